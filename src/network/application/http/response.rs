use crate::network::Connection;
use crate::network::error::Error;
use heapless::{String, Vec};

/// The only status the store uses for success.
pub const STATUS_OK: u16 = 200;

/// Body reported for every response whose status is not [`STATUS_OK`].
pub const NO_DATA: &str = "NULL";

/// Longest status or header line kept; the remainder of a longer line is dropped.
pub const MAX_LINE_LEN: usize = 512;

/// Capacity of the accumulated response body.
pub const MAX_BODY_LEN: usize = 2048;

const HTTP_VERSION_PREFIX: &str = "HTTP/";

/// Which part of the response the reader is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Nothing but (possibly) noise seen so far.
    StatusLine,
    /// Status line consumed; header lines are skipped.
    Headers,
    /// The empty line was seen; every further line belongs to the body.
    Body,
}

/// Status code and body of one store response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Parsed status code, 0 if no well-formed status line arrived.
    pub status_code: u16,
    /// Body with one pair of enclosing quotes removed, or [`NO_DATA`].
    pub body: String<MAX_BODY_LEN>,
}

impl Response {
    /// The response every failed exchange collapses to.
    pub fn empty() -> Self {
        Self {
            status_code: 0,
            body: no_data(),
        }
    }

    /// Whether the store answered with [`STATUS_OK`].
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }

    /// The body as text.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Incremental, line-oriented response parser.
///
/// Bytes are fed in arbitrary chunks. Status and header lines go through a
/// small line buffer; body bytes go straight into the body so a body line may
/// be as long as the whole body buffer. Lines are trimmed of trailing
/// whitespace and body lines are concatenated without separators, which
/// rebuilds the single-line JSON the store emits.
#[derive(Debug)]
pub struct ResponseReader {
    section: Section,
    status_code: u16,
    line: Vec<u8, MAX_LINE_LEN>,
    body: Vec<u8, MAX_BODY_LEN>,
}

impl Default for ResponseReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseReader {
    /// Creates a reader awaiting the status line.
    pub fn new() -> Self {
        Self {
            section: Section::StatusLine,
            status_code: 0,
            line: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Current section.
    pub fn section(&self) -> Section {
        self.section
    }

    /// Status code parsed so far.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Consumes a chunk of response bytes.
    ///
    /// Fails only when a success body outgrows [`MAX_BODY_LEN`]; bodies of
    /// other statuses are discarded as they arrive.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), Error> {
        for &byte in bytes {
            match self.section {
                Section::StatusLine | Section::Headers => {
                    if byte == b'\n' {
                        self.end_header_line();
                    } else {
                        // Overlong header lines are truncated, only their
                        // prefix or emptiness matters.
                        let _ = self.line.push(byte);
                    }
                }
                Section::Body => {
                    if self.status_code != STATUS_OK {
                        continue;
                    }
                    if byte == b'\n' {
                        trim_end(&mut self.body);
                    } else {
                        self.body.push(byte).map_err(|_| Error::BufferOverflow)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Flushes a trailing unterminated line and builds the [`Response`].
    pub fn finish(mut self) -> Result<Response, Error> {
        match self.section {
            Section::StatusLine | Section::Headers => {
                if !self.line.is_empty() {
                    self.end_header_line();
                }
            }
            Section::Body => trim_end(&mut self.body),
        }

        if self.status_code != STATUS_OK {
            return Ok(Response {
                status_code: self.status_code,
                body: no_data(),
            });
        }

        let text = core::str::from_utf8(&self.body).map_err(|_| Error::ReadError)?;
        let text = strip_quotes(text);
        Ok(Response {
            status_code: self.status_code,
            body: String::try_from(text).map_err(|_| Error::BufferOverflow)?,
        })
    }

    fn end_header_line(&mut self) {
        trim_end(&mut self.line);

        if self.line.is_empty() {
            self.section = Section::Body;
        } else if let Ok(line) = core::str::from_utf8(&self.line) {
            if line.starts_with(HTTP_VERSION_PREFIX) {
                self.status_code = parse_status_code(line);
                self.section = Section::Headers;
            }
        }

        self.line.clear();
    }
}

/// Drains `connection` into a [`Response`].
///
/// Reading continues while the link is open or bytes are still buffered, so
/// the last line survives a server that closes right after flushing it. A
/// read error ends the exchange as if the peer had dropped the link.
pub fn read_response<C: Connection>(connection: &mut C) -> Result<Response, Error> {
    let mut reader = ResponseReader::new();
    let mut chunk = [0u8; 64];

    while connection.is_open() || connection.available() > 0 {
        let ready = connection.available().min(chunk.len());
        if ready == 0 {
            core::hint::spin_loop();
            continue;
        }

        match connection.read(&mut chunk[..ready]) {
            // Some TLS stacks count undecrypted bytes as available.
            Ok(0) => {
                debug!("read returned no data, treating link as closed");
                break;
            }
            Ok(n) => reader.feed(&chunk[..n])?,
            Err(_) => {
                warn!("read failed, treating link as closed");
                break;
            }
        }
    }

    let response = reader.finish()?;
    debug!("response status {}", response.status_code);
    Ok(response)
}

/// Status code between the first and second space of a status line.
///
/// Like the lenient integer conversion on the device side, only leading
/// digits count and anything unparsable is 0. Unlike it, codes that do not
/// fit a `u16` (including negative ones) are 0 as well; real HTTP status
/// codes are three digits.
fn parse_status_code(line: &str) -> u16 {
    let Some(first) = line.find(' ') else {
        return 0;
    };
    let rest = &line[first + 1..];
    let Some(second) = rest.find(' ') else {
        return 0;
    };

    let code = &rest[..second];
    let digits = code
        .as_bytes()
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    code[..digits].parse().unwrap_or(0)
}

fn strip_quotes(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

fn trim_end<const N: usize>(bytes: &mut Vec<u8, N>) {
    while bytes.last().is_some_and(|b| b.is_ascii_whitespace()) {
        bytes.pop();
    }
}

fn no_data() -> String<MAX_BODY_LEN> {
    let mut body = String::new();
    // NO_DATA is far below MAX_BODY_LEN.
    let _ = body.push_str(NO_DATA);
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Response {
        let mut reader = ResponseReader::new();
        reader.feed(raw.as_bytes()).unwrap();
        reader.finish().unwrap()
    }

    #[test]
    fn test_sections_advance_on_status_and_blank_line() {
        let mut reader = ResponseReader::new();
        assert_eq!(reader.section(), Section::StatusLine);

        reader.feed(b"HTTP/1.1 200 OK\r\n").unwrap();
        assert_eq!(reader.section(), Section::Headers);
        assert_eq!(reader.status_code(), 200);

        reader.feed(b"Content-Type: application/json\r\n").unwrap();
        assert_eq!(reader.section(), Section::Headers);

        reader.feed(b"\r\n").unwrap();
        assert_eq!(reader.section(), Section::Body);
    }

    #[test]
    fn test_string_body_is_unquoted() {
        let response = parse("HTTP/1.1 200 OK\r\n\r\n\"hello\"\r\n");
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body(), "hello");
    }

    #[test]
    fn test_object_body_is_kept() {
        let response = parse(
            "HTTP/1.1 200 OK\r\nContent-Length: 13\r\n\r\n{\"a\":1,\"b\":2}\r\n",
        );
        assert_eq!(response.body(), "{\"a\":1,\"b\":2}");
    }

    #[test]
    fn test_only_one_quote_pair_is_stripped() {
        let response = parse("HTTP/1.1 200 OK\r\n\r\n\"\"nested\"\"\r\n");
        assert_eq!(response.body(), "\"nested\"");
    }

    #[test]
    fn test_lone_quote_is_not_stripped() {
        let response = parse("HTTP/1.1 200 OK\r\n\r\n\"\r\n");
        assert_eq!(response.body(), "\"");
    }

    #[test]
    fn test_error_status_yields_sentinel() {
        let response = parse("HTTP/1.1 404 Not Found\r\n\r\n{\"error\":\"nope\"}\r\n");
        assert_eq!(response.status_code, 404);
        assert_eq!(response.body(), NO_DATA);
    }

    #[test]
    fn test_multi_line_body_is_concatenated() {
        let response = parse("HTTP/1.1 200 OK\r\n\r\n{\"a\":\r\n  1}\r\n");
        assert_eq!(response.body(), "{\"a\":  1}");
    }

    #[test]
    fn test_missing_reason_phrase_leaves_status_unset() {
        let response = parse("HTTP/1.1 200\r\n\r\n\"x\"\r\n");
        assert_eq!(response.status_code, 0);
        assert_eq!(response.body(), NO_DATA);
    }

    #[test]
    fn test_non_numeric_status_is_zero() {
        let mut reader = ResponseReader::new();
        reader.feed(b"HTTP/1.1 abc Weird\r\n").unwrap();
        assert_eq!(reader.status_code(), 0);
        assert_eq!(reader.section(), Section::Headers);
    }

    #[test]
    fn test_status_digits_prefix_is_used() {
        assert_eq!(parse_status_code("HTTP/1.1 201x Created"), 201);
        assert_eq!(parse_status_code("HTTP/1.1 99999 Big"), 0);
        assert_eq!(parse_status_code("HTTP/1.1"), 0);
    }

    #[test]
    fn test_noise_before_status_line_is_skipped() {
        let mut reader = ResponseReader::new();
        reader.feed(b"garbage\r\n").unwrap();
        assert_eq!(reader.section(), Section::StatusLine);
        reader.feed(b"HTTP/1.1 200 OK\r\n\r\ntrue").unwrap();
        let response = reader.finish().unwrap();
        assert_eq!(response.body(), "true");
    }

    #[test]
    fn test_no_bytes_means_status_zero() {
        let response = ResponseReader::new().finish().unwrap();
        assert_eq!(response, Response::empty());
    }

    #[test]
    fn test_bytes_may_arrive_one_at_a_time() {
        let raw = b"HTTP/1.1 200 OK\r\nServer: x\r\n\r\n42\r\n";
        let mut reader = ResponseReader::new();
        for byte in raw {
            reader.feed(core::slice::from_ref(byte)).unwrap();
        }
        let response = reader.finish().unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body(), "42");
    }

    #[test]
    fn test_overlong_header_is_truncated() {
        let mut reader = ResponseReader::new();
        reader.feed(b"HTTP/1.1 200 OK\r\nSet-Cookie: ").unwrap();
        reader.feed(&[b'x'; MAX_LINE_LEN * 2]).unwrap();
        reader.feed(b"\r\n\r\n1\r\n").unwrap();
        assert_eq!(reader.finish().unwrap().body(), "1");
    }

    #[test]
    fn test_oversized_success_body_overflows() {
        let mut reader = ResponseReader::new();
        reader.feed(b"HTTP/1.1 200 OK\r\n\r\n").unwrap();
        assert_eq!(
            reader.feed(&[b'7'; MAX_BODY_LEN + 1]),
            Err(Error::BufferOverflow)
        );
    }

    #[test]
    fn test_oversized_error_body_is_discarded() {
        let mut reader = ResponseReader::new();
        reader.feed(b"HTTP/1.1 500 Oops\r\n\r\n").unwrap();
        reader.feed(&[b'e'; MAX_BODY_LEN + 1]).unwrap();
        assert_eq!(reader.finish().unwrap().body(), NO_DATA);
    }

    /// Reports buffered bytes it never hands out, like a TLS stack holding
    /// an incomplete record.
    struct StalledConnection {
        incoming: &'static [u8],
    }

    impl crate::network::Read for StalledConnection {
        type Error = ();
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let n = buf.len().min(self.incoming.len());
            buf[..n].copy_from_slice(&self.incoming[..n]);
            self.incoming = &self.incoming[n..];
            Ok(n)
        }
    }

    impl crate::network::Write for StalledConnection {
        type Error = ();
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl crate::network::Close for StalledConnection {
        type Error = ();
        fn close(self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl Connection for StalledConnection {
        fn is_open(&self) -> bool {
            true
        }
        fn available(&mut self) -> usize {
            self.incoming.len().max(5)
        }
    }

    #[test]
    fn test_empty_read_ends_exchange() {
        let mut connection = StalledConnection { incoming: b"" };
        let response = read_response(&mut connection).unwrap();
        assert_eq!(response.status_code, 0);
        assert_eq!(response.body(), NO_DATA);
    }

    #[test]
    fn test_empty_read_keeps_received_lines() {
        let mut connection = StalledConnection {
            incoming: b"HTTP/1.1 200 OK\r\n\r\n\"partial\"",
        };
        let response = read_response(&mut connection).unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body(), "partial");
    }

    #[test]
    fn test_out_of_range_status_is_zero() {
        assert_eq!(parse_status_code("HTTP/1.1 70000 Huge"), 0);
        assert_eq!(parse_status_code("HTTP/1.1 -200 Negative"), 0);
    }
}
