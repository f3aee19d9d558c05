use crate::network::error::Error;
use core::fmt::Write;
use heapless::{String, Vec};

/// Capacity of the buffer a whole request is serialised into.
pub const MAX_REQUEST_LEN: usize = 2048;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/4.0 (compatible; Arduino Device; Windows NT 5.1)";

const CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// The four verbs the store understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Replace the value at a path.
    Put,
    /// Append a child under a store-generated key.
    Post,
    /// Read the value at a path.
    Get,
    /// Delete the value at a path.
    Delete,
}

impl Method {
    /// Token used in the request line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Get => "GET",
            Method::Delete => "DELETE",
        }
    }

    /// Whether requests with this verb carry a JSON payload.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Put | Method::Post)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Method {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

/// One store request. Built per call and dropped once the response is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    /// HTTP verb.
    pub method: Method,
    /// Logical store path without leading slash or `.json` suffix. Not escaped.
    pub path: &'a str,
    /// JSON payload; ignored for verbs without a body.
    pub body: Option<&'a str>,
}

impl<'a> Request<'a> {
    /// Serialises the request into `buf`.
    ///
    /// The target is `/<path>.json`, followed by `?auth=<auth>` when `auth` is
    /// non-empty. Headers are emitted in a fixed order; `Content-Type` and
    /// `Content-Length` only for verbs with a body, which is followed by a
    /// trailing CRLF.
    pub fn write_to<const N: usize>(
        &self,
        host: &str,
        auth: &str,
        buf: &mut Vec<u8, N>,
    ) -> Result<(), Error> {
        buf.clear();

        // Request line
        put(buf, self.method.as_str())?;
        put(buf, " /")?;
        put(buf, self.path)?;
        put(buf, ".json")?;
        if !auth.is_empty() {
            put(buf, "?auth=")?;
            put(buf, auth)?;
        }
        put(buf, " HTTP/1.1\r\n")?;

        // Headers
        header(buf, "Host", host)?;
        header(buf, "Connection", "close")?;
        header(buf, "Accept", "*/*")?;
        header(buf, "User-Agent", USER_AGENT)?;

        if self.method.has_body() {
            let body = self.body.unwrap_or("");
            let mut len_str: String<10> = String::new();
            write!(len_str, "{}", body.len()).map_err(|_| Error::BufferOverflow)?;

            header(buf, "Content-Type", CONTENT_TYPE)?;
            header(buf, "Content-Length", &len_str)?;
            put(buf, "\r\n")?;
            put(buf, body)?;
            put(buf, "\r\n")?;
        } else {
            put(buf, "\r\n")?;
        }

        Ok(())
    }
}

fn put<const N: usize>(buf: &mut Vec<u8, N>, text: &str) -> Result<(), Error> {
    buf.extend_from_slice(text.as_bytes())
        .map_err(|_| Error::BufferOverflow)
}

fn header<const N: usize>(buf: &mut Vec<u8, N>, name: &str, value: &str) -> Result<(), Error> {
    put(buf, name)?;
    put(buf, ": ")?;
    put(buf, value)?;
    put(buf, "\r\n")
}
