//! Conversions between typed values and the JSON scalar text the store
//! exchanges.
//!
//! Decoding never fails: text that does not look like the requested type
//! decodes to that type's default, so the status code returned alongside is
//! the only reliable failure signal.

use crate::network::error::Error;
use core::fmt::Write;
use heapless::String;

/// Renders a value as a request payload.
pub trait Encode {
    /// Appends the JSON text of `self` to `out`.
    fn encode<const N: usize>(&self, out: &mut String<N>) -> Result<(), Error>;
}

/// Recovers a value from response text.
///
/// `Default` is the value reported when the store did not answer with
/// success.
pub trait Decode: Default {
    /// Parses `text`, falling back to the default.
    fn decode(text: &str) -> Self;
}

/// Raw JSON supplied by the caller, sent as-is.
///
/// Text wrapped in one pair of double quotes is unwrapped first, so a
/// document that was itself stored as a string is not encoded twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Json<'a>(pub &'a str);

impl Encode for str {
    fn encode<const N: usize>(&self, out: &mut String<N>) -> Result<(), Error> {
        push(out, "\"")?;
        push(out, self)?;
        push(out, "\"")
    }
}

impl<const M: usize> Encode for String<M> {
    fn encode<const N: usize>(&self, out: &mut String<N>) -> Result<(), Error> {
        self.as_str().encode(out)
    }
}

impl Encode for i32 {
    fn encode<const N: usize>(&self, out: &mut String<N>) -> Result<(), Error> {
        write!(out, "{}", self).map_err(|_| Error::BufferOverflow)
    }
}

impl Encode for f32 {
    fn encode<const N: usize>(&self, out: &mut String<N>) -> Result<(), Error> {
        if self.is_finite() {
            write!(out, "{}", self).map_err(|_| Error::BufferOverflow)
        } else {
            // JSON has no NaN or infinity.
            push(out, "null")
        }
    }
}

impl Encode for bool {
    fn encode<const N: usize>(&self, out: &mut String<N>) -> Result<(), Error> {
        push(out, if *self { "true" } else { "false" })
    }
}

impl Encode for Json<'_> {
    fn encode<const N: usize>(&self, out: &mut String<N>) -> Result<(), Error> {
        let text = self.0;
        let text = if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            &text[1..text.len() - 1]
        } else {
            text
        };
        push(out, text)
    }
}

impl Decode for i32 {
    /// Optional sign and leading digits; `"12.5"` is 12, `"abc"` is 0.
    fn decode(text: &str) -> Self {
        let text = text.trim_start();
        let bytes = text.as_bytes();
        let sign = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
        let digits = bytes[sign..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        text[..sign + digits].parse().unwrap_or(0)
    }
}

impl Decode for f32 {
    fn decode(text: &str) -> Self {
        text.trim().parse().unwrap_or(0.0)
    }
}

impl Decode for bool {
    /// Only the literal `true` is true.
    fn decode(text: &str) -> Self {
        text == "true"
    }
}

fn push<const N: usize>(out: &mut String<N>, text: &str) -> Result<(), Error> {
    out.push_str(text).map_err(|_| Error::BufferOverflow)
}
