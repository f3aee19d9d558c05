//! A network abstraction layer for embedded systems
//!
//! This module defines the small set of blocking traits the store client is
//! written against. A platform wires its TLS socket into [`Connection`] and
//! [`Connect`], and its timer into [`Delay`]; everything above this layer is
//! platform independent.
//!

#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Bounded-retry connection establishment
pub mod connector;

/// Application layer protocols
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Delay, Read, Write};
}

/// Blocking byte source.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Blocking byte sink.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Tear-down of a connection.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous, stream-oriented connection.
///
/// Besides byte I/O a connection reports its link state. The response reader
/// keeps draining while the link is open *or* bytes are still buffered,
/// because a server may close the socket right after flushing its last line.
pub trait Connection: Read + Write + Close {
    /// Whether the peer has not (yet) closed the link.
    fn is_open(&self) -> bool;

    /// Number of bytes that can be read without blocking.
    fn available(&mut self) -> usize;
}

/// A synchronous connector (client).
///
/// One call is one connection attempt, e.g. a single TLS handshake. Retrying
/// is the job of [`connector::connect_with_retry`].
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to `host` on `port`
    fn connect(&mut self, host: &str, port: u16) -> Result<Self::Connection, Self::Error>;
}

/// Blocking millisecond delay, usually backed by a hardware timer.
pub trait Delay {
    /// Block the calling thread for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

impl<T: Delay + ?Sized> Delay for &mut T {
    fn delay_ms(&mut self, ms: u32) {
        T::delay_ms(self, ms)
    }
}
