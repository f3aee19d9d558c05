//! Common error types for network operations

/// A common error type for network operations.
///
/// Every variant describes why a single store operation failed. None of them
/// is fatal to the client; the next operation starts from a fresh connection.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// Every connection attempt of the retry budget failed.
    ConnectionRefused,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// The reference URL or auth token does not fit the client's buffers.
    InvalidAddress,
    /// A request or response did not fit its fixed-size buffer.
    BufferOverflow,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
        }
    }
}
