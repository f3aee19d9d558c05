//! HTTP/1.1 protocol implementation for embedded systems.
//!
//! Only the subset a document store needs: four verbs, a fixed header set,
//! `Connection: close` on every request, and a response reader that recovers
//! the status code and a single-line body without ever buffering the whole
//! response.
//!
//! ```rust
//! use librtdb::network::application::http::{Method, Request};
//!
//! let request = Request {
//!     method: Method::Put,
//!     path: "sensors/temperature",
//!     body: Some("21.5"),
//! };
//!
//! let mut buf: heapless::Vec<u8, 512> = heapless::Vec::new();
//! request.write_to("db.example.com", "", &mut buf).unwrap();
//! assert!(buf.starts_with(b"PUT /sensors/temperature.json HTTP/1.1\r\n"));
//! ```

/// Request line, header and body serialisation.
pub mod request;

/// Status-line / headers / body state machine.
pub mod response;

pub use request::{MAX_REQUEST_LEN, Method, Request, USER_AGENT};
pub use response::{
    MAX_BODY_LEN, MAX_LINE_LEN, NO_DATA, Response, ResponseReader, STATUS_OK, Section,
    read_response,
};
