//! # Application Layer Network Protocols
//!
//! - **[`http`]**: the HTTP/1.1 request builder and streaming response reader
//! - **[`rtdb`]**: the document store client built on top of it
//!
//! Both work with any type implementing [`Connection`](crate::network::Connection)
//! and only use fixed-size buffers.

/// HTTP/1.1 request serialisation and line-oriented response parsing.
pub mod http;

/// REST client for a hosted JSON document store.
pub mod rtdb;
