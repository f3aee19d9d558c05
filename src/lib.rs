//! # librtdb - embedded REST client for hosted JSON document stores
//!
//! A minimal client for a Firebase Realtime Database style store, written for
//! devices with little memory and a blocking, single-threaded network stack.
//! The library does not allocate: requests, response lines and bodies live in
//! fixed-size `heapless` buffers.
//!
//! ## Layers
//!
//! - [`network`]: the blocking transport traits a platform implements
//!   ([`Connection`](network::Connection), [`Connect`](network::Connect),
//!   [`Delay`](network::Delay)) and the bounded-retry connector.
//! - [`network::application::http`]: HTTP/1.1 request builder and a streaming,
//!   line-oriented response reader.
//! - [`network::application::rtdb`]: the store client with typed
//!   set/push/get/remove operations.
//! - [`registry`]: an application-owned device registry updated from polled
//!   store documents.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! librtdb = "0.1.0"
//! ```
//!
//! ```rust,no_run
//! use librtdb::network::application::rtdb::{Client, Options};
//! # use librtdb::network::{Close, Connect, Connection, Delay, Read, Write};
//! # struct Tls;
//! # impl Read for Tls {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl Write for Tls {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Close for Tls {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Connection for Tls {
//! #     fn is_open(&self) -> bool { false }
//! #     fn available(&mut self) -> usize { 0 }
//! # }
//! # struct Stack;
//! # impl Connect for Stack {
//! #     type Connection = Tls;
//! #     type Error = ();
//! #     fn connect(&mut self, _host: &str, _port: u16) -> Result<Tls, ()> { Ok(Tls) }
//! # }
//! # struct Timer;
//! # impl Delay for Timer { fn delay_ms(&mut self, _ms: u32) {} }
//!
//! let options = Options::new("https://demo-default-rtdb.firebaseio.com/")
//!     .with_auth_token("database-secret");
//! let mut client = Client::new(Stack, Timer, options).unwrap();
//!
//! let status = client.set_string("greeting", "hello");
//! if status != 200 {
//!     // 0 means the store was never reached
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (a `std::thread::sleep` based delay)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod fmt;

/// Network abstraction layer: transport traits, retrying connector and
/// application protocols.
pub mod network;

/// Application-owned device registry fed from store documents.
pub mod registry;
