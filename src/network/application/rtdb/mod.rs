//! REST client for a hosted JSON document store (Firebase Realtime Database
//! style).
//!
//! Every logical path is addressed as `/<path>.json`; set, push, get and
//! remove map to PUT, POST, GET and DELETE. Values travel as JSON scalars:
//! strings are quoted, numbers and booleans are bare, and raw JSON is passed
//! through.
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
//! let options = Options::new("https://demo-default-rtdb.firebaseio.com/");
//! let mut client = Client::new(Stack, Timer, options).unwrap();
//!
//! if client.set_int("sensors/counter", 42) == 200 {
//!     let mut counter = 0;
//!     client.get_int("sensors/counter", &mut counter);
//! }
//! ```

pub mod client;
pub mod value;

pub use client::{Client, MAX_HOST_LEN, MAX_PAYLOAD_LEN, MAX_TOKEN_LEN, Options};
pub use value::{Decode, Encode, Json};
