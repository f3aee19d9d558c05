//! Store client composing connector, request builder and response reader.

use super::value::{Decode, Encode, Json};
use crate::network::application::http::{
    MAX_BODY_LEN, MAX_REQUEST_LEN, Method, Request, Response, read_response,
};
use crate::network::connector::{RetryPolicy, connect_with_retry};
use crate::network::error::Error;
use crate::network::{Close, Connect, Connection, Delay};
use heapless::{String, Vec};

/// Capacity of the normalised host name.
pub const MAX_HOST_LEN: usize = 128;
/// Capacity of the auth token.
pub const MAX_TOKEN_LEN: usize = 256;
/// Capacity of an encoded payload.
pub const MAX_PAYLOAD_LEN: usize = 1536;

const SCHEME: &str = "https://";

/// Options for configuring the store client.
#[derive(Debug, Clone, Copy)]
pub struct Options<'a> {
    /// Database URL, with or without `https://` and a trailing slash.
    pub reference_url: &'a str,
    /// Token appended as `?auth=`; empty for a public database.
    pub auth_token: &'a str,
    /// Connection retry budget.
    pub retry: RetryPolicy,
}

impl<'a> Options<'a> {
    /// Options for an unauthenticated database with the default retry budget.
    pub fn new(reference_url: &'a str) -> Self {
        Self {
            reference_url,
            auth_token: "",
            retry: RetryPolicy::default(),
        }
    }

    /// Sets the auth token.
    pub fn with_auth_token(mut self, auth_token: &'a str) -> Self {
        self.auth_token = auth_token;
        self
    }
}

/// A blocking REST client for a hosted JSON document store.
///
/// Each operation opens a fresh connection, sends one request with
/// `Connection: close`, reads the response to the end and closes the
/// connection again. The typed methods follow a status-code contract: they
/// return the HTTP status, or 0 when no status line was received, and reset
/// read outputs to their default on any failure. [`Client::execute`] exposes
/// the underlying failure reason for callers that want it.
pub struct Client<K: Connect, D: Delay> {
    connector: K,
    delay: D,
    host: String<MAX_HOST_LEN>,
    auth_token: String<MAX_TOKEN_LEN>,
    retry: RetryPolicy,
}

impl<K: Connect, D: Delay> core::fmt::Debug for Client<K, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.host.as_str())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl<K: Connect, D: Delay> Client<K, D> {
    /// Creates a client, normalising the reference URL once.
    ///
    /// Fails with [`Error::InvalidAddress`] if the host or token does not fit.
    pub fn new(connector: K, delay: D, options: Options) -> Result<Self, Error> {
        let host = normalize_host(options.reference_url);
        Ok(Self {
            connector,
            delay,
            host: String::try_from(host).map_err(|_| Error::InvalidAddress)?,
            auth_token: String::try_from(options.auth_token).map_err(|_| Error::InvalidAddress)?,
            retry: options.retry,
        })
    }

    /// Host name requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Mutable access to the connector, e.g. to reconfigure TLS.
    pub fn connector_mut(&mut self) -> &mut K {
        &mut self.connector
    }

    /// Performs one request/response exchange.
    ///
    /// The request is serialised before connecting so an oversized request
    /// never touches the network.
    pub fn execute(&mut self, request: &Request) -> Result<Response, Error> {
        let mut request_buf: Vec<u8, MAX_REQUEST_LEN> = Vec::new();
        request.write_to(&self.host, &self.auth_token, &mut request_buf)?;

        let mut connection =
            connect_with_retry(&mut self.connector, &mut self.delay, &self.host, self.retry)?;

        info!("{} /{}.json", request.method, request.path);
        let result = exchange(&mut connection, &request_buf);

        if connection.close().is_err() {
            warn!("closing connection failed");
        }
        result
    }

    // --- Set (PUT) ---

    /// Stores a string at `path`.
    pub fn set_string(&mut self, path: &str, value: &str) -> u16 {
        self.send(Method::Put, path, value)
    }

    /// Stores an integer at `path`.
    pub fn set_int(&mut self, path: &str, value: i32) -> u16 {
        self.send(Method::Put, path, &value)
    }

    /// Stores a float at `path`.
    pub fn set_float(&mut self, path: &str, value: f32) -> u16 {
        self.send(Method::Put, path, &value)
    }

    /// Stores a boolean at `path`.
    pub fn set_bool(&mut self, path: &str, value: bool) -> u16 {
        self.send(Method::Put, path, &value)
    }

    /// Stores a JSON document at `path`.
    pub fn set_json(&mut self, path: &str, value: &str) -> u16 {
        self.send(Method::Put, path, &Json(value))
    }

    // --- Push (POST) ---

    /// Appends a string under a store-generated key below `path`.
    pub fn push_string(&mut self, path: &str, value: &str) -> u16 {
        self.send(Method::Post, path, value)
    }

    /// Appends an integer under a store-generated key below `path`.
    pub fn push_int(&mut self, path: &str, value: i32) -> u16 {
        self.send(Method::Post, path, &value)
    }

    /// Appends a float under a store-generated key below `path`.
    pub fn push_float(&mut self, path: &str, value: f32) -> u16 {
        self.send(Method::Post, path, &value)
    }

    /// Appends a boolean under a store-generated key below `path`.
    pub fn push_bool(&mut self, path: &str, value: bool) -> u16 {
        self.send(Method::Post, path, &value)
    }

    /// Appends a JSON document under a store-generated key below `path`.
    pub fn push_json(&mut self, path: &str, value: &str) -> u16 {
        self.send(Method::Post, path, &Json(value))
    }

    // --- Get (GET) ---

    /// Reads a string. On failure `result` holds
    /// [`NO_DATA`](crate::network::application::http::NO_DATA).
    pub fn get_string(&mut self, path: &str, result: &mut String<MAX_BODY_LEN>) -> u16 {
        let response = self.fetch(path);
        *result = response.body;
        response.status_code
    }

    /// Reads an integer. On failure `result` is 0.
    pub fn get_int(&mut self, path: &str, result: &mut i32) -> u16 {
        self.get_value(path, result)
    }

    /// Reads a float. On failure `result` is 0.0.
    pub fn get_float(&mut self, path: &str, result: &mut f32) -> u16 {
        self.get_value(path, result)
    }

    /// Reads a boolean; only the literal `true` is true. On failure `result` is false.
    pub fn get_bool(&mut self, path: &str, result: &mut bool) -> u16 {
        self.get_value(path, result)
    }

    /// Reads a JSON document as text. Same as [`Client::get_string`].
    pub fn get_json(&mut self, path: &str, result: &mut String<MAX_BODY_LEN>) -> u16 {
        self.get_string(path, result)
    }

    // --- Remove (DELETE) ---

    /// Deletes the value at `path`.
    pub fn remove(&mut self, path: &str) -> u16 {
        let request = Request {
            method: Method::Delete,
            path,
            body: None,
        };
        status_of(self.execute(&request))
    }

    fn send<V: Encode + ?Sized>(&mut self, method: Method, path: &str, value: &V) -> u16 {
        let mut payload: String<MAX_PAYLOAD_LEN> = String::new();
        if value.encode(&mut payload).is_err() {
            warn!("payload for /{} does not fit", path);
            return 0;
        }

        let request = Request {
            method,
            path,
            body: Some(payload.as_str()),
        };
        status_of(self.execute(&request))
    }

    fn fetch(&mut self, path: &str) -> Response {
        let request = Request {
            method: Method::Get,
            path,
            body: None,
        };
        self.execute(&request).unwrap_or_else(|_error| {
            debug!("get /{} failed: {}", path, _error);
            Response::empty()
        })
    }

    fn get_value<T: Decode>(&mut self, path: &str, result: &mut T) -> u16 {
        let response = self.fetch(path);
        *result = if response.is_success() {
            T::decode(response.body())
        } else {
            T::default()
        };
        response.status_code
    }
}

/// Writes the serialised request and reads the response.
fn exchange<C: Connection>(connection: &mut C, request: &[u8]) -> Result<Response, Error> {
    let mut written = 0;
    while written < request.len() {
        match connection.write(&request[written..]) {
            Ok(0) | Err(_) => return Err(Error::WriteError),
            Ok(n) => written += n,
        }
    }
    connection.flush().map_err(|_| Error::WriteError)?;

    read_response(connection)
}

fn status_of(result: Result<Response, Error>) -> u16 {
    match result {
        Ok(response) => response.status_code,
        Err(_error) => {
            debug!("request failed: {}", _error);
            0
        }
    }
}

/// Strips a leading `https://` and one trailing `/`.
fn normalize_host(reference_url: &str) -> &str {
    let host = reference_url.strip_prefix(SCHEME).unwrap_or(reference_url);
    host.strip_suffix('/').unwrap_or(host)
}
