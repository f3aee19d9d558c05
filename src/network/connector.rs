//! Bounded-retry connection establishment.
//!
//! Embedded TLS stacks have no asynchronous connect, so the only way to ride
//! out a flaky radio link is to try again after a pause. The pause is fixed
//! rather than exponential so the worst-case latency of a store operation is
//! known up front: `attempts * delay_ms` at most.

use super::error::Error;
use super::{Connect, Delay};

/// TCP port of the store's HTTPS endpoint.
pub const PORT: u16 = 443;

/// How often and how patiently to attempt a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of connection attempts. Zero is treated as one.
    pub attempts: u8,
    /// Pause between two consecutive attempts, in milliseconds.
    pub delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 30,
            delay_ms: 100,
        }
    }
}

/// Opens a connection to `host` on [`PORT`], retrying per `policy`.
///
/// The delay is slept between attempts only, so with the default policy a
/// host that never answers costs 30 attempts and 2900 ms of sleep before
/// [`Error::ConnectionRefused`] is returned.
pub fn connect_with_retry<K, D>(
    connector: &mut K,
    delay: &mut D,
    host: &str,
    policy: RetryPolicy,
) -> Result<K::Connection, Error>
where
    K: Connect,
    D: Delay,
{
    let attempts = policy.attempts.max(1);
    for attempt in 1..=attempts {
        match connector.connect(host, PORT) {
            Ok(connection) => {
                debug!("connected to {} after {} attempt(s)", host, attempt);
                return Ok(connection);
            }
            Err(_) => {
                debug!("connect attempt {} to {} failed", attempt, host);
                if attempt < attempts {
                    delay.delay_ms(policy.delay_ms);
                }
            }
        }
    }

    warn!("giving up on {} after {} attempts", host, attempts);
    Err(Error::ConnectionRefused)
}

/// A [`Delay`] backed by `std::thread::sleep`, for hosted targets.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
