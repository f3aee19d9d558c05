//! Scripted transport for exercising the store client without a network.

#![allow(dead_code)]

use librtdb::network::error::Error;
use librtdb::network::{Close, Connect, Connection, Delay, Read, Write};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// What the mock store saw, shared with the test after the client took ownership.
#[derive(Debug, Default)]
pub struct Transcript {
    pub requests: Vec<String>,
    pub attempts: usize,
    pub closes: usize,
    pub ports: Vec<u16>,
    pub hosts: Vec<String>,
}

/// How a scripted connection ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hangup {
    /// The link stays open until every byte has been read.
    AfterDrain,
    /// The peer closed right after flushing; only buffered bytes remain.
    Immediately,
}

#[derive(Debug)]
pub struct MockConnection {
    incoming: Vec<u8>,
    read_pos: usize,
    written: Vec<u8>,
    hangup: Hangup,
    transcript: Rc<RefCell<Transcript>>,
}

impl Read for MockConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.incoming.len() - self.read_pos;
        let len = buf.len().min(remaining);
        buf[..len].copy_from_slice(&self.incoming[self.read_pos..self.read_pos + len]);
        self.read_pos += len;
        Ok(len)
    }
}

impl Write for MockConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        // Accept at most 100 bytes per call to exercise partial writes.
        let len = buf.len().min(100);
        self.written.extend_from_slice(&buf[..len]);
        Ok(len)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MockConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        let mut transcript = self.transcript.borrow_mut();
        transcript.closes += 1;
        transcript
            .requests
            .push(String::from_utf8(self.written).expect("request is utf-8"));
        Ok(())
    }
}

impl Connection for MockConnection {
    fn is_open(&self) -> bool {
        match self.hangup {
            Hangup::AfterDrain => self.read_pos < self.incoming.len(),
            Hangup::Immediately => false,
        }
    }

    fn available(&mut self) -> usize {
        self.incoming.len() - self.read_pos
    }
}

/// Hands out one scripted response per successful connection.
#[derive(Debug)]
pub struct MockStore {
    responses: VecDeque<&'static str>,
    failures: usize,
    hangup: Hangup,
    pub transcript: Rc<RefCell<Transcript>>,
}

impl MockStore {
    pub fn new(responses: &[&'static str]) -> Self {
        Self {
            responses: responses.iter().copied().collect(),
            failures: 0,
            hangup: Hangup::AfterDrain,
            transcript: Rc::new(RefCell::new(Transcript::default())),
        }
    }

    /// A store that is never reachable.
    pub fn unreachable() -> Self {
        let mut store = Self::new(&[]);
        store.failures = usize::MAX;
        store
    }

    /// Fail the first `failures` connection attempts.
    pub fn failing_first(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }

    pub fn hangup(mut self, hangup: Hangup) -> Self {
        self.hangup = hangup;
        self
    }

    pub fn transcript(&self) -> Rc<RefCell<Transcript>> {
        Rc::clone(&self.transcript)
    }
}

impl Connect for MockStore {
    type Connection = MockConnection;
    type Error = Error;

    fn connect(&mut self, host: &str, port: u16) -> Result<Self::Connection, Self::Error> {
        let mut transcript = self.transcript.borrow_mut();
        transcript.attempts += 1;
        transcript.ports.push(port);
        transcript.hosts.push(host.to_string());

        if self.failures > 0 {
            self.failures -= 1;
            return Err(Error::ConnectionRefused);
        }

        let response = self.responses.pop_front().unwrap_or("");
        Ok(MockConnection {
            incoming: response.as_bytes().to_vec(),
            read_pos: 0,
            written: Vec::new(),
            hangup: self.hangup,
            transcript: Rc::clone(&self.transcript),
        })
    }
}

/// A clock that only advances when slept on.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    elapsed_ms: Rc<Cell<u64>>,
}

impl SimulatedClock {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms.get()
    }
}

impl Delay for SimulatedClock {
    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms.set(self.elapsed_ms.get() + u64::from(ms));
    }
}
