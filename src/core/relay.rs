//! # Relay
//!
//! A bounded, thread-safe FIFO of text fragments standing in for a blocking
//! text stream. One relay carries commands from the interface to the engine,
//! another carries narrative text back.
//!
//! The interface thread only ever calls [`Relay::try_drain`] (never blocks)
//! and [`Relay::write`] on user-paced submission. The engine side blocks
//! freely through the [`RelayReader`] / [`RelayWriter`] adapters, which
//! implement `BufRead` / `Write` so line-oriented code runs against the
//! queue unmodified.
//!
//! Within one relay, FIFO order is exact. No ordering guarantee is made
//! across two relay instances.

use std::collections::VecDeque;
use std::io;
use std::io::{BufRead, Read, Write};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

/// Default fragment capacity of a relay.
pub const DEFAULT_CAPACITY: usize = 2048;

pub struct Relay {
    queue: Mutex<VecDeque<String>>,
    readable: Condvar,
    writable: Condvar,
    capacity: usize,
}

impl Relay {
    pub fn new() -> Arc<Self> {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Arc<Self> {
        assert!(capacity > 0, "relay capacity must be non-zero");
        Arc::new(Self {
            queue: Mutex::new(VecDeque::new()),
            readable: Condvar::new(),
            writable: Condvar::new(),
            capacity,
        })
    }

    // The queue stays coherent even if a peer thread panicked while holding
    // the lock, so poisoning is recovered rather than propagated.
    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Enqueue a fragment, blocking while the relay is at capacity.
    pub fn write(&self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        let mut queue = self.lock_queue();
        while queue.len() >= self.capacity {
            queue = self.writable.wait(queue).unwrap_or_else(|e| e.into_inner());
        }
        queue.push_back(fragment);
        self.readable.notify_one();
    }

    /// Dequeue the next fragment, blocking until one is available.
    pub fn read_line(&self) -> String {
        let mut queue = self.lock_queue();
        loop {
            if let Some(fragment) = queue.pop_front() {
                self.writable.notify_one();
                return fragment;
            }
            queue = self.readable.wait(queue).unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Drain everything currently queued without blocking.
    ///
    /// Returns an empty `Vec` immediately when nothing is ready — an empty
    /// drain is an expected "nothing this tick", not an error.
    pub fn try_drain(&self) -> Vec<String> {
        let mut queue = self.lock_queue();
        let drained: Vec<String> = queue.drain(..).collect();
        if !drained.is_empty() {
            self.writable.notify_all();
        }
        drained
    }

    /// No-op: the relay has no buffering beyond its queue.
    pub fn flush(&self) {}

    pub fn len(&self) -> usize {
        self.lock_queue().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_queue().is_empty()
    }

    /// A blocking `BufRead` handle over this relay.
    pub fn reader(self: &Arc<Self>) -> RelayReader {
        RelayReader {
            relay: Arc::clone(self),
            pending: Vec::new(),
            pos: 0,
        }
    }

    /// A `Write` handle feeding this relay.
    pub fn writer(self: &Arc<Self>) -> RelayWriter {
        RelayWriter {
            relay: Arc::clone(self),
            partial: Vec::new(),
        }
    }
}

/// Blocking read side of a relay.
///
/// `fill_buf` waits for the next fragment, so `BufRead::read_line` works
/// unmodified — this is the adapter point that lets the engine's line-based
/// reads run against the queue. The relay never closes, so a reader never
/// reports end-of-file.
pub struct RelayReader {
    relay: Arc<Relay>,
    pending: Vec<u8>,
    pos: usize,
}

impl Read for RelayReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for RelayReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        // Empty fragments are skipped: an empty return here would read as EOF.
        while self.pos >= self.pending.len() {
            self.pending = self.relay.read_line().into_bytes();
            self.pos = 0;
        }
        Ok(&self.pending[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.pending.len());
    }
}

/// Write side of a relay.
///
/// Byte writes become text fragments. A partial UTF-8 sequence at the end of
/// a chunk is held back until the following write completes it, so a
/// multi-byte character split across two reads of the engine's output is
/// never mangled.
pub struct RelayWriter {
    relay: Arc<Relay>,
    partial: Vec<u8>,
}

impl Write for RelayWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.extend_from_slice(buf);
        match std::str::from_utf8(&self.partial) {
            Ok(text) => {
                if !text.is_empty() {
                    let fragment = text.to_string();
                    self.partial.clear();
                    self.relay.write(fragment);
                }
            }
            Err(e) if e.error_len().is_some() => {
                // Genuinely invalid bytes, not a truncated sequence.
                let fragment = String::from_utf8_lossy(&self.partial).into_owned();
                self.partial.clear();
                self.relay.write(fragment);
            }
            Err(e) => {
                let valid = e.valid_up_to();
                if valid > 0 {
                    let fragment = String::from_utf8_lossy(&self.partial[..valid]).into_owned();
                    self.partial.drain(..valid);
                    self.relay.write(fragment);
                }
                // A bare truncated sequence stays pending for the next write.
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.relay.flush();
        Ok(())
    }
}
