//! Message Buffer
//!
//! A fixed-capacity byte area filled by a single read. One byte is always
//! reserved for the terminator, so a buffer of capacity 128 accepts at most
//! 127 bytes from the peer. Text ends at the terminator or at the first NUL
//! byte received, whichever comes first.

use std::io;

/// Default buffer capacity, terminator included
pub const DEFAULT_BUFFER_SIZE: usize = 128;

/// Largest accepted buffer capacity, terminator included
pub const MAX_BUFFER_SIZE: usize = 64 * 1024;

/// Fixed-size receive buffer
#[derive(Debug)]
pub struct MessageBuffer {
    bytes: Box<[u8]>,
    /// Number of bytes stored by the last fill (0 if never filled)
    len: usize,
}

impl MessageBuffer {
    /// Create a buffer with the given capacity (terminator included)
    ///
    /// Capacities are clamped to `2..=MAX_BUFFER_SIZE`, so at least one byte
    /// can always be read.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity.clamp(2, MAX_BUFFER_SIZE)].into_boxed_slice(),
            len: 0,
        }
    }

    /// Total capacity, terminator included
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Largest number of bytes a single read may store
    pub fn max_read(&self) -> usize {
        self.bytes.len() - 1
    }

    /// Writable region handed to the read call
    pub(crate) fn read_area(&mut self) -> &mut [u8] {
        let max = self.max_read();
        &mut self.bytes[..max]
    }

    /// Record that `n` bytes were read and place the terminator after them
    pub(crate) fn terminate(&mut self, n: usize) {
        let n = n.min(self.max_read());
        self.bytes[n] = 0;
        self.len = n;
    }

    /// Bytes stored by the last read
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Stored bytes up to the first NUL, decoded lossily as UTF-8
    pub fn text(&self) -> String {
        let stored = self.as_bytes();
        let end = stored.iter().position(|&b| b == 0).unwrap_or(stored.len());
        String::from_utf8_lossy(&stored[..end]).into_owned()
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }
}

/// Result of the single read performed on a connection
#[derive(Debug)]
pub enum ReadOutcome {
    /// A positive number of bytes arrived
    Message(String),
    /// The peer closed without sending anything
    Empty,
    /// The read failed at the transport layer
    Failed(io::Error),
}

impl ReadOutcome {
    /// Classify a raw read result, terminating the buffer on success
    pub(crate) fn from_read(result: io::Result<usize>, buffer: &mut MessageBuffer) -> Self {
        match result {
            Ok(0) => Self::Empty,
            Ok(n) => {
                buffer.terminate(n);
                Self::Message(buffer.text())
            }
            Err(e) => Self::Failed(e),
        }
    }

    /// The received text, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(text) => Some(text.as_str()),
            Self::Empty | Self::Failed(_) => None,
        }
    }

    /// Consume the outcome, keeping only the received text
    pub fn into_message(self) -> Option<String> {
        match self {
            Self::Message(text) => Some(text),
            Self::Empty | Self::Failed(_) => None,
        }
    }
}
