use bytes::{Bytes, BytesMut};

use crate::error::{CodecError, Result};

/// Growable byte storage with a read cursor.
///
/// Writes always append at the end; reads consume from the cursor. There is
/// no compaction: a buffer is filled once for an outbound message, or wraps
/// one inbound frame, and is then read through once.
///
/// Invariant: `cursor <= len()`.
#[derive(Debug, Clone, Default)]
pub struct ByteBuffer {
    data: BytesMut,
    cursor: usize,
}

impl ByteBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            cursor: 0,
        }
    }

    /// Create a buffer holding a copy of `bytes`, cursor at the start.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            data: BytesMut::from(bytes),
            cursor: 0,
        }
    }

    /// Append raw bytes at the end.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// The unread bytes, starting at the cursor.
    pub fn peek(&self) -> &[u8] {
        &self.data[self.cursor..]
    }

    /// Move the cursor forward by `n` bytes.
    pub fn advance(&mut self, n: usize) -> Result<()> {
        self.need(n)?;
        self.cursor += n;
        Ok(())
    }

    /// Consume the next `n` bytes and return them.
    pub fn take(&mut self, n: usize) -> Result<&[u8]> {
        self.need(n)?;
        let start = self.cursor;
        self.cursor += n;
        Ok(&self.data[start..self.cursor])
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Total number of bytes written, read or not.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Everything written so far, ignoring the cursor.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Freeze the unread bytes into shared, immutable storage.
    pub fn freeze(mut self) -> Bytes {
        self.data.split_off(self.cursor).freeze()
    }

    fn need(&self, n: usize) -> Result<()> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(CodecError::Underflow {
                needed: n,
                remaining,
            });
        }
        Ok(())
    }
}
