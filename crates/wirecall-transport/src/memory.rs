use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use bytes::Bytes;
use tracing::trace;

use crate::error::{Result, TransportError};

/// One end of an in-process, message-oriented request/reply channel.
///
/// Unlike a byte [`Stream`](crate::Stream), every `send` arrives as exactly
/// one message on the other end, so no framing is needed.
#[derive(Debug)]
pub struct MemoryChannel {
    tx: Sender<Bytes>,
    rx: Receiver<Bytes>,
}

impl MemoryChannel {
    /// Create two connected ends.
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::channel();
        let (b_tx, a_rx) = mpsc::channel();
        (
            Self { tx: a_tx, rx: a_rx },
            Self { tx: b_tx, rx: b_rx },
        )
    }

    /// Queue one message for the other end.
    pub fn send(&self, message: &[u8]) -> Result<()> {
        trace!(size = message.len(), "memory channel send");
        self.tx
            .send(Bytes::copy_from_slice(message))
            .map_err(|_| TransportError::Disconnected)
    }

    /// Block until the next message arrives.
    pub fn recv(&self) -> Result<Bytes> {
        self.rx.recv().map_err(|_| TransportError::Disconnected)
    }

    /// Wait up to `timeout` for the next message. `None` waits forever.
    ///
    /// Returns `Ok(None)` when the timeout expires.
    pub fn recv_timeout(&self, timeout: Option<Duration>) -> Result<Option<Bytes>> {
        let Some(timeout) = timeout else {
            return self.recv().map(Some);
        };
        match self.rx.recv_timeout(timeout) {
            Ok(message) => Ok(Some(message)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(TransportError::Disconnected),
        }
    }
}
