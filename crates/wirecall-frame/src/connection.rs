use std::io::ErrorKind;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::trace;
use wirecall_transport::Stream;

use crate::codec::FrameConfig;
use crate::error::{FrameError, Result};
use crate::reader::FrameReader;
use crate::writer::FrameWriter;

/// A bidirectional framed connection over a [`Stream`].
///
/// Reads and writes go through separate handles of the same socket, so the
/// reader keeps any partially received frame across timed-out reads.
pub struct FramedConnection {
    reader: FrameReader<Stream>,
    writer: FrameWriter<Stream>,
    /// Read timeout currently applied to the socket.
    applied_read_timeout: Option<Duration>,
    peer: String,
}

impl FramedConnection {
    /// Wrap a connected stream, applying the configured timeouts.
    pub fn new(stream: Stream, config: FrameConfig) -> Result<Self> {
        let reader_stream = stream.try_clone()?;
        reader_stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;

        let peer = stream.peer_label();
        let applied_read_timeout = config.read_timeout;
        Ok(Self {
            reader: FrameReader::with_config(reader_stream, config.clone()),
            writer: FrameWriter::with_config(stream, config),
            applied_read_timeout,
            peer,
        })
    }

    /// Send one payload as a frame.
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        trace!(peer = %self.peer, size = payload.len(), "sending frame");
        self.writer.send(payload)
    }

    /// Receive the next payload, honoring the configured read timeout.
    ///
    /// A timeout surfaces as `FrameError::Io` with kind `TimedOut`; use
    /// [`recv_timeout`](Self::recv_timeout) to get it as a value instead.
    pub fn recv(&mut self) -> Result<Bytes> {
        let default_timeout = self.reader.config().read_timeout;
        self.recv_timeout(default_timeout)?
            .ok_or_else(|| FrameError::Io(std::io::Error::from(ErrorKind::TimedOut)))
    }

    /// Receive the next payload, waiting at most `timeout` in total (`None`
    /// waits forever). Returns `Ok(None)` when the wait expires; a zero
    /// timeout only hands out a frame that is already buffered.
    ///
    /// The socket timeout is re-armed with the time left before every read,
    /// so a peer trickling bytes cannot stretch the wait. Bytes of a partial
    /// frame stay buffered for the next receive.
    pub fn recv_timeout(&mut self, timeout: Option<Duration>) -> Result<Option<Bytes>> {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        loop {
            if let Some(payload) = self.reader.buffered_frame()? {
                trace!(peer = %self.peer, size = payload.len(), "received frame");
                return Ok(Some(payload));
            }

            let remaining = match deadline {
                Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
                    Some(left) if !left.is_zero() => Some(left),
                    _ => return Ok(self.timed_out()),
                },
                None => None,
            };
            self.apply_read_timeout(remaining)?;

            match self.reader.fill() {
                Ok(_) => {}
                Err(FrameError::Io(err))
                    if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    return Ok(self.timed_out());
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Description of the remote end, for logs.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    fn timed_out(&self) -> Option<Bytes> {
        trace!(peer = %self.peer, buffered = self.reader.buffered(), "receive timed out");
        None
    }

    fn apply_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        if self.applied_read_timeout != timeout {
            self.reader.get_ref().set_read_timeout(timeout)?;
            self.applied_read_timeout = timeout;
        }
        Ok(())
    }
}

impl std::fmt::Debug for FramedConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramedConnection")
            .field("peer", &self.peer)
            .field("applied_read_timeout", &self.applied_read_timeout)
            .finish()
    }
}
