use std::time::Duration;

use bytes::Bytes;
use wirecall_frame::{FrameError, FramedConnection};
use wirecall_transport::{MemoryChannel, TransportError};

use crate::error::{Result, RpcError};

/// Outcome of waiting for a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Message(Bytes),
    TimedOut,
}

/// A message-oriented, bidirectional link used by one call session.
///
/// One `send` must arrive as exactly one message on the other side. A peer
/// that goes away is reported as [`RpcError::Disconnected`], never as a
/// timeout.
pub trait Transport {
    fn send(&mut self, message: &[u8]) -> Result<()>;

    /// Wait for the next message; `None` waits indefinitely.
    fn receive(&mut self, timeout: Option<Duration>) -> Result<Received>;
}

impl Transport for FramedConnection {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        FramedConnection::send(self, message).map_err(|err| closed_or(err, self.peer()))
    }

    fn receive(&mut self, timeout: Option<Duration>) -> Result<Received> {
        match self.recv_timeout(timeout) {
            Ok(Some(message)) => Ok(Received::Message(message)),
            Ok(None) => Ok(Received::TimedOut),
            Err(err) => Err(closed_or(err, self.peer())),
        }
    }
}

fn closed_or(err: FrameError, peer: &str) -> RpcError {
    match err {
        FrameError::ConnectionClosed => RpcError::Disconnected(peer.to_string()),
        FrameError::Io(io)
            if matches!(
                io.kind(),
                std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
            ) =>
        {
            RpcError::Disconnected(format!("{peer}: {io}"))
        }
        other => RpcError::Frame(other),
    }
}

impl Transport for MemoryChannel {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        MemoryChannel::send(self, message).map_err(memory_error)
    }

    fn receive(&mut self, timeout: Option<Duration>) -> Result<Received> {
        match self.recv_timeout(timeout).map_err(memory_error)? {
            Some(message) => Ok(Received::Message(message)),
            None => Ok(Received::TimedOut),
        }
    }
}

fn memory_error(err: TransportError) -> RpcError {
    match err {
        TransportError::Disconnected => RpcError::Disconnected("memory channel".to_string()),
        other => RpcError::Transport(other),
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        (**self).send(message)
    }

    fn receive(&mut self, timeout: Option<Duration>) -> Result<Received> {
        (**self).receive(timeout)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        (**self).send(message)
    }

    fn receive(&mut self, timeout: Option<Duration>) -> Result<Received> {
        (**self).receive(timeout)
    }
}

#[cfg(test)]
mod tests {
    use wirecall_frame::FrameConfig;
    use wirecall_transport::TcpTransport;

    use super::*;

    #[test]
    fn memory_channel_times_out_then_disconnects() {
        let (mut left, right) = MemoryChannel::pair();
        let got = left.receive(Some(Duration::from_millis(20))).unwrap();
        assert_eq!(got, Received::TimedOut);

        drop(right);
        let err = left.receive(Some(Duration::from_millis(20))).unwrap_err();
        assert!(matches!(err, RpcError::Disconnected(_)));
        let err = Transport::send(&mut left, b"x").unwrap_err();
        assert!(matches!(err, RpcError::Disconnected(_)));
    }

    #[test]
    fn framed_connection_reports_close_as_disconnect() {
        let listener = TcpTransport::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().to_string();
        let client = TcpTransport::connect(&addr).unwrap();
        let server = listener.accept().unwrap();
        let mut client = FramedConnection::new(client, FrameConfig::default()).unwrap();
        let mut server = FramedConnection::new(server, FrameConfig::default()).unwrap();

        Transport::send(&mut client, b"hello").unwrap();
        assert_eq!(
            server.receive(None).unwrap(),
            Received::Message(Bytes::from_static(b"hello"))
        );

        drop(server);
        let err = client.receive(Some(Duration::from_secs(5))).unwrap_err();
        assert!(matches!(err, RpcError::Disconnected(_)));
    }
}
