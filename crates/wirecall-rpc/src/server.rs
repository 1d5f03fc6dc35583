use std::sync::Arc;
use std::thread;

use bytes::Bytes;
use tracing::{debug, info, warn};
use wirecall_codec::Codec;
use wirecall_frame::FramedConnection;
use wirecall_transport::{Stream, TcpTransport};

use crate::config::ServerConfig;
use crate::error::{Result, RpcError};
use crate::registry::Registry;
use crate::transport::{Received, Transport};

/// The serving side.
///
/// Owns the [`Registry`] from construction on, so handlers can no longer be
/// added or removed once serving starts. Cloning is cheap and shares the
/// registry.
#[derive(Debug, Clone)]
pub struct Server {
    registry: Arc<Registry>,
    config: ServerConfig,
}

impl Server {
    pub fn new(registry: Registry) -> Self {
        Self::with_config(registry, ServerConfig::default())
    }

    pub fn with_config(registry: Registry, config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Turn one Call Frame into the encoded response envelope.
    ///
    /// Fails only when the frame itself is malformed (no readable name, or
    /// arguments that do not decode as the handler's parameters).
    pub fn handle_message(&self, message: &[u8]) -> Result<Bytes> {
        let mut codec = Codec::from_slice(message);
        let name: String = codec.decode()?;
        debug!(function = %name, args = codec.remaining(), "dispatching call");
        Ok(self.registry.dispatch(&name, codec.unread())?)
    }

    /// Answer calls on `transport` until the peer disconnects.
    ///
    /// With a configured read timeout the session also ends after that much
    /// idle time. A malformed call ends the session with an error: there is
    /// no envelope to report it in.
    pub fn serve<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<()> {
        let idle_timeout = self.config.frame.read_timeout;
        loop {
            let message = match transport.receive(idle_timeout) {
                Ok(Received::Message(message)) => message,
                Ok(Received::TimedOut) => {
                    debug!(?idle_timeout, "session idle, closing");
                    return Ok(());
                }
                Err(RpcError::Disconnected(peer)) => {
                    debug!(%peer, "peer disconnected");
                    return Ok(());
                }
                Err(err) => return Err(err),
            };

            let reply = self.handle_message(&message)?;
            match transport.send(&reply) {
                Ok(()) => {}
                Err(RpcError::Disconnected(peer)) => {
                    debug!(%peer, "peer left before the reply was sent");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Accept TCP connections forever, one thread per session.
    pub fn serve_tcp(&self, listener: &TcpTransport) -> Result<()> {
        info!(addr = %listener.local_addr(), functions = self.registry.len(), "serving over tcp");
        loop {
            let stream = listener.accept()?;
            self.spawn_session(stream);
        }
    }

    /// Accept Unix domain socket connections forever, one thread per session.
    #[cfg(unix)]
    pub fn serve_unix(&self, listener: &wirecall_transport::UnixDomainSocket) -> Result<()> {
        info!(path = %listener.path().display(), functions = self.registry.len(), "serving over unix socket");
        loop {
            let stream = listener.accept()?;
            self.spawn_session(stream);
        }
    }

    fn spawn_session(&self, stream: Stream) {
        let peer = stream.peer_label();
        info!(%peer, "accepted connection");

        let server = self.clone();
        let spawned = thread::Builder::new()
            .name("wirecall-session".to_string())
            .spawn(move || server.run_session(stream, peer));
        if let Err(err) = spawned {
            warn!(error = %err, "failed to spawn session thread");
        }
    }

    fn run_session(&self, stream: Stream, peer: String) {
        let mut connection = match FramedConnection::new(stream, self.config.frame.clone()) {
            Ok(connection) => connection,
            Err(err) => {
                warn!(%peer, error = %err, "failed to set up connection");
                return;
            }
        };

        match self.serve(&mut connection) {
            Ok(()) => info!(%peer, "session closed"),
            Err(err) => warn!(%peer, error = %err, "dropping session"),
        }
    }
}
