use std::time::Duration;

use tracing::{debug, warn};
use wirecall_codec::{pack, Codec, Decode, Pack};
use wirecall_frame::{FrameError, FramedConnection};
use wirecall_transport::TcpTransport;

use crate::config::ClientConfig;
use crate::envelope::Response;
use crate::error::{Result, RpcError};
use crate::transport::{Received, Transport};

/// The calling side of a session.
///
/// Strictly request/response: one call is in flight at a time and replies
/// carry no call ID, so they are matched to calls by order alone.
#[derive(Debug)]
pub struct Client<T> {
    transport: T,
    config: ClientConfig,
    desynchronized: bool,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            desynchronized: false,
        }
    }

    /// Call `name` with `args`, waiting up to the configured receive timeout.
    ///
    /// ```no_run
    /// use wirecall_rpc::{connect_tcp, ClientConfig};
    ///
    /// let mut client = connect_tcp("127.0.0.1:5555", ClientConfig::default())?;
    /// let sum: i32 = client.call("add", &(3i32, 2i32))?.into_result()?;
    /// assert_eq!(sum, 5);
    /// # Ok::<(), wirecall_rpc::RpcError>(())
    /// ```
    pub fn call<R, A>(&mut self, name: &str, args: &A) -> Result<Response<R>>
    where
        R: Decode,
        A: Pack + ?Sized,
    {
        let timeout = self.config.recv_timeout;
        self.call_with(name, args, timeout)
    }

    /// Call `name` with `args`, waiting up to `timeout` (`None` waits
    /// indefinitely).
    ///
    /// When the wait expires the result is a
    /// [`Status::RecvTimeout`](crate::Status::RecvTimeout) response; a zero
    /// timeout expires at once. Either way, and after any failure once the
    /// call was sent, the session is unusable from then on: a late reply
    /// would otherwise be taken as the answer to the next call.
    pub fn call_with<R, A>(
        &mut self,
        name: &str,
        args: &A,
        timeout: Option<Duration>,
    ) -> Result<Response<R>>
    where
        R: Decode,
        A: Pack + ?Sized,
    {
        if self.desynchronized {
            return Err(RpcError::Desynchronized);
        }

        let mut frame = Codec::new();
        frame.encode(name)?;
        pack(&mut frame, args)?;
        let frame = frame.into_bytes();

        debug!(function = name, size = frame.len(), "sending call");
        if let Err(err) = self.transport.send(&frame) {
            // An oversized call is refused before any byte reaches the peer.
            if !matches!(err, RpcError::Frame(FrameError::PayloadTooLarge { .. })) {
                self.desynchronized = true;
            }
            return Err(err);
        }

        // The call is on the wire now: unless its reply is consumed here, the
        // next call would read it as its own.
        match self.await_reply(name, timeout) {
            Ok(response) => Ok(response),
            Err(err) => {
                warn!(function = name, error = %err, "call failed after sending");
                self.desynchronized = true;
                Err(err)
            }
        }
    }

    fn await_reply<R: Decode>(
        &mut self,
        name: &str,
        timeout: Option<Duration>,
    ) -> Result<Response<R>> {
        match self.transport.receive(timeout)? {
            Received::Message(reply) => {
                let response = Response::from_bytes(&reply)?;
                debug!(
                    function = name,
                    status = response.code(),
                    "received response"
                );
                Ok(response)
            }
            Received::TimedOut => {
                warn!(function = name, ?timeout, "call timed out waiting for reply");
                self.desynchronized = true;
                Ok(Response::timeout())
            }
        }
    }

    /// Whether an earlier timeout or failed call left this session unusable.
    pub fn is_desynchronized(&self) -> bool {
        self.desynchronized
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}

/// Connect to a TCP server.
pub fn connect_tcp(addr: &str, config: ClientConfig) -> Result<Client<FramedConnection>> {
    let stream = TcpTransport::connect(addr)?;
    let connection = FramedConnection::new(stream, config.frame.clone())?;
    debug!(peer = connection.peer(), "connected");
    Ok(Client::with_config(connection, config))
}

/// Connect to a Unix domain socket server.
#[cfg(unix)]
pub fn connect_unix(
    path: impl AsRef<std::path::Path>,
    config: ClientConfig,
) -> Result<Client<FramedConnection>> {
    let stream = wirecall_transport::UnixDomainSocket::connect(path)?;
    let connection = FramedConnection::new(stream, config.frame.clone())?;
    debug!(peer = connection.peer(), "connected");
    Ok(Client::with_config(connection, config))
}
