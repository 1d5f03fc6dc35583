use std::time::Duration;

use wirecall_frame::FrameConfig;

/// Client session settings.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// How long a call waits for its reply. `None` waits indefinitely.
    pub recv_timeout: Option<Duration>,
    /// Framing settings for stream transports.
    pub frame: FrameConfig,
}

impl ClientConfig {
    pub fn with_recv_timeout(mut self, timeout: Duration) -> Self {
        self.recv_timeout = Some(timeout);
        self
    }
}

/// Server settings, applied to every accepted connection.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub frame: FrameConfig,
}
