//! Server lifecycle: build the device and dispatcher, bind, serve.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use jcm_core::{Device, Dispatcher, Listener, SimulatedDevice};

use crate::config::ServerConfig;

/// The top-level JCM server.
///
/// Owns the device handle shared by every session and a shutdown token
/// that stops the accept loop and ends all live sessions.
pub struct ServerService {
    config: ServerConfig,
    device: Arc<dyn Device>,
    shutdown: CancellationToken,
}

impl ServerService {
    /// Serve the in-memory device described by `config.device`.
    pub fn new(config: ServerConfig) -> Self {
        let device = Arc::new(SimulatedDevice::new(config.geometry()));
        Self::with_device(config, device)
    }

    pub fn with_device(config: ServerConfig, device: Arc<dyn Device>) -> Self {
        Self {
            config,
            device,
            shutdown: CancellationToken::new(),
        }
    }

    /// Cancel to stop the server from another task.
    pub fn stop_handle(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled()
    }

    /// Bind the configured address. The returned listener is not yet
    /// accepting; pass it to [`ServerService::serve`].
    pub async fn bind(&self) -> Result<Listener, Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.bind_addr()?;
        let dispatcher = Dispatcher::new(Arc::clone(&self.device))
            .with_readback_path(self.config.device.readback_path.clone());
        let framer = self.config.to_framer();
        let listener = Listener::bind(addr, self.config.network.backlog, dispatcher, framer)
            .await?
            .with_shutdown(self.shutdown.clone());
        Ok(listener)
    }

    pub async fn serve(
        &self,
        listener: Listener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        listener.run().await?;
        info!("JCM server stopped");
        Ok(())
    }

    /// Bind and serve until stopped.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }
}
