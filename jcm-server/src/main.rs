//! JCM server: entry point.

use clap::Parser;
use tracing::{info, warn};

use jcm_server::cli::{self, Cli};
use jcm_server::config::ServerConfig;
use jcm_server::logging;
use jcm_server::service::ServerService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if cli::wants_info(std::env::args()) {
        println!("{}", cli::DESCRIPTION);
        return Ok(());
    }
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        println!("{}", ServerConfig::default_toml()?);
        return Ok(());
    }

    let mut config = ServerConfig::load(&cli.config);
    if let Some(port) = cli.port {
        config.network.port = port;
    }

    logging::init(&config.logging)?;

    info!("jcm-server v{}", env!("CARGO_PKG_VERSION"));
    info!("listening address: {}:{}", config.network.bind_address, config.network.port);
    info!("max frame size: {} bytes", config.network.max_frame_size);
    info!("readback file: {}", config.device.readback_path.display());

    let service = ServerService::new(config);
    let stop = service.stop_handle();

    // Ctrl-C handler.
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {e}");
            return;
        }
        info!("Ctrl-C received, shutting down");
        stop.cancel();
    });

    service.run().await?;

    Ok(())
}
