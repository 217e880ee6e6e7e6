//! Configuration for the JCM server.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use jcm_core::dispatch::DEFAULT_READBACK_PATH;
use jcm_core::{DEFAULT_BACKLOG, DEFAULT_PORT, Framer, Geometry, MAX_FRAME_SIZE};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listening socket and framing.
    pub network: NetworkConfig,
    /// Attached device.
    pub device: DeviceConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Address to bind; `0.0.0.0` accepts on every interface.
    pub bind_address: String,
    pub port: u16,
    /// Pending-connection queue length.
    pub backlog: u32,
    /// Largest payload chunk per write.
    pub max_frame_size: usize,
    /// Pause after the header of multi-frame responses, for clients that
    /// cannot cope with header and payload arriving together. 0 disables.
    pub settle_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// File written by the `readback` command.
    pub readback_path: PathBuf,
    pub words_per_frame: u32,
    pub logic_frames: u32,
    pub bram_frames: u32,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Optional log file path. If empty, logs to stderr.
    pub file: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            backlog: DEFAULT_BACKLOG,
            max_frame_size: MAX_FRAME_SIZE,
            settle_delay_ms: 0,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        let geometry = Geometry::default();
        Self {
            readback_path: PathBuf::from(DEFAULT_READBACK_PATH),
            words_per_frame: geometry.words_per_frame,
            logic_frames: geometry.logic_frames,
            bram_frames: geometry.bram_frames,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: String::new(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl ServerConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// The default configuration as TOML, for `--gen-config`.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&Self::default())
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        let ip: IpAddr = self.network.bind_address.parse()?;
        Ok(SocketAddr::new(ip, self.network.port))
    }

    pub fn to_framer(&self) -> Framer {
        Framer::new(self.network.max_frame_size)
            .with_settle_delay(Duration::from_millis(self.network.settle_delay_ms))
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            words_per_frame: self.device.words_per_frame,
            logic_frames: self.device.logic_frames,
            bram_frames: self.device.bram_frames,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
