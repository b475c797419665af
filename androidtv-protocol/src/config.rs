//! Client Configuration
//!
//! Where the TV lives, where the client certificate is stored and how this
//! client introduces itself during pairing and remote sessions.
//!
//! ```toml
//! host = "192.168.1.20"
//! certificate = "/home/user/.config/androidtv-remote/client.pem"
//! dump_events = false
//!
//! [pairing]
//! port = 6467
//! service_name = "rs.androidtv.remote"
//! client_name = "androidtv-remote"
//!
//! [remote]
//! port = 6466
//!
//! [remote.device]
//! model = "androidtv-remote"
//! vendor = "androidtv-remote"
//! package_name = "androidtv-remote"
//! app_version = "0.3.0"
//! code = 622
//! ```

use crate::{ProtocolError, Result, PAIRING_PORT, REMOTE_PORT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the configuration file location
pub const CONFIG_ENV: &str = "ANDROIDTV_REMOTE_CONFIG";

/// Directory name under the user configuration directory
const APP_DIR: &str = "androidtv-remote";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AndroidTvConfig {
    /// TV host name or IP address
    #[serde(default)]
    pub host: String,

    /// Client certificate file (defaults to `<config_dir>/androidtv-remote/client.pem`)
    #[serde(default)]
    pub certificate: Option<PathBuf>,

    /// Log every protocol message at info level
    #[serde(default)]
    pub dump_events: bool,

    /// Pairing service settings
    #[serde(default)]
    pub pairing: PairingConfig,

    /// Remote-control service settings
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Pairing service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingConfig {
    /// TV pairing port
    #[serde(default = "default_pairing_port")]
    pub port: u16,

    /// Service name sent in the pairing request
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Client name shown by the TV while pairing
    #[serde(default = "default_client_name")]
    pub client_name: String,
}

/// Remote-control service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// TV remote-control port
    #[serde(default = "default_remote_port")]
    pub port: u16,

    /// Identity announced when the TV asks us to configure
    #[serde(default)]
    pub device: DeviceIdentity,
}

/// Device identity sent in reply to the TV's configure message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    #[serde(default = "default_client_name")]
    pub model: String,

    #[serde(default = "default_client_name")]
    pub vendor: String,

    #[serde(default = "default_client_name")]
    pub package_name: String,

    #[serde(default = "default_app_version")]
    pub app_version: String,

    /// Feature code echoed in configure and set-active replies
    #[serde(default = "default_code")]
    pub code: i32,
}

fn default_pairing_port() -> u16 {
    PAIRING_PORT
}

fn default_remote_port() -> u16 {
    REMOTE_PORT
}

fn default_service_name() -> String {
    "rs.androidtv.remote".to_string()
}

fn default_client_name() -> String {
    "androidtv-remote".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_code() -> i32 {
    622
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            port: default_pairing_port(),
            service_name: default_service_name(),
            client_name: default_client_name(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            port: default_remote_port(),
            device: DeviceIdentity::default(),
        }
    }
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            model: default_client_name(),
            vendor: default_client_name(),
            package_name: default_client_name(),
            app_version: default_app_version(),
            code: default_code(),
        }
    }
}

impl AndroidTvConfig {
    /// Configuration for a TV host with every other setting at its default
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            certificate: None,
            dump_events: false,
            pairing: PairingConfig::default(),
            remote: RemoteConfig::default(),
        }
    }

    /// Default configuration file location
    ///
    /// `$ANDROIDTV_REMOTE_CONFIG` when set, otherwise
    /// `<config_dir>/androidtv-remote/config.toml`.
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        app_dir().join("config.toml")
    }

    /// Load configuration from the default location
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path())
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {:?}", path);

        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;

        info!("Loaded configuration for TV host {}", config.host);
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AndroidTvConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::Configuration(format!("Failed to serialize: {}", e)))?;
        fs::write(path, contents)?;

        debug!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Reject configurations that cannot reach a TV
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::Configuration(
                "android-tv host not configured".to_string(),
            ));
        }
        if self.pairing.port == 0 || self.remote.port == 0 {
            return Err(ProtocolError::Configuration(
                "android-tv ports must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Client certificate file path
    pub fn certificate_path(&self) -> Result<PathBuf> {
        match &self.certificate {
            Some(path) => Ok(path.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR).join("client.pem"))
                .ok_or_else(|| {
                    ProtocolError::Configuration(
                        "no certificate path configured and no user config directory".to_string(),
                    )
                }),
        }
    }

    /// Whether the client certificate has already been created (i.e. paired)
    pub fn certificate_exists(&self) -> bool {
        self.certificate_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// `host:port` of the pairing service
    pub fn pairing_address(&self) -> String {
        format!("{}:{}", self.host, self.pairing.port)
    }

    /// `host:port` of the remote-control service
    pub fn remote_address(&self) -> String {
        format!("{}:{}", self.host, self.remote.port)
    }
}

fn app_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join(APP_DIR)
}
