//! Android TV Remote Protocol Implementation
//!
//! This library provides a pure Rust client for the Android TV remote
//! protocol (version 2), letting a computer pair with a TV and act as a
//! software remote control.
//!
//! ## Components
//!
//! - [`CertificateInfo`]: self-signed RSA client identity stored as PEM
//! - [`Transport`]: TLS socket with 1-byte length framing and automatic re-dial
//! - [`PairingSession`]: six-step handshake ending in a PIN-derived secret
//! - [`RemoteSession`]: key injection, keepalive and mirrored TV state
//! - [`AndroidTvConfig`]: TOML configuration for host, ports and identity
//!
//! ## Usage
//!
//! ```no_run
//! use androidtv_protocol::{AndroidTvConfig, CertificateInfo, RemoteSession};
//! use std::sync::Arc;
//!
//! # async fn example() -> androidtv_protocol::Result<()> {
//! let config = AndroidTvConfig::load_default()?;
//! let certificate = Arc::new(CertificateInfo::open(config.certificate_path()?)?);
//!
//! let remote = RemoteSession::connect(&config, certificate).await?;
//! remote.mute().await?;
//! remote.close().await?;
//! remote.listen().await?;
//! # Ok(())
//! # }
//! ```

pub mod certificate;
pub mod config;
pub mod messages;
pub mod pairing;
pub mod remote;
pub mod transport;

mod error;
pub use certificate::CertificateInfo;
pub use config::{AndroidTvConfig, DeviceIdentity};
pub use error::{ProtocolError, Result};
pub use messages::{PairingMessage, RemoteKeyCode, RemoteMessage};
pub use pairing::{CallbackDelegate, PairingDelegate, PairingSession, PairingState};
pub use remote::{PlayPauseIntent, RemoteSession, VolumeState};
pub use transport::{FrameDecoder, FrameHandler, Transport};

/// Protocol version we implement
pub const PROTOCOL_VERSION: i32 = 2;

/// TCP port of the TV pairing service
pub const PAIRING_PORT: u16 = 6467;

/// TCP port of the TV remote-control service
pub const REMOTE_PORT: u16 = 6466;

/// Lock a short-lived synchronous mutex, recovering the data if a holder panicked
pub(crate) fn lock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
