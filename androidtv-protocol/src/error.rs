//! Error handling for the Android TV remote protocol
//!
//! This module provides one error type for every protocol operation: the
//! certificate store, the framed TLS transport, the pairing handshake and the
//! remote-control session. Errors from underlying libraries convert through
//! `From` so `?` works everywhere.
//!
//! ## Error Categories
//!
//! ### Transport Errors
//! - `ConnectionClosed`: operation attempted after `close()`
//! - `OversizedMessage`: outbound payload does not fit the 1-byte length prefix
//! - `Io` / `Tls` / `Timeout`: network failures. Broken pipes and connection
//!   resets are retried by the transport before they surface here.
//!
//! ### Protocol Errors
//! - `PairingFailed`: a handshake step answered with a non-OK status
//! - `RemoteError`: the TV sent an error message during a remote session
//!
//! ### Validation Errors
//! - `UnknownKeyCode`: a key-code name that the protocol does not define
//! - `InvalidSecret`: a PIN whose middle characters are not hexadecimal
//!
//! ### Logging Errors
//!
//! ```rust,ignore
//! use tracing::{error, warn};
//!
//! if let Err(e) = remote.listen().await {
//!     error!("Remote session terminated: {}", e);
//! }
//!
//! if let Err(e) = remote.unmute().await {
//!     warn!("Failed to restore volume: {}", e);
//! }
//! ```

use crate::messages::PairingStatus;
use thiserror::Error;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors that can occur during protocol operations
///
/// # Examples
///
/// ```rust
/// use androidtv_protocol::ProtocolError;
///
/// let error = ProtocolError::ConnectionClosed;
/// assert_eq!(error.to_string(), "Connection is closed");
///
/// let error = ProtocolError::OversizedMessage(300);
/// assert_eq!(
///     error.to_string(),
///     "Message length must fit a byte: 300 bytes (max 255)"
/// );
/// ```
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// I/O error (file system, network, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS handshake or stream error
    #[error("TLS error: {0}")]
    Tls(#[from] openssl::ssl::Error),

    /// Key generation, certificate building or parsing error
    #[error("Certificate error: {0}")]
    Certificate(#[from] openssl::error::ErrorStack),

    /// Malformed PEM data in the certificate file
    #[error("PEM error: {0}")]
    Pem(#[from] pem::PemError),

    /// Certificate content is unusable (missing blocks, non-RSA key, ...)
    #[error("Certificate validation error: {0}")]
    CertificateValidation(String),

    /// A received payload is not a valid protobuf message
    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration is invalid or incomplete
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation attempted on a closed transport
    #[error("Connection is closed")]
    ConnectionClosed,

    /// Outbound payload larger than the 1-byte frame length allows
    #[error("Message length must fit a byte: {0} bytes (max 255)")]
    OversizedMessage(usize),

    /// Network operation timed out
    #[error("Connection timeout: {0}")]
    Timeout(String),

    /// A pairing step was answered with a non-OK status
    #[error("Pairing {step} failed with status {status:?}")]
    PairingFailed {
        /// Handshake step that failed
        step: &'static str,
        /// Status reported by the TV
        status: PairingStatus,
    },

    /// The TV reported an error during a remote session
    #[error("Remote error: {0}")]
    RemoteError(String),

    /// Key-code name not defined by the protocol
    #[error("Key code not found: {0}")]
    UnknownKeyCode(String),

    /// PIN entered by the user cannot be turned into a pairing secret
    #[error("Invalid pairing secret: {0}")]
    InvalidSecret(String),

    /// The background read loop result was already collected
    #[error("Session listener already consumed")]
    ListenerConsumed,

    /// The background read task panicked or was aborted
    #[error("Background task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl ProtocolError {
    /// Check whether this error is a transient socket failure that a re-dial
    /// can repair (broken pipe or connection reset)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use androidtv_protocol::ProtocolError;
    /// use std::io::{Error, ErrorKind};
    ///
    /// let error = ProtocolError::Io(Error::new(ErrorKind::BrokenPipe, "pipe"));
    /// assert!(error.is_transient());
    ///
    /// let error = ProtocolError::Io(Error::new(ErrorKind::NotFound, "missing"));
    /// assert!(!error.is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        match self {
            ProtocolError::Io(e) => is_transient_io(e),
            _ => false,
        }
    }

    /// Check if this error might succeed when the caller starts over
    ///
    /// Pairing failures are recoverable by restarting pairing from the
    /// beginning; validation and certificate errors are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProtocolError::Io(_)
                | ProtocolError::Tls(_)
                | ProtocolError::Timeout(_)
                | ProtocolError::PairingFailed { .. }
                | ProtocolError::RemoteError(_)
        )
    }
}

/// Broken pipe and connection reset, possibly wrapped by the TLS layer
pub(crate) fn is_transient_io(error: &std::io::Error) -> bool {
    use std::io::ErrorKind;

    if matches!(
        error.kind(),
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset
    ) {
        return true;
    }

    let Some(inner) = error.get_ref() else {
        return false;
    };
    if let Some(io) = inner.downcast_ref::<std::io::Error>() {
        return is_transient_io(io);
    }
    inner
        .downcast_ref::<openssl::ssl::Error>()
        .and_then(|ssl| ssl.io_error())
        .is_some_and(is_transient_io)
}

/// End of stream, including a TLS peer that closed without close-notify
pub(crate) fn is_end_of_stream(error: &std::io::Error) -> bool {
    if error.kind() == std::io::ErrorKind::UnexpectedEof {
        return true;
    }

    error
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<openssl::ssl::Error>())
        .and_then(|ssl| ssl.ssl_error())
        .is_some_and(|stack| {
            stack
                .errors()
                .iter()
                .any(|e| e.reason() == Some("unexpected eof while reading"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_error_display() {
        let error = ProtocolError::UnknownKeyCode("KEYCODE_NOPE".to_string());
        assert_eq!(error.to_string(), "Key code not found: KEYCODE_NOPE");

        let error = ProtocolError::PairingFailed {
            step: "request",
            status: PairingStatus::Error,
        };
        assert_eq!(error.to_string(), "Pairing request failed with status Error");
    }

    #[test]
    fn test_transient_classification() {
        assert!(ProtocolError::Io(Error::new(ErrorKind::ConnectionReset, "reset")).is_transient());
        assert!(!ProtocolError::Io(Error::new(ErrorKind::TimedOut, "slow")).is_transient());
        assert!(!ProtocolError::ConnectionClosed.is_transient());

        let wrapped = Error::new(ErrorKind::Other, Error::new(ErrorKind::BrokenPipe, "pipe"));
        assert!(is_transient_io(&wrapped));
    }

    #[test]
    fn test_end_of_stream() {
        assert!(is_end_of_stream(&Error::new(ErrorKind::UnexpectedEof, "eof")));
        assert!(!is_end_of_stream(&Error::new(ErrorKind::ConnectionReset, "reset")));
        assert!(!is_end_of_stream(&Error::new(ErrorKind::Other, "other")));
    }

    #[test]
    fn test_recoverable() {
        let error = ProtocolError::PairingFailed {
            step: "secret",
            status: PairingStatus::BadSecret,
        };
        assert!(error.is_recoverable());
        assert!(!ProtocolError::UnknownKeyCode("X".into()).is_recoverable());
        assert!(!ProtocolError::OversizedMessage(256).is_recoverable());
    }
}
