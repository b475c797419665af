//! Android TV Pairing
//!
//! Pairing establishes trust between this client's certificate and the TV.
//! It runs once, on port 6467, before any remote-control session.
//!
//! ## Pairing Protocol
//!
//! 1. **Request**: client sends its service and client name
//! 2. **Option**: after the TV acknowledges, client offers the input role with
//!    a 6-symbol hexadecimal code
//! 3. **Configuration**: after the TV echoes the option, client selects it
//! 4. **PIN**: the TV shows a code on screen; the user types it in
//! 5. **Secret**: client sends `SHA256(client N, e, TV N, e, PIN[2..6])`
//! 6. **Done**: the TV acknowledges the secret and remembers our certificate
//!
//! Every TV message carries a status; anything other than OK aborts pairing.
//!
//! ## Usage
//!
//! ```no_run
//! use androidtv_protocol::{AndroidTvConfig, CallbackDelegate, CertificateInfo, PairingSession};
//! use std::sync::Arc;
//!
//! # async fn example() -> androidtv_protocol::Result<()> {
//! let config = AndroidTvConfig::new("192.168.1.20");
//! let certificate = Arc::new(CertificateInfo::open_or_create(config.certificate_path()?)?);
//!
//! let delegate = CallbackDelegate::new(|| {
//!     let mut pin = String::new();
//!     std::io::stdin().read_line(&mut pin)?;
//!     Ok(pin.trim().to_string())
//! })
//! .on_complete(|| println!("Paired"));
//!
//! let pairing = PairingSession::connect(&config, certificate, delegate).await?;
//! pairing.request().await?;
//! pairing.listen().await?;
//! # Ok(())
//! # }
//! ```

mod delegate;
mod secret;
mod session;

pub use delegate::{CallbackDelegate, PairingDelegate};
pub use secret::{compute_secret, PIN_LENGTH};
pub use session::{PairingSession, PairingState};
