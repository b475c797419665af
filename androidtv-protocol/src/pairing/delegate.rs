//! Pairing callbacks
//!
//! The session asks its delegate for the PIN the TV displays and tells it
//! when the TV accepted the secret.

use crate::Result;
use async_trait::async_trait;

/// Receives the user-facing steps of a pairing handshake
#[async_trait]
pub trait PairingDelegate: Send + Sync {
    /// Return the code currently shown on the TV screen
    ///
    /// The protocol task waits for this call, so the TV sees no further
    /// traffic until it returns. An error aborts pairing.
    async fn request_secret(&self) -> Result<String>;

    /// Called once, after the TV accepted the secret
    async fn pairing_complete(&self) {}
}

type SecretCallback = Box<dyn Fn() -> Result<String> + Send + Sync>;
type CompleteCallback = Box<dyn Fn() + Send + Sync>;

/// Delegate built from plain closures
pub struct CallbackDelegate {
    secret: SecretCallback,
    complete: Option<CompleteCallback>,
}

impl CallbackDelegate {
    /// Delegate that obtains the PIN from `secret`
    pub fn new<F>(secret: F) -> Self
    where
        F: Fn() -> Result<String> + Send + Sync + 'static,
    {
        Self {
            secret: Box::new(secret),
            complete: None,
        }
    }

    /// Also run `complete` when pairing succeeds
    pub fn on_complete<F>(mut self, complete: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.complete = Some(Box::new(complete));
        self
    }
}

#[async_trait]
impl PairingDelegate for CallbackDelegate {
    async fn request_secret(&self) -> Result<String> {
        (self.secret)()
    }

    async fn pairing_complete(&self) {
        if let Some(complete) = &self.complete {
            complete();
        }
    }
}

impl std::fmt::Debug for CallbackDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackDelegate")
            .field("complete", &self.complete.is_some())
            .finish_non_exhaustive()
    }
}
