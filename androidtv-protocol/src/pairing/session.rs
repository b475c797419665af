//! Pairing Session
//!
//! Owns the pairing-port transport and its background read task. The task
//! answers each TV message with the next handshake step; the caller only
//! starts the handshake and waits for its outcome.

use super::delegate::PairingDelegate;
use super::secret::compute_secret;
use crate::certificate::rsa_modulus;
use crate::messages::pairing_message::Payload;
use crate::messages::PairingMessage;
use crate::transport::{FrameHandler, Transport};
use crate::{lock, AndroidTvConfig, CertificateInfo, ProtocolError, Result};
use async_trait::async_trait;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Pairing handshake progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingState {
    /// Connected, nothing sent yet
    Init,
    /// Request sent, waiting for the TV to acknowledge
    Requested,
    /// Option sent
    OptionOffered,
    /// Configuration sent, the TV should now display a PIN
    Configured,
    /// Secret sent, waiting for the TV verdict
    SecretSent,
    /// The TV accepted the secret
    Paired,
    /// A step failed; start over with a new session
    Failed,
}

impl PairingState {
    /// Check if the handshake is over, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, PairingState::Paired | PairingState::Failed)
    }

    /// State once the request is out; a TV that already answered keeps its state
    fn after_request(self) -> Self {
        match self {
            PairingState::Init => PairingState::Requested,
            other => other,
        }
    }
}

/// Background side of the session
struct PairingHandler {
    transport: Arc<Transport>,
    delegate: Arc<dyn PairingDelegate>,
    state: Mutex<PairingState>,
    dump_events: bool,
}

impl PairingHandler {
    fn state(&self) -> PairingState {
        *lock(&self.state)
    }

    fn set_state(&self, state: PairingState) {
        let mut current = lock(&self.state);
        if *current != state {
            debug!("Pairing state {:?} -> {:?}", *current, state);
            *current = state;
        }
    }

    fn mark_requested(&self) {
        let mut current = lock(&self.state);
        let next = current.after_request();
        if *current != next {
            debug!("Pairing state {:?} -> {:?}", *current, next);
            *current = next;
        }
    }

    fn fail(&self, step: &'static str, message: &PairingMessage) -> ProtocolError {
        self.set_state(PairingState::Failed);
        let status = message.status();
        error!("Pairing {} rejected by TV with status {:?}", step, status);
        ProtocolError::PairingFailed { step, status }
    }

    async fn send_secret(&self) -> Result<()> {
        let pin = self.delegate.request_secret().await?;

        let client_modulus = self.transport.certificate().public_modulus()?;
        let peer = self.transport.peer_certificate().ok_or_else(|| {
            ProtocolError::CertificateValidation("TV did not present a certificate".to_string())
        })?;
        let server_modulus = rsa_modulus(&peer)?;

        let secret = compute_secret(&client_modulus, &server_modulus, &pin)?;
        self.transport.send(&PairingMessage::secret(secret.to_vec())).await
    }
}

#[async_trait]
impl FrameHandler for PairingHandler {
    type Message = PairingMessage;

    async fn handle(&self, message: PairingMessage) -> Result<ControlFlow<()>> {
        if self.dump_events {
            info!("event: {:?}", message);
        } else {
            debug!(
                "Received pairing {} (status {:?})",
                message.payload.as_ref().map_or("message", Payload::name),
                message.status()
            );
        }

        match &message.payload {
            Some(Payload::RequestAck(_)) => {
                if !message.is_ok() {
                    return Err(self.fail("request", &message));
                }
                self.transport.send(&PairingMessage::input_option()).await?;
                self.set_state(PairingState::OptionOffered);
            }
            Some(Payload::Option(_)) => {
                if !message.is_ok() {
                    return Err(self.fail("option", &message));
                }
                self.transport
                    .send(&PairingMessage::input_configuration())
                    .await?;
                self.set_state(PairingState::Configured);
            }
            Some(Payload::ConfigurationAck(_)) => {
                if !message.is_ok() {
                    return Err(self.fail("configuration", &message));
                }
                info!("TV is displaying the pairing code");
                self.send_secret().await?;
                self.set_state(PairingState::SecretSent);
            }
            Some(Payload::SecretAck(_)) => {
                if !message.is_ok() {
                    return Err(self.fail("secret", &message));
                }
                info!("Paired with {}", self.transport.address());
                self.set_state(PairingState::Paired);
                self.delegate.pairing_complete().await;
                return Ok(ControlFlow::Break(()));
            }
            _ if !message.is_ok() => return Err(self.fail("handshake", &message)),
            _ => {}
        }

        Ok(ControlFlow::Continue(()))
    }
}

/// Pairing handshake with one TV
pub struct PairingSession {
    handler: Arc<PairingHandler>,
    task: Mutex<Option<JoinHandle<Result<()>>>>,
    service_name: String,
    client_name: String,
}

impl PairingSession {
    /// Connect to the TV pairing port and start the background read task
    pub async fn connect<D>(
        config: &AndroidTvConfig,
        certificate: Arc<CertificateInfo>,
        delegate: D,
    ) -> Result<Self>
    where
        D: PairingDelegate + 'static,
    {
        config.validate()?;
        let transport = Transport::open(config.pairing_address(), certificate).await?;

        let handler = Arc::new(PairingHandler {
            transport,
            delegate: Arc::new(delegate),
            state: Mutex::new(PairingState::Init),
            dump_events: config.dump_events,
        });

        let task = tokio::spawn({
            let handler = handler.clone();
            async move {
                let result = handler.transport.listen(handler.as_ref()).await;
                if let Err(e) = &result {
                    error!("Pairing with {} failed: {}", handler.transport.address(), e);
                    handler.set_state(PairingState::Failed);
                }
                result
            }
        });

        Ok(Self {
            handler,
            task: Mutex::new(Some(task)),
            service_name: config.pairing.service_name.clone(),
            client_name: config.pairing.client_name.clone(),
        })
    }

    /// Start the handshake by sending the pairing request
    pub async fn request(&self) -> Result<()> {
        info!("Requesting pairing as {:?}", self.client_name);
        self.handler.mark_requested();
        self.handler
            .transport
            .send(&PairingMessage::request(&self.service_name, &self.client_name))
            .await
    }

    /// Wait for the read task to finish and return its result
    ///
    /// Succeeds once the TV accepted the secret or closed the connection.
    /// The result can only be taken once.
    pub async fn listen(&self) -> Result<()> {
        let task = lock(&self.task)
            .take()
            .ok_or(ProtocolError::ListenerConsumed)?;
        task.await?
    }

    /// Current handshake state
    pub fn state(&self) -> PairingState {
        self.handler.state()
    }

    /// Send a raw pairing message
    pub async fn send(&self, message: &PairingMessage) -> Result<()> {
        self.handler.transport.send(message).await
    }

    /// Close the connection; the read task ends
    pub async fn close(&self) -> Result<()> {
        self.handler.transport.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(PairingState::Paired.is_terminal());
        assert!(PairingState::Failed.is_terminal());
        assert!(!PairingState::Init.is_terminal());
        assert!(!PairingState::SecretSent.is_terminal());
    }

    #[test]
    fn test_request_only_advances_from_init() {
        assert_eq!(PairingState::Init.after_request(), PairingState::Requested);
        assert_eq!(
            PairingState::OptionOffered.after_request(),
            PairingState::OptionOffered
        );
        assert_eq!(PairingState::Failed.after_request(), PairingState::Failed);
    }
}
