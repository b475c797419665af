//! Remote Session
//!
//! Owns the remote-port transport and its background read task. The task
//! answers the TV handshake and keepalives and mirrors the state the TV
//! reports; foreground calls inject key presses on the same transport.

use super::state::{PlayPauseIntent, RemoteState, VolumeState};
use crate::messages::remote_message::Payload;
use crate::messages::{
    RemoteConfigure, RemoteDeviceInfo, RemoteKeyCode, RemoteMessage, RemoteSetActive,
};
use crate::transport::{FrameHandler, Transport};
use crate::{lock, AndroidTvConfig, CertificateInfo, DeviceIdentity, ProtocolError, Result};
use async_trait::async_trait;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex};
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// Background side of the session
struct RemoteHandler {
    transport: Arc<Transport>,
    device: DeviceIdentity,
    state: Mutex<RemoteState>,
    /// Flips to true once, when the TV first starts the input session
    ready: watch::Sender<bool>,
    /// Set when the read task is done
    ended: watch::Sender<bool>,
    dump_events: bool,
}

impl RemoteHandler {
    fn configure_reply(&self) -> RemoteMessage {
        Payload::Configure(RemoteConfigure {
            code1: self.device.code,
            device_info: Some(RemoteDeviceInfo {
                model: self.device.model.clone(),
                vendor: self.device.vendor.clone(),
                unknown1: 1,
                unknown2: "1".to_string(),
                package_name: self.device.package_name.clone(),
                app_version: self.device.app_version.clone(),
            }),
        })
        .into()
    }

    fn log_event(&self, message: &RemoteMessage) {
        if self.dump_events {
            info!("event: {:?}", message);
        } else if matches!(message.payload, Some(Payload::PingRequest(_))) {
            trace!("Received ping");
        } else {
            debug!("Received remote message: {:?}", message.payload);
        }
    }
}

#[async_trait]
impl FrameHandler for RemoteHandler {
    type Message = RemoteMessage;

    async fn handle(&self, message: RemoteMessage) -> Result<ControlFlow<()>> {
        self.log_event(&message);

        match message.payload {
            Some(Payload::Error(err)) if err.value => {
                error!("TV reported an error: {:?}", err.message);
                return Err(ProtocolError::RemoteError(format!("{:?}", err.message)));
            }
            Some(Payload::Configure(_)) => {
                self.transport.send(&self.configure_reply()).await?;
            }
            Some(Payload::SetActive(_)) => {
                let reply: RemoteMessage = Payload::SetActive(RemoteSetActive {
                    active: self.device.code,
                })
                .into();
                self.transport.send(&reply).await?;
            }
            Some(Payload::Start(start)) => {
                let became_ready = lock(&self.state).start(start.started);
                if became_ready {
                    info!("Remote session with {} is ready", self.transport.address());
                    self.ready.send_replace(true);
                } else {
                    debug!("Input session started: {}", start.started);
                }
            }
            Some(Payload::PingRequest(ping)) => {
                self.transport.send(&RemoteMessage::pong(ping.val1)).await?;
            }
            Some(Payload::ImeKeyInject(ime)) => {
                let package = ime.app_info.map(|app| app.app_package).unwrap_or_default();
                debug!("Foreground app: {:?}", package);
                lock(&self.state).set_foreground_app(package);
            }
            Some(Payload::SetVolumeLevel(level)) => {
                lock(&self.state).apply_volume(&level);
            }
            _ => {}
        }

        Ok(ControlFlow::Continue(()))
    }
}

/// Remote-control session with one paired TV
pub struct RemoteSession {
    handler: Arc<RemoteHandler>,
    task: Mutex<Option<JoinHandle<Result<()>>>>,
    /// Serializes mute and unmute from check to send
    toggling: AsyncMutex<()>,
}

impl RemoteSession {
    /// Connect to the TV remote port and start the background read task
    pub async fn connect(config: &AndroidTvConfig, certificate: Arc<CertificateInfo>) -> Result<Self> {
        config.validate()?;
        let transport = Transport::open(config.remote_address(), certificate).await?;

        let (ready, _) = watch::channel(false);
        let (ended, _) = watch::channel(false);
        let handler = Arc::new(RemoteHandler {
            transport,
            device: config.remote.device.clone(),
            state: Mutex::new(RemoteState::default()),
            ready,
            ended,
            dump_events: config.dump_events,
        });

        let task = tokio::spawn({
            let handler = handler.clone();
            async move {
                let result = handler.transport.listen(handler.as_ref()).await;
                if let Err(e) = &result {
                    error!("Remote session with {} failed: {}", handler.transport.address(), e);
                }
                handler.ended.send_replace(true);
                result
            }
        });

        Ok(Self {
            handler,
            task: Mutex::new(Some(task)),
            toggling: AsyncMutex::new(()),
        })
    }

    /// Wait for the read task to finish and return its result
    ///
    /// The result can only be taken once.
    pub async fn listen(&self) -> Result<()> {
        let task = lock(&self.task)
            .take()
            .ok_or(ProtocolError::ListenerConsumed)?;
        task.await?
    }

    fn is_ignoring(&self) -> bool {
        lock(&self.handler.state).is_ignoring()
    }

    /// Wait for the first Start; fails once the session has ended
    async fn wait_ready(&self) -> Result<()> {
        let mut ready = self.handler.ready.subscribe();
        let mut ended = self.handler.ended.subscribe();

        let started = tokio::select! {
            biased;
            result = async { ready.wait_for(|ready| *ready).await.map(|_| ()) } => result.is_ok(),
            _ = async { ended.wait_for(|ended| *ended).await.map(|_| ()) } => false,
        };

        if started && !self.handler.transport.is_closed() {
            Ok(())
        } else {
            Err(ProtocolError::ConnectionClosed)
        }
    }

    /// Send a short key press
    ///
    /// Dropped silently while the TV has the input session stopped. Waits
    /// until the TV started the input session for the first time, and fails
    /// with `ConnectionClosed` if the session ends first.
    pub async fn send_key(&self, code: RemoteKeyCode) -> Result<()> {
        if self.is_ignoring() {
            debug!("Input session stopped, dropping {}", code);
            return Ok(());
        }

        self.wait_ready().await?;
        self.handler
            .transport
            .send(&RemoteMessage::key_press(code))
            .await?;
        debug!("Sent {}", code);

        lock(&self.handler.state).record_key(code);
        Ok(())
    }

    /// Send a short key press by its `KEYCODE_*` name
    pub async fn send_key_code(&self, name: &str) -> Result<()> {
        if self.is_ignoring() {
            debug!("Input session stopped, dropping {}", name);
            return Ok(());
        }

        let code: RemoteKeyCode = name.parse()?;
        self.send_key(code).await
    }

    /// Mute the TV unless it already is (or is about to be)
    pub async fn mute(&self) -> Result<()> {
        let _toggling = self.toggling.lock().await;
        if lock(&self.handler.state).effective_muted() {
            return Ok(());
        }
        self.send_key(RemoteKeyCode::VolumeMute).await
    }

    /// Unmute the TV unless it already is (or is about to be)
    pub async fn unmute(&self) -> Result<()> {
        let _toggling = self.toggling.lock().await;
        if !lock(&self.handler.state).effective_muted() {
            return Ok(());
        }
        self.send_key(RemoteKeyCode::VolumeMute).await
    }

    /// Resume playback, unless the home screen is in the foreground
    pub async fn play(&self) -> Result<()> {
        if lock(&self.handler.state).is_launcher() {
            return Ok(());
        }
        self.send_key(RemoteKeyCode::MediaPlay).await
    }

    /// Pause playback, unless the home screen is in the foreground
    pub async fn pause(&self) -> Result<()> {
        if lock(&self.handler.state).is_launcher() {
            return Ok(());
        }
        self.send_key(RemoteKeyCode::MediaPause).await
    }

    /// Send a raw remote message
    pub async fn send(&self, message: &RemoteMessage) -> Result<()> {
        self.handler.transport.send(message).await
    }

    /// Undo our mute and pause, then close the connection
    ///
    /// Restore failures are logged and do not prevent closing.
    pub async fn close(&self) -> Result<()> {
        let (unmute, resume) = {
            let state = lock(&self.handler.state);
            (state.should_unmute(), state.should_resume())
        };

        if unmute {
            if let Err(e) = self.unmute().await {
                warn!("Failed to restore volume: {}", e);
            }
        }
        if resume {
            if let Err(e) = self.play().await {
                warn!("Failed to resume playback: {}", e);
            }
        }

        self.handler.transport.close().await
    }

    /// Whether the TV started the input session
    pub fn is_ready(&self) -> bool {
        *self.handler.ready.borrow()
    }

    /// Package name of the app in the foreground, empty when unknown
    pub fn foreground_app(&self) -> String {
        lock(&self.handler.state).foreground_app().to_string()
    }

    /// Volume as last reported by the TV
    pub fn volume(&self) -> VolumeState {
        lock(&self.handler.state).volume()
    }

    /// Last play/pause key sent by this client
    pub fn play_pause_intent(&self) -> PlayPauseIntent {
        lock(&self.handler.state).play_pause()
    }
}
