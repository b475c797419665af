//! Mirrored TV state and local intents

use crate::messages::{RemoteKeyCode, RemoteSetVolumeLevel};

/// Package prefixes of the TV home screens
const LAUNCHER_PREFIXES: [&str; 2] = ["com.google.android.apps.tv.", "com.android.tv."];

/// Whether `package` is a system launcher (home screen)
pub fn is_launcher(package: &str) -> bool {
    LAUNCHER_PREFIXES
        .iter()
        .any(|prefix| package.starts_with(prefix))
}

/// Volume as last reported by the TV
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolumeState {
    pub max: u32,
    pub level: u32,
    pub muted: bool,
}

/// Last play/pause key this client sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayPauseIntent {
    #[default]
    Unknown,
    Play,
    Pause,
}

#[derive(Debug, Default)]
pub(crate) struct RemoteState {
    /// The TV started the input session at least once
    started: bool,
    /// The TV stopped the input session; key presses are dropped
    ignore: bool,
    foreground_app: String,
    volume: VolumeState,
    play_pause: PlayPauseIntent,
    /// This client sent a mute toggle
    mute_requested: bool,
    /// Mute state our last toggle should produce, until the TV reports volume
    pending_mute: Option<bool>,
}

impl RemoteState {
    /// Apply a Start message; true when the session became ready
    pub(crate) fn start(&mut self, started: bool) -> bool {
        match (started, self.started) {
            (true, false) => {
                self.started = true;
                true
            }
            (true, true) => {
                self.ignore = false;
                false
            }
            (false, true) => {
                self.ignore = true;
                false
            }
            (false, false) => false,
        }
    }

    pub(crate) fn is_ignoring(&self) -> bool {
        self.ignore
    }

    pub(crate) fn set_foreground_app(&mut self, package: String) {
        self.foreground_app = package;
    }

    pub(crate) fn foreground_app(&self) -> &str {
        &self.foreground_app
    }

    pub(crate) fn apply_volume(&mut self, level: &RemoteSetVolumeLevel) {
        self.volume = VolumeState {
            max: level.volume_max,
            level: level.volume_level,
            muted: level.volume_muted,
        };
        self.pending_mute = None;
    }

    pub(crate) fn volume(&self) -> VolumeState {
        self.volume
    }

    pub(crate) fn play_pause(&self) -> PlayPauseIntent {
        self.play_pause
    }

    /// Mute state to act on: our pending toggle if any, else the TV report
    pub(crate) fn effective_muted(&self) -> bool {
        self.pending_mute.unwrap_or(self.volume.muted)
    }

    /// Record the intent behind a key press that was sent
    pub(crate) fn record_key(&mut self, code: RemoteKeyCode) {
        match code {
            RemoteKeyCode::VolumeMute => {
                self.mute_requested = true;
                self.pending_mute = Some(!self.effective_muted());
            }
            RemoteKeyCode::MediaPlay => self.play_pause = PlayPauseIntent::Play,
            RemoteKeyCode::MediaPause => self.play_pause = PlayPauseIntent::Pause,
            _ => {}
        }
    }

    pub(crate) fn is_launcher(&self) -> bool {
        is_launcher(&self.foreground_app)
    }

    /// This client muted the TV and it is still muted
    pub(crate) fn should_unmute(&self) -> bool {
        self.mute_requested && self.effective_muted()
    }

    /// This client paused playback
    pub(crate) fn should_resume(&self) -> bool {
        self.play_pause == PlayPauseIntent::Pause
    }
}
