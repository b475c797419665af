//! Android TV Remote Control
//!
//! A remote session runs on port 6466 once the client is paired. The TV
//! drives the handshake: it asks the client to configure itself, activates
//! it and finally reports that the input session started. From then on the
//! client can inject key presses while the TV pings it and reports the
//! foreground app and volume changes.
//!
//! ## Message Flow
//!
//! ```text
//! TV                                client
//!  |-- Configure ------------------->|
//!  |<------------------ Configure ---|  device identity, code 622
//!  |-- SetActive ------------------->|
//!  |<------------------ SetActive ---|
//!  |-- Start{started} -------------->|  session ready
//!  |-- PingRequest ----------------->|
//!  |<--------------- PingResponse ---|
//!  |<----------------- KeyInject ----|  caller actions
//!  |-- ImeKeyInject / SetVolume ---->|  state mirroring
//! ```

mod session;
mod state;

pub use session::RemoteSession;
pub use state::{is_launcher, PlayPauseIntent, VolumeState};
