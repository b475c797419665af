//! Android TV Remote Protocol Messages
//!
//! Protobuf schemas for the two message families spoken on the wire.
//! Both are modeled as tagged unions: each message carries at most one active
//! payload, so dispatch is a single `match` on the payload variant.
//!
//! - [`PairingMessage`]: pairing handshake on port 6467, with a status code
//!   and protocol version on every message
//! - [`RemoteMessage`]: remote-control session on port 6466, no status field;
//!   errors are a payload variant of their own
//!
//! Message types are declared with `prost` derives, so no build script or
//! `.proto` compilation step is needed.

mod keycode;
mod pairing;
mod remote;

pub use keycode::{RemoteDirection, RemoteKeyCode};
pub use pairing::{
    pairing_message, EncodingType, PairingConfiguration, PairingConfigurationAck,
    PairingEncoding, PairingMessage, PairingOption, PairingRequest, PairingRequestAck,
    PairingSecret, PairingSecretAck, PairingStatus, RoleType,
};
pub use remote::{
    remote_message, RemoteAppInfo, RemoteConfigure, RemoteDeviceInfo, RemoteError,
    RemoteImeKeyInject, RemoteKeyInject, RemoteMessage, RemotePingRequest,
    RemotePingResponse, RemoteSetActive, RemoteSetVolumeLevel, RemoteStart,
};
