//! Remote-control message schema
//!
//! Remote messages carry no status code. Payloads this client does not model
//! (voice, IME batch edits, app links, ...) are skipped by the decoder and
//! show up as a message without payload.

use super::keycode::{RemoteDirection, RemoteKeyCode};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteDeviceInfo {
    #[prost(string, tag = "1")]
    pub model: String,
    #[prost(string, tag = "2")]
    pub vendor: String,
    #[prost(int32, tag = "3")]
    pub unknown1: i32,
    #[prost(string, tag = "4")]
    pub unknown2: String,
    #[prost(string, tag = "5")]
    pub package_name: String,
    #[prost(string, tag = "6")]
    pub app_version: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteConfigure {
    #[prost(int32, tag = "1")]
    pub code1: i32,
    #[prost(message, optional, tag = "2")]
    pub device_info: Option<RemoteDeviceInfo>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteSetActive {
    #[prost(int32, tag = "1")]
    pub active: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteError {
    #[prost(bool, tag = "1")]
    pub value: bool,
    #[prost(message, optional, boxed, tag = "2")]
    pub message: Option<Box<RemoteMessage>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemotePingRequest {
    #[prost(int32, tag = "1")]
    pub val1: i32,
    #[prost(int32, tag = "2")]
    pub val2: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemotePingResponse {
    #[prost(int32, tag = "1")]
    pub val1: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteKeyInject {
    #[prost(enumeration = "RemoteKeyCode", tag = "1")]
    pub key_code: i32,
    #[prost(enumeration = "RemoteDirection", tag = "2")]
    pub direction: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteAppInfo {
    #[prost(int32, tag = "1")]
    pub counter: i32,
    #[prost(string, tag = "10")]
    pub label: String,
    #[prost(string, tag = "12")]
    pub app_package: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteImeKeyInject {
    #[prost(message, optional, tag = "1")]
    pub app_info: Option<RemoteAppInfo>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteStart {
    #[prost(bool, tag = "1")]
    pub started: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteSetVolumeLevel {
    #[prost(string, tag = "3")]
    pub player_model: String,
    #[prost(uint32, tag = "6")]
    pub volume_max: u32,
    #[prost(uint32, tag = "7")]
    pub volume_level: u32,
    #[prost(bool, tag = "8")]
    pub volume_muted: bool,
}

/// Envelope for every message exchanged on the remote-control port
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteMessage {
    #[prost(oneof = "remote_message::Payload", tags = "1, 2, 3, 8, 9, 10, 20, 40, 50")]
    pub payload: Option<remote_message::Payload>,
}

pub mod remote_message {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "1")]
        Configure(super::RemoteConfigure),
        #[prost(message, tag = "2")]
        SetActive(super::RemoteSetActive),
        #[prost(message, tag = "3")]
        Error(super::RemoteError),
        #[prost(message, tag = "8")]
        PingRequest(super::RemotePingRequest),
        #[prost(message, tag = "9")]
        PingResponse(super::RemotePingResponse),
        #[prost(message, tag = "10")]
        KeyInject(super::RemoteKeyInject),
        #[prost(message, tag = "20")]
        ImeKeyInject(super::RemoteImeKeyInject),
        #[prost(message, tag = "40")]
        Start(super::RemoteStart),
        #[prost(message, tag = "50")]
        SetVolumeLevel(super::RemoteSetVolumeLevel),
    }
}

impl From<remote_message::Payload> for RemoteMessage {
    fn from(payload: remote_message::Payload) -> Self {
        Self {
            payload: Some(payload),
        }
    }
}

impl RemoteMessage {
    /// Short key press
    pub fn key_press(code: RemoteKeyCode) -> Self {
        remote_message::Payload::KeyInject(RemoteKeyInject {
            key_code: code as i32,
            direction: RemoteDirection::Short as i32,
        })
        .into()
    }

    /// Keepalive answer echoing the TV's ping value
    pub fn pong(val1: i32) -> Self {
        remote_message::Payload::PingResponse(RemotePingResponse { val1 }).into()
    }
}
