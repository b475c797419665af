//! Pairing message schema
//!
//! Every pairing message carries a protocol version, a status code and at most
//! one handshake payload. Field tags follow the TV's `pairing.PairingMessage`
//! definition.

use crate::PROTOCOL_VERSION;

/// Status code carried by every pairing message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum PairingStatus {
    Unknown = 0,
    Ok = 200,
    Error = 400,
    BadConfiguration = 401,
    BadSecret = 402,
}

/// Role a pairing peer plays when exchanging the secret
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RoleType {
    Unknown = 0,
    Input = 1,
    Output = 2,
}

/// Symbol alphabet of the code displayed on the TV
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum EncodingType {
    Unknown = 0,
    Alphanumeric = 1,
    Numeric = 2,
    Hexadecimal = 3,
    Qrcode = 4,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PairingRequest {
    #[prost(string, tag = "1")]
    pub service_name: String,
    #[prost(string, tag = "2")]
    pub client_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PairingRequestAck {
    #[prost(string, tag = "1")]
    pub server_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PairingEncoding {
    #[prost(enumeration = "EncodingType", tag = "1")]
    pub r#type: i32,
    #[prost(uint32, tag = "2")]
    pub symbol_length: u32,
}

impl PairingEncoding {
    /// The only encoding this client supports: six hexadecimal symbols
    pub fn hexadecimal() -> Self {
        Self {
            r#type: EncodingType::Hexadecimal as i32,
            symbol_length: 6,
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PairingOption {
    #[prost(message, repeated, tag = "1")]
    pub input_encodings: Vec<PairingEncoding>,
    #[prost(message, repeated, tag = "2")]
    pub output_encodings: Vec<PairingEncoding>,
    #[prost(enumeration = "RoleType", tag = "3")]
    pub preferred_role: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PairingConfiguration {
    #[prost(message, optional, tag = "1")]
    pub encoding: Option<PairingEncoding>,
    #[prost(enumeration = "RoleType", tag = "2")]
    pub client_role: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PairingConfigurationAck {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PairingSecret {
    #[prost(bytes = "vec", tag = "1")]
    pub secret: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PairingSecretAck {
    #[prost(bytes = "vec", tag = "1")]
    pub secret: Vec<u8>,
}

/// Envelope for every message exchanged on the pairing port
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PairingMessage {
    #[prost(int32, tag = "1")]
    pub protocol_version: i32,
    #[prost(enumeration = "PairingStatus", tag = "2")]
    pub status: i32,
    #[prost(int32, tag = "3")]
    pub request_case: i32,
    #[prost(oneof = "pairing_message::Payload", tags = "10, 11, 20, 30, 31, 40, 41")]
    pub payload: Option<pairing_message::Payload>,
}

pub mod pairing_message {
    /// Handshake payload; at most one is present per message
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "10")]
        Request(super::PairingRequest),
        #[prost(message, tag = "11")]
        RequestAck(super::PairingRequestAck),
        #[prost(message, tag = "20")]
        Option(super::PairingOption),
        #[prost(message, tag = "30")]
        Configuration(super::PairingConfiguration),
        #[prost(message, tag = "31")]
        ConfigurationAck(super::PairingConfigurationAck),
        #[prost(message, tag = "40")]
        Secret(super::PairingSecret),
        #[prost(message, tag = "41")]
        SecretAck(super::PairingSecretAck),
    }

    impl Payload {
        /// Short name used in logs and errors
        pub fn name(&self) -> &'static str {
            match self {
                Payload::Request(_) => "request",
                Payload::RequestAck(_) => "request_ack",
                Payload::Option(_) => "option",
                Payload::Configuration(_) => "configuration",
                Payload::ConfigurationAck(_) => "configuration_ack",
                Payload::Secret(_) => "secret",
                Payload::SecretAck(_) => "secret_ack",
            }
        }
    }
}

impl PairingMessage {
    /// Build an outbound message with status OK and our protocol version
    pub fn ok(payload: pairing_message::Payload) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            status: PairingStatus::Ok as i32,
            request_case: 0,
            payload: Some(payload),
        }
    }

    /// Pairing request announcing this client
    pub fn request(service_name: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self::ok(pairing_message::Payload::Request(PairingRequest {
            service_name: service_name.into(),
            client_name: client_name.into(),
        }))
    }

    /// Option offering the input role with a hexadecimal, 6-symbol code
    pub fn input_option() -> Self {
        Self::ok(pairing_message::Payload::Option(PairingOption {
            input_encodings: vec![PairingEncoding::hexadecimal()],
            output_encodings: Vec::new(),
            preferred_role: RoleType::Input as i32,
        }))
    }

    /// Configuration selecting the input role with a hexadecimal, 6-symbol code
    pub fn input_configuration() -> Self {
        Self::ok(pairing_message::Payload::Configuration(PairingConfiguration {
            encoding: Some(PairingEncoding::hexadecimal()),
            client_role: RoleType::Input as i32,
        }))
    }

    /// Secret derived from both public keys and the PIN
    pub fn secret(secret: Vec<u8>) -> Self {
        Self::ok(pairing_message::Payload::Secret(PairingSecret { secret }))
    }

    /// Whether the sender reported success
    pub fn is_ok(&self) -> bool {
        self.status() == PairingStatus::Ok
    }
}
