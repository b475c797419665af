//! Android TV Transport Layer
//!
//! One TLS connection per session, carrying 1-byte length-prefixed protobuf
//! frames. The transport re-dials transparently when the socket breaks
//! (broken pipe or connection reset) so the session above it survives.

mod connection;
pub mod framing;
pub mod tls_config;

pub use connection::{FrameHandler, Transport, REDIAL_ATTEMPTS, REDIAL_INTERVAL};
pub use framing::{frame_header, write_frame, FrameDecoder, MAX_PAYLOAD_LEN};
