//! Length-prefixed framing
//!
//! ```text
//! +--------+---------------------------+
//! | len u8 | len bytes of protobuf     |
//! +--------+---------------------------+
//! ```
//!
//! The length is a single byte, so a payload can never exceed 255 bytes.
//! Socket reads may return any number of bytes: a read can split the length
//! from its payload, split the payload itself, or carry several frames.

use crate::{ProtocolError, Result};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Largest payload a frame can carry
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

/// Length prefix for `payload`, or `OversizedMessage` when it does not fit
pub fn frame_header(payload: &[u8]) -> Result<u8> {
    u8::try_from(payload.len()).map_err(|_| ProtocolError::OversizedMessage(payload.len()))
}

/// Write one frame: the length byte, then the payload
///
/// The size check happens before anything is written, so an oversized
/// payload leaves the stream untouched.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let len = frame_header(payload)?;
    writer.write_all(&[len]).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Reassembles frames from arbitrarily sized reads
///
/// Exactly one frame is under reconstruction at any time.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Payload length of the frame under reconstruction, once its prefix was read
    expected: Option<usize>,
    /// Payload bytes collected so far
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one read and return every payload it completed, in order
    pub fn push(&mut self, mut chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();

        while !chunk.is_empty() {
            let expected = match self.expected {
                Some(expected) => expected,
                None => {
                    let expected = usize::from(chunk[0]);
                    chunk = &chunk[1..];
                    self.expected = Some(expected);
                    self.buffer.reserve(expected);
                    expected
                }
            };

            let take = (expected - self.buffer.len()).min(chunk.len());
            self.buffer.extend_from_slice(&chunk[..take]);
            chunk = &chunk[take..];

            if self.buffer.len() == expected {
                frames.push(std::mem::take(&mut self.buffer));
                self.expected = None;
            }
        }

        frames
    }

    /// Drop any partially reconstructed frame
    pub fn reset(&mut self) {
        self.expected = None;
        self.buffer.clear();
    }

    /// True between frames
    pub fn is_idle(&self) -> bool {
        self.expected.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![payload.len() as u8];
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_single_read() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(&framed(b"hello"));
        assert_eq!(frames, vec![b"hello".to_vec()]);
        assert!(decoder.is_idle());
    }

    #[test]
    fn test_every_split_point() {
        let payload: Vec<u8> = (0..200u8).collect();
        let bytes = framed(&payload);

        for split in 0..=bytes.len() {
            let mut decoder = FrameDecoder::new();
            let mut frames = decoder.push(&bytes[..split]);
            frames.extend(decoder.push(&[]));
            frames.extend(decoder.push(&bytes[split..]));
            assert_eq!(frames, vec![payload.clone()], "split at {}", split);
        }
    }

    #[test]
    fn test_byte_by_byte_with_empty_reads() {
        let payload: Vec<u8> = (0..=254u8).rev().collect();
        let bytes = framed(&payload);

        let mut decoder = FrameDecoder::new();
        let mut frames = Vec::new();
        for byte in &bytes {
            frames.extend(decoder.push(&[]));
            frames.extend(decoder.push(std::slice::from_ref(byte)));
            if frames.is_empty() {
                assert!(!decoder.is_idle());
            }
        }
        assert_eq!(frames, vec![payload]);
    }

    #[test]
    fn test_boundary_sizes() {
        for len in [0usize, 1, 127, 128, 254, 255] {
            let payload = vec![0xa5; len];
            let mut decoder = FrameDecoder::new();
            assert_eq!(decoder.push(&framed(&payload)), vec![payload]);
        }
    }

    #[test]
    fn test_several_frames_in_one_read() {
        let mut bytes = framed(b"one");
        bytes.extend(framed(b""));
        bytes.extend(framed(b"three"));
        bytes.extend_from_slice(&[4, b'f']);

        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(&bytes);
        assert_eq!(frames, vec![b"one".to_vec(), Vec::new(), b"three".to_vec()]);
        assert!(!decoder.is_idle());

        assert_eq!(decoder.push(b"our"), vec![b"four".to_vec()]);
    }

    #[test]
    fn test_reset_discards_partial_frame() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(&[10, 1, 2, 3]).is_empty());

        decoder.reset();
        assert!(decoder.is_idle());
        assert_eq!(decoder.push(&framed(b"ok")), vec![b"ok".to_vec()]);
    }

    #[test]
    fn test_frame_header_limits() {
        assert_eq!(frame_header(&[0u8; 255]).unwrap(), 255);
        assert_eq!(frame_header(&[]).unwrap(), 0);
        assert!(matches!(
            frame_header(&[0u8; 256]),
            Err(ProtocolError::OversizedMessage(256))
        ));
    }

    #[tokio::test]
    async fn test_write_frame_writes_length_then_payload() {
        let mut writer = tokio_test::io::Builder::new()
            .write(&[3])
            .write(b"abc")
            .build();

        write_frame(&mut writer, b"abc").await.unwrap();
    }

    #[tokio::test]
    async fn test_oversized_frame_writes_nothing() {
        // A mock with no scripted writes panics on any write attempt
        let mut writer = tokio_test::io::Builder::new().build();

        let err = write_frame(&mut writer, &[0u8; 256]).await.unwrap_err();
        assert!(matches!(err, ProtocolError::OversizedMessage(256)));
    }
}
