//! Fake Android TV for integration tests
//!
//! Accepts TLS connections on a loopback port with its own self-signed
//! certificate and speaks the 1-byte length framing.

#![allow(dead_code)]

use androidtv_protocol::transport::{write_frame, FrameDecoder};
use androidtv_protocol::{AndroidTvConfig, CertificateInfo};
use openssl::ssl::{Ssl, SslAcceptor, SslMethod, SslVerifyMode};
use openssl::x509::X509;
use prost::Message;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_openssl::SslStream;

/// How long a test waits for a message it expects
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a test waits to be sure nothing arrives
pub const SILENCE: Duration = Duration::from_millis(300);

pub fn client_certificate() -> Arc<CertificateInfo> {
    Arc::new(CertificateInfo::generate().expect("Failed to generate client certificate"))
}

pub fn config_for(tv: &FakeTv) -> AndroidTvConfig {
    let mut config = AndroidTvConfig::new("127.0.0.1");
    config.pairing.port = tv.port();
    config.remote.port = tv.port();
    config
}

pub struct FakeTv {
    listener: TcpListener,
    acceptor: SslAcceptor,
    pub certificate: CertificateInfo,
}

impl FakeTv {
    pub async fn bind() -> Self {
        let certificate = CertificateInfo::generate().expect("Failed to generate TV certificate");

        let mut builder = SslAcceptor::mozilla_intermediate_v5(SslMethod::tls_server()).unwrap();
        builder.set_certificate(&certificate.x509().unwrap()).unwrap();
        builder.set_private_key(&certificate.pkey().unwrap()).unwrap();
        // Ask for the client certificate but accept any
        builder.set_verify_callback(SslVerifyMode::PEER, |_, _| true);
        let acceptor = builder.build();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        Self {
            listener,
            acceptor,
            certificate,
        }
    }

    pub fn port(&self) -> u16 {
        self.listener.local_addr().unwrap().port()
    }

    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port())
    }

    pub async fn accept(&self) -> TvConnection {
        let (tcp, _) = timeout(RECV_TIMEOUT, self.listener.accept())
            .await
            .expect("client never connected")
            .unwrap();

        let ssl = Ssl::new(self.acceptor.context()).unwrap();
        let mut stream = SslStream::new(ssl, tcp).unwrap();
        Pin::new(&mut stream).accept().await.unwrap();

        TvConnection {
            stream,
            decoder: FrameDecoder::new(),
            frames: VecDeque::new(),
        }
    }

    /// True when no further client connects within `SILENCE`
    pub async fn no_new_connection(&self) -> bool {
        timeout(SILENCE, self.listener.accept()).await.is_err()
    }
}

pub struct TvConnection {
    stream: SslStream<TcpStream>,
    decoder: FrameDecoder,
    frames: VecDeque<Vec<u8>>,
}

impl TvConnection {
    pub async fn send<M: Message>(&mut self, message: &M) {
        write_frame(&mut self.stream, &message.encode_to_vec())
            .await
            .unwrap();
    }

    /// Next frame, or None on end of stream
    async fn next_frame(&mut self) -> Option<Vec<u8>> {
        let mut buffer = [0u8; 512];
        loop {
            if let Some(frame) = self.frames.pop_front() {
                return Some(frame);
            }
            match self.stream.read(&mut buffer).await {
                Ok(0) | Err(_) => return None,
                Ok(n) => self.frames.extend(self.decoder.push(&buffer[..n])),
            }
        }
    }

    /// Next message; panics when none arrives in time
    pub async fn recv<M: Message + Default>(&mut self) -> M {
        let frame = timeout(RECV_TIMEOUT, self.next_frame())
            .await
            .expect("timed out waiting for a message")
            .expect("connection closed while waiting for a message");
        M::decode(frame.as_slice()).expect("client sent an undecodable frame")
    }

    /// Message arriving within `SILENCE`, if any
    pub async fn try_recv<M: Message + Default>(&mut self) -> Option<M> {
        let frame = timeout(SILENCE, self.next_frame()).await.ok().flatten()?;
        Some(M::decode(frame.as_slice()).expect("client sent an undecodable frame"))
    }

    /// True when the client closed the connection
    pub async fn at_eof(&mut self) -> bool {
        matches!(timeout(RECV_TIMEOUT, self.next_frame()).await, Ok(None))
    }

    pub fn client_certificate(&self) -> Option<X509> {
        self.stream.ssl().peer_certificate()
    }

    /// Close cleanly with a TLS close-notify
    pub async fn shutdown(mut self) {
        let _ = self.stream.shutdown().await;
    }

    /// Drop the TCP connection with a reset
    #[allow(deprecated)]
    pub fn reset(self) {
        self.stream.get_ref().set_linger(Some(Duration::ZERO)).unwrap();
    }
}
