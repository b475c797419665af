//! Framed TLS connection with transparent re-dial
//!
//! The stream is split into a read half owned by the listening task and a
//! write half shared by every sender behind an async lock. When either side
//! sees a broken pipe or a connection reset the transport dials the same
//! address again, installs the new halves and lets both sides carry on.

use crate::error::{is_end_of_stream, is_transient_io};
use crate::transport::framing::{frame_header, write_frame, FrameDecoder};
use crate::transport::tls_config;
use crate::{lock, CertificateInfo, ProtocolError, Result};
use async_trait::async_trait;
use openssl::ssl::{Ssl, SslConnector};
use openssl::x509::X509;
use prost::Message;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, Notify};
use tokio::time::{sleep, timeout, Duration};
use tokio_openssl::SslStream;
use tracing::{debug, error, info, trace, warn};

/// TCP connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// TLS handshake timeout
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Re-dial attempts before giving up
pub const REDIAL_ATTEMPTS: u32 = 5;

/// Pause between re-dial attempts
pub const REDIAL_INTERVAL: Duration = Duration::from_millis(500);

/// Socket read size
const READ_BUFFER_SIZE: usize = 1024;

type TlsStream = SslStream<TcpStream>;

/// Receives every decoded inbound message of a connection
#[async_trait]
pub trait FrameHandler: Send + Sync {
    /// Message type carried by the connection
    type Message: prost::Message + Default + Send;

    /// Handle one message; `Break` ends the read loop successfully
    async fn handle(&self, message: Self::Message) -> Result<ControlFlow<()>>;
}

/// What woke the read loop
enum ReadEvent {
    Shutdown,
    Reconnected,
    Data(std::io::Result<usize>),
}

/// TLS connection to one TV service
pub struct Transport {
    /// `host:port` dialed (and re-dialed)
    addr: String,
    /// Our client identity
    certificate: Arc<CertificateInfo>,
    /// Client TLS configuration, reused for every dial
    connector: SslConnector,
    /// Write half; one frame at a time
    writer: Mutex<Option<WriteHalf<TlsStream>>>,
    /// Read half waiting to be picked up by the read loop
    incoming: std::sync::Mutex<Option<ReadHalf<TlsStream>>>,
    /// Certificate the TV presented on the current connection
    peer_certificate: std::sync::Mutex<Option<X509>>,
    closed: AtomicBool,
    /// Bumped every time new halves are installed
    generation: AtomicU64,
    /// Held for the whole of a re-dial
    redialing: Mutex<()>,
    /// Signalled when new halves were installed
    reconnected: Notify,
    /// Signalled by `close()`
    shutdown: Notify,
}

impl Transport {
    /// Dial `addr` and complete the TLS handshake, presenting `certificate`
    ///
    /// The TV certificate is not verified.
    pub async fn open(addr: impl Into<String>, certificate: Arc<CertificateInfo>) -> Result<Arc<Self>> {
        let addr = addr.into();
        let connector = tls_config::create_client_config(&certificate)?;

        let transport = Arc::new(Self {
            addr,
            certificate,
            connector,
            writer: Mutex::new(None),
            incoming: std::sync::Mutex::new(None),
            peer_certificate: std::sync::Mutex::new(None),
            closed: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            redialing: Mutex::new(()),
            reconnected: Notify::new(),
            shutdown: Notify::new(),
        });

        let stream = transport.dial().await?;
        transport.install(stream).await;

        Ok(transport)
    }

    async fn dial(&self) -> Result<TlsStream> {
        info!("Connecting to {} via TLS", self.addr);

        let tcp_stream = timeout(CONNECT_TIMEOUT, TcpStream::connect(self.addr.as_str()))
            .await
            .map_err(|_| ProtocolError::Timeout(format!("connecting to {}", self.addr)))??;
        tcp_stream.set_nodelay(true)?;

        debug!("TCP connection established to {}", self.addr);

        let ssl = Ssl::new(self.connector.context())?;
        let mut tls_stream = SslStream::new(ssl, tcp_stream)?;

        timeout(HANDSHAKE_TIMEOUT, Pin::new(&mut tls_stream).connect())
            .await
            .map_err(|_| ProtocolError::Timeout(format!("TLS handshake with {}", self.addr)))?
            .map_err(|e| {
                error!("TLS handshake with {} failed: {}", self.addr, e);
                ProtocolError::Tls(e)
            })?;

        info!("TLS connection established to {}", self.addr);
        Ok(tls_stream)
    }

    async fn install(&self, stream: TlsStream) {
        let peer = stream.ssl().peer_certificate();
        if peer.is_none() {
            warn!("{} did not present a certificate", self.addr);
        }
        *lock(&self.peer_certificate) = peer;

        let (reader, writer) = tokio::io::split(stream);
        let mut current = self.writer.lock().await;
        *current = Some(writer);
        *lock(&self.incoming) = Some(reader);
        self.generation.fetch_add(1, Ordering::AcqRel);
        drop(current);

        self.reconnected.notify_one();
    }

    fn take_reader(&self) -> Option<ReadHalf<TlsStream>> {
        lock(&self.incoming).take()
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Dial the same address again, up to `REDIAL_ATTEMPTS` times
    ///
    /// `seen` is the generation of the connection that failed. Concurrent
    /// callers coalesce: they wait for the re-dial in flight and do not dial
    /// again once it replaced the failed connection.
    async fn redial(&self, seen: u64) -> Result<()> {
        let _redialing = self.redialing.lock().await;
        if self.generation() != seen {
            debug!("{} was already re-dialed", self.addr);
            return Ok(());
        }

        let mut last_error = ProtocolError::ConnectionClosed;
        for attempt in 1..=REDIAL_ATTEMPTS {
            if self.is_closed() {
                return Err(ProtocolError::ConnectionClosed);
            }

            match self.dial().await {
                Ok(stream) => {
                    self.install(stream).await;
                    info!("Re-dialed {} (attempt {})", self.addr, attempt);
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "Re-dial attempt {}/{} to {} failed: {}",
                        attempt, REDIAL_ATTEMPTS, self.addr, e
                    );
                    last_error = e;
                }
            }

            if attempt < REDIAL_ATTEMPTS {
                sleep(REDIAL_INTERVAL).await;
            }
        }

        error!("Giving up on {} after {} re-dial attempts", self.addr, REDIAL_ATTEMPTS);
        Err(last_error)
    }

    /// Encode and send one message as a single frame
    ///
    /// Messages over 255 bytes are rejected before anything is written. A
    /// transient socket failure triggers a re-dial and one retry of the
    /// whole frame.
    pub async fn send<M: Message>(&self, message: &M) -> Result<()> {
        self.ensure_open()?;

        let payload = message.encode_to_vec();
        frame_header(&payload)?;

        let generation = self.generation();
        match self.write_payload(&payload).await {
            Err(e) if e.is_transient() && !self.is_closed() => {
                warn!("Write to {} failed: {}, re-dialing", self.addr, e);
                self.redial(generation).await?;
                self.write_payload(&payload).await
            }
            result => result,
        }
    }

    async fn write_payload(&self, payload: &[u8]) -> Result<()> {
        let mut writer = self.writer.lock().await;
        let writer = writer.as_mut().ok_or(ProtocolError::ConnectionClosed)?;

        write_frame(writer, payload).await?;
        trace!("Sent {} byte frame to {}", payload.len(), self.addr);
        Ok(())
    }

    /// Read frames until end of stream, `close()`, a `Break` from the handler
    /// or an unrecoverable error
    ///
    /// Frames are decoded and handed to `handler` in arrival order. A
    /// transient read failure re-dials; a partial frame from the broken
    /// connection is discarded.
    pub async fn listen<H>(&self, handler: &H) -> Result<()>
    where
        H: FrameHandler + ?Sized,
    {
        self.ensure_open()?;
        let mut generation = self.generation();
        let mut reader = self.take_reader().ok_or(ProtocolError::ConnectionClosed)?;
        let mut decoder = FrameDecoder::new();
        let mut buffer = [0u8; READ_BUFFER_SIZE];

        loop {
            if self.is_closed() {
                return Ok(());
            }

            let event = tokio::select! {
                biased;
                _ = self.shutdown.notified() => ReadEvent::Shutdown,
                _ = self.reconnected.notified() => ReadEvent::Reconnected,
                result = reader.read(&mut buffer) => ReadEvent::Data(result),
            };

            match event {
                ReadEvent::Shutdown => {
                    debug!("Read loop for {} stopped by close", self.addr);
                    return Ok(());
                }
                ReadEvent::Reconnected => {
                    if let Some(fresh) = self.take_reader() {
                        debug!("Read loop for {} switched to the new connection", self.addr);
                        generation = self.generation();
                        reader = fresh;
                        decoder.reset();
                    }
                }
                ReadEvent::Data(Ok(0)) => {
                    info!("Connection to {} closed by peer", self.addr);
                    return Ok(());
                }
                ReadEvent::Data(Ok(n)) => {
                    trace!("Read {} bytes from {}", n, self.addr);
                    for payload in decoder.push(&buffer[..n]) {
                        let message = H::Message::decode(payload.as_slice())?;
                        if handler.handle(message).await?.is_break() {
                            return Ok(());
                        }
                    }
                }
                ReadEvent::Data(Err(e)) if is_end_of_stream(&e) => {
                    info!("Connection to {} ended", self.addr);
                    return Ok(());
                }
                ReadEvent::Data(Err(e)) if self.is_closed() => {
                    debug!("Read from closed connection to {} failed: {}", self.addr, e);
                    return Ok(());
                }
                ReadEvent::Data(Err(e)) if is_transient_io(&e) => {
                    warn!("Read from {} failed: {}, re-dialing", self.addr, e);
                    self.redial(generation).await?;
                    match self.take_reader() {
                        Some(fresh) => {
                            generation = self.generation();
                            reader = fresh;
                            decoder.reset();
                        }
                        None => sleep(REDIAL_INTERVAL).await,
                    }
                }
                ReadEvent::Data(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Close the connection
    ///
    /// Stops the read loop and shuts the socket down. Closing twice fails
    /// with `ConnectionClosed`.
    pub async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(ProtocolError::ConnectionClosed);
        }

        info!("Closing connection to {}", self.addr);
        self.shutdown.notify_one();

        drop(self.take_reader());
        let writer = self.writer.lock().await.take();
        if let Some(mut writer) = writer {
            if let Err(e) = writer.shutdown().await {
                debug!("TLS shutdown with {} failed: {}", self.addr, e);
            }
        }

        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(ProtocolError::ConnectionClosed)
        } else {
            Ok(())
        }
    }

    /// True once `close()` was called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Certificate presented by the TV on the current connection
    pub fn peer_certificate(&self) -> Option<X509> {
        lock(&self.peer_certificate).clone()
    }

    /// Our client identity
    pub fn certificate(&self) -> &Arc<CertificateInfo> {
        &self.certificate
    }

    /// Address this transport dials
    pub fn address(&self) -> &str {
        &self.addr
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("addr", &self.addr)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
