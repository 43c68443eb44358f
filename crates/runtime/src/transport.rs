//! Loopback transport for the bridge services.
//!
//! Each direction of the bridge is one unary request/response service over
//! its own loopback TCP connection. Frames are a 4-byte little-endian length
//! prefix followed by a JSON body. The transport is trusted (loopback only);
//! there is no authentication and no reconnect - the first failed call
//! latches the channel disconnected for the remainder of the process's life.
//!
//! A [`BridgeListener`] serves inbound requests through a [`ServiceHandler`];
//! the handler runs on the network task and must not block, so the host-side
//! implementation only enqueues and returns an acknowledgement. The actual
//! result of an operation, when one is expected, travels later through the
//! opposite direction's [`BridgeClient`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use webdock_protocol::{Ack, BridgeRequest};

use crate::error::{Error, Result};

/// How often a connecting client re-tries while waiting for the peer.
const CONNECT_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Writes one length-prefixed JSON frame.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, message: &Value) -> Result<()> {
    let body = serde_json::to_vec(message)?;
    let length = body.len() as u32;

    writer
        .write_all(&length.to_le_bytes())
        .await
        .map_err(|e| Error::Transport(format!("Failed to write length prefix: {e}")))?;
    writer
        .write_all(&body)
        .await
        .map_err(|e| Error::Transport(format!("Failed to write frame body: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| Error::Transport(format!("Failed to flush frame: {e}")))?;

    Ok(())
}

/// Reads one length-prefixed JSON frame.
///
/// Returns `Ok(None)` on a clean close (EOF before any prefix byte); a close
/// mid-frame is a transport error.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Value>> {
    let mut length_buf = [0u8; 4];
    match reader.read_exact(&mut length_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => {
            return Err(Error::Transport(format!(
                "Failed to read length prefix: {e}"
            )));
        }
    }

    let length = u32::from_le_bytes(length_buf) as usize;
    let mut body = vec![0u8; length];
    reader
        .read_exact(&mut body)
        .await
        .map_err(|e| Error::Transport(format!("Failed to read frame body: {e}")))?;

    Ok(Some(serde_json::from_slice(&body)?))
}

/// Handles inbound requests on a bridge service.
///
/// Runs on the network task; implementations must return promptly (enqueue
/// and acknowledge, never execute inline).
pub trait ServiceHandler: Send + Sync + 'static {
    fn handle(&self, request: BridgeRequest) -> Ack;
}

/// One direction's listening half: accepts loopback connections and feeds
/// request frames to the service handler.
pub struct BridgeListener {
    port: u16,
    accept_task: JoinHandle<()>,
}

impl BridgeListener {
    /// Binds `127.0.0.1:port` and starts serving. Port 0 picks a free port;
    /// the bound port is available via [`BridgeListener::port`]. A bind
    /// failure is fatal to bridge start.
    pub async fn bind(port: u16, handler: Arc<dyn ServiceHandler>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|source| Error::Bind { port, source })?;
        let port = listener
            .local_addr()
            .map_err(|source| Error::Bind { port, source })?
            .port();

        // Connections live in a JoinSet so tearing down the listener also
        // closes every connection it accepted.
        let accept_task = tokio::spawn(async move {
            let mut connections = tokio::task::JoinSet::new();
            loop {
                tokio::select! {
                    accepted = listener.accept() => match accepted {
                        Ok((stream, peer)) => {
                            tracing::debug!(%peer, "bridge service connection accepted");
                            let handler = Arc::clone(&handler);
                            connections.spawn(async move {
                                if let Err(e) = serve_connection(stream, handler).await {
                                    tracing::warn!("bridge service connection ended: {e}");
                                }
                            });
                        }
                        Err(e) => {
                            tracing::error!("bridge service accept failed: {e}");
                            break;
                        }
                    },
                    Some(_) = connections.join_next(), if !connections.is_empty() => {}
                }
            }
        });

        Ok(Self { port, accept_task })
    }

    /// The locally bound port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Drop for BridgeListener {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

async fn serve_connection(mut stream: TcpStream, handler: Arc<dyn ServiceHandler>) -> Result<()> {
    while let Some(frame) = read_frame(&mut stream).await? {
        let ack = match serde_json::from_value::<BridgeRequest>(frame) {
            Ok(request) => handler.handle(request),
            Err(e) => {
                tracing::warn!("unparseable bridge request: {e}");
                Ack::error(format!("unparseable request: {e}"))
            }
        };
        write_frame(&mut stream, &serde_json::to_value(&ack)?).await?;
    }
    Ok(())
}

/// Per-client connection health flag.
///
/// Starts connected; the first transport failure latches it false for the
/// remainder of the process's life. There is no reconnect. Reads are lock-free
/// and may come from any thread.
#[derive(Debug, Clone)]
pub struct ConnectionState {
    connected: Arc<AtomicBool>,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self {
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Latches the channel dead. Idempotent; logs only on the first flip.
    pub fn mark_disconnected(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            tracing::warn!("bridge channel latched disconnected");
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// One direction's calling half: a single loopback connection issuing unary
/// request/response calls.
pub struct BridgeClient {
    stream: Mutex<TcpStream>,
    state: ConnectionState,
    port: u16,
}

impl BridgeClient {
    /// Connects to `127.0.0.1:port`, retrying until `ready_timeout` elapses.
    ///
    /// The peer process may still be starting up when we first try; refusals
    /// inside the window are expected and silent.
    pub async fn connect(port: u16, ready_timeout: Duration) -> Result<Self> {
        let deadline = tokio::time::Instant::now() + ready_timeout;

        loop {
            match TcpStream::connect(("127.0.0.1", port)).await {
                Ok(stream) => {
                    stream.set_nodelay(true).map_err(Error::Io)?;
                    tracing::debug!(port, "bridge client connected");
                    return Ok(Self {
                        stream: Mutex::new(stream),
                        state: ConnectionState::new(),
                        port,
                    });
                }
                Err(e) => {
                    if tokio::time::Instant::now() >= deadline {
                        tracing::error!(port, "bridge client connect timed out: {e}");
                        return Err(Error::ConnectTimeout(port));
                    }
                    tokio::time::sleep(CONNECT_RETRY_INTERVAL).await;
                }
            }
        }
    }

    /// Issues one call and awaits the acknowledgement.
    ///
    /// Any transport failure latches the connection dead and surfaces as an
    /// error; the caller must treat the channel as permanently broken from
    /// then on. An error-status ack does not affect the latch.
    pub async fn call(&self, request: &BridgeRequest) -> Result<Ack> {
        if !self.state.is_connected() {
            return Err(Error::Disconnected);
        }

        let mut stream = self.stream.lock().await;
        match Self::exchange(&mut stream, request).await {
            Ok(ack) => Ok(ack),
            Err(e) => {
                self.state.mark_disconnected();
                Err(e)
            }
        }
    }

    async fn exchange(stream: &mut TcpStream, request: &BridgeRequest) -> Result<Ack> {
        write_frame(stream, &serde_json::to_value(request)?).await?;
        let frame = read_frame(stream)
            .await?
            .ok_or_else(|| Error::Transport("connection closed before ack".to_string()))?;
        Ok(serde_json::from_value(frame)?)
    }

    /// Shared health flag; cloning it lets other components observe the latch.
    pub fn state(&self) -> ConnectionState {
        self.state.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// The peer port this client dials.
    pub fn port(&self) -> u16 {
        self.port
    }
}
