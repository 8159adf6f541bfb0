//! WebSocket transport implementation.
//!
//! One envelope travels as one text message; binary messages are accepted
//! on the inbound side and parsed the same way. Ping/pong keepalive is
//! handled by the WebSocket library and never surfaces as a frame.
//!
//! # Example
//!
//! ```ignore
//! use fathom_client::transport::WsTransport;
//!
//! let transport = WsTransport::open("ws://localhost:8000/rpc").await?;
//! ```

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::{FathomError, Result};
use crate::transport::{BoxFuture, Transport};

/// WebSocket transport over a tokio-tungstenite stream.
///
/// Generic over the underlying I/O so tests can run the real handshake
/// over an in-memory duplex pipe instead of a TCP socket.
#[derive(Debug)]
pub struct WsTransport<S = MaybeTlsStream<TcpStream>> {
    stream: WebSocketStream<S>,
}

impl WsTransport {
    /// Open a WebSocket connection to `url` (e.g. `ws://localhost:8000/rpc`).
    ///
    /// Fails with [`FathomError::Connection`] when the URL is invalid or
    /// the handshake does not complete.
    pub async fn open(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| FathomError::Connection(e.to_string()))?;

        tracing::debug!("WebSocket connected to {}", url);
        Ok(Self { stream })
    }
}

impl<S> WsTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already-handshaken WebSocket stream.
    pub fn from_stream(stream: WebSocketStream<S>) -> Self {
        Self { stream }
    }
}

impl<S> Transport for WsTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    fn send(&mut self, frame: Value) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let text = serde_json::to_string(&frame)?;
            self.stream
                .send(Message::Text(text))
                .await
                .map_err(|e| FathomError::Transport(e.to_string()))
        })
    }

    fn receive(&mut self) -> BoxFuture<'_, Result<Value>> {
        Box::pin(async move {
            loop {
                match self.stream.next().await {
                    Some(Ok(Message::Text(text))) => return Ok(serde_json::from_str(&text)?),
                    Some(Ok(Message::Binary(data))) => return Ok(serde_json::from_slice(&data)?),
                    Some(Ok(Message::Close(_))) => {
                        return Err(FathomError::Transport(
                            "connection closed by server".to_string(),
                        ))
                    }
                    Some(Ok(_)) => continue, // ping/pong
                    Some(Err(e)) => return Err(FathomError::Transport(e.to_string())),
                    None => return Err(FathomError::Transport("connection closed".to_string())),
                }
            }
        })
    }

    fn close(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let _ = self.stream.close(None).await;
            tracing::debug!("WebSocket closed");
        })
    }
}
