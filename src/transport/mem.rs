//! In-memory transport for tests and embedding.
//!
//! [`pair`] returns a connected transport/peer couple over unbounded
//! channels. The peer side stands in for a server: it scripts inbound
//! frames with [`MemPeer::push`] and captures whatever the client sends.
//!
//! # Example
//!
//! ```
//! use fathom_client::transport::{mem, Transport};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (mut transport, peer) = mem::pair();
//! peer.push(json!({"id": "1", "result": null}));
//! let frame = transport.receive().await.unwrap();
//! assert_eq!(frame["id"], "1");
//! # }
//! ```

use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{FathomError, Result};
use crate::transport::{BoxFuture, Transport};

/// In-memory channel transport.
pub struct MemTransport {
    tx: mpsc::UnboundedSender<Value>,
    rx: mpsc::UnboundedReceiver<Value>,
}

/// The server side of an in-memory transport pair.
pub struct MemPeer {
    tx: Option<mpsc::UnboundedSender<Value>>,
    rx: mpsc::UnboundedReceiver<Value>,
}

/// Create a connected transport/peer pair.
pub fn pair() -> (MemTransport, MemPeer) {
    let (client_tx, peer_rx) = mpsc::unbounded_channel();
    let (peer_tx, client_rx) = mpsc::unbounded_channel();

    (
        MemTransport {
            tx: client_tx,
            rx: client_rx,
        },
        MemPeer {
            tx: Some(peer_tx),
            rx: peer_rx,
        },
    )
}

impl MemPeer {
    /// Queue a frame for the client to receive.
    ///
    /// Frames may be queued ahead of the calls that consume them; they are
    /// delivered in push order.
    pub fn push(&self, frame: Value) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(frame);
        }
    }

    /// Take the next frame the client sent, without waiting.
    pub fn try_recv(&mut self) -> Option<Value> {
        self.rx.try_recv().ok()
    }

    /// Await the next frame the client sent.
    pub async fn recv(&mut self) -> Option<Value> {
        self.rx.recv().await
    }

    /// Stop supplying frames: the client's next `receive` fails as a
    /// closed channel. Frames it already sent remain readable here.
    pub fn shutdown(&mut self) {
        self.tx = None;
    }
}

impl Transport for MemTransport {
    fn send(&mut self, frame: Value) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.tx
                .send(frame)
                .map_err(|_| FathomError::Transport("channel closed".to_string()))
        })
    }

    fn receive(&mut self) -> BoxFuture<'_, Result<Value>> {
        Box::pin(async move {
            self.rx
                .recv()
                .await
                .ok_or_else(|| FathomError::Transport("channel closed".to_string()))
        })
    }

    fn close(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.rx.close();
        })
    }
}
