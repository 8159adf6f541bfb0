//! Transport module - duplex frame channels the client speaks over.
//!
//! Provides abstraction over:
//! - WebSocket connections ([`WsTransport`])
//! - In-memory channels for tests and embedding ([`mem`])

pub mod mem;
mod ws;

pub use mem::{MemPeer, MemTransport};
pub use ws::WsTransport;

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::error::Result;

/// Boxed future returned by transport operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A duplex frame channel.
///
/// One frame is one JSON envelope; how a frame maps onto channel bytes is
/// the implementation's concern. Opening a channel is construction (see
/// [`WsTransport::open`]); a session owns its transport exclusively.
pub trait Transport: Send {
    /// Send one frame, suspending until the channel accepts it.
    fn send(&mut self, frame: Value) -> BoxFuture<'_, Result<()>>;

    /// Receive the next frame, suspending until one is available.
    ///
    /// Fails with [`FathomError::Transport`](crate::FathomError::Transport)
    /// when the channel closes or reports an error.
    fn receive(&mut self) -> BoxFuture<'_, Result<Value>>;

    /// Close the channel. Best-effort: teardown failures are swallowed.
    fn close(&mut self) -> BoxFuture<'_, ()>;
}
