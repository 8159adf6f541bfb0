//! # fathom-client
//!
//! Async Rust client for FathomDB's WebSocket RPC interface.
//!
//! One persistent duplex connection carries JSON request/response
//! envelopes, strictly one call at a time per session.
//!
//! ## Architecture
//!
//! - **Session** ([`Client`]): lifecycle state machine plus typed RPC methods
//! - **Protocol** ([`protocol`]): request ids and envelope encoding/decoding
//! - **Transport** ([`transport`]): the frame channel seam (WebSocket or
//!   in-memory)
//!
//! ## Example
//!
//! ```ignore
//! use fathom_client::Client;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> fathom_client::Result<()> {
//!     let mut db = Client::new("ws://localhost:8000/rpc");
//!     db.connect().await?;
//!     db.signin(json!({"user": "root", "pass": "root"})).await?;
//!     db.use_ns("test", "test").await?;
//!
//!     let people = db.select("person").await?;
//!     println!("{people}");
//!
//!     db.close().await;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod protocol;
pub mod state;
pub mod transport;

mod client;

pub use client::Client;
pub use error::{ErrorContext, FathomError, Result};
pub use state::ConnectionState;
pub use transport::Transport;
