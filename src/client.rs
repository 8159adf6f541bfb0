//! Client session and RPC methods.
//!
//! The [`Client`] manages the lifecycle:
//! 1. Create the session (`Connecting`)
//! 2. `connect()` opens the WebSocket (`Connected`)
//! 3. RPC methods issue one request/response pair at a time
//! 4. `close()` releases the transport (`Disconnected`, terminal)
//!
//! # Example
//!
//! ```ignore
//! use fathom_client::Client;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut db = Client::new("ws://localhost:8000/rpc");
//!     db.connect().await?;
//!     db.signin(json!({"user": "root", "pass": "root"})).await?;
//!     db.use_ns("test", "test").await?;
//!
//!     let person = db.create("person:tobie", Some(json!({"name": "Tobie"}))).await?;
//!     println!("{person}");
//!
//!     db.close().await;
//!     Ok(())
//! }
//! ```

use serde_json::{json, Value};

use crate::error::{ErrorContext, FathomError, Result};
use crate::protocol::{Request, Response};
use crate::state::ConnectionState;
use crate::transport::{Transport, WsTransport};

/// A client session against one server.
///
/// One request is outstanding at a time; every RPC method takes `&mut self`
/// so the borrow checker enforces that. The session is one-shot: `connect`
/// works once, and a closed session stays closed.
pub struct Client {
    /// Server address, e.g. `ws://localhost:8000/rpc`.
    address: String,
    /// Lifecycle state gating every operation.
    state: ConnectionState,
    /// Token cached by the last successful signin/signup.
    token: Option<String>,
    /// The channel, present exactly while `Connected`.
    transport: Option<Box<dyn Transport>>,
}

impl Client {
    /// Create a session for the given server address.
    ///
    /// No I/O happens here; call [`connect`](Self::connect) to open the
    /// channel.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            state: ConnectionState::Connecting,
            token: None,
            transport: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The token cached by the last successful signin or signup.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Open the WebSocket connection to the session's address.
    ///
    /// Valid exactly once, in the `Connecting` state a fresh session
    /// starts in.
    pub async fn connect(&mut self) -> Result<()> {
        if !self.state.can_connect() {
            return Err(FathomError::Connection(format!(
                "cannot connect in {:?} state",
                self.state
            )));
        }

        let transport = WsTransport::open(&self.address).await?;
        self.transport = Some(Box::new(transport));
        self.state = ConnectionState::Connected;
        tracing::debug!("Session connected to {}", self.address);
        Ok(())
    }

    /// Attach a caller-supplied transport instead of opening a WebSocket.
    ///
    /// Follows the same one-shot rule as [`connect`](Self::connect).
    pub fn connect_with(&mut self, transport: impl Transport + 'static) -> Result<()> {
        if !self.state.can_connect() {
            return Err(FathomError::Connection(format!(
                "cannot connect in {:?} state",
                self.state
            )));
        }

        self.transport = Some(Box::new(transport));
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Close the session.
    ///
    /// Never fails and may be called any number of times. The first call
    /// tears the transport down best-effort; every call lands in
    /// `Disconnected`.
    pub async fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close().await;
            tracing::debug!("Session disconnected from {}", self.address);
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Issue one RPC call and await its reply.
    ///
    /// The building block under every typed method: mints a request with a
    /// fresh id, sends it, and pairs it with the next inbound frame.
    /// `context` decides which error variant a server-reported failure
    /// becomes.
    pub async fn call(
        &mut self,
        method: &str,
        params: Vec<Value>,
        context: ErrorContext,
    ) -> Result<Value> {
        if !self.state.is_connected() {
            return Err(FathomError::NotConnected);
        }
        let transport = self.transport.as_mut().ok_or(FathomError::NotConnected)?;

        let request = Request::new(method, params);
        tracing::trace!("Sending {} request {}", request.method, request.id);

        transport.send(serde_json::to_value(&request)?).await?;
        let frame = transport.receive().await?;

        let response = Response::from_value(frame)?;
        tracing::trace!("Received reply to request {}", request.id);

        if let Some(id) = response.id() {
            if id != request.id {
                tracing::warn!(
                    "Response id {} does not match request id {}",
                    id,
                    request.id
                );
            }
        }

        response.into_result(context)
    }

    /// Select the namespace and database for the session.
    pub async fn use_ns(&mut self, namespace: &str, database: &str) -> Result<()> {
        self.call(
            "use",
            vec![json!(namespace), json!(database)],
            ErrorContext::Query,
        )
        .await?;
        Ok(())
    }

    /// Sign up a new scope user.
    ///
    /// Caches and returns the session token.
    pub async fn signup(&mut self, vars: Value) -> Result<String> {
        let result = self
            .call("signup", vec![vars], ErrorContext::Authentication)
            .await?;
        let token: String = serde_json::from_value(result)?;
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Sign in as a root, namespace, database or scope user.
    ///
    /// Caches and returns the session token.
    pub async fn signin(&mut self, vars: Value) -> Result<String> {
        let result = self
            .call("signin", vec![vars], ErrorContext::Authentication)
            .await?;
        let token: String = serde_json::from_value(result)?;
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Invalidate the session's authentication. Clears the cached token.
    pub async fn invalidate(&mut self) -> Result<()> {
        self.call("invalidate", Vec::new(), ErrorContext::Authentication)
            .await?;
        self.token = None;
        Ok(())
    }

    /// Authenticate with an existing token.
    pub async fn authenticate(&mut self, token: &str) -> Result<()> {
        self.call(
            "authenticate",
            vec![json!(token)],
            ErrorContext::Authentication,
        )
        .await?;
        Ok(())
    }

    /// Assign a session parameter, available to queries as `$key`.
    pub async fn assign(&mut self, key: &str, value: Value) -> Result<()> {
        self.call("let", vec![json!(key), value], ErrorContext::Permission)
            .await?;
        Ok(())
    }

    /// Alias for [`assign`](Self::assign).
    pub async fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.assign(key, value).await
    }

    /// Run a query, with optional bind variables.
    pub async fn query(&mut self, sql: &str, vars: Option<Value>) -> Result<Value> {
        let mut params = vec![json!(sql)];
        if let Some(vars) = vars {
            params.push(vars);
        }
        self.call("query", params, ErrorContext::Query).await
    }

    /// Select all records in a table, or a single record by id.
    pub async fn select(&mut self, thing: &str) -> Result<Value> {
        self.call("select", vec![json!(thing)], ErrorContext::Query)
            .await
    }

    /// Create a record, optionally with initial content.
    pub async fn create(&mut self, thing: &str, data: Option<Value>) -> Result<Value> {
        self.call("create", thing_params(thing, data), ErrorContext::Permission)
            .await
    }

    /// Replace a record with new content, or create it if missing.
    pub async fn update(&mut self, thing: &str, data: Option<Value>) -> Result<Value> {
        self.call("update", thing_params(thing, data), ErrorContext::Permission)
            .await
    }

    /// Merge content into a record (the `change` wire method).
    pub async fn merge(&mut self, thing: &str, data: Option<Value>) -> Result<Value> {
        self.call("change", thing_params(thing, data), ErrorContext::Permission)
            .await
    }

    /// Apply a JSON Patch to a record (the `modify` wire method).
    pub async fn patch(&mut self, thing: &str, data: Option<Value>) -> Result<Value> {
        self.call("modify", thing_params(thing, data), ErrorContext::Permission)
            .await
    }

    /// Delete all records in a table, or a single record by id.
    pub async fn delete(&mut self, thing: &str) -> Result<Value> {
        self.call("delete", vec![json!(thing)], ErrorContext::Permission)
            .await
    }

    /// Information about the authenticated session user.
    pub async fn info(&mut self) -> Result<Value> {
        self.call("info", Vec::new(), ErrorContext::Query).await
    }

    /// Start a live query on a table. Returns the live query id.
    pub async fn live(&mut self, table: &str) -> Result<String> {
        let result = self
            .call("live", vec![json!(table)], ErrorContext::Query)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Stop a running live query.
    pub async fn kill(&mut self, query_id: &str) -> Result<()> {
        self.call("kill", vec![json!(query_id)], ErrorContext::Permission)
            .await?;
        Ok(())
    }

    /// Check the connection is alive and the server responsive.
    pub async fn ping(&mut self) -> Result<bool> {
        let result = self.call("ping", Vec::new(), ErrorContext::Query).await?;
        Ok(serde_json::from_value(result)?)
    }
}

/// Params for the record operations: the target, plus content when given.
fn thing_params(thing: &str, data: Option<Value>) -> Vec<Value> {
    let mut params = vec![json!(thing)];
    if let Some(data) = data {
        params.push(data);
    }
    params
}
