//! Protocol module - request identifiers and wire envelopes.
//!
//! This module implements the JSON envelope protocol:
//! - Fresh UUID request identifiers
//! - Request serialization (`id`, `method`, `params`)
//! - Response parsing with error/success discrimination

mod envelope;
mod id;

pub use envelope::{Request, Response, WireError};
pub use id::next_request_id;
