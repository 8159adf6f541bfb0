//! Request identifier generation.

use uuid::Uuid;

/// Generate a fresh request identifier.
///
/// Identifiers are 128-bit random UUIDs in canonical hyphenated form.
/// Safe to call from any task with no coordination; two calls never
/// return the same id.
pub fn next_request_id() -> String {
    Uuid::new_v4().to_string()
}
