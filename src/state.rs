//! Connection lifecycle states.

/// Lifecycle state of a client session.
///
/// A session starts in `Connecting`, moves to `Connected` on a successful
/// [`connect`](crate::Client::connect), and lands in `Disconnected` once
/// [`close`](crate::Client::close) runs. `Disconnected` is terminal: a
/// closed session cannot be revived, create a new one to connect again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Session created, transport not yet opened.
    Connecting,
    /// Transport open, RPC calls allowed.
    Connected,
    /// Session closed. Terminal.
    Disconnected,
}

impl ConnectionState {
    /// Whether RPC calls are allowed in this state.
    #[inline]
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// Whether `connect` may still be attempted.
    #[inline]
    pub fn can_connect(self) -> bool {
        matches!(self, ConnectionState::Connecting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connecting_allows_connect_only() {
        assert!(ConnectionState::Connecting.can_connect());
        assert!(!ConnectionState::Connecting.is_connected());
    }

    #[test]
    fn test_connected_allows_calls() {
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Connected.can_connect());
    }

    #[test]
    fn test_disconnected_is_terminal() {
        assert!(!ConnectionState::Disconnected.can_connect());
        assert!(!ConnectionState::Disconnected.is_connected());
    }
}
