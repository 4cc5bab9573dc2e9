//! Two-phase session identity.

use serde::{Deserialize, Serialize};

/// Session identifier pair: the client-generated local id, plus the
/// authoritative id the server may confirm via the `X-Session-ID` response
/// header. Once observed, the server id wins for every subsequent request.
/// The local id is never overwritten in place, so an operation already in
/// flight keeps the value it started with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIdentity {
    local_id: String,
    server_id: Option<String>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self {
            local_id: uuid::Uuid::new_v4().to_string(),
            server_id: None,
        }
    }

    pub fn with_local_id(local_id: impl Into<String>) -> Self {
        Self {
            local_id: local_id.into(),
            server_id: None,
        }
    }

    /// The id to send with the next request.
    pub fn effective(&self) -> &str {
        self.server_id.as_deref().unwrap_or(&self.local_id)
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub fn server_id(&self) -> Option<&str> {
        self.server_id.as_deref()
    }

    /// Record the id the server confirmed. Later observations replace
    /// earlier ones.
    pub fn observe_server_id(&mut self, id: impl Into<String>) {
        self.server_id = Some(id.into());
    }
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_id_effective_until_server_confirms() {
        let mut identity = SessionIdentity::with_local_id("local-1");
        assert_eq!(identity.effective(), "local-1");

        identity.observe_server_id("server-9");
        assert_eq!(identity.effective(), "server-9");
        assert_eq!(identity.local_id(), "local-1");
    }

    #[test]
    fn test_later_observation_wins() {
        let mut identity = SessionIdentity::new();
        identity.observe_server_id("a");
        identity.observe_server_id("b");
        assert_eq!(identity.effective(), "b");
    }
}
