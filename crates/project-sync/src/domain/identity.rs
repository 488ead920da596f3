//! Identity and Session
//!
//! The identity is an opaque owner tag handed out by the identity provider.
//! A `Session` is passed explicitly to every list/detail operation.

use serde::{Deserialize, Serialize};

/// Opaque user identifier supplied by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub identity: Identity,
    pub display_name: Option<String>,
    /// Unix millis
    pub signed_in_at: i64,
}

impl Session {
    pub fn new(identity: Identity, display_name: Option<String>) -> Self {
        Self {
            identity,
            display_name,
            signed_in_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Whether `owner` is the identity of this session
    pub fn owns(&self, owner: &str) -> bool {
        self.identity.as_str() == owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_serializes_as_plain_string() {
        let id = Identity::new("uid-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"uid-1\"");
    }

    #[test]
    fn test_session_ownership() {
        let session = Session::new(Identity::new("alice"), None);
        assert!(session.owns("alice"));
        assert!(!session.owns("bob"));
        assert!(session.signed_in_at > 0);
    }
}
