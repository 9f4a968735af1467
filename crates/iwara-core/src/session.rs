//! Authentication session
//!
//! A [`Session`] is the opaque token returned by the login endpoint. It is
//! created at login (or restored by the caller from its own storage) and
//! replaced wholesale on re-login; the core never mutates it.

use serde::{Deserialize, Serialize};

/// Authenticated identity attached to every request
///
/// An empty token represents a guest; guest requests are sent without an
/// `Authorization` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
}

impl Session {
    /// Create a session from a raw token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Guest session with no token
    pub fn guest() -> Self {
        Self::default()
    }

    /// True when no token is present
    pub fn is_guest(&self) -> bool {
        self.token.trim().is_empty()
    }

    /// `Authorization` header value, `None` for guests
    pub fn authorization(&self) -> Option<String> {
        if self.is_guest() {
            None
        } else {
            Some(format!("Bearer {}", self.token))
        }
    }
}
