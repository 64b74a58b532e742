//! Auth types
//!
//! The credential held by the token store and the header policy applied by
//! the authorizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bearer credential with its acquisition time
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The opaque bearer token
    pub token: String,
    /// When the token was written to the store
    pub acquired_at: DateTime<Utc>,
}

impl Credential {
    /// Create a credential stamped with the current time
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            acquired_at: Utc::now(),
        }
    }

    /// Time elapsed since the credential was acquired
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.acquired_at
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}

/// Header policy for the request authorizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizerConfig {
    /// URL substrings (object-storage hosts) that are never authorized
    pub exempt_hosts: Vec<String>,
    /// `Accept-Language` value
    pub locale: String,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            exempt_hosts: vec!["aliyuncs.com".to_string()],
            locale: "zh".to_string(),
        }
    }
}
