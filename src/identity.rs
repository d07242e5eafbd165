//! Identity types — the authenticated principal as seen by this core.
//!
//! Sign-in, sign-up, and token issuance live in an external identity
//! service. This core only consumes the resulting identity through the
//! `IdentityProvider` trait and never mutates it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An authenticated principal. Read-only to this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque unique id issued by the identity service.
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Source of the current authenticated identity.
///
/// `current()` settles asynchronously with no ordering guarantee relative
/// to anything else in the system; callers must tolerate it resolving late.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in identity, or `None` when unauthenticated.
    async fn current(&self) -> Option<Identity>;
}

/// Identity provider backed by environment variables.
///
/// Development stand-in for the external identity service: reads
/// `PORTAL_IDENTITY_ID`, `PORTAL_IDENTITY_NAME`, `PORTAL_IDENTITY_EMAIL`
/// once at construction. Unset id means unauthenticated.
pub struct EnvIdentity {
    identity: Option<Identity>,
}

impl EnvIdentity {
    pub fn from_env() -> Self {
        let identity = std::env::var("PORTAL_IDENTITY_ID").ok().map(|id| Identity {
            id,
            name: std::env::var("PORTAL_IDENTITY_NAME").unwrap_or_default(),
            email: std::env::var("PORTAL_IDENTITY_EMAIL").unwrap_or_default(),
        });
        Self { identity }
    }
}

#[async_trait]
impl IdentityProvider for EnvIdentity {
    async fn current(&self) -> Option<Identity> {
        self.identity.clone()
    }
}
