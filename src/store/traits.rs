//! `ProfileStore` trait — async interface to the profile persistence
//! service. The profile query layer is the only caller.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::profile::model::{ProfilePatch, ProfileRecord};

/// Backend-agnostic profile persistence.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile record for an identity, or `None` when no record
    /// exists yet.
    async fn fetch_profile(&self, identity_id: &str) -> Result<Option<ProfileRecord>, StoreError>;

    /// Create-or-merge write scoped to an identity.
    ///
    /// Persists `role` if provided (a conflicting role is rejected) and
    /// merges any provided detail block field-by-field over the existing
    /// block of the same name. Returns the full post-write record.
    async fn merge_profile(
        &self,
        identity_id: &str,
        patch: &ProfilePatch,
    ) -> Result<ProfileRecord, StoreError>;
}
