//! `ProfileQuery` — composes the identity source and the profile store
//! into one derived view.
//!
//! Single source of truth for role-derived booleans, and the only
//! component allowed to read or write the profile store. Fetches exactly
//! once per identity change; a result that arrives for a superseded
//! identity is discarded, never merged.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ProfileError;
use crate::identity::Identity;
use crate::profile::model::{Profile, ProfilePatch, Role};
use crate::store::ProfileStore;

/// Derived snapshot handed to the resolution controller, guards, and
/// root router. Booleans are pure functions of `profile.role`.
#[derive(Debug, Clone, Default)]
pub struct ProfileView {
    pub identity: Option<Identity>,
    pub profile: Option<Profile>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ProfileView {
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().and_then(|p| p.role)
    }

    pub fn has_role(&self) -> bool {
        self.role().is_some()
    }

    pub fn is_student(&self) -> bool {
        self.role() == Some(Role::Student)
    }

    pub fn is_startup(&self) -> bool {
        self.role() == Some(Role::Startup)
    }

    pub fn is_mentor(&self) -> bool {
        self.role() == Some(Role::Mentor)
    }

    pub fn is_professor(&self) -> bool {
        self.role() == Some(Role::Professor)
    }

    /// Whether the active role's onboarding details are completed.
    pub fn role_completed(&self) -> bool {
        self.profile.as_ref().is_some_and(|p| p.role_completed())
    }
}

struct QueryState {
    identity: Option<Identity>,
    /// Bumped on every identity change; fetches and writes only apply
    /// their result when the epoch they started under is still current.
    epoch: u64,
    loading: bool,
    profile: Option<Profile>,
    error: Option<String>,
}

/// The profile query hook.
pub struct ProfileQuery {
    store: Arc<dyn ProfileStore>,
    state: RwLock<QueryState>,
}

impl ProfileQuery {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            state: RwLock::new(QueryState {
                identity: None,
                epoch: 0,
                loading: false,
                profile: None,
                error: None,
            }),
        }
    }

    /// Install the current identity.
    ///
    /// A changed identity supersedes any in-flight fetch (epoch bump) and
    /// marks the view loading until `fetch_current` settles. `None` means
    /// unauthenticated: no store access, `profile = None`, not loading.
    /// Re-installing the same identity is a no-op, so the profile is
    /// fetched exactly once per identity change.
    pub async fn set_identity(&self, identity: Option<Identity>) {
        let mut state = self.state.write().await;
        let same = match (&state.identity, &identity) {
            (Some(current), Some(new)) => current.id == new.id,
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }
        state.epoch += 1;
        state.profile = None;
        state.error = None;
        state.loading = identity.is_some();
        state.identity = identity;
    }

    /// Run the pending fetch for the current identity, if any.
    ///
    /// Captures `(epoch, identity)` up front and re-checks the epoch at
    /// resolution time; a result for a superseded identity is dropped.
    pub async fn fetch_current(&self) {
        let (epoch, identity_id) = {
            let state = self.state.read().await;
            match (&state.identity, state.loading) {
                (Some(identity), true) => (state.epoch, identity.id.clone()),
                _ => return,
            }
        };

        let result = self.store.fetch_profile(&identity_id).await;

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            tracing::debug!(identity = %identity_id, "Discarding fetch for superseded identity");
            return;
        }
        state.loading = false;
        match result {
            Ok(Some(record)) => {
                state.profile = Some(Profile::from_record(record));
                state.error = None;
            }
            Ok(None) => {
                // First authenticated fetch with no record yet: materialize
                // a role-less profile; the row is created on first write.
                state.profile = Some(Profile::empty());
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(identity = %identity_id, "Profile fetch failed: {e}");
                state.profile = None;
                state.error = Some(e.to_string());
            }
        }
    }

    /// Current derived view.
    pub async fn snapshot(&self) -> ProfileView {
        let state = self.state.read().await;
        ProfileView {
            identity: state.identity.clone(),
            profile: state.profile.clone(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    /// Merge-write the patch against the store, scoped to the current
    /// identity. Rejects when unauthenticated. On success the in-memory
    /// profile is replaced with the server-confirmed post-write record
    /// (never an optimistic merge), which is also returned.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<Profile, ProfileError> {
        let (epoch, identity_id) = {
            let state = self.state.read().await;
            let identity = state.identity.as_ref().ok_or(ProfileError::NoIdentity)?;
            (state.epoch, identity.id.clone())
        };

        let record = self.store.merge_profile(&identity_id, patch).await?;
        let profile = Profile::from_record(record);

        let mut state = self.state.write().await;
        if state.epoch == epoch {
            state.profile = Some(profile.clone());
            state.error = None;
        }
        Ok(profile)
    }
}
