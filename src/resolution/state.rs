//! Resolution states — which onboarding step, if any, applies to the
//! current identity.
//!
//! Progresses one way: NeedsRole → NeedsDetails → Ready. Nothing in this
//! core un-completes a profile or changes a role.

use serde::{Deserialize, Serialize};

use crate::profile::model::Role;
use crate::profile::query::ProfileView;

/// The five resolution states, derived purely from `(identity, loading,
/// profile)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionState {
    /// No identity. Terminal for the controller; it renders nothing.
    Unauthenticated,
    /// Identity present, profile fetch not yet settled. No decision made.
    Loading,
    /// Authenticated, no role yet: the role must be chosen (or hinted).
    NeedsRole,
    /// Role chosen but its onboarding details are absent or incomplete.
    NeedsDetails { role: Role },
    /// Role resolved and onboarding completed; routing takes over.
    Ready { role: Role },
}

impl ResolutionState {
    /// Derive the state from a profile view. Pure; re-evaluated whenever
    /// the view changes.
    pub fn resolve(view: &ProfileView) -> Self {
        if view.identity.is_none() {
            return Self::Unauthenticated;
        }
        if view.loading {
            return Self::Loading;
        }
        match view.role() {
            None => Self::NeedsRole,
            Some(role) if view.role_completed() => Self::Ready { role },
            Some(role) => Self::NeedsDetails { role },
        }
    }
}

impl std::fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Loading => write!(f, "loading"),
            Self::NeedsRole => write!(f, "needs_role"),
            Self::NeedsDetails { role } => write!(f, "needs_details({role})"),
            Self::Ready { role } => write!(f, "ready({role})"),
        }
    }
}
