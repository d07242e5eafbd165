//! `SectionGuard` — role gate for a dashboard section.
//!
//! One generic guard parameterized by the required role replaces the three
//! structurally identical per-role guards of the original portal; the
//! mentor, startup, and professor sections each mount one instance.

use crate::profile::model::Role;
use crate::profile::query::ProfileView;

/// Outcome of one guard evaluation. Exactly one applies; wrapped content
/// and a redirect are never produced by the same evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Profile still loading: show a neutral indicator, nothing else.
    /// Prevents a flash of unauthorized content.
    Loading,
    /// Issue a redirect to the root route. Emitted exactly once per
    /// mismatch detection.
    Redirect,
    /// A redirect has already been issued for the current mismatch;
    /// render nothing and enqueue no further navigation.
    Hold,
    /// The role matches: render the wrapped section content.
    Render,
}

/// `(identity id, observed role)` a redirect was issued against. A view
/// differing in either component is a new mismatch detection.
type MismatchKey = (Option<String>, Option<Role>);

/// Role gate wrapping one section's content.
#[derive(Debug)]
pub struct SectionGuard {
    required_role: Role,
    /// Key of the mismatch the last redirect was issued for; cleared when
    /// the view goes back to loading or becomes authorized.
    redirected_for: Option<MismatchKey>,
}

impl SectionGuard {
    pub fn new(required_role: Role) -> Self {
        Self {
            required_role,
            redirected_for: None,
        }
    }

    pub fn required_role(&self) -> Role {
        self.required_role
    }

    /// Evaluate the guard against the current view.
    ///
    /// No role yet (the resolution controller at root owns that case) or a
    /// foreign role both redirect to the root route. Re-evaluating with an
    /// unchanged `(identity, profile)` never enqueues a duplicate redirect;
    /// a different identity or a different observed role is a fresh
    /// mismatch and redirects again.
    pub fn evaluate(&mut self, view: &ProfileView) -> GuardDecision {
        if view.loading {
            self.redirected_for = None;
            return GuardDecision::Loading;
        }
        if view.role() == Some(self.required_role) {
            self.redirected_for = None;
            return GuardDecision::Render;
        }
        let mismatch = (view.identity.as_ref().map(|i| i.id.clone()), view.role());
        if self.redirected_for.as_ref() == Some(&mismatch) {
            return GuardDecision::Hold;
        }
        self.redirected_for = Some(mismatch);
        GuardDecision::Redirect
    }
}
