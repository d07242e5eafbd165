//! `RootRouter` — dispatch at the root route.
//!
//! A resolved non-student role is sent to its dedicated section; students
//! and role-less identities stay on the root dashboard, which mounts the
//! resolution controller.

use crate::profile::model::Role;
use crate::profile::query::ProfileView;

/// Outcome of one root evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootDecision {
    /// Profile still loading: neutral indicator only.
    Loading,
    /// Redirect to the given role's section. Issued exactly once per
    /// detection; content rendering is deferred to that section's guard.
    RedirectTo(Role),
    /// A redirect has already been issued; render nothing further.
    Hold,
    /// Render the root (student) dashboard content.
    RenderDashboard,
}

#[derive(Debug)]
pub struct RootRouter {
    /// `(identity id, role)` a redirect has already been issued for, if
    /// any. A view differing in either component redirects again.
    redirected_for: Option<(Option<String>, Role)>,
}

impl RootRouter {
    pub fn new() -> Self {
        Self {
            redirected_for: None,
        }
    }

    pub fn evaluate(&mut self, view: &ProfileView) -> RootDecision {
        if view.loading {
            self.redirected_for = None;
            return RootDecision::Loading;
        }
        match view.role() {
            Some(role @ (Role::Startup | Role::Mentor | Role::Professor)) => {
                let key = (view.identity.as_ref().map(|i| i.id.clone()), role);
                if self.redirected_for.as_ref() == Some(&key) {
                    return RootDecision::Hold;
                }
                self.redirected_for = Some(key);
                RootDecision::RedirectTo(role)
            }
            // Student or unset role: the root dashboard renders, and its
            // resolution controller takes over when no role is set yet.
            Some(Role::Student) | None => {
                self.redirected_for = None;
                RootDecision::RenderDashboard
            }
        }
    }
}

impl Default for RootRouter {
    fn default() -> Self {
        Self::new()
    }
}
