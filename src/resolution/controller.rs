//! `RoleResolver` — the single authoritative resolution controller.
//!
//! Mounted once near the application root. Decides which onboarding step
//! applies, consumes role hints, and drives role selection and form
//! submission through the profile query. Exactly one of {nothing, role
//! prompt, one onboarding form} is presented per evaluation.

use std::sync::Arc;

use serde::Serialize;

use crate::error::ProfileError;
use crate::profile::forms::RoleForm;
use crate::profile::hint::{HintSlot, normalize_role_hint};
use crate::profile::model::{Profile, ProfilePatch, Role};
use crate::profile::query::ProfileQuery;
use crate::resolution::state::ResolutionState;

/// What the controller presents after an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionStep {
    /// Nothing to present (unauthenticated, loading, or ready).
    Nothing,
    /// The role-selection prompt.
    RolePrompt,
    /// The one onboarding form matching the resolved role.
    OnboardingForm { role: Role },
}

/// Result of a controller evaluation: the derived state, the single step
/// to present, and any surfaced (non-fatal) error.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub state: ResolutionState,
    pub step: ResolutionStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct RoleResolver {
    query: Arc<ProfileQuery>,
    hints: Arc<HintSlot>,
}

impl RoleResolver {
    pub fn new(query: Arc<ProfileQuery>, hints: Arc<HintSlot>) -> Self {
        Self { query, hints }
    }

    /// Re-evaluate against the current `(identity, loading, profile)`.
    ///
    /// In the needs-role state an unconsumed hint is taken (at most once):
    /// a hint that maps to a role skips the prompt entirely by writing the
    /// role immediately; an unmapped hint is cleared and falls back to the
    /// prompt. Idempotent otherwise — repeated evaluation with an
    /// unchanged view yields the same step.
    pub async fn evaluate(&self) -> Evaluation {
        let view = self.query.snapshot().await;
        let state = ResolutionState::resolve(&view);
        let mut error = view.error.clone();

        let step = match state {
            ResolutionState::Unauthenticated
            | ResolutionState::Loading
            | ResolutionState::Ready { .. } => ResolutionStep::Nothing,
            ResolutionState::NeedsDetails { role } => ResolutionStep::OnboardingForm { role },
            ResolutionState::NeedsRole => match self.consume_hint().await {
                HintOutcome::Applied(role) => ResolutionStep::OnboardingForm { role },
                HintOutcome::WriteFailed(message) => {
                    error = Some(message);
                    ResolutionStep::RolePrompt
                }
                HintOutcome::NoHint => ResolutionStep::RolePrompt,
            },
        };

        // Recompute: a consumed hint may have advanced the state.
        let state = ResolutionState::resolve(&self.query.snapshot().await);
        Evaluation { state, step, error }
    }

    /// Explicit role choice from the prompt. Transitions needs-role to
    /// needs-details; the store rejects a conflicting role.
    pub async fn choose_role(&self, role: Role) -> Result<Profile, ProfileError> {
        self.query.update_profile(&ProfilePatch::with_role(role)).await
    }

    /// Onboarding form submission.
    ///
    /// Validates the role's required fields locally (no store call on
    /// failure), then writes `{role, <role>_details: {fields…,
    /// completed: true}}`. A write failure leaves the state machine where
    /// it was; the caller resubmits.
    pub async fn submit_details(&self, form: RoleForm) -> Result<Profile, ProfileError> {
        let submitted = form.role();
        let current = self
            .query
            .snapshot()
            .await
            .role()
            .ok_or(ProfileError::NoRole)?;
        if current != submitted {
            return Err(ProfileError::RoleMismatch {
                submitted: submitted.to_string(),
                current: current.to_string(),
            });
        }

        form.validate()?;
        let details = form.into_details();
        let patch = ProfilePatch::with_details(submitted, details.to_block());
        self.query.update_profile(&patch).await
    }

    async fn consume_hint(&self) -> HintOutcome {
        let Some(raw) = self.hints.take().await else {
            return HintOutcome::NoHint;
        };
        let Some(role) = normalize_role_hint(&raw) else {
            tracing::debug!(hint = %raw, "Ignoring unmapped role hint");
            return HintOutcome::NoHint;
        };
        match self.query.update_profile(&ProfilePatch::with_role(role)).await {
            Ok(_) => {
                tracing::info!(%role, "Role resolved from hint");
                HintOutcome::Applied(role)
            }
            Err(e) => {
                tracing::warn!(%role, "Hinted role write failed: {e}");
                HintOutcome::WriteFailed(e.to_string())
            }
        }
    }
}

enum HintOutcome {
    Applied(Role),
    WriteFailed(String),
    NoHint,
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::error::StoreError;
    use crate::identity::Identity;
    use crate::profile::forms::MentorForm;
    use crate::profile::model::ProfileRecord;
    use crate::store::ProfileStore;
    use crate::store::merge::merge_record;

    #[derive(Default)]
    struct StubStore {
        records: Mutex<std::collections::HashMap<String, ProfileRecord>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl ProfileStore for StubStore {
        async fn fetch_profile(
            &self,
            identity_id: &str,
        ) -> Result<Option<ProfileRecord>, StoreError> {
            Ok(self.records.lock().await.get(identity_id).cloned())
        }

        async fn merge_profile(
            &self,
            identity_id: &str,
            patch: &ProfilePatch,
        ) -> Result<ProfileRecord, StoreError> {
            if self.fail_writes {
                return Err(StoreError::Query("write refused".into()));
            }
            let mut records = self.records.lock().await;
            let merged = merge_record(records.get(identity_id), patch, chrono::Utc::now())?;
            records.insert(identity_id.to_string(), merged.clone());
            Ok(merged)
        }
    }

    async fn signed_in_resolver(store: StubStore) -> (RoleResolver, Arc<HintSlot>) {
        let query = Arc::new(ProfileQuery::new(Arc::new(store)));
        query
            .set_identity(Some(Identity::new("u1", "Test", "t@example.com")))
            .await;
        query.fetch_current().await;
        let hints = Arc::new(HintSlot::new());
        (RoleResolver::new(query, Arc::clone(&hints)), hints)
    }

    fn valid_mentor_form() -> MentorForm {
        MentorForm {
            full_name: "Mina Rao".into(),
            mobile: "9876543210".into(),
            current_role: "EM".into(),
            organization: "Acme".into(),
            years_of_experience: Some(6),
            expertise: vec!["product".into()],
            city: "Pune".into(),
            state: "MH".into(),
            total_years_experience: Some(12),
        }
    }

    #[tokio::test]
    async fn unauthenticated_presents_nothing() {
        let query = Arc::new(ProfileQuery::new(Arc::new(StubStore::default())));
        let resolver = RoleResolver::new(query, Arc::new(HintSlot::new()));
        let eval = resolver.evaluate().await;
        assert_eq!(eval.state, ResolutionState::Unauthenticated);
        assert_eq!(eval.step, ResolutionStep::Nothing);
    }

    #[tokio::test]
    async fn loading_presents_nothing() {
        let query = Arc::new(ProfileQuery::new(Arc::new(StubStore::default())));
        query
            .set_identity(Some(Identity::new("u1", "T", "t@example.com")))
            .await;
        // No fetch_current: still loading.
        let resolver = RoleResolver::new(query, Arc::new(HintSlot::new()));
        let eval = resolver.evaluate().await;
        assert_eq!(eval.state, ResolutionState::Loading);
        assert_eq!(eval.step, ResolutionStep::Nothing);
    }

    #[tokio::test]
    async fn no_role_and_no_hint_reaches_the_prompt_and_stays() {
        let (resolver, _hints) = signed_in_resolver(StubStore::default()).await;
        let eval = resolver.evaluate().await;
        assert_eq!(eval.state, ResolutionState::NeedsRole);
        assert_eq!(eval.step, ResolutionStep::RolePrompt);

        // Re-evaluation with an unchanged view is stable: still the prompt,
        // never a form.
        let eval = resolver.evaluate().await;
        assert_eq!(eval.step, ResolutionStep::RolePrompt);
    }

    #[tokio::test]
    async fn valid_hint_skips_the_prompt() {
        let (resolver, hints) = signed_in_resolver(StubStore::default()).await;
        hints.set("MENTORS").await;

        let eval = resolver.evaluate().await;
        assert_eq!(eval.step, ResolutionStep::OnboardingForm { role: Role::Mentor });
        assert_eq!(eval.state, ResolutionState::NeedsDetails { role: Role::Mentor });
        assert!(!hints.is_set().await, "hint must be cleared after use");
    }

    #[tokio::test]
    async fn invalid_hint_falls_back_to_prompt() {
        let (resolver, hints) = signed_in_resolver(StubStore::default()).await;
        hints.set("administrator").await;

        let eval = resolver.evaluate().await;
        assert_eq!(eval.step, ResolutionStep::RolePrompt);
        assert!(!hints.is_set().await);
    }

    #[tokio::test]
    async fn hint_write_failure_surfaces_and_keeps_prompt() {
        let (resolver, hints) = signed_in_resolver(StubStore {
            fail_writes: true,
            ..Default::default()
        })
        .await;
        hints.set("mentor").await;

        let eval = resolver.evaluate().await;
        assert_eq!(eval.step, ResolutionStep::RolePrompt);
        assert!(eval.error.is_some());
        assert_eq!(eval.state, ResolutionState::NeedsRole);
    }

    #[tokio::test]
    async fn choose_role_then_submit_reaches_ready() {
        let (resolver, _hints) = signed_in_resolver(StubStore::default()).await;

        resolver.choose_role(Role::Mentor).await.unwrap();
        let eval = resolver.evaluate().await;
        assert_eq!(eval.step, ResolutionStep::OnboardingForm { role: Role::Mentor });

        resolver
            .submit_details(RoleForm::Mentor(valid_mentor_form()))
            .await
            .unwrap();
        let eval = resolver.evaluate().await;
        assert_eq!(eval.state, ResolutionState::Ready { role: Role::Mentor });
        assert_eq!(eval.step, ResolutionStep::Nothing);
    }

    #[tokio::test]
    async fn invalid_submission_stays_in_needs_details() {
        let (resolver, _hints) = signed_in_resolver(StubStore::default()).await;
        resolver.choose_role(Role::Mentor).await.unwrap();

        let err = resolver
            .submit_details(RoleForm::Mentor(MentorForm::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::Validation(_)));

        let eval = resolver.evaluate().await;
        assert_eq!(eval.state, ResolutionState::NeedsDetails { role: Role::Mentor });
    }

    #[tokio::test]
    async fn foreign_role_submission_is_rejected() {
        let (resolver, _hints) = signed_in_resolver(StubStore::default()).await;
        resolver.choose_role(Role::Professor).await.unwrap();

        let err = resolver
            .submit_details(RoleForm::Mentor(valid_mentor_form()))
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::RoleMismatch { .. }));
    }
}
