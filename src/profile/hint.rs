//! Role hints — transient role pre-selection carried by login/registration
//! URLs or short-lived session storage.
//!
//! A hint is normalized through a fixed mapping (case fold plus a single
//! trailing pluralizing "S"), never ad hoc string surgery. Unmapped hints
//! fall back to the regular role prompt. A hint is consumed at most once.

use tokio::sync::Mutex;

use crate::profile::model::Role;

/// Normalize a raw hint string to a role.
///
/// Case-insensitive; accepts an optional single trailing "S"
/// ("MENTORS" → mentor, "startups" → startup). Anything else maps to
/// `None` and the caller falls back to the role prompt.
pub fn normalize_role_hint(raw: &str) -> Option<Role> {
    let upper = raw.trim().to_ascii_uppercase();
    let base = upper.strip_suffix('S').unwrap_or(&upper);
    match base {
        "STUDENT" => Some(Role::Student),
        "STARTUP" => Some(Role::Startup),
        "MENTOR" => Some(Role::Mentor),
        "PROFESSOR" => Some(Role::Professor),
        _ => None,
    }
}

/// At-most-once hint carrier for a session.
///
/// `set` stashes the raw string; `take` hands it out exactly once and
/// clears the slot, so re-evaluating the resolution controller can never
/// consume the same hint twice.
pub struct HintSlot {
    slot: Mutex<Option<String>>,
}

impl HintSlot {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Stash a raw hint, replacing any unconsumed one.
    pub async fn set(&self, raw: impl Into<String>) {
        *self.slot.lock().await = Some(raw.into());
    }

    /// Take the hint, clearing the slot.
    pub async fn take(&self) -> Option<String> {
        self.slot.lock().await.take()
    }

    /// Whether an unconsumed hint is present.
    pub async fn is_set(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

impl Default for HintSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_all_roles_case_insensitively() {
        assert_eq!(normalize_role_hint("student"), Some(Role::Student));
        assert_eq!(normalize_role_hint("STARTUP"), Some(Role::Startup));
        assert_eq!(normalize_role_hint("Mentor"), Some(Role::Mentor));
        assert_eq!(normalize_role_hint("Professor"), Some(Role::Professor));
    }

    #[test]
    fn strips_a_single_trailing_plural_s() {
        assert_eq!(normalize_role_hint("MENTORS"), Some(Role::Mentor));
        assert_eq!(normalize_role_hint("startups"), Some(Role::Startup));
        assert_eq!(normalize_role_hint("Students"), Some(Role::Student));
        assert_eq!(normalize_role_hint("professors"), Some(Role::Professor));
        // Only one S is stripped.
        assert_eq!(normalize_role_hint("MENTORSS"), None);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize_role_hint("  mentor  "), Some(Role::Mentor));
    }

    #[test]
    fn unmapped_hints_are_none() {
        assert_eq!(normalize_role_hint(""), None);
        assert_eq!(normalize_role_hint("admin"), None);
        assert_eq!(normalize_role_hint("mentorship"), None);
        assert_eq!(normalize_role_hint("stud"), None);
    }

    #[tokio::test]
    async fn slot_takes_at_most_once() {
        let slot = HintSlot::new();
        slot.set("MENTORS").await;
        assert!(slot.is_set().await);
        assert_eq!(slot.take().await.as_deref(), Some("MENTORS"));
        assert_eq!(slot.take().await, None);
        assert!(!slot.is_set().await);
    }

    #[tokio::test]
    async fn set_replaces_unconsumed_hint() {
        let slot = HintSlot::new();
        slot.set("student").await;
        slot.set("mentor").await;
        assert_eq!(slot.take().await.as_deref(), Some("mentor"));
    }
}
