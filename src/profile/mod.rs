//! Profile domain — roles, onboarding payloads, hints, and the query hook
//! that composes the identity source with the profile store.

pub mod forms;
pub mod hint;
pub mod model;
pub mod query;

pub use forms::{MentorForm, ProfessorForm, RoleForm, StartupForm, StudentForm};
pub use hint::{HintSlot, normalize_role_hint};
pub use model::{Profile, ProfilePatch, ProfileRecord, Role, RoleDetails};
pub use query::{ProfileQuery, ProfileView};
