//! Role resolution — the onboarding state machine and its controller.

pub mod controller;
pub mod state;

pub use controller::{Evaluation, ResolutionStep, RoleResolver};
pub use state::ResolutionState;
