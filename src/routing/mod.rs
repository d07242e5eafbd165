//! Dashboard routing — section guards, root dispatch, and the HTTP surface.

pub mod guard;
pub mod root;
pub mod routes;

pub use guard::{GuardDecision, SectionGuard};
pub use root::{RootDecision, RootRouter};
pub use routes::{AppState, portal_routes};
