//! Portal Gate — role-gated onboarding and dashboard-routing core.

pub mod config;
pub mod error;
pub mod identity;
pub mod profile;
pub mod resolution;
pub mod routing;
pub mod store;
