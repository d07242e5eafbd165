//! Profile persistence — the store trait, merge semantics, and the libSQL
//! backend.

pub mod libsql_backend;
pub mod merge;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlStore;
pub use traits::ProfileStore;
