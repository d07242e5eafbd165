//! Error types for the portal core.

/// Top-level error type for the portal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Profile store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Role is immutable: profile has role {existing}, patch requested {requested}")]
    RoleChange { existing: String, requested: String },
}

/// Errors surfaced by the profile query layer.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("No authenticated identity; profile writes require a signed-in session")]
    NoIdentity,

    #[error("Profile has no role yet; onboarding details require a resolved role")]
    NoRole,

    #[error("Submitted details are for role {submitted}, but the profile role is {current}")]
    RoleMismatch { submitted: String, current: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

/// A single failed form field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field-level validation failures from an onboarding form.
///
/// Carries every failed field so the caller can surface them all at once
/// instead of one per resubmission.
#[derive(Debug, Clone, Default, thiserror::Error, serde::Serialize)]
#[error("{} field(s) failed validation", .fields.len())]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert into a `Result`, erring when any field failed.
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Result type alias for the portal.
pub type Result<T> = std::result::Result<T, Error>;
