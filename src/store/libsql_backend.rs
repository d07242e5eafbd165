//! libSQL backend — async `ProfileStore` implementation.
//!
//! One row per identity; the four detail blocks are stored as JSON TEXT
//! columns mirroring the managed-DB wire format. Supports local file and
//! in-memory databases.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::profile::model::{ProfilePatch, ProfileRecord, Role};
use crate::store::merge::merge_record;
use crate::store::migrations;
use crate::store::traits::ProfileStore;

const PROFILE_COLUMNS: &str = "role, student_details, startup_details, mentor_details, \
                               professor_details, created_at, updated_at";

/// libSQL profile store.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Pool(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&store.conn).await?;
        info!(path = %path.display(), "Profile database opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Pool(format!("Failed to create in-memory database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Pool(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&store.conn).await?;
        Ok(store)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(ndt.and_utc());
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(ndt.and_utc());
    }
    None
}

fn block_to_json<T: Serialize>(block: &Option<T>) -> Result<libsql::Value, StoreError> {
    match block {
        Some(details) => {
            let json = serde_json::to_string(details)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            Ok(libsql::Value::Text(json))
        }
        None => Ok(libsql::Value::Null),
    }
}

fn json_to_block<T: DeserializeOwned>(json: Option<String>) -> Result<Option<T>, StoreError> {
    match json {
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| StoreError::Serialization(e.to_string())),
        None => Ok(None),
    }
}

/// Map a libsql row to a ProfileRecord. Column order matches
/// `PROFILE_COLUMNS`.
fn row_to_record(row: &libsql::Row) -> Result<ProfileRecord, StoreError> {
    let role_str: Option<String> = row.get::<String>(0).ok();
    let role = match role_str {
        Some(ref s) => Role::from_str(s)
            .map(Some)
            .map_err(|_| StoreError::Serialization(format!("Unknown role in database: {s}")))?,
        None => None,
    };

    Ok(ProfileRecord {
        role,
        student_details: json_to_block(row.get::<String>(1).ok())?,
        startup_details: json_to_block(row.get::<String>(2).ok())?,
        mentor_details: json_to_block(row.get::<String>(3).ok())?,
        professor_details: json_to_block(row.get::<String>(4).ok())?,
        created_at: row.get::<String>(5).ok().as_deref().and_then(parse_datetime),
        updated_at: row.get::<String>(6).ok().as_deref().and_then(parse_datetime),
    })
}

#[async_trait]
impl ProfileStore for LibSqlStore {
    async fn fetch_profile(&self, identity_id: &str) -> Result<Option<ProfileRecord>, StoreError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE identity_id = ?1"),
                params![identity_id],
            )
            .await
            .map_err(|e| StoreError::Query(format!("fetch_profile: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_record(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Query(format!("fetch_profile: {e}"))),
        }
    }

    async fn merge_profile(
        &self,
        identity_id: &str,
        patch: &ProfilePatch,
    ) -> Result<ProfileRecord, StoreError> {
        let existing = self.fetch_profile(identity_id).await?;
        let merged = merge_record(existing.as_ref(), patch, Utc::now())?;

        let conn = self.conn();
        conn.execute(
            "INSERT INTO profiles (identity_id, role, student_details, startup_details, \
             mentor_details, professor_details, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
             ON CONFLICT(identity_id) DO UPDATE SET \
                 role = excluded.role, \
                 student_details = excluded.student_details, \
                 startup_details = excluded.startup_details, \
                 mentor_details = excluded.mentor_details, \
                 professor_details = excluded.professor_details, \
                 updated_at = excluded.updated_at",
            params![
                identity_id,
                match merged.role {
                    Some(role) => libsql::Value::Text(role.as_str().to_string()),
                    None => libsql::Value::Null,
                },
                block_to_json(&merged.student_details)?,
                block_to_json(&merged.startup_details)?,
                block_to_json(&merged.mentor_details)?,
                block_to_json(&merged.professor_details)?,
                merged.created_at.unwrap_or_else(Utc::now).to_rfc3339(),
                merged.updated_at.unwrap_or_else(Utc::now).to_rfc3339(),
            ],
        )
        .await
        .map_err(|e| StoreError::Query(format!("merge_profile: {e}")))?;

        debug!(identity = %identity_id, role = ?merged.role, "Profile merged");
        Ok(merged)
    }
}
