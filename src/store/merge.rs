//! Create-or-merge semantics for profile writes.
//!
//! A patch persists `role` if provided and overlays any provided detail
//! block field-by-field over the existing block of the same name, so a
//! partial write never loses previously stored fields. `completed` comes
//! from the payload, or defaults to `true` on the first write of a block.
//! Role is immutable once persisted: a conflicting role in a patch is
//! rejected, re-asserting the same role is a no-op.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::profile::model::{ProfilePatch, ProfileRecord, Role};

/// Apply a patch to an optional existing record, producing the full
/// post-write record. Pure; the storage backend persists the result.
pub fn merge_record(
    existing: Option<&ProfileRecord>,
    patch: &ProfilePatch,
    now: DateTime<Utc>,
) -> Result<ProfileRecord, StoreError> {
    let mut merged = existing.cloned().unwrap_or_default();

    if let Some(requested) = patch.role {
        match merged.role {
            Some(current) if current != requested => {
                return Err(StoreError::RoleChange {
                    existing: current.to_string(),
                    requested: requested.to_string(),
                });
            }
            _ => merged.role = Some(requested),
        }
    }

    for role in Role::ALL {
        let Some(patch_block) = patch.block(role) else {
            continue;
        };
        let merged_block = merge_block(existing_block(&merged, role), patch_block);
        set_block(&mut merged, role, merged_block)?;
    }

    merged.created_at = merged.created_at.or(Some(now));
    merged.updated_at = Some(now);
    Ok(merged)
}

/// Overlay the patch fields onto the existing block (if any).
fn merge_block(
    existing: Option<Map<String, Value>>,
    patch: &Map<String, Value>,
) -> Map<String, Value> {
    let first_write = existing.is_none();
    let mut block = existing.unwrap_or_default();
    for (key, value) in patch {
        block.insert(key.clone(), value.clone());
    }
    if first_write && !block.contains_key("completed") {
        block.insert("completed".to_string(), Value::Bool(true));
    }
    block
}

fn existing_block(record: &ProfileRecord, role: Role) -> Option<Map<String, Value>> {
    match role {
        Role::Student => to_map(record.student_details.as_ref()),
        Role::Startup => to_map(record.startup_details.as_ref()),
        Role::Mentor => to_map(record.mentor_details.as_ref()),
        Role::Professor => to_map(record.professor_details.as_ref()),
    }
}

fn to_map<T: Serialize>(details: Option<&T>) -> Option<Map<String, Value>> {
    let details = details?;
    match serde_json::to_value(details) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn set_block(
    record: &mut ProfileRecord,
    role: Role,
    block: Map<String, Value>,
) -> Result<(), StoreError> {
    let value = Value::Object(block);
    match role {
        Role::Student => {
            record.student_details =
                Some(serde_json::from_value(value).map_err(serialization_err)?);
        }
        Role::Startup => {
            record.startup_details =
                Some(serde_json::from_value(value).map_err(serialization_err)?);
        }
        Role::Mentor => {
            record.mentor_details = Some(serde_json::from_value(value).map_err(serialization_err)?);
        }
        Role::Professor => {
            record.professor_details =
                Some(serde_json::from_value(value).map_err(serialization_err)?);
        }
    }
    Ok(())
}

fn serialization_err(e: serde_json::Error) -> StoreError {
    StoreError::Serialization(e.to_string())
}
