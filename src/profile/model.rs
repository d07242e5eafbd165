//! Profile data model — roles, role-detail blocks, and the wire format.
//!
//! The managed database keeps a profile as an optional `role` plus four
//! optional detail blocks (`ProfileRecord`). Internally we collapse that
//! into a tagged `Profile { role, details }` where `details` is only ever
//! the block matching `role` — stale blocks left behind by the wire format
//! are dropped at the boundary and can never be read as the active role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The four portal roles. At most one per profile, immutable once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Startup,
    Mentor,
    Professor,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::Startup, Role::Mentor, Role::Professor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Startup => "startup",
            Self::Mentor => "mentor",
            Self::Professor => "professor",
        }
    }

    /// Wire key of this role's detail block.
    pub fn details_key(&self) -> &'static str {
        match self {
            Self::Student => "student_details",
            Self::Startup => "startup_details",
            Self::Mentor => "mentor_details",
            Self::Professor => "professor_details",
        }
    }

    /// Navigation path of this role's dashboard section.
    ///
    /// Students use the root route directly; the other three roles each
    /// have a dedicated guarded section.
    pub fn section_path(&self) -> &'static str {
        match self {
            Self::Student => "/",
            Self::Startup => "/startup",
            Self::Mentor => "/mentor",
            Self::Professor => "/professor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "startup" => Ok(Self::Startup),
            "mentor" => Ok(Self::Mentor),
            "professor" => Ok(Self::Professor),
            _ => Err(()),
        }
    }
}

/// Student income category. EWS requires a verification number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeCategory {
    #[serde(rename = "EWS")]
    Ews,
    General,
}

/// Startup maturity stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartupStage {
    Idea,
    #[serde(rename = "MVP")]
    Mvp,
    Revenue,
}

/// Student onboarding details.
///
/// Fields are individually optional on the wire because the store merges
/// partial writes; a block is only trustworthy for dashboard access when
/// `completed` is true, which the onboarding form sets after validating
/// every required field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<IncomeCategory>,
    /// Required when `category` is EWS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ews_verification_number: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Startup onboarding details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartupDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founder_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<StartupStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorporation_details: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Mentor onboarding details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentorDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expertise: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_years_experience: Option<u32>,
    #[serde(default)]
    pub completed: bool,
}

/// Professor onboarding details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessorDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_teaching: Option<u32>,
    #[serde(default)]
    pub completed: bool,
}

/// The active role's detail block, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleDetails {
    Student(StudentDetails),
    Startup(StartupDetails),
    Mentor(MentorDetails),
    Professor(ProfessorDetails),
}

impl RoleDetails {
    pub fn role(&self) -> Role {
        match self {
            Self::Student(_) => Role::Student,
            Self::Startup(_) => Role::Startup,
            Self::Mentor(_) => Role::Mentor,
            Self::Professor(_) => Role::Professor,
        }
    }

    pub fn completed(&self) -> bool {
        match self {
            Self::Student(d) => d.completed,
            Self::Startup(d) => d.completed,
            Self::Mentor(d) => d.completed,
            Self::Professor(d) => d.completed,
        }
    }

    /// Serialize the inner block as a wire JSON object.
    pub fn to_block(&self) -> Map<String, Value> {
        let value = match self {
            Self::Student(d) => serde_json::to_value(d),
            Self::Startup(d) => serde_json::to_value(d),
            Self::Mentor(d) => serde_json::to_value(d),
            Self::Professor(d) => serde_json::to_value(d),
        };
        match value {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Wire-format profile record as persisted by the profile store.
///
/// Blocks other than the one matching `role` may linger from partial
/// writes; they are preserved for backward compatibility but must never be
/// used to infer the role. `Profile::from_record` enforces that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_details: Option<StudentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_details: Option<StartupDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_details: Option<MentorDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professor_details: Option<ProfessorDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Internal profile view: the role plus only its own detail block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub role: Option<Role>,
    pub details: Option<RoleDetails>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// A fresh role-less profile, materialized when the store has no record
    /// for the identity yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collapse a wire record into the tagged internal form.
    ///
    /// Only the block matching `role` is carried over; any other block is
    /// stale data from the optional-columns wire format and is dropped.
    pub fn from_record(record: ProfileRecord) -> Self {
        let details = match record.role {
            Some(Role::Student) => record.student_details.map(RoleDetails::Student),
            Some(Role::Startup) => record.startup_details.map(RoleDetails::Startup),
            Some(Role::Mentor) => record.mentor_details.map(RoleDetails::Mentor),
            Some(Role::Professor) => record.professor_details.map(RoleDetails::Professor),
            None => None,
        };
        Self {
            role: record.role,
            details,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    pub fn has_role(&self) -> bool {
        self.role.is_some()
    }

    /// Whether the active role's onboarding details are completed.
    ///
    /// False when there is no role, no block, or an incomplete block —
    /// in all three cases the dashboard is only reachable via onboarding.
    pub fn role_completed(&self) -> bool {
        self.details.as_ref().is_some_and(|d| d.completed())
    }

    /// Expand back into the wire format (only the active block is ever
    /// present; stale blocks were dropped on the way in).
    pub fn to_record(&self) -> ProfileRecord {
        let mut record = ProfileRecord {
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
            ..Default::default()
        };
        match &self.details {
            Some(RoleDetails::Student(d)) => record.student_details = Some(d.clone()),
            Some(RoleDetails::Startup(d)) => record.startup_details = Some(d.clone()),
            Some(RoleDetails::Mentor(d)) => record.mentor_details = Some(d.clone()),
            Some(RoleDetails::Professor(d)) => record.professor_details = Some(d.clone()),
            None => {}
        }
        record
    }
}

/// Partial profile write: create-or-merge payload for the profile store.
///
/// At most one detail block is carried per patch (a form submits only its
/// own role's block). Blocks are shallow JSON objects so the store can
/// merge field-by-field, preserving omitted fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_details: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_details: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_details: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professor_details: Option<Map<String, Value>>,
}

impl ProfilePatch {
    /// Patch that only sets the role (role selection step).
    pub fn with_role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    /// Patch carrying a role plus its detail block (onboarding submission).
    pub fn with_details(role: Role, block: Map<String, Value>) -> Self {
        let mut patch = Self::with_role(role);
        patch.set_block(role, block);
        patch
    }

    /// Attach a detail block under the given role's wire key.
    pub fn set_block(&mut self, role: Role, block: Map<String, Value>) {
        match role {
            Role::Student => self.student_details = Some(block),
            Role::Startup => self.startup_details = Some(block),
            Role::Mentor => self.mentor_details = Some(block),
            Role::Professor => self.professor_details = Some(block),
        }
    }

    /// The detail block carried for the given role, if any.
    pub fn block(&self, role: Role) -> Option<&Map<String, Value>> {
        match role {
            Role::Student => self.student_details.as_ref(),
            Role::Startup => self.startup_details.as_ref(),
            Role::Mentor => self.mentor_details.as_ref(),
            Role::Professor => self.professor_details.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_display_matches_serde() {
        for role in Role::ALL {
            let display = format!("{role}");
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }

    #[test]
    fn role_from_str_round_trip() {
        for role in Role::ALL {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn section_paths() {
        assert_eq!(Role::Student.section_path(), "/");
        assert_eq!(Role::Mentor.section_path(), "/mentor");
        assert_eq!(Role::Startup.section_path(), "/startup");
        assert_eq!(Role::Professor.section_path(), "/professor");
    }

    #[test]
    fn category_and_stage_wire_names() {
        assert_eq!(
            serde_json::to_string(&IncomeCategory::Ews).unwrap(),
            "\"EWS\""
        );
        assert_eq!(
            serde_json::to_string(&IncomeCategory::General).unwrap(),
            "\"General\""
        );
        assert_eq!(serde_json::to_string(&StartupStage::Mvp).unwrap(), "\"MVP\"");
        assert_eq!(
            serde_json::to_string(&StartupStage::Idea).unwrap(),
            "\"Idea\""
        );
    }

    #[test]
    fn from_record_drops_stale_foreign_blocks() {
        // A mentor profile that still carries a stale student block from an
        // earlier partial write must surface only the mentor details.
        let record = ProfileRecord {
            role: Some(Role::Mentor),
            student_details: Some(StudentDetails {
                full_name: Some("Old Student".into()),
                completed: true,
                ..Default::default()
            }),
            mentor_details: Some(MentorDetails {
                full_name: Some("Mina".into()),
                completed: false,
                ..Default::default()
            }),
            ..Default::default()
        };

        let profile = Profile::from_record(record);
        assert_eq!(profile.role, Some(Role::Mentor));
        match profile.details {
            Some(RoleDetails::Mentor(ref d)) => {
                assert_eq!(d.full_name.as_deref(), Some("Mina"));
            }
            ref other => panic!("expected mentor details, got {other:?}"),
        }
        // The stale completed=true student block must not make the profile ready.
        assert!(!profile.role_completed());
    }

    #[test]
    fn from_record_without_role_has_no_details() {
        let record = ProfileRecord {
            role: None,
            professor_details: Some(ProfessorDetails {
                completed: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        let profile = Profile::from_record(record);
        assert!(!profile.has_role());
        assert!(profile.details.is_none());
        assert!(!profile.role_completed());
    }

    #[test]
    fn role_completed_requires_completed_block() {
        let mut profile = Profile {
            role: Some(Role::Professor),
            details: None,
            ..Default::default()
        };
        assert!(!profile.role_completed());

        profile.details = Some(RoleDetails::Professor(ProfessorDetails {
            completed: false,
            ..Default::default()
        }));
        assert!(!profile.role_completed());

        profile.details = Some(RoleDetails::Professor(ProfessorDetails {
            completed: true,
            ..Default::default()
        }));
        assert!(profile.role_completed());
    }

    #[test]
    fn sparse_block_parses_with_defaults() {
        // A block written by a partial merge may carry a single field.
        let details: MentorDetails = serde_json::from_str(r#"{"city":"Pune"}"#).unwrap();
        assert_eq!(details.city.as_deref(), Some("Pune"));
        assert!(!details.completed);
        assert!(details.full_name.is_none());
    }

    #[test]
    fn patch_serializes_only_present_blocks() {
        let patch = ProfilePatch::with_role(Role::Startup);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"role": "startup"}));

        let mut block = Map::new();
        block.insert("city".into(), Value::String("Pune".into()));
        let patch = ProfilePatch::with_details(Role::Mentor, block);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "mentor", "mentor_details": {"city": "Pune"}})
        );
    }

    #[test]
    fn record_serde_round_trip() {
        let record = ProfileRecord {
            role: Some(Role::Startup),
            startup_details: Some(StartupDetails {
                founder_name: Some("Ravi".into()),
                stage: Some(StartupStage::Revenue),
                completed: true,
                ..Default::default()
            }),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ProfileRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.role, Some(Role::Startup));
        let details = parsed.startup_details.unwrap();
        assert_eq!(details.founder_name.as_deref(), Some("Ravi"));
        assert_eq!(details.stage, Some(StartupStage::Revenue));
        assert!(details.completed);
    }
}
