//! Onboarding form payloads — one per role, locally validated.
//!
//! The forms themselves are external data-collection UIs; this module is
//! the submission boundary. Each payload validates its role's required
//! field set without touching the network, and only a fully valid payload
//! converts into a completed detail block for the profile store.

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::profile::model::{
    IncomeCategory, MentorDetails, ProfessorDetails, Role, RoleDetails, StartupDetails,
    StartupStage, StudentDetails,
};

/// A submitted onboarding form, tagged by role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleForm {
    Student(StudentForm),
    Startup(StartupForm),
    Mentor(MentorForm),
    Professor(ProfessorForm),
}

impl RoleForm {
    pub fn role(&self) -> Role {
        match self {
            Self::Student(_) => Role::Student,
            Self::Startup(_) => Role::Startup,
            Self::Mentor(_) => Role::Mentor,
            Self::Professor(_) => Role::Professor,
        }
    }

    /// Validate the role's required field set. No network is involved;
    /// failures carry one entry per offending field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::Student(f) => f.validate(),
            Self::Startup(f) => f.validate(),
            Self::Mentor(f) => f.validate(),
            Self::Professor(f) => f.validate(),
        }
    }

    /// Convert a validated form into its completed detail block.
    ///
    /// Callers must run `validate` first; conversion itself is infallible.
    pub fn into_details(self) -> RoleDetails {
        match self {
            Self::Student(f) => RoleDetails::Student(f.into_details()),
            Self::Startup(f) => RoleDetails::Startup(f.into_details()),
            Self::Mentor(f) => RoleDetails::Mentor(f.into_details()),
            Self::Professor(f) => RoleDetails::Professor(f.into_details()),
        }
    }
}

/// Student onboarding form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub full_name: String,
    pub age: Option<u32>,
    pub mobile: String,
    pub parent_name: String,
    pub parent_email: String,
    pub parent_mobile: String,
    pub college_name: String,
    pub course: String,
    pub year_of_study: String,
    pub income_group: String,
    pub category: Option<IncomeCategory>,
    pub ews_verification_number: String,
}

impl StudentForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "full_name", &self.full_name);
        match self.age {
            None => errors.push("age", "age is required"),
            Some(0) => errors.push("age", "age must be greater than zero"),
            Some(_) => {}
        }
        require_mobile(&mut errors, "mobile", &self.mobile);
        require(&mut errors, "parent_name", &self.parent_name);
        require_email(&mut errors, "parent_email", &self.parent_email);
        require_mobile(&mut errors, "parent_mobile", &self.parent_mobile);
        require(&mut errors, "college_name", &self.college_name);
        require(&mut errors, "course", &self.course);
        require(&mut errors, "year_of_study", &self.year_of_study);
        require(&mut errors, "income_group", &self.income_group);
        match self.category {
            None => errors.push("category", "category must be EWS or General"),
            Some(IncomeCategory::Ews) => {
                if self.ews_verification_number.trim().is_empty() {
                    errors.push(
                        "ews_verification_number",
                        "EWS category requires a verification number",
                    );
                }
            }
            Some(IncomeCategory::General) => {}
        }
        errors.into_result()
    }

    fn into_details(self) -> StudentDetails {
        let ews_number = match self.category {
            Some(IncomeCategory::Ews) => Some(self.ews_verification_number),
            _ => None,
        };
        StudentDetails {
            full_name: Some(self.full_name),
            age: self.age,
            mobile: Some(self.mobile),
            parent_name: Some(self.parent_name),
            parent_email: Some(self.parent_email),
            parent_mobile: Some(self.parent_mobile),
            college_name: Some(self.college_name),
            course: Some(self.course),
            year_of_study: Some(self.year_of_study),
            income_group: Some(self.income_group),
            category: self.category,
            ews_verification_number: ews_number,
            completed: true,
        }
    }
}

/// Startup onboarding form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupForm {
    pub founder_name: String,
    pub mobile: String,
    pub startup_name: String,
    pub stage: Option<StartupStage>,
    pub industry: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub gst_number: String,
    pub incorporation_details: String,
}

impl StartupForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "founder_name", &self.founder_name);
        require_mobile(&mut errors, "mobile", &self.mobile);
        require(&mut errors, "startup_name", &self.startup_name);
        if self.stage.is_none() {
            errors.push("stage", "stage must be Idea, MVP, or Revenue");
        }
        require(&mut errors, "industry", &self.industry);
        require(&mut errors, "city", &self.city);
        require(&mut errors, "state", &self.state);
        require(&mut errors, "address", &self.address);
        require(&mut errors, "gst_number", &self.gst_number);
        require(&mut errors, "incorporation_details", &self.incorporation_details);
        errors.into_result()
    }

    fn into_details(self) -> StartupDetails {
        StartupDetails {
            founder_name: Some(self.founder_name),
            mobile: Some(self.mobile),
            startup_name: Some(self.startup_name),
            stage: self.stage,
            industry: Some(self.industry),
            city: Some(self.city),
            state: Some(self.state),
            address: Some(self.address),
            gst_number: Some(self.gst_number),
            incorporation_details: Some(self.incorporation_details),
            completed: true,
        }
    }
}

/// Mentor onboarding form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MentorForm {
    pub full_name: String,
    pub mobile: String,
    pub current_role: String,
    pub organization: String,
    pub years_of_experience: Option<u32>,
    pub expertise: Vec<String>,
    pub city: String,
    pub state: String,
    pub total_years_experience: Option<u32>,
}

impl MentorForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "full_name", &self.full_name);
        require_mobile(&mut errors, "mobile", &self.mobile);
        require(&mut errors, "current_role", &self.current_role);
        require(&mut errors, "organization", &self.organization);
        if self.years_of_experience.is_none() {
            errors.push("years_of_experience", "years of experience is required");
        }
        if !self.expertise.iter().any(|e| !e.trim().is_empty()) {
            errors.push("expertise", "at least one area of expertise is required");
        }
        require(&mut errors, "city", &self.city);
        require(&mut errors, "state", &self.state);
        if self.total_years_experience.is_none() {
            errors.push(
                "total_years_experience",
                "total years of experience is required",
            );
        }
        errors.into_result()
    }

    fn into_details(self) -> MentorDetails {
        let expertise = self
            .expertise
            .into_iter()
            .filter(|e| !e.trim().is_empty())
            .collect();
        MentorDetails {
            full_name: Some(self.full_name),
            mobile: Some(self.mobile),
            current_role: Some(self.current_role),
            organization: Some(self.organization),
            years_of_experience: self.years_of_experience,
            expertise,
            city: Some(self.city),
            state: Some(self.state),
            total_years_experience: self.total_years_experience,
            completed: true,
        }
    }
}

/// Professor onboarding form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfessorForm {
    pub full_name: String,
    pub mobile: String,
    pub college_name: String,
    pub department: String,
    pub years_of_teaching: Option<u32>,
}

impl ProfessorForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "full_name", &self.full_name);
        require_mobile(&mut errors, "mobile", &self.mobile);
        require(&mut errors, "college_name", &self.college_name);
        require(&mut errors, "department", &self.department);
        if self.years_of_teaching.is_none() {
            errors.push("years_of_teaching", "years of teaching experience is required");
        }
        errors.into_result()
    }

    fn into_details(self) -> ProfessorDetails {
        ProfessorDetails {
            full_name: Some(self.full_name),
            mobile: Some(self.mobile),
            college_name: Some(self.college_name),
            department: Some(self.department),
            years_of_teaching: self.years_of_teaching,
            completed: true,
        }
    }
}

fn require(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, format!("{field} is required"));
    }
}

fn require_mobile(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        errors.push(field, format!("{field} must be a phone number"));
    } else if !(10..=15).contains(&digits.len()) {
        errors.push(field, format!("{field} must be 10-15 digits"));
    }
}

fn require_email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, format!("{field} is required"));
    } else if !value.contains('@') {
        errors.push(field, format!("{field} must be an email address"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_mentor_form() -> MentorForm {
        MentorForm {
            full_name: "Mina Rao".into(),
            mobile: "9876543210".into(),
            current_role: "Engineering Manager".into(),
            organization: "Acme".into(),
            years_of_experience: Some(6),
            expertise: vec!["product".into(), "hiring".into()],
            city: "Pune".into(),
            state: "MH".into(),
            total_years_experience: Some(12),
        }
    }

    fn valid_student_form() -> StudentForm {
        StudentForm {
            full_name: "Asha K".into(),
            age: Some(19),
            mobile: "9876543210".into(),
            parent_name: "K Parent".into(),
            parent_email: "parent@example.com".into(),
            parent_mobile: "9876501234".into(),
            college_name: "City College".into(),
            course: "BSc".into(),
            year_of_study: "2".into(),
            income_group: "< 5L".into(),
            category: Some(IncomeCategory::General),
            ews_verification_number: String::new(),
        }
    }

    #[test]
    fn valid_forms_pass() {
        assert!(valid_mentor_form().validate().is_ok());
        assert!(valid_student_form().validate().is_ok());
        assert!(
            ProfessorForm {
                full_name: "Dr. Iyer".into(),
                mobile: "9876543210".into(),
                college_name: "IIT".into(),
                department: "Physics".into(),
                years_of_teaching: Some(15),
            }
            .validate()
            .is_ok()
        );
        assert!(
            StartupForm {
                founder_name: "Ravi".into(),
                mobile: "9876543210".into(),
                startup_name: "Acme Labs".into(),
                stage: Some(StartupStage::Mvp),
                industry: "fintech".into(),
                city: "Pune".into(),
                state: "MH".into(),
                address: "12 Main St".into(),
                gst_number: "27AAAAA0000A1Z5".into(),
                incorporation_details: "Pvt Ltd, 2024".into(),
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn empty_form_reports_every_missing_field() {
        let err = StudentForm::default().validate().unwrap_err();
        let fields: Vec<&str> = err.fields.iter().map(|f| f.field).collect();
        for expected in [
            "full_name",
            "age",
            "mobile",
            "parent_name",
            "parent_email",
            "parent_mobile",
            "college_name",
            "course",
            "year_of_study",
            "income_group",
            "category",
        ] {
            assert!(fields.contains(&expected), "missing {expected} in {fields:?}");
        }
    }

    #[test]
    fn ews_requires_verification_number() {
        let mut form = valid_student_form();
        form.category = Some(IncomeCategory::Ews);
        let err = form.validate().unwrap_err();
        assert!(
            err.fields
                .iter()
                .any(|f| f.field == "ews_verification_number")
        );

        form.ews_verification_number = "EWS-1234".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn mentor_requires_at_least_one_expertise() {
        let mut form = valid_mentor_form();
        form.expertise = vec![];
        assert!(form.validate().is_err());

        // Whitespace-only entries do not count.
        form.expertise = vec!["  ".into()];
        assert!(form.validate().is_err());
    }

    #[test]
    fn mobile_format_is_checked() {
        let mut form = valid_mentor_form();
        form.mobile = "12345".into();
        let err = form.validate().unwrap_err();
        assert!(err.fields.iter().any(|f| f.field == "mobile"));

        form.mobile = "not-a-number".into();
        assert!(form.validate().is_err());

        form.mobile = "+919876543210".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn into_details_marks_completed() {
        let details = RoleForm::Mentor(valid_mentor_form()).into_details();
        assert_eq!(details.role(), Role::Mentor);
        assert!(details.completed());
    }

    #[test]
    fn into_details_drops_ews_number_for_general_category() {
        let mut form = valid_student_form();
        form.ews_verification_number = "left-over".into();
        let RoleDetails::Student(details) = RoleForm::Student(form).into_details() else {
            panic!("expected student details");
        };
        assert!(details.ews_verification_number.is_none());
    }

    #[test]
    fn tagged_form_deserializes_by_role() {
        let json = serde_json::json!({
            "role": "professor",
            "full_name": "Dr. Iyer",
            "mobile": "9876543210",
            "college_name": "IIT",
            "department": "Physics",
            "years_of_teaching": 15
        });
        let form: RoleForm = serde_json::from_value(json).unwrap();
        assert_eq!(form.role(), Role::Professor);
        assert!(form.validate().is_ok());
    }
}
