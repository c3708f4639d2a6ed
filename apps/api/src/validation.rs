//! Field validation for the resume form.
//!
//! Syntactic checks only — required-ness, email shape, URL shape. Errors are
//! accumulated per field (wire-cased paths like `experience[0].jobTitle`) so
//! the client can render them inline. A failed validation blocks document
//! assembly entirely; no collaborator or renderer call is made.

use serde::Serialize;

use crate::models::resume::ResumeRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Syntactic email check: exactly one `@`, non-empty local part, and a
/// dotted domain with non-empty labels. No whitespace anywhere.
pub fn validate_email(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.split('.').any(|label| label.is_empty())
}

/// URL fields must carry an explicit http(s) scheme and a non-empty host.
pub fn validate_url(value: &str) -> bool {
    let value = value.trim();
    let Some(rest) = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
    else {
        return false;
    };
    let host = rest.split('/').next().unwrap_or("");
    !host.is_empty() && !host.chars().any(char::is_whitespace)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn opt_present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Runs the full rule set over a finalized record, returning every failure.
/// Optional fields holding an empty string are treated as absent — the form
/// stores `''` for untouched optional inputs.
pub fn validate_record(record: &ResumeRecord) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if is_blank(&record.contact.full_name) {
        errors.push(FieldError::new("contact.fullName", "Full name is required"));
    }
    if is_blank(&record.contact.email) {
        errors.push(FieldError::new("contact.email", "Email is required"));
    } else if !validate_email(&record.contact.email) {
        errors.push(FieldError::new("contact.email", "Invalid email address"));
    }

    let url_fields = [
        ("contact.linkedin", &record.contact.linkedin, "Invalid LinkedIn URL"),
        ("contact.github", &record.contact.github, "Invalid GitHub URL"),
        ("contact.portfolio", &record.contact.portfolio, "Invalid portfolio URL"),
    ];
    for (field, value, message) in url_fields {
        if let Some(url) = opt_present(value) {
            if !validate_url(url) {
                errors.push(FieldError::new(field, message));
            }
        }
    }

    for (i, exp) in record.experience.iter().enumerate() {
        if is_blank(&exp.job_title) {
            errors.push(FieldError::new(
                format!("experience[{i}].jobTitle"),
                "Job title is required",
            ));
        }
        if is_blank(&exp.company) {
            errors.push(FieldError::new(
                format!("experience[{i}].company"),
                "Company name is required",
            ));
        }
        if is_blank(&exp.start_date) {
            errors.push(FieldError::new(
                format!("experience[{i}].startDate"),
                "Start date is required",
            ));
        }
        if is_blank(&exp.description) {
            errors.push(FieldError::new(
                format!("experience[{i}].description"),
                "Description is required",
            ));
        }
    }

    for (i, edu) in record.education.iter().enumerate() {
        if is_blank(&edu.degree) {
            errors.push(FieldError::new(
                format!("education[{i}].degree"),
                "Degree is required",
            ));
        }
        if is_blank(&edu.institution) {
            errors.push(FieldError::new(
                format!("education[{i}].institution"),
                "Institution name is required",
            ));
        }
        if is_blank(&edu.graduation_date) {
            errors.push(FieldError::new(
                format!("education[{i}].graduationDate"),
                "Graduation date is required",
            ));
        }
    }

    for (i, skill) in record.skills.iter().enumerate() {
        if is_blank(&skill.name) {
            errors.push(FieldError::new(
                format!("skills[{i}].name"),
                "Skill name is required",
            ));
        }
    }

    for (i, project) in record.projects.iter().enumerate() {
        if is_blank(&project.name) {
            errors.push(FieldError::new(
                format!("projects[{i}].name"),
                "Project name is required",
            ));
        }
        if is_blank(&project.description) {
            errors.push(FieldError::new(
                format!("projects[{i}].description"),
                "Description is required",
            ));
        }
        if let Some(link) = opt_present(&project.link) {
            if !validate_url(link) {
                errors.push(FieldError::new(
                    format!("projects[{i}].link"),
                    "Invalid project link",
                ));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Contact, Education, Experience, Project, Skill};

    fn minimal_record() -> ResumeRecord {
        ResumeRecord {
            contact: Contact {
                full_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                ..Default::default()
            },
            summary: "Engineer.".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_email_addresses() {
        assert!(validate_email("jane@example.com"));
        assert!(validate_email("j.doe+resume@sub.example.co"));
        assert!(validate_email("  padded@example.com  "));
    }

    #[test]
    fn test_invalid_email_addresses() {
        assert!(!validate_email(""));
        assert!(!validate_email("no-at-sign.example.com"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("jane@"));
        assert!(!validate_email("jane@nodot"));
        assert!(!validate_email("jane@example..com"));
        assert!(!validate_email("jane@.example.com"));
        assert!(!validate_email("jane doe@example.com"));
        assert!(!validate_email("jane@@example.com"));
    }

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("https://linkedin.com/in/janedoe"));
        assert!(validate_url("http://example.com"));
        assert!(validate_url("https://janedoe.dev"));
    }

    #[test]
    fn test_invalid_urls() {
        assert!(!validate_url(""));
        assert!(!validate_url("linkedin.com/in/janedoe"));
        assert!(!validate_url("ftp://example.com"));
        assert!(!validate_url("https://"));
        assert!(!validate_url("https:// example.com"));
    }

    #[test]
    fn test_minimal_record_passes() {
        assert!(validate_record(&minimal_record()).is_empty());
    }

    #[test]
    fn test_missing_full_name_and_email() {
        let mut record = minimal_record();
        record.contact.full_name = "  ".to_string();
        record.contact.email = String::new();
        let errors = validate_record(&record);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "contact.fullName");
        assert_eq!(errors[1].field, "contact.email");
        assert_eq!(errors[1].message, "Email is required");
    }

    #[test]
    fn test_malformed_email_reported_once() {
        let mut record = minimal_record();
        record.contact.email = "not-an-email".to_string();
        let errors = validate_record(&record);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Invalid email address");
    }

    #[test]
    fn test_empty_string_optional_url_is_ignored() {
        let mut record = minimal_record();
        record.contact.linkedin = Some(String::new());
        assert!(validate_record(&record).is_empty());
    }

    #[test]
    fn test_invalid_contact_url_flagged() {
        let mut record = minimal_record();
        record.contact.github = Some("github.com/janedoe".to_string());
        let errors = validate_record(&record);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "contact.github");
    }

    #[test]
    fn test_experience_required_fields() {
        let mut record = minimal_record();
        record.experience.push(Experience {
            company: "Acme".to_string(),
            ..Default::default()
        });
        let fields: Vec<String> = validate_record(&record)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(
            fields,
            vec![
                "experience[0].jobTitle",
                "experience[0].startDate",
                "experience[0].description"
            ]
        );
    }

    #[test]
    fn test_education_required_fields() {
        let mut record = minimal_record();
        record.education.push(Education::default());
        let errors = validate_record(&record);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.field == "education[0].degree"));
    }

    #[test]
    fn test_blank_skill_name_flagged() {
        let mut record = minimal_record();
        record.skills.push(Skill::default());
        let errors = validate_record(&record);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "skills[0].name");
    }

    #[test]
    fn test_project_link_validated_when_present() {
        let mut record = minimal_record();
        record.projects.push(Project {
            name: "Portfolio".to_string(),
            description: "Personal site".to_string(),
            link: Some("myproject.com".to_string()),
            ..Default::default()
        });
        let errors = validate_record(&record);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "projects[0].link");
        assert_eq!(errors[0].message, "Invalid project link");
    }

    #[test]
    fn test_second_entry_indexes_in_field_path() {
        let mut record = minimal_record();
        record.skills.push(Skill {
            name: "Rust".to_string(),
        });
        record.skills.push(Skill::default());
        let errors = validate_record(&record);
        assert_eq!(errors[0].field, "skills[1].name");
    }
}
