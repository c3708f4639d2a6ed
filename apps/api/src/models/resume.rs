//! Resume data model — plain records with no identity beyond field values.
//!
//! All state is in-memory and scoped to a single form session: a
//! `ResumeRecord` exists only transiently to produce a PDF artifact and is
//! discarded after generation. Field names serialize in the wire casing the
//! frontend uses (`fullName`, `jobTitle`, ...).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// One work-experience entry. List order is user-entered order — no
/// chronological invariant is enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub job_title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    pub description: String,
}

impl Experience {
    /// Date line for the rendered document: `start - end`, or
    /// `start - Present` when the role is ongoing.
    pub fn date_range(&self) -> String {
        match self.end_date.as_deref() {
            Some(end) if !end.trim().is_empty() => format!("{} - {}", self.start_date, end),
            _ => format!("{} - Present", self.start_date),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub location: Option<String>,
    pub graduation_date: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub technologies: Option<String>,
}

/// The aggregate handed to document assembly. Absent list fields
/// deserialize to empty lists — never null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub contact: Contact,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub projects: Vec<Project>,
}
