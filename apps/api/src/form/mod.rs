//! Form state — the in-memory resume draft tree behind the builder UI.
//!
//! A session holds a `ResumeRecord`-shaped draft: contact, summary, and four
//! dynamic lists with stable synthetic keys per row. Each list starts with
//! one blank entry. Rows left entirely blank are placeholder rows and are
//! dropped at finalize time; rows with partial content validate in full.
//! The session also owns the single live preview artifact slot — storing a
//! new preview always releases the previous one first.

pub mod handlers;
pub mod store;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Contact, Education, Experience, Project, ResumeRecord, Skill};
use crate::validation::{validate_record, FieldError};

/// One dynamic form row. The key is assigned at append time and is stable
/// across edits and removals of other rows — it is never an index.
#[derive(Debug, Clone, Serialize)]
pub struct FormEntry<T> {
    pub key: Uuid,
    pub value: T,
}

impl<T: Default> FormEntry<T> {
    fn blank() -> Self {
        Self {
            key: Uuid::new_v4(),
            value: T::default(),
        }
    }
}

/// The four dynamically-sized form sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionList {
    Experience,
    Education,
    Skills,
    Projects,
}

impl SectionList {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionList::Experience => "experience",
            SectionList::Education => "education",
            SectionList::Skills => "skills",
            SectionList::Projects => "projects",
        }
    }
}

#[derive(Debug)]
pub struct FormSession {
    pub id: Uuid,
    pub contact: Contact,
    pub summary: String,
    pub experience: Vec<FormEntry<Experience>>,
    pub education: Vec<FormEntry<Education>>,
    pub skills: Vec<FormEntry<Skill>>,
    pub projects: Vec<FormEntry<Project>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    preview: Option<Bytes>,
    in_flight: bool,
}

/// Serializable snapshot of a session returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub contact: Contact,
    pub summary: String,
    pub experience: Vec<FormEntry<Experience>>,
    pub education: Vec<FormEntry<Education>>,
    pub skills: Vec<FormEntry<Skill>>,
    pub projects: Vec<FormEntry<Project>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub has_preview: bool,
}

impl FormSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            contact: Contact::default(),
            summary: String::new(),
            experience: vec![FormEntry::blank()],
            education: vec![FormEntry::blank()],
            skills: vec![FormEntry::blank()],
            projects: vec![FormEntry::blank()],
            created_at: now,
            updated_at: now,
            preview: None,
            in_flight: false,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            contact: self.contact.clone(),
            summary: self.summary.clone(),
            experience: self.experience.clone(),
            education: self.education.clone(),
            skills: self.skills.clone(),
            projects: self.projects.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            has_preview: self.preview.is_some(),
        }
    }

    pub fn set_contact(&mut self, contact: Contact) {
        self.contact = contact;
        self.touch();
    }

    pub fn set_summary(&mut self, summary: String) {
        self.summary = summary;
        self.touch();
    }

    /// Appends a blank row to the given list, returning its synthetic key.
    pub fn append_entry(&mut self, list: SectionList) -> Uuid {
        let key = match list {
            SectionList::Experience => push_blank(&mut self.experience),
            SectionList::Education => push_blank(&mut self.education),
            SectionList::Skills => push_blank(&mut self.skills),
            SectionList::Projects => push_blank(&mut self.projects),
        };
        self.touch();
        key
    }

    /// Replaces the value at `index` with the deserialized body.
    pub fn update_entry(
        &mut self,
        list: SectionList,
        index: usize,
        value: Value,
    ) -> Result<(), AppError> {
        match list {
            SectionList::Experience => set_at(&mut self.experience, list, index, value),
            SectionList::Education => set_at(&mut self.education, list, index, value),
            SectionList::Skills => set_at(&mut self.skills, list, index, value),
            SectionList::Projects => set_at(&mut self.projects, list, index, value),
        }?;
        self.touch();
        Ok(())
    }

    pub fn remove_entry(&mut self, list: SectionList, index: usize) -> Result<(), AppError> {
        match list {
            SectionList::Experience => remove_at(&mut self.experience, list, index),
            SectionList::Education => remove_at(&mut self.education, list, index),
            SectionList::Skills => remove_at(&mut self.skills, list, index),
            SectionList::Projects => remove_at(&mut self.projects, list, index),
        }?;
        self.touch();
        Ok(())
    }

    /// Produces a finalized record for assembly, or every field error found.
    /// Placeholder rows (all fields blank) are dropped; empty-string
    /// optionals normalize to `None`.
    pub fn finalize(&self) -> Result<ResumeRecord, Vec<FieldError>> {
        let record = ResumeRecord {
            contact: normalize_contact(self.contact.clone()),
            summary: self.summary.clone(),
            experience: collect_rows(&self.experience, experience_is_blank, normalize_experience),
            education: collect_rows(&self.education, education_is_blank, normalize_education),
            skills: collect_rows(&self.skills, skill_is_blank, |s| s),
            projects: collect_rows(&self.projects, project_is_blank, normalize_project),
        };

        let errors = validate_record(&record);
        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }

    /// Claims the generation guard. Returns false when a submit or preview
    /// is already in flight — the caller must refuse rather than queue.
    pub fn begin_generation(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn end_generation(&mut self) {
        self.in_flight = false;
    }

    /// Stores a freshly assembled preview artifact, dropping any previous
    /// one first. Returns true when a previous artifact was released.
    pub fn store_preview(&mut self, artifact: Bytes) -> bool {
        let replaced = self.preview.take().is_some();
        self.preview = Some(artifact);
        self.touch();
        replaced
    }

    pub fn preview(&self) -> Option<Bytes> {
        self.preview.clone()
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

fn push_blank<T: Default>(entries: &mut Vec<FormEntry<T>>) -> Uuid {
    let entry = FormEntry::blank();
    let key = entry.key;
    entries.push(entry);
    key
}

fn set_at<T: DeserializeOwned>(
    entries: &mut [FormEntry<T>],
    list: SectionList,
    index: usize,
    value: Value,
) -> Result<(), AppError> {
    let entry = entries.get_mut(index).ok_or_else(|| {
        AppError::NotFound(format!("No {} entry at index {index}", list.as_str()))
    })?;
    entry.value = serde_json::from_value(value)
        .map_err(|e| AppError::Validation(format!("Invalid {} entry: {e}", list.as_str())))?;
    Ok(())
}

fn remove_at<T>(
    entries: &mut Vec<FormEntry<T>>,
    list: SectionList,
    index: usize,
) -> Result<(), AppError> {
    if index >= entries.len() {
        return Err(AppError::NotFound(format!(
            "No {} entry at index {index}",
            list.as_str()
        )));
    }
    entries.remove(index);
    Ok(())
}

fn collect_rows<T: Clone>(
    entries: &[FormEntry<T>],
    is_blank: impl Fn(&T) -> bool,
    normalize: impl Fn(T) -> T,
) -> Vec<T> {
    entries
        .iter()
        .map(|e| e.value.clone())
        .filter(|v| !is_blank(v))
        .map(normalize)
        .collect()
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn blank_opt(value: &Option<String>) -> bool {
    value.as_deref().unwrap_or("").trim().is_empty()
}

fn experience_is_blank(e: &Experience) -> bool {
    e.job_title.trim().is_empty()
        && e.company.trim().is_empty()
        && blank_opt(&e.location)
        && e.start_date.trim().is_empty()
        && blank_opt(&e.end_date)
        && e.description.trim().is_empty()
}

fn education_is_blank(e: &Education) -> bool {
    e.degree.trim().is_empty()
        && e.institution.trim().is_empty()
        && blank_opt(&e.location)
        && e.graduation_date.trim().is_empty()
        && blank_opt(&e.details)
}

fn skill_is_blank(s: &Skill) -> bool {
    s.name.trim().is_empty()
}

fn project_is_blank(p: &Project) -> bool {
    p.name.trim().is_empty()
        && p.description.trim().is_empty()
        && blank_opt(&p.link)
        && blank_opt(&p.technologies)
}

fn normalize_contact(contact: Contact) -> Contact {
    Contact {
        phone: none_if_blank(contact.phone),
        linkedin: none_if_blank(contact.linkedin),
        github: none_if_blank(contact.github),
        portfolio: none_if_blank(contact.portfolio),
        address: none_if_blank(contact.address),
        ..contact
    }
}

fn normalize_experience(exp: Experience) -> Experience {
    Experience {
        location: none_if_blank(exp.location),
        end_date: none_if_blank(exp.end_date),
        ..exp
    }
}

fn normalize_education(edu: Education) -> Education {
    Education {
        location: none_if_blank(edu.location),
        details: none_if_blank(edu.details),
        ..edu
    }
}

fn normalize_project(project: Project) -> Project {
    Project {
        link: none_if_blank(project.link),
        technologies: none_if_blank(project.technologies),
        ..project
    }
}
