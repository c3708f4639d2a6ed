//! Document assembly — converts a `ResumeRecord` into a paginated PDF
//! artifact held in memory.
//!
//! Flow: precondition check → summary substitution (collaborator or fixed
//! fallback, never an error) → HTML document tree → PDF via the rendering
//! library. Page breaks are the renderer's automatic flow, not decided here.

pub mod markup;

use std::collections::BTreeMap;

use bytes::Bytes;
use printpdf::{GeneratePdfOptions, PdfDocument};
use thiserror::Error;
use tracing::{debug, warn};

use crate::collaborators::{SummaryGenerator, SummaryInput, SUMMARY_FALLBACK};
use crate::errors::AppError;
use crate::models::resume::ResumeRecord;

#[derive(Debug, Error, PartialEq)]
pub enum PdfError {
    #[error("Full name and email are required in contact information")]
    MissingContactFields,

    #[error("PDF rendering failed: {0}")]
    Render(String),
}

impl From<PdfError> for AppError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::MissingContactFields => AppError::UnprocessableEntity(err.to_string()),
            PdfError::Render(msg) => AppError::Pdf(msg),
        }
    }
}

fn check_preconditions(record: &ResumeRecord) -> Result<(), PdfError> {
    if record.contact.full_name.trim().is_empty() || record.contact.email.trim().is_empty() {
        return Err(PdfError::MissingContactFields);
    }
    Ok(())
}

/// Pure render: record in, PDF bytes out. Rejects before the renderer is
/// invoked when required contact fields are missing.
pub fn render_resume(record: &ResumeRecord) -> Result<Bytes, PdfError> {
    check_preconditions(record)?;
    let html = markup::resume_html(record);
    render_html(&html)
}

/// Fills a blank summary from the collaborator so a document is never
/// assembled with an empty summary field. Substitutes the fixed fallback
/// sentence on any failure — this step itself never errors.
pub async fn resolve_summary(
    record: ResumeRecord,
    summarizer: &dyn SummaryGenerator,
) -> ResumeRecord {
    if !record.summary.trim().is_empty() {
        return record;
    }

    let input = SummaryInput {
        contact: record.contact.clone(),
        experience: record.experience.clone(),
        skills: record.skills.clone(),
    };
    let summary = match summarizer.generate_summary(&input).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("Summary collaborator returned empty text; substituting fallback");
            SUMMARY_FALLBACK.to_string()
        }
        Err(e) => {
            warn!("Summary generation failed ({e}); substituting fallback");
            SUMMARY_FALLBACK.to_string()
        }
    };

    ResumeRecord { summary, ..record }
}

/// Full assembly: preconditions, summary substitution, render.
pub async fn assemble_document(
    record: ResumeRecord,
    summarizer: &dyn SummaryGenerator,
) -> Result<Bytes, PdfError> {
    check_preconditions(&record)?;
    let record = resolve_summary(record, summarizer).await;
    render_resume(&record)
}

fn render_html(html: &str) -> Result<Bytes, PdfError> {
    let mut warnings = Vec::new();

    let doc = PdfDocument::from_html(
        html,
        &BTreeMap::new(), // images
        &BTreeMap::new(), // fonts
        &GeneratePdfOptions::default(),
        &mut warnings,
    )
    .map_err(|e| PdfError::Render(e.to_string()))?;

    if !warnings.is_empty() {
        debug!("PDF generation produced {} warnings", warnings.len());
    }

    let bytes = doc.save(&Default::default(), &mut warnings);
    Ok(Bytes::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::CollaboratorError;
    use crate::models::resume::Contact;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSummarizer {
        text: &'static str,
        calls: AtomicUsize,
    }

    impl FixedSummarizer {
        fn new(text: &'static str) -> Self {
            Self {
                text,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SummaryGenerator for FixedSummarizer {
        async fn generate_summary(
            &self,
            _input: &SummaryInput,
        ) -> Result<String, CollaboratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.to_string())
        }
    }

    struct FailingSummarizer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SummaryGenerator for FailingSummarizer {
        async fn generate_summary(
            &self,
            _input: &SummaryInput,
        ) -> Result<String, CollaboratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(CollaboratorError::EmptyContent)
        }
    }

    fn record_with_summary(summary: &str) -> ResumeRecord {
        ResumeRecord {
            contact: Contact {
                full_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                ..Default::default()
            },
            summary: summary.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_produces_nonempty_pdf() {
        let artifact = render_resume(&record_with_summary("Seasoned engineer.")).unwrap();
        assert!(!artifact.is_empty());
        assert!(artifact.starts_with(b"%PDF"));
    }

    #[test]
    fn test_missing_full_name_rejected_before_rendering() {
        let mut record = record_with_summary("Engineer.");
        record.contact.full_name = "  ".to_string();
        assert_eq!(
            render_resume(&record).unwrap_err(),
            PdfError::MissingContactFields
        );
    }

    #[test]
    fn test_missing_email_rejected_before_rendering() {
        let mut record = record_with_summary("Engineer.");
        record.contact.email = String::new();
        assert_eq!(
            render_resume(&record).unwrap_err(),
            PdfError::MissingContactFields
        );
    }

    #[tokio::test]
    async fn test_blank_summary_is_substituted() {
        let summarizer = FixedSummarizer::new("Generated summary.");
        let record = resolve_summary(record_with_summary(""), &summarizer).await;
        assert_eq!(record.summary, "Generated summary.");
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_nonblank_summary_skips_collaborator() {
        let summarizer = FixedSummarizer::new("unused");
        let record = resolve_summary(record_with_summary("Already written."), &summarizer).await;
        assert_eq!(record.summary, "Already written.");
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_generation_substitutes_exact_fallback() {
        let summarizer = FailingSummarizer {
            calls: AtomicUsize::new(0),
        };
        let record = resolve_summary(record_with_summary("  "), &summarizer).await;
        assert_eq!(record.summary, SUMMARY_FALLBACK);
        assert_eq!(record.summary, "A passionate professional.");
    }

    #[tokio::test]
    async fn test_empty_collaborator_text_substitutes_fallback() {
        let summarizer = FixedSummarizer::new("   ");
        let record = resolve_summary(record_with_summary(""), &summarizer).await;
        assert_eq!(record.summary, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn test_fallback_summary_renders_in_document_tree() {
        let summarizer = FailingSummarizer {
            calls: AtomicUsize::new(0),
        };
        let record = resolve_summary(record_with_summary(""), &summarizer).await;
        let html = markup::resume_html(&record);
        assert!(html.contains("A passionate professional."));
    }

    #[tokio::test]
    async fn test_assembly_checks_contact_before_summary_substitution() {
        let summarizer = FixedSummarizer::new("unused");
        let mut record = record_with_summary("");
        record.contact.full_name = String::new();
        let result = assemble_document(record, &summarizer).await;
        assert_eq!(result.unwrap_err(), PdfError::MissingContactFields);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_assembly_succeeds_with_minimal_record() {
        let summarizer = FailingSummarizer {
            calls: AtomicUsize::new(0),
        };
        let artifact = assemble_document(record_with_summary(""), &summarizer)
            .await
            .unwrap();
        assert!(!artifact.is_empty());
    }
}
