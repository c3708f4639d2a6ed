//! LLM collaborators — the single seam between this service and its
//! network-backed AI provider.
//!
//! ARCHITECTURAL RULE: no other module may call the provider API directly.
//! Core logic depends only on the two narrow traits below, so every caller is
//! test-doubleable without a live network. Failures are never retried
//! anywhere in this service — recovery is "fall back to a default" or
//! "surface an actionable message".

pub mod anthropic;
pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use base64::engine::general_purpose;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::{Contact, Experience, Skill};

/// Substituted for the summary whenever generation fails for any reason.
/// The substitution itself must never raise an error upward.
pub const SUMMARY_FALLBACK: &str = "A passionate professional.";

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid document payload: {0}")]
    InvalidPayload(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Wire shape of the summary-generation request: the partial resume data the
/// frontend sends (and that document assembly forwards when the summary
/// field is blank at generation time).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryInput {
    pub contact: Contact,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

/// Generates a professional summary from partial resume data.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate_summary(&self, input: &SummaryInput) -> Result<String, CollaboratorError>;
}

/// Evaluates an uploaded resume document, passed as a self-describing
/// base64 data URI (`data:<mime>;base64,<payload>`), returning free-form
/// textual feedback.
#[async_trait]
pub trait DocumentEvaluator: Send + Sync {
    async fn evaluate_document(&self, resume_data_uri: &str)
        -> Result<String, CollaboratorError>;
}

/// A parsed `data:<media_type>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    pub media_type: String,
    /// Base64 payload, still encoded.
    pub data: String,
}

impl DataUri {
    pub fn encode(media_type: &str, bytes: &[u8]) -> Self {
        Self {
            media_type: media_type.to_string(),
            data: general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn parse(uri: &str) -> Result<Self, CollaboratorError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| CollaboratorError::InvalidPayload("missing data: scheme".to_string()))?;
        let (media_type, data) = rest.split_once(";base64,").ok_or_else(|| {
            CollaboratorError::InvalidPayload("expected ;base64, separator".to_string())
        })?;
        if media_type.is_empty() {
            return Err(CollaboratorError::InvalidPayload(
                "missing media type".to_string(),
            ));
        }
        Ok(Self {
            media_type: media_type.to_string(),
            data: data.to_string(),
        })
    }

    pub fn to_uri_string(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }

    /// Decodes the base64 payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, CollaboratorError> {
        general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| CollaboratorError::InvalidPayload(e.to_string()))
    }
}
