//! Resume evaluation — upload preconditions and the evaluation endpoint.
//!
//! The uploaded file is checked locally (MIME type, byte size) before any
//! network activity; violations reject with a specific user-visible message
//! and the collaborator is never called. Valid uploads are base64-encoded
//! into a self-describing data URI and handed to the evaluator. Any
//! collaborator failure surfaces as one generic evaluation-failed state —
//! nothing is retried.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::collaborators::{DataUri, DocumentEvaluator};
use crate::errors::AppError;
use crate::feedback::{parse_feedback, FeedbackBlock};
use crate::state::AppState;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Router body limit. Above the app-level cap so an oversized file reaches
/// the size check and gets its specific message instead of a transport error.
pub const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Exactly three accepted upload types: PDF, DOCX, plain text.
pub const ALLOWED_UPLOAD_TYPES: [&str; 3] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

const FILE_TYPE_MESSAGE: &str = "Invalid file type. Please upload a PDF, DOCX, or TXT file.";
const FILE_SIZE_MESSAGE: &str = "File is too large. Maximum size is 5MB.";

/// Local preconditions, checked in order: type, then size.
pub fn check_upload(content_type: &str, size: usize) -> Result<(), AppError> {
    if !ALLOWED_UPLOAD_TYPES.contains(&content_type) {
        return Err(AppError::UnsupportedMediaType(FILE_TYPE_MESSAGE.to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(FILE_SIZE_MESSAGE.to_string()));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    /// Raw collaborator text, as received.
    pub feedback: String,
    /// The parsed display tree.
    pub blocks: Vec<FeedbackBlock>,
}

/// Precondition check → data-URI encoding → collaborator call → block
/// parsing. Precondition violations make no network call.
pub async fn evaluate_upload(
    evaluator: &dyn DocumentEvaluator,
    content_type: &str,
    data: &[u8],
) -> Result<EvaluationResponse, AppError> {
    check_upload(content_type, data.len())?;

    let uri = DataUri::encode(content_type, data).to_uri_string();
    let feedback = evaluator
        .evaluate_document(&uri)
        .await
        .map_err(|e| AppError::Evaluation(e.to_string()))?;

    let blocks = parse_feedback(&feedback);
    Ok(EvaluationResponse { feedback, blocks })
}

/// POST /api/v1/evaluations
///
/// Multipart upload with a single `file` part.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EvaluationResponse>, AppError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .ok_or_else(|| {
                    AppError::Validation("The file part must declare a content type".to_string())
                })?
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
            file = Some((content_type, data));
            break;
        }
    }

    let (content_type, data) = file.ok_or_else(|| {
        AppError::Validation("Please select a resume file to evaluate.".to_string())
    })?;

    info!(
        "Evaluating uploaded resume ({content_type}, {} bytes)",
        data.len()
    );
    let response = evaluate_upload(state.evaluator.as_ref(), &content_type, &data).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::CollaboratorError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct RecordingEvaluator {
        calls: AtomicUsize,
        last_uri: Mutex<Option<String>>,
        feedback: &'static str,
    }

    impl RecordingEvaluator {
        fn new(feedback: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_uri: Mutex::new(None),
                feedback,
            }
        }
    }

    #[async_trait]
    impl DocumentEvaluator for RecordingEvaluator {
        async fn evaluate_document(
            &self,
            resume_data_uri: &str,
        ) -> Result<String, CollaboratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_uri.lock().unwrap() = Some(resume_data_uri.to_string());
            Ok(self.feedback.to_string())
        }
    }

    struct FailingEvaluator;

    #[async_trait]
    impl DocumentEvaluator for FailingEvaluator {
        async fn evaluate_document(&self, _: &str) -> Result<String, CollaboratorError> {
            Err(CollaboratorError::Api {
                status: 500,
                message: "upstream".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_oversized_pdf_rejected_without_network_call() {
        let evaluator = RecordingEvaluator::new("unused");
        let six_mb = vec![0u8; 6 * 1024 * 1024];
        let err = evaluate_upload(&evaluator, "application/pdf", &six_mb)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert_eq!(evaluator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_png_rejected_without_network_call() {
        let evaluator = RecordingEvaluator::new("unused");
        let err = evaluate_upload(&evaluator, "image/png", b"\x89PNG")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
        assert_eq!(evaluator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_exactly_five_megabytes_passes() {
        assert!(check_upload("application/pdf", MAX_UPLOAD_BYTES).is_ok());
        assert!(check_upload("application/pdf", MAX_UPLOAD_BYTES + 1).is_err());
    }

    #[test]
    fn test_all_three_upload_types_accepted() {
        for media_type in ALLOWED_UPLOAD_TYPES {
            assert!(check_upload(media_type, 1024).is_ok());
        }
    }

    #[tokio::test]
    async fn test_valid_upload_encodes_data_uri_and_parses_blocks() {
        let evaluator = RecordingEvaluator::new("* **Clarity:** Good\n* Add metrics\nSolid.");
        let response = evaluate_upload(&evaluator, "text/plain", b"Jane Doe, Engineer")
            .await
            .unwrap();

        assert_eq!(evaluator.calls.load(Ordering::SeqCst), 1);
        let uri = evaluator.last_uri.lock().unwrap().clone().unwrap();
        assert!(uri.starts_with("data:text/plain;base64,"));

        assert_eq!(response.blocks.len(), 3);
        assert!(response.feedback.contains("Add metrics"));
    }

    #[tokio::test]
    async fn test_collaborator_failure_is_generic_evaluation_error() {
        let err = evaluate_upload(&FailingEvaluator, "application/pdf", b"%PDF")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Evaluation(_)));
    }
}
