//! Anthropic-backed implementation of both collaborator seams.
//!
//! Wraps the Messages API the same way for summary generation and document
//! evaluation. There is deliberately NO retry logic here: a non-success
//! status or malformed body is an immediate error, and each caller decides
//! whether that degrades to a fallback value (summary) or a visible failure
//! state (evaluation).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collaborators::prompts::{
    EVALUATION_PROMPT, EVALUATION_SYSTEM, SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM,
};
use crate::collaborators::{
    CollaboratorError, DataUri, DocumentEvaluator, SummaryGenerator, SummaryInput,
};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in this service.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

/// User-message content blocks. Uploaded PDFs/DOCX travel as base64
/// `document` blocks; plain text is inlined into the prompt.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    Document { source: DocumentSource },
}

#[derive(Debug, Serialize)]
struct DocumentSource {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct LlmResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The single LLM client used by both collaborator seams.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a single call to the Messages API. One attempt only.
    async fn call(
        &self,
        system: &str,
        content: Vec<ContentPart>,
    ) -> Result<LlmResponse, CollaboratorError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the structured error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CollaboratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

fn build_summary_prompt(input: &SummaryInput) -> String {
    let experience = if input.experience.is_empty() {
        "N/A".to_string()
    } else {
        input
            .experience
            .iter()
            .map(|e| format!("{} at {}", e.job_title, e.company))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let skills = if input.skills.is_empty() {
        "N/A".to_string()
    } else {
        input
            .skills
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    SUMMARY_PROMPT_TEMPLATE
        .replace("{name}", &input.contact.full_name)
        .replace("{experience}", &experience)
        .replace("{skills}", &skills)
}

/// Builds the user-message content for an evaluation call from the parsed
/// data URI. Plain text is decoded and inlined; everything else ships as a
/// base64 document block and any provider rejection of the media type
/// surfaces as an API error.
fn evaluation_content(document: &DataUri) -> Result<Vec<ContentPart>, CollaboratorError> {
    if document.media_type == "text/plain" {
        let bytes = document.decode()?;
        let text = String::from_utf8(bytes)
            .map_err(|e| CollaboratorError::InvalidPayload(e.to_string()))?;
        return Ok(vec![ContentPart::Text {
            text: format!("{EVALUATION_PROMPT}\n\nResume:\n{text}"),
        }]);
    }

    Ok(vec![
        ContentPart::Document {
            source: DocumentSource {
                source_type: "base64",
                media_type: document.media_type.clone(),
                data: document.data.clone(),
            },
        },
        ContentPart::Text {
            text: EVALUATION_PROMPT.to_string(),
        },
    ])
}

#[async_trait]
impl SummaryGenerator for AnthropicClient {
    async fn generate_summary(&self, input: &SummaryInput) -> Result<String, CollaboratorError> {
        let prompt = build_summary_prompt(input);
        let response = self
            .call(
                SUMMARY_SYSTEM,
                vec![ContentPart::Text { text: prompt }],
            )
            .await?;

        let summary = response
            .text()
            .ok_or(CollaboratorError::EmptyContent)?
            .trim()
            .to_string();
        if summary.is_empty() {
            return Err(CollaboratorError::EmptyContent);
        }
        Ok(summary)
    }
}

#[async_trait]
impl DocumentEvaluator for AnthropicClient {
    async fn evaluate_document(
        &self,
        resume_data_uri: &str,
    ) -> Result<String, CollaboratorError> {
        let document = DataUri::parse(resume_data_uri)?;
        let content = evaluation_content(&document)?;
        let response = self.call(EVALUATION_SYSTEM, content).await?;

        let feedback = response.text().ok_or(CollaboratorError::EmptyContent)?;
        Ok(feedback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Contact, Experience, Skill};

    fn input_with(experience: Vec<Experience>, skills: Vec<Skill>) -> SummaryInput {
        SummaryInput {
            contact: Contact {
                full_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                ..Default::default()
            },
            experience,
            skills,
        }
    }

    #[test]
    fn test_summary_prompt_joins_experience_and_skills() {
        let input = input_with(
            vec![
                Experience {
                    job_title: "Engineer".to_string(),
                    company: "Acme".to_string(),
                    ..Default::default()
                },
                Experience {
                    job_title: "Lead".to_string(),
                    company: "Globex".to_string(),
                    ..Default::default()
                },
            ],
            vec![
                Skill {
                    name: "Rust".to_string(),
                },
                Skill {
                    name: "SQL".to_string(),
                },
            ],
        );
        let prompt = build_summary_prompt(&input);
        assert!(prompt.contains("Name: Jane Doe"));
        assert!(prompt.contains("Experience: Engineer at Acme, Lead at Globex"));
        assert!(prompt.contains("Skills: Rust, SQL"));
    }

    #[test]
    fn test_summary_prompt_uses_na_for_empty_lists() {
        let prompt = build_summary_prompt(&input_with(vec![], vec![]));
        assert!(prompt.contains("Experience: N/A"));
        assert!(prompt.contains("Skills: N/A"));
    }

    #[test]
    fn test_evaluation_content_inlines_plain_text() {
        let uri = DataUri::encode("text/plain", b"Jane Doe\nEngineer");
        let content = evaluation_content(&uri).unwrap();
        assert_eq!(content.len(), 1);
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json[0]["type"], "text");
        assert!(json[0]["text"]
            .as_str()
            .unwrap()
            .contains("Jane Doe\nEngineer"));
    }

    #[test]
    fn test_evaluation_content_wraps_pdf_as_document_block() {
        let uri = DataUri::encode("application/pdf", b"%PDF-1.7");
        let content = evaluation_content(&uri).unwrap();
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json[0]["type"], "document");
        assert_eq!(json[0]["source"]["type"], "base64");
        assert_eq!(json[0]["source"]["media_type"], "application/pdf");
        assert_eq!(json[1]["type"], "text");
    }

    #[test]
    fn test_evaluation_content_rejects_undecodable_text() {
        let uri = DataUri {
            media_type: "text/plain".to_string(),
            data: "not!!valid@@base64".to_string(),
        };
        assert!(matches!(
            evaluation_content(&uri),
            Err(CollaboratorError::InvalidPayload(_))
        ));
    }
}
