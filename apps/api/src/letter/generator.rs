//! Letter generation: pluggable, trait-based text generators.
//!
//! Default: `MockGenerator` (fixed template after an artificial delay).
//! Optional: `LlmGenerator` (Anthropic via `LlmClient`), chosen by `GENERATION_BACKEND`.
//!
//! `AppState` holds an `Arc<dyn LetterGenerator>`; the timeout and
//! last-request-wins cancellation are applied by the caller, not here.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::letter::composer::{compose, contact_header, BLOCK_SEPARATOR};
use crate::letter::prompts::{LETTER_PROMPT_TEMPLATE, LETTER_SYSTEM, NO_JOB_DESCRIPTION};
use crate::letter::request::{ContactDetails, LetterRequest};
use crate::llm_client::prompts::MARKUP_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError};

/// Failure of the backing generation call. Distinct from validation errors.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation backend failed: {0}")]
    Backend(String),

    #[error("generation backend returned an empty letter")]
    EmptyResponse,

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyContent => GenerationError::EmptyResponse,
            other => GenerationError::Backend(other.to_string()),
        }
    }
}

/// Produces a letter draft for a validated request.
#[async_trait]
pub trait LetterGenerator: Send + Sync {
    async fn generate(&self, request: &LetterRequest) -> Result<String, GenerationError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Template-backed generator simulating a remote call with a fixed delay.
pub struct MockGenerator {
    contact: ContactDetails,
    delay: Duration,
}

impl MockGenerator {
    pub fn new(contact: ContactDetails, delay: Duration) -> Self {
        Self { contact, delay }
    }
}

#[async_trait]
impl LetterGenerator for MockGenerator {
    async fn generate(&self, request: &LetterRequest) -> Result<String, GenerationError> {
        debug!("Mock generation for {} at {}", request.job_title, request.company);
        tokio::time::sleep(self.delay).await;
        Ok(compose(request, &self.contact))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Generator backed by the Anthropic Messages API.
pub struct LlmGenerator {
    llm: LlmClient,
    contact: ContactDetails,
}

impl LlmGenerator {
    pub fn new(llm: LlmClient, contact: ContactDetails) -> Self {
        Self { llm, contact }
    }
}

#[async_trait]
impl LetterGenerator for LlmGenerator {
    async fn generate(&self, request: &LetterRequest) -> Result<String, GenerationError> {
        let system = format!("{LETTER_SYSTEM}{}", request.tone.label());
        let prompt = build_letter_prompt(request);

        info!(
            "Requesting LLM letter for {} at {}",
            request.job_title, request.company
        );
        let body = self.llm.call_text(&prompt, &system).await?;

        Ok(attach_header(&self.contact, &body))
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}

/// Fills the letter prompt template from the request.
fn build_letter_prompt(request: &LetterRequest) -> String {
    let job_description = if request.job_description.trim().is_empty() {
        NO_JOB_DESCRIPTION
    } else {
        request.job_description.as_str()
    };
    let voice = request.tone.voice();

    LETTER_PROMPT_TEMPLATE
        .replace("{job_title}", &request.job_title)
        .replace("{company}", &request.company)
        .replace("{tone}", request.tone.label())
        .replace("{skills}", &request.all_skills())
        .replace("{experience}", &request.experience)
        .replace("{preferred_verbs}", &voice.preferred_verbs.join(", "))
        .replace("{avoid}", &voice.avoid.join(", "))
        .replace("{markup_instruction}", MARKUP_INSTRUCTION)
        // Last: user text may itself contain braces.
        .replace("{job_description}", job_description)
}

/// Prepends the contact header block to a model-written body.
fn attach_header(contact: &ContactDetails, body: &str) -> String {
    format!("{}{BLOCK_SEPARATOR}{}", contact_header(contact), body.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letter::tone::Tone;

    fn make_request() -> LetterRequest {
        LetterRequest {
            job_title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            skills: vec!["Rust".to_string(), "Postgres".to_string()],
            experience: "Reduced p99 latency by 35%".to_string(),
            tone: Tone::FormalResultsDriven,
            job_description: String::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_generator_waits_for_delay() {
        let generator = MockGenerator::new(ContactDetails::default(), Duration::from_millis(1000));
        let start = tokio::time::Instant::now();
        let draft = generator.generate(&make_request()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(draft, compose(&make_request(), &ContactDetails::default()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_generator_respects_caller_timeout() {
        let generator = MockGenerator::new(ContactDetails::default(), Duration::from_secs(30));
        let result =
            tokio::time::timeout(Duration::from_secs(5), generator.generate(&make_request())).await;
        assert!(result.is_err(), "30s mock must not finish inside a 5s timeout");
    }

    #[test]
    fn test_prompt_substitutes_every_placeholder() {
        let prompt = build_letter_prompt(&make_request());
        assert!(prompt.contains("- Job Title: Backend Engineer"));
        assert!(prompt.contains("- Company Name: Acme"));
        assert!(prompt.contains("- Desired Tone: Formal and Results-Driven"));
        assert!(prompt.contains("- Key Skills to Emphasize: Rust, Postgres"));
        assert!(prompt.contains(NO_JOB_DESCRIPTION));
        assert!(prompt.contains("Dear Acme Hiring Team"));
        assert!(prompt.contains("Achieved"));
        assert!(!prompt.contains("{markup_instruction}"));
        assert!(!prompt.contains("{company}"));
    }

    #[test]
    fn test_prompt_keeps_braces_in_job_description() {
        let mut request = make_request();
        request.job_description = "Write {tone} code".to_string();
        let prompt = build_letter_prompt(&request);
        assert!(prompt.contains("Write {tone} code"));
    }

    #[test]
    fn test_attach_header_separates_with_blank_line() {
        let draft = attach_header(&ContactDetails::default(), "\nDear Hiring Team,\n\nThanks.\n");
        assert!(draft.starts_with("**[Your Name]**\n"));
        assert!(draft.contains("[Your LinkedIn/Portfolio URL]\n\nDear Hiring Team,"));
        assert!(draft.ends_with("Thanks."));
    }

    #[test]
    fn test_llm_empty_content_maps_to_empty_response() {
        let err: GenerationError = LlmError::EmptyContent.into();
        assert!(matches!(err, GenerationError::EmptyResponse));

        let err: GenerationError = LlmError::Api {
            status: 400,
            message: "bad request".to_string(),
        }
        .into();
        assert!(matches!(err, GenerationError::Backend(_)));
    }
}
