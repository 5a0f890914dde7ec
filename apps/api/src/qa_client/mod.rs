//! Question/Answer Service client — the single point of entry for all calls
//! to the interactive generation backend.
//!
//! ARCHITECTURAL RULE: no other module may talk to the service directly.
//! Every round-trip goes through this module, and the wire envelope is
//! decoded into typed outcomes here, exactly once. Downstream code matches
//! on `AnswerOutcome` and never probes optional fields.
//!
//! The `answer` endpoint carries no idempotency key, so calls are made at
//! most once: a failed round-trip surfaces as `ServiceError` and the caller
//! decides whether to resubmit the step.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::wizard::session::{Question, QuestionKind};

const START_PATH: &str = "/cover-letter/interactive/start";
const ANSWER_PATH: &str = "/cover-letter/interactive/answer";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed service response: {0}")]
    Malformed(String),
}

/// Result of opening a new wizard session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOpened {
    pub session_id: String,
    pub current_step: u32,
    pub total_steps: u32,
    pub question: Question,
}

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// The service posed another question.
    Next { current_step: u32, question: Question },
    /// No further questions remain; the artifact is ready.
    Completed { generated_content: String },
}

/// The consumed interface of the Question/Answer Service.
///
/// Carried in `AppState` as `Arc<dyn QuestionService>` so the session
/// controller can be exercised against a scripted fake.
#[async_trait]
pub trait QuestionService: Send + Sync {
    async fn create_session(
        &self,
        company_name: &str,
        position: &str,
        section: &str,
        user_id: Uuid,
    ) -> Result<SessionOpened, ServiceError>;

    async fn answer(
        &self,
        session_id: &str,
        answer: &str,
        selections: &[String],
    ) -> Result<AnswerOutcome, ServiceError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StartData {
    session_id: String,
    current_step: u32,
    total_steps: u32,
    question: Question,
}

#[derive(Debug, Deserialize)]
struct AnswerData {
    current_step: Option<u32>,
    question: Option<Question>,
    #[serde(default)]
    is_completed: bool,
    generated_content: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP client
// ────────────────────────────────────────────────────────────────────────────

/// The single Question/Answer Service client used by the application.
#[derive(Clone)]
pub struct QaClient {
    client: Client,
    base_url: String,
}

impl QaClient {
    pub fn new(base_url: String, timeout: std::time::Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_envelope<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;

        if !envelope.success {
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "service reported failure".to_string()),
            });
        }

        envelope
            .data
            .ok_or_else(|| ServiceError::Malformed("success envelope without data".to_string()))
    }
}

#[async_trait]
impl QuestionService for QaClient {
    async fn create_session(
        &self,
        company_name: &str,
        position: &str,
        section: &str,
        user_id: Uuid,
    ) -> Result<SessionOpened, ServiceError> {
        let user_id = user_id.to_string();
        let query = [
            ("company_name", company_name),
            ("position", position),
            ("section", section),
            ("user_id", user_id.as_str()),
        ];

        let data: StartData = self.post_envelope(START_PATH, &query).await?;
        validate_question(&data.question)?;

        debug!(
            "Opened wizard session {} ({} steps)",
            data.session_id, data.total_steps
        );

        Ok(SessionOpened {
            session_id: data.session_id,
            current_step: data.current_step,
            total_steps: data.total_steps,
            question: data.question,
        })
    }

    async fn answer(
        &self,
        session_id: &str,
        answer: &str,
        selections: &[String],
    ) -> Result<AnswerOutcome, ServiceError> {
        let mut query: Vec<(&str, &str)> = vec![("session_id", session_id), ("answer", answer)];
        for value in selections {
            query.push(("selections", value.as_str()));
        }

        let data: AnswerData = self.post_envelope(ANSWER_PATH, &query).await?;
        decode_answer(data)
    }
}

/// Collapses the loosely-shaped answer payload into the tagged outcome.
/// Inconsistent payloads are rejected here so no caller ever sees them.
fn decode_answer(data: AnswerData) -> Result<AnswerOutcome, ServiceError> {
    if data.is_completed {
        let generated_content = data.generated_content.ok_or_else(|| {
            ServiceError::Malformed("completed response without generated_content".to_string())
        })?;
        return Ok(AnswerOutcome::Completed { generated_content });
    }

    let question = data
        .question
        .ok_or_else(|| ServiceError::Malformed("active response without question".to_string()))?;
    validate_question(&question)?;
    let current_step = data
        .current_step
        .ok_or_else(|| ServiceError::Malformed("active response without current_step".to_string()))?;

    Ok(AnswerOutcome::Next {
        current_step,
        question,
    })
}

/// Rejects questions the user could never answer: a selection question with
/// `max_selections` of 0 makes the count bound unsatisfiable.
fn validate_question(question: &Question) -> Result<(), ServiceError> {
    if let QuestionKind::Selection { max_selections, .. } = &question.kind {
        if *max_selections == 0 {
            return Err(ServiceError::Malformed(
                "selection question with max_selections of 0".to_string(),
            ));
        }
    }
    Ok(())
}
