//! Session Controller — mediates between the presentation layer and the
//! Question/Answer Service, and enforces the answer-submission contract.
//!
//! Flow per operation: validate locally → at most one service round-trip →
//! apply the confirmed transition → persist the snapshot. A service failure
//! leaves the session (and its stored snapshot) at the last confirmed state,
//! so the same step can be resubmitted without data loss.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::qa_client::{AnswerOutcome, QuestionService};
use crate::store::SessionStore;
use crate::wizard::session::{Question, QuestionKind, Session};

/// Result of a previous-step rollback: the rolled-back session plus the
/// popped answer, returned so the presentation layer can prefill the form
/// for re-editing.
#[derive(Debug)]
pub struct PreviousStep {
    pub session: Session,
    pub prefill_answer: String,
    pub prefill_selections: Vec<String>,
}

pub struct SessionController {
    qa: Arc<dyn QuestionService>,
    store: Arc<dyn SessionStore>,
}

impl SessionController {
    pub fn new(qa: Arc<dyn QuestionService>, store: Arc<dyn SessionStore>) -> Self {
        Self { qa, store }
    }

    /// Opens a new wizard session for the given generation context.
    ///
    /// All three context strings must be non-blank; otherwise the service is
    /// never contacted.
    pub async fn start(
        &self,
        company_name: &str,
        position: &str,
        section: &str,
        user_id: Uuid,
    ) -> Result<Session, AppError> {
        require_non_blank(company_name, "company_name")?;
        require_non_blank(position, "position")?;
        require_non_blank(section, "section")?;

        let opened = self
            .qa
            .create_session(company_name, position, section, user_id)
            .await?;

        // A fresh session always starts at step 1; the service's reported
        // step is advisory only.
        if opened.current_step != 1 {
            warn!(
                "Service reported step {} for new session {}, expected 1",
                opened.current_step, opened.session_id
            );
        }

        let now = Utc::now();
        let session = Session {
            session_id: opened.session_id,
            user_id,
            company_name: company_name.to_string(),
            position: position.to_string(),
            section: section.to_string(),
            current_step: 1,
            total_steps: opened.total_steps,
            current_question: Some(opened.question.clone()),
            asked: vec![opened.question],
            responses: vec![],
            selections: vec![],
            is_completed: false,
            generated_content: None,
            created_at: now,
            updated_at: now,
        };

        self.store.set(&session).await?;

        info!(
            "Started wizard session {} ({} steps) for user {}",
            session.session_id, session.total_steps, user_id
        );

        Ok(session)
    }

    /// Submits the answer for the session's current question.
    ///
    /// Non-terminal: the answer is appended, the step advances, and the next
    /// question becomes current. Terminal: the answer is appended, the step
    /// stays put, and the session carries the generated artifact.
    pub async fn submit_answer(
        &self,
        session: &Session,
        answer: &str,
        selections: &[String],
    ) -> Result<Session, AppError> {
        if !session.is_active() {
            return Err(AppError::SessionCompleted(format!(
                "Session {} has already produced its content",
                session.session_id
            )));
        }

        let question = session.current_question.as_ref().ok_or_else(|| {
            AppError::Validation("Session has no pending question".to_string())
        })?;

        let effective_selections = validate_answer(question, answer, selections)?;

        let outcome = self
            .qa
            .answer(&session.session_id, answer, &effective_selections)
            .await?;

        let mut updated = session.clone();
        updated.responses.push(answer.to_string());
        updated.selections.push(effective_selections);

        match outcome {
            AnswerOutcome::Next {
                current_step,
                question,
            } => {
                let expected = session.current_step + 1;
                if current_step != expected {
                    warn!(
                        "Service reported step {} for session {}, expected {}",
                        current_step, session.session_id, expected
                    );
                }
                updated.current_step = expected;
                updated.current_question = Some(question.clone());
                updated.asked.push(question);
            }
            AnswerOutcome::Completed { generated_content } => {
                updated.is_completed = true;
                updated.current_question = None;
                updated.generated_content = Some(generated_content);
                info!(
                    "Wizard session {} completed at step {}",
                    updated.session_id, updated.current_step
                );
            }
        }

        updated.updated_at = Utc::now();
        self.store.set(&updated).await?;

        Ok(updated)
    }

    /// Rolls the session back one step, purely locally: the last answer is
    /// popped (and returned as prefill) and the prior question is restored
    /// from the asked history. The service is not contacted and is not
    /// notified of the rollback.
    pub async fn previous_step(&self, session: &Session) -> Result<PreviousStep, AppError> {
        if !session.is_active() {
            return Err(AppError::SessionCompleted(format!(
                "Session {} has already produced its content",
                session.session_id
            )));
        }
        if session.current_step <= 1 {
            return Err(AppError::Validation(
                "Already at the first step".to_string(),
            ));
        }

        let mut updated = session.clone();
        updated.current_step -= 1;
        let prefill_answer = updated.responses.pop().unwrap_or_default();
        let prefill_selections = updated.selections.pop().unwrap_or_default();
        updated.asked.pop();
        updated.current_question = updated.asked.last().cloned();
        updated.updated_at = Utc::now();

        self.store.set(&updated).await?;

        Ok(PreviousStep {
            session: updated,
            prefill_answer,
            prefill_selections,
        })
    }

    /// Loads the stored snapshot for a session id.
    pub async fn fetch(&self, session_id: &str) -> Result<Session, AppError> {
        self.store
            .get(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
    }
}

fn require_non_blank(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Checks the submitted answer against the current question's input contract
/// and returns the selections that will be recorded for this step (always
/// empty for free-text questions).
fn validate_answer(
    question: &Question,
    answer: &str,
    selections: &[String],
) -> Result<Vec<String>, AppError> {
    match &question.kind {
        QuestionKind::Text { .. } => {
            if answer.trim().is_empty() {
                return Err(AppError::Validation(
                    "Answer cannot be empty for a text question".to_string(),
                ));
            }
            Ok(vec![])
        }
        QuestionKind::Selection { max_selections, .. } => {
            if selections.is_empty() {
                return Err(AppError::Validation(
                    "At least one option must be selected".to_string(),
                ));
            }
            if selections.len() > *max_selections as usize {
                return Err(AppError::Validation(format!(
                    "At most {max_selections} options may be selected"
                )));
            }
            Ok(selections.to_vec())
        }
    }
}
