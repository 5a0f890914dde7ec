//! Wizard session model — one in-progress or completed run of the guided
//! section generator.
//!
//! A session is a snapshot of confirmed state only: answers appear in
//! `responses`/`selections` after the service has accepted them, never
//! before. In-flight form input belongs to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single choice offered by a selection question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

/// The input affordance a question expects.
///
/// Decoded once at the service boundary; everything downstream matches on
/// this tag instead of probing optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Selection {
        options: Vec<ChoiceOption>,
        /// Upper bound on chosen values. The wire payload may omit it,
        /// which means single-select.
        #[serde(default = "default_max_selections")]
        max_selections: u32,
    },
}

fn default_max_selections() -> u32 {
    1
}

/// A question posed by the Question/Answer Service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// One run of the guided wizard.
///
/// Invariants while `is_completed == false`:
/// - `current_question` is present and equals `asked.last()`
/// - `responses.len() == selections.len() == current_step - 1`
/// - `asked.len() == current_step`
///
/// Once `is_completed == true`, `current_question` is permanently absent,
/// `generated_content` is present, and `responses.len() == total_steps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque identifier assigned by the Question/Answer Service.
    pub session_id: String,
    pub user_id: Uuid,
    pub company_name: String,
    pub position: String,
    pub section: String,
    /// 1-indexed. Monotonically non-decreasing except for the purely local
    /// previous-step rollback.
    pub current_step: u32,
    pub total_steps: u32,
    pub current_question: Option<Question>,
    /// Every question the service has posed, in order (index = step - 1).
    /// Retained so a previous-step rollback can re-display the prior
    /// question without a round-trip.
    pub asked: Vec<Question>,
    /// Free-text answers, one per confirmed step, append-only.
    pub responses: Vec<String>,
    /// Multi-choice answer sets, parallel to `responses`. Empty set for
    /// free-text steps.
    pub selections: Vec<Vec<String>>,
    pub is_completed: bool,
    pub generated_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn is_active(&self) -> bool {
        !self.is_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_question_deserializes() {
        let json = r#"{
            "type": "text",
            "prompt": "이 회사에 지원한 동기는 무엇인가요?",
            "placeholder": "자유롭게 작성해 주세요"
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.prompt, "이 회사에 지원한 동기는 무엇인가요?");
        match question.kind {
            QuestionKind::Text { placeholder } => {
                assert_eq!(placeholder.as_deref(), Some("자유롭게 작성해 주세요"));
            }
            other => panic!("Expected text question, got {other:?}"),
        }
    }

    #[test]
    fn test_selection_question_deserializes() {
        let json = r#"{
            "type": "selection",
            "prompt": "강점을 골라 주세요",
            "options": [
                {"value": "teamwork", "label": "협업"},
                {"value": "ownership", "label": "주도성"}
            ],
            "max_selections": 2
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        match question.kind {
            QuestionKind::Selection {
                options,
                max_selections,
            } => {
                assert_eq!(options.len(), 2);
                assert_eq!(options[0].value, "teamwork");
                assert_eq!(options[1].label, "주도성");
                assert_eq!(max_selections, 2);
            }
            other => panic!("Expected selection question, got {other:?}"),
        }
    }

    #[test]
    fn test_max_selections_defaults_to_single_select() {
        let json = r#"{
            "type": "selection",
            "prompt": "하나만 골라 주세요",
            "options": [{"value": "a", "label": "A"}]
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        match question.kind {
            QuestionKind::Selection { max_selections, .. } => assert_eq!(max_selections, 1),
            other => panic!("Expected selection question, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_question_type_fails_deserialization() {
        let json = r#"{"type": "slider", "prompt": "?"}"#;
        let result: Result<Question, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_question_round_trips_through_json() {
        let question = Question {
            prompt: "강점을 골라 주세요".to_string(),
            kind: QuestionKind::Selection {
                options: vec![ChoiceOption {
                    value: "teamwork".to_string(),
                    label: "협업".to_string(),
                }],
                max_selections: 3,
            },
        };
        let json = serde_json::to_string(&question).unwrap();
        let recovered: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, question);
    }

    #[test]
    fn test_session_snapshot_round_trips_through_json() {
        let session = Session {
            session_id: "sess-123".to_string(),
            user_id: Uuid::new_v4(),
            company_name: "Acme".to_string(),
            position: "Backend Engineer".to_string(),
            section: "성장과정".to_string(),
            current_step: 2,
            total_steps: 3,
            current_question: Some(Question {
                prompt: "두 번째 질문".to_string(),
                kind: QuestionKind::Text { placeholder: None },
            }),
            asked: vec![
                Question {
                    prompt: "첫 질문".to_string(),
                    kind: QuestionKind::Text { placeholder: None },
                },
                Question {
                    prompt: "두 번째 질문".to_string(),
                    kind: QuestionKind::Text { placeholder: None },
                },
            ],
            responses: vec!["첫 답변".to_string()],
            selections: vec![vec![]],
            is_completed: false,
            generated_content: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&session).unwrap();
        let recovered: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered.session_id, "sess-123");
        assert_eq!(recovered.current_step, 2);
        assert_eq!(recovered.asked.len(), 2);
        assert_eq!(recovered.responses.len(), 1);
        assert!(recovered.is_active());
    }
}
