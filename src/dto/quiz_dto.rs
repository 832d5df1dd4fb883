use crate::models::question::{Question, QuestionKind};
use crate::models::session::{GenerationMode, QuizSession};
use crate::services::ai_service::Difficulty;
use crate::services::generator_service::DEFAULT_QUESTIONS;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A question as shown while the quiz is being taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl PublicQuestion {
    pub fn hidden(index: usize, q: &Question) -> Self {
        Self {
            index,
            kind: q.kind,
            prompt: q.prompt.clone(),
            options: q.options.clone(),
            topic: q.topic.clone(),
            correct_answer: None,
            explanation: None,
        }
    }

    pub fn revealed(index: usize, q: &Question) -> Self {
        Self {
            correct_answer: Some(q.correct_answer.clone()),
            explanation: Some(q.explanation.clone()),
            ..Self::hidden(index, q)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: uuid::Uuid,
    pub generated: bool,
    pub submitted: bool,
    pub source_name: Option<String>,
    pub mode: Option<GenerationMode>,
    pub warnings: Vec<String>,
    pub total_questions: usize,
    pub questions_answered: usize,
    pub questions: Vec<PublicQuestion>,
    pub answers: BTreeMap<usize, String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<&QuizSession> for SessionView {
    fn from(session: &QuizSession) -> Self {
        let submitted = session.is_submitted();
        let questions = session
            .questions()
            .iter()
            .enumerate()
            .map(|(i, q)| {
                if submitted {
                    PublicQuestion::revealed(i, q)
                } else {
                    PublicQuestion::hidden(i, q)
                }
            })
            .collect();

        Self {
            session_id: session.id,
            generated: session.is_generated(),
            submitted,
            source_name: session.source_name.clone(),
            mode: session.mode,
            warnings: session.warnings.clone(),
            total_questions: session.questions().len(),
            questions_answered: session.answers().len(),
            questions,
            answers: session.answers().clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct GenerateQuizParams {
    #[validate(range(min = 3, max = 20))]
    pub num_questions: usize,
    pub kinds: BTreeSet<QuestionKind>,
    pub mode: GenerationMode,
    pub difficulty: Difficulty,
    #[validate(length(max = 512))]
    pub api_key: Option<String>,
}

impl Default for GenerateQuizParams {
    fn default() -> Self {
        Self {
            num_questions: DEFAULT_QUESTIONS,
            kinds: BTreeSet::new(),
            mode: GenerationMode::RuleBased,
            difficulty: Difficulty::Medium,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQuizResponse {
    pub session_id: uuid::Uuid,
    pub mode: GenerationMode,
    pub requested: usize,
    pub generated: usize,
    pub questions: Vec<PublicQuestion>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordAnswerRequest {
    #[validate(length(min = 1, max = 2000))]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAnswerResponse {
    pub saved: bool,
    pub question_index: usize,
    pub questions_answered: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitQuizRequest {
    #[serde(default)]
    pub answers: BTreeMap<usize, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(num_questions: usize) -> GenerateQuizParams {
        GenerateQuizParams {
            num_questions,
            ..GenerateQuizParams::default()
        }
    }

    #[test]
    fn question_count_is_bounded_from_three_to_twenty() {
        assert!(params(DEFAULT_QUESTIONS).validate().is_ok());
        assert!(params(3).validate().is_ok());
        assert!(params(20).validate().is_ok());
        assert!(params(2).validate().is_err());
        assert!(params(21).validate().is_err());
    }
}
