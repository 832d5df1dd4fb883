use crate::error::{Error, Result};
use crate::models::question::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    #[default]
    RuleBased,
    Ai,
}

impl std::str::FromStr for GenerationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "rule_based" | "rules" => Ok(GenerationMode::RuleBased),
            "ai" | "llm" => Ok(GenerationMode::Ai),
            other => Err(Error::BadRequest(format!("Unknown generation mode: {}", other))),
        }
    }
}

/// One user's quiz attempt. Questions are only ever swapped as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: Uuid,
    questions: Vec<Question>,
    answers: BTreeMap<usize, String>,
    submitted: bool,
    pub source_name: Option<String>,
    pub mode: Option<GenerationMode>,
    pub warnings: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            questions: Vec::new(),
            answers: BTreeMap::new(),
            submitted: false,
            source_name: None,
            mode: None,
            warnings: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_generated(&self) -> bool {
        !self.questions.is_empty()
    }

    /// Installs a freshly generated question set, discarding previous answers.
    pub fn replace_questions(
        &mut self,
        questions: Vec<Question>,
        source_name: Option<String>,
        mode: GenerationMode,
        warnings: Vec<String>,
    ) {
        self.questions = questions;
        self.answers.clear();
        self.submitted = false;
        self.source_name = source_name;
        self.mode = Some(mode);
        self.warnings = warnings;
        self.touch();
    }

    pub fn record_answer(&mut self, index: usize, answer: String) -> Result<()> {
        if self.submitted {
            return Err(Error::Conflict("Quiz has already been submitted".to_string()));
        }
        let question = self
            .questions
            .get(index)
            .ok_or_else(|| Error::NotFound(format!("Question {} does not exist", index)))?;
        if !question.has_option(&answer) {
            return Err(Error::BadRequest(format!(
                "Answer for question {} is not one of its options",
                index
            )));
        }
        self.answers.insert(index, answer);
        self.touch();
        Ok(())
    }

    pub fn submit(&mut self) -> Result<()> {
        if !self.is_generated() {
            return Err(Error::Conflict("No quiz has been generated yet".to_string()));
        }
        if self.submitted {
            return Err(Error::Conflict("Quiz has already been submitted".to_string()));
        }
        if self.answers.is_empty() {
            return Err(Error::BadRequest(
                "Please answer at least one question before submitting".to_string(),
            ));
        }
        self.submitted = true;
        self.touch();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.questions.clear();
        self.answers.clear();
        self.submitted = false;
        self.source_name = None;
        self.mode = None;
        self.warnings.clear();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> QuizSession {
        let mut session = QuizSession::new();
        session.replace_questions(
            vec![
                Question::true_false("True or False: a".into(), true, String::new()),
                Question::true_false("True or False: b".into(), false, String::new()),
            ],
            Some("notes.txt".into()),
            GenerationMode::RuleBased,
            vec![],
        );
        session
    }

    #[test]
    fn record_answer_validates_index_and_option() {
        let mut session = sample_session();
        assert!(matches!(
            session.record_answer(5, "True".into()),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            session.record_answer(0, "Maybe".into()),
            Err(Error::BadRequest(_))
        ));
        session.record_answer(0, "True".into()).unwrap();
        assert_eq!(session.answers().get(&0).map(String::as_str), Some("True"));
    }

    #[test]
    fn submit_requires_an_answer_and_locks_the_session() {
        let mut session = sample_session();
        assert!(matches!(session.submit(), Err(Error::BadRequest(_))));
        session.record_answer(1, "False".into()).unwrap();
        session.submit().unwrap();
        assert!(session.is_submitted());
        assert!(matches!(
            session.record_answer(0, "True".into()),
            Err(Error::Conflict(_))
        ));
        assert!(matches!(session.submit(), Err(Error::Conflict(_))));
    }

    #[test]
    fn replacing_questions_clears_previous_attempt() {
        let mut session = sample_session();
        session.record_answer(0, "True".into()).unwrap();
        session.submit().unwrap();
        session.replace_questions(
            vec![Question::true_false("True or False: c".into(), true, String::new())],
            None,
            GenerationMode::Ai,
            vec!["note".into()],
        );
        assert!(!session.is_submitted());
        assert!(session.answers().is_empty());
        assert_eq!(session.questions().len(), 1);
        assert_eq!(session.mode, Some(GenerationMode::Ai));
    }

    #[test]
    fn reset_returns_to_empty_state() {
        let mut session = sample_session();
        session.record_answer(0, "True".into()).unwrap();
        let id = session.id;
        session.reset();
        assert_eq!(session.id, id);
        assert!(!session.is_generated());
        assert!(session.answers().is_empty());
        assert!(session.mode.is_none());
    }

    #[test]
    fn submit_without_questions_is_a_conflict() {
        let mut session = QuizSession::new();
        assert!(matches!(session.submit(), Err(Error::Conflict(_))));
    }
}
