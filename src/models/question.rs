use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub const TRUE_OPTION: &str = "True";
pub const FALSE_OPTION: &str = "False";

/// Topic reported for questions that were not built around a concept.
pub const GENERAL_TOPIC: &str = "General";

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
}

impl std::str::FromStr for QuestionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', ' ', '/'], "_").as_str() {
            "multiple_choice" | "mcq" => Ok(QuestionKind::MultipleChoice),
            "true_false" | "truefalse" => Ok(QuestionKind::TrueFalse),
            other => Err(Error::BadRequest(format!("Unknown question type: {}", other))),
        }
    }
}

/// A single quiz item. `correct_answer` is always one of `options`; the
/// constructors below are the only way generation code builds one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    #[serde(default)]
    pub topic: Option<String>,
}

impl Question {
    pub fn multiple_choice(
        prompt: String,
        options: Vec<String>,
        correct_answer: String,
        explanation: String,
        topic: Option<String>,
    ) -> Result<Self> {
        let question = Self {
            kind: QuestionKind::MultipleChoice,
            prompt,
            options,
            correct_answer,
            explanation,
            topic,
        };
        question.check()?;
        Ok(question)
    }

    pub fn true_false(prompt: String, is_true: bool, explanation: String) -> Self {
        let correct_answer = if is_true { TRUE_OPTION } else { FALSE_OPTION };
        Self {
            kind: QuestionKind::TrueFalse,
            prompt,
            options: vec![TRUE_OPTION.to_string(), FALSE_OPTION.to_string()],
            correct_answer: correct_answer.to_string(),
            explanation,
            topic: None,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.check().is_ok()
    }

    pub fn has_option(&self, answer: &str) -> bool {
        self.options.iter().any(|o| o == answer)
    }

    fn check(&self) -> Result<()> {
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&self.options.len()) {
            return Err(Error::Internal(format!(
                "Question must have between {} and {} options, got {}",
                MIN_OPTIONS,
                MAX_OPTIONS,
                self.options.len()
            )));
        }
        if !self.has_option(&self.correct_answer) {
            return Err(Error::Internal(
                "Correct answer is not one of the question options".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_choice_rejects_answer_outside_options() {
        let res = Question::multiple_choice(
            "What is Rust?".into(),
            vec!["A language".into(), "A metal oxide".into()],
            "A crab".into(),
            String::new(),
            None,
        );
        assert!(res.is_err());
    }

    #[test]
    fn multiple_choice_rejects_too_many_options() {
        let options: Vec<String> = (0..5).map(|i| format!("option {}", i)).collect();
        let res = Question::multiple_choice(
            "Pick one".into(),
            options.clone(),
            options[0].clone(),
            String::new(),
            None,
        );
        assert!(res.is_err());
    }

    #[test]
    fn true_false_items_are_well_formed() {
        let q = Question::true_false("True or False: water is wet".into(), false, String::new());
        assert!(q.is_well_formed());
        assert_eq!(q.correct_answer, FALSE_OPTION);
        assert!(q.topic.is_none());
    }

    #[test]
    fn question_kind_parses_form_values() {
        assert_eq!("multiple_choice".parse::<QuestionKind>().unwrap(), QuestionKind::MultipleChoice);
        assert_eq!("True/False".parse::<QuestionKind>().unwrap(), QuestionKind::TrueFalse);
        assert!("essay".parse::<QuestionKind>().is_err());
    }

    #[test]
    fn kind_serializes_as_type_field() {
        let q = Question::true_false("True or False: x".into(), true, String::new());
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["type"], "true_false");
    }
}
