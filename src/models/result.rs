use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    Skipped,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Correct => "Correct",
            Outcome::Incorrect => "Incorrect",
            Outcome::Skipped => "Skipped",
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            Outcome::Correct => 1,
            Outcome::Incorrect | Outcome::Skipped => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl PerformanceTier {
    /// Lower bounds are inclusive: 80.0 is excellent, 60.0 is good.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            PerformanceTier::Excellent
        } else if percentage >= 60.0 {
            PerformanceTier::Good
        } else {
            PerformanceTier::NeedsImprovement
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "Excellent! Outstanding performance!",
            PerformanceTier::Good => "Good job! Solid understanding shown.",
            PerformanceTier::NeedsImprovement => "Keep studying! Room for improvement.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredItem {
    pub question_number: usize,
    pub question: String,
    pub topic: Option<String>,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub outcome: Outcome,
    pub points: u32,
    pub explanation: String,
}

impl ScoredItem {
    pub fn is_correct(&self) -> bool {
        self.outcome == Outcome::Correct
    }
}

/// Derived from a session on demand; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub score: usize,
    pub total_questions: usize,
    pub questions_answered: usize,
    pub percentage: f64,
    pub completion_rate: f64,
    pub tier: PerformanceTier,
    pub message: String,
    pub items: Vec<ScoredItem>,
}
