use crate::error::{Error, Result};
use crate::models::question::{Question, GENERAL_TOPIC};
use crate::models::result::ScoredResult;
use serde::{Deserialize, Serialize};

pub const NOT_ANSWERED: &str = "Not answered";
const RULE_LINE_WIDTH: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizMetadata {
    pub timestamp: String,
    pub total_questions: usize,
    pub questions_answered: usize,
    pub score: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question_number: usize,
    pub question_text: String,
    pub topic: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedResults {
    pub quiz_metadata: QuizMetadata,
    pub questions_and_answers: Vec<AnsweredQuestion>,
}

pub struct ExportService;

impl ExportService {
    /// One row per question: Question, Topic, Your Answer, Correct Answer, Status, Points.
    pub fn results_csv(result: &ScoredResult) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "Question",
            "Topic",
            "Your Answer",
            "Correct Answer",
            "Status",
            "Points",
        ])?;

        for item in &result.items {
            let label = format!("Q{}", item.question_number);
            let points = item.points.to_string();
            writer.write_record([
                label.as_str(),
                item.topic.as_deref().unwrap_or(GENERAL_TOPIC),
                item.user_answer.as_deref().unwrap_or("Skipped"),
                item.correct_answer.as_str(),
                item.outcome.label(),
                points.as_str(),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::Internal(format!("Failed to flush CSV export: {}", e)))
    }

    pub fn detailed_results(result: &ScoredResult, timestamp: String) -> DetailedResults {
        DetailedResults {
            quiz_metadata: QuizMetadata {
                timestamp,
                total_questions: result.total_questions,
                questions_answered: result.questions_answered,
                score: result.score,
                percentage: result.percentage,
            },
            questions_and_answers: result
                .items
                .iter()
                .map(|item| AnsweredQuestion {
                    question_number: item.question_number,
                    question_text: item.question.clone(),
                    topic: item.topic.clone().unwrap_or_else(|| GENERAL_TOPIC.to_string()),
                    user_answer: item
                        .user_answer
                        .clone()
                        .unwrap_or_else(|| NOT_ANSWERED.to_string()),
                    correct_answer: item.correct_answer.clone(),
                    is_correct: item.is_correct(),
                    explanation: item.explanation.clone(),
                })
                .collect(),
        }
    }

    pub fn results_json(result: &ScoredResult, timestamp: String) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::detailed_results(
            result, timestamp,
        ))?)
    }

    /// Plain-text study sheet: question, lettered options, answer and
    /// explanation, separated by a rule line.
    pub fn questions_text(questions: &[Question]) -> String {
        let rule = "-".repeat(RULE_LINE_WIDTH);
        let mut out = String::new();

        for (idx, q) in questions.iter().enumerate() {
            out.push_str(&format!("Question {}: {}\n", idx + 1, q.prompt));
            for (opt_idx, option) in q.options.iter().enumerate() {
                out.push_str(&format!("{}) {}\n", option_letter(opt_idx), option));
            }
            out.push_str(&format!("Correct Answer: {}\n", q.correct_answer));
            out.push_str(&format!("Explanation: {}\n", q.explanation));
            out.push_str(&rule);
            out.push_str("\n\n");
        }

        out
    }
}

pub fn option_letter(idx: usize) -> char {
    (b'A' + (idx % 26) as u8) as char
}
