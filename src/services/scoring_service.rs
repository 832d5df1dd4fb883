use std::collections::BTreeMap;

use crate::models::question::Question;
use crate::models::result::{Outcome, PerformanceTier, ScoredItem, ScoredResult};

pub struct ScoringService;

impl ScoringService {
    /// Compares each recorded answer with the question's correct answer.
    /// Skipped questions earn nothing, exactly like wrong ones, but are
    /// reported separately.
    pub fn score(questions: &[Question], answers: &BTreeMap<usize, String>) -> ScoredResult {
        let total_questions = questions.len();
        let mut score = 0;

        let items: Vec<ScoredItem> = questions
            .iter()
            .enumerate()
            .map(|(idx, q)| {
                let user_answer = answers.get(&idx).cloned();
                let outcome = match &user_answer {
                    None => Outcome::Skipped,
                    Some(a) if *a == q.correct_answer => Outcome::Correct,
                    Some(_) => Outcome::Incorrect,
                };
                if outcome == Outcome::Correct {
                    score += 1;
                }

                ScoredItem {
                    question_number: idx + 1,
                    question: q.prompt.clone(),
                    topic: q.topic.clone(),
                    user_answer,
                    correct_answer: q.correct_answer.clone(),
                    outcome,
                    points: outcome.points(),
                    explanation: q.explanation.clone(),
                }
            })
            .collect();

        let questions_answered = items
            .iter()
            .filter(|item| item.outcome != Outcome::Skipped)
            .count();
        let percentage = ratio_percent(score, total_questions);
        let tier = PerformanceTier::from_percentage(percentage);

        ScoredResult {
            score,
            total_questions,
            questions_answered,
            percentage,
            completion_rate: ratio_percent(questions_answered, total_questions),
            tier,
            message: tier.message().to_string(),
            items,
        }
    }
}

fn ratio_percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}
