use crate::error::{Error, Result};
use crate::models::question::{Question, MAX_OPTIONS, MIN_OPTIONS};
use crate::utils::text::take_chars;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "" | "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(Error::BadRequest(format!("Unknown difficulty: {}", other))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAnswer {
    Text(String),
    Index(usize),
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: RawAnswer,
    #[serde(default)]
    explanation: String,
}

/// Client for an OpenAI-compatible chat-completion endpoint that returns
/// ready-made multiple-choice questions.
#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_url: String,
    model: String,
    default_api_key: Option<String>,
    prompt_char_budget: usize,
    timeout: Duration,
}

impl AIService {
    pub fn new(
        client: Client,
        api_url: String,
        model: String,
        default_api_key: Option<String>,
        prompt_char_budget: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            api_url,
            model,
            default_api_key,
            prompt_char_budget,
            timeout,
        }
    }

    pub async fn generate_questions(
        &self,
        text: &str,
        count: usize,
        difficulty: Difficulty,
        api_key: Option<&str>,
    ) -> Result<Vec<Question>> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(self.default_api_key.as_deref())
            .ok_or_else(|| Error::BadRequest("An API key is required for AI generation".into()))?;

        let prompt = self.build_prompt(text, count, difficulty);
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": "You are a helpful assistant that creates educational quiz questions."},
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.7
        });

        tracing::info!(count, difficulty = difficulty.label(), model = %self.model, "requesting AI questions");
        let reply = self.chat_completion(api_key, payload).await?;

        let mut rng = StdRng::from_entropy();
        let questions = parse_questions(&reply, count, &mut rng)?;
        tracing::info!(produced = questions.len(), "AI questions parsed");
        Ok(questions)
    }

    pub fn build_prompt(&self, text: &str, count: usize, difficulty: Difficulty) -> String {
        format!(
            "Based on the following text, generate {count} multiple-choice questions at {difficulty} difficulty.\n\
             Return ONLY a JSON array. Each element must have:\n\
             - \"question\": the question text\n\
             - \"options\": an array of exactly 4 answer strings\n\
             - \"correct_answer\": the exact text of the correct option\n\
             - \"explanation\": a short explanation of why it is correct\n\n\
             Text:\n{excerpt}",
            count = count,
            difficulty = difficulty.label(),
            excerpt = take_chars(text, self.prompt_char_budget),
        )
    }

    async fn chat_completion(&self, api_key: &str, payload: JsonValue) -> Result<String> {
        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            tracing::error!(%status, "chat completion request failed");
            return Err(Error::Upstream(format!("API error {}: {}", status, text)));
        }

        let body: JsonValue = res.json().await?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| Error::Upstream("Invalid completion response format".into()))
    }
}

/// Parses the JSON array found between the first `[` and the last `]` of a
/// model reply. Any malformed element fails the whole reply.
pub fn parse_questions<R: Rng + ?Sized>(
    reply: &str,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Question>> {
    let (start, end) = match (reply.find('['), reply.rfind(']')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(Error::Upstream(
                "Response did not contain a JSON array of questions".into(),
            ))
        }
    };

    let raw: Vec<RawQuestion> = serde_json::from_str(&reply[start..=end])
        .map_err(|e| Error::Upstream(format!("Could not parse questions: {}", e)))?;

    raw.into_iter()
        .take(count)
        .enumerate()
        .map(|(idx, q)| into_question(idx, q, rng))
        .collect()
}

fn into_question<R: Rng + ?Sized>(idx: usize, raw: RawQuestion, rng: &mut R) -> Result<Question> {
    let RawQuestion {
        question,
        mut options,
        correct_answer,
        explanation,
    } = raw;

    if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&options.len()) {
        return Err(Error::Upstream(format!(
            "Question {} has {} options",
            idx + 1,
            options.len()
        )));
    }

    let correct = resolve_answer(&options, &correct_answer).ok_or_else(|| {
        Error::Upstream(format!(
            "Question {} has a correct answer that is not one of its options",
            idx + 1
        ))
    })?;

    options.shuffle(rng);
    Question::multiple_choice(question, options, correct, explanation, None)
        .map_err(|e| Error::Upstream(e.to_string()))
}

fn resolve_answer(options: &[String], answer: &RawAnswer) -> Option<String> {
    match answer {
        RawAnswer::Index(i) => options.get(*i).cloned(),
        RawAnswer::Text(text) => {
            let text = text.trim();
            if let Some(found) = options.iter().find(|o| o.trim() == text) {
                return Some(found.clone());
            }
            if let Some(found) = options.iter().find(|o| o.trim().eq_ignore_ascii_case(text)) {
                return Some(found.clone());
            }
            letter_index(text).and_then(|i| options.get(i).cloned())
        }
    }
}

/// Accepts `B`, `b`, `B)` or `B.` as a reference to the second option.
fn letter_index(text: &str) -> Option<usize> {
    let letter = text.trim_end_matches([')', '.']);
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
        }
        _ => None,
    }
}
