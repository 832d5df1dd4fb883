use std::collections::{BTreeSet, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::models::question::{Question, QuestionKind};
use crate::services::concept_service::extract_key_concepts;
use crate::services::normalizer::normalize_text;
use crate::utils::text::{char_len, split_sentences, take_chars, truncate_with_ellipsis};

pub const DEFAULT_QUESTIONS: usize = 8;

/// Normalized documents shorter than this are rejected outright.
pub const MIN_DOCUMENT_LEN: usize = 100;

const MC_SENTENCE_MIN_LEN: usize = 30;
const TF_SENTENCE_MIN_LEN: usize = 20;
const MIN_MC_SENTENCES: usize = 3;
const DISTRACTOR_COUNT: usize = 3;
const OPTION_MAX_LEN: usize = 100;
const EXPLANATION_EXCERPT_LEN: usize = 150;

const QUESTION_TEMPLATES: [&str; 8] = [
    "What is the main concept of {}?",
    "According to the document, what is {}?",
    "How is {} defined in the text?",
    "What are the key characteristics of {}?",
    "What does the document say about {}?",
    "Which statement best describes {}?",
    "What is the primary function of {}?",
    "According to the content, {} is:",
];

const TRUE_EXPLANATION: &str = "This statement is directly from the document.";
const FALSE_EXPLANATION: &str = "This is a modified version of information in the document.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentShortfall {
    TooFewSentences { usable: usize },
    NoConcepts,
}

impl ContentShortfall {
    pub fn message(&self) -> String {
        match self {
            ContentShortfall::TooFewSentences { usable } => format!(
                "The document content seems too short to generate meaningful questions ({} usable sentences).",
                usable
            ),
            ContentShortfall::NoConcepts => {
                "Could not extract enough key concepts from the document.".to_string()
            }
        }
    }
}

/// Outcome of the multiple-choice synthesizer. Running out of content is an
/// expected result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Synthesis {
    Questions(Vec<Question>),
    InsufficientContent(ContentShortfall),
}

impl Synthesis {
    pub fn into_questions(self) -> Vec<Question> {
        match self {
            Synthesis::Questions(questions) => questions,
            Synthesis::InsufficientContent(_) => Vec::new(),
        }
    }
}

/// Builds up to `count` multiple-choice questions from normalized text.
///
/// One concept is drawn per iteration. Concepts without a supporting
/// sentence are skipped and still consume the iteration, so the result can
/// hold fewer than `count` questions.
pub fn generate_multiple_choice<R: Rng + ?Sized>(
    text: &str,
    count: usize,
    rng: &mut R,
) -> Synthesis {
    let sentences = split_sentences(text, MC_SENTENCE_MIN_LEN);
    if sentences.len() < MIN_MC_SENTENCES {
        return Synthesis::InsufficientContent(ContentShortfall::TooFewSentences {
            usable: sentences.len(),
        });
    }

    let concepts = extract_key_concepts(text);
    if concepts.is_empty() {
        return Synthesis::InsufficientContent(ContentShortfall::NoConcepts);
    }

    let mut used: HashSet<&str> = HashSet::new();
    let mut questions = Vec::new();

    for _ in 0..count.min(concepts.len()) {
        let available: Vec<&str> = concepts
            .iter()
            .map(String::as_str)
            .filter(|c| !used.contains(c))
            .collect();
        let Some(&concept) = available.choose(rng) else {
            break;
        };
        used.insert(concept);

        let template = QUESTION_TEMPLATES.choose(rng).copied().unwrap_or(QUESTION_TEMPLATES[0]);
        let prompt = template.replace("{}", concept);

        let needle = concept.to_lowercase();
        let (context, others): (Vec<&str>, Vec<&str>) = sentences
            .iter()
            .copied()
            .partition(|s| s.to_lowercase().contains(&needle));
        let Some(&correct_context) = context.first() else {
            tracing::debug!(concept, "no context sentence, skipping concept");
            continue;
        };

        let correct_answer = if char_len(correct_context) < OPTION_MAX_LEN {
            correct_context.to_string()
        } else {
            format!("A concept related to {} as described in the document", concept)
        };

        let distractors: Vec<String> = if others.len() >= DISTRACTOR_COUNT {
            others
                .choose_multiple(rng, DISTRACTOR_COUNT)
                .map(|s| s.to_string())
                .collect()
        } else {
            generic_distractors(concept)
        };

        let mut options = Vec::with_capacity(DISTRACTOR_COUNT + 1);
        options.push(correct_answer.clone());
        options.extend(
            distractors
                .iter()
                .map(|d| truncate_with_ellipsis(d, OPTION_MAX_LEN)),
        );
        options.shuffle(rng);

        let explanation = format!(
            "This information relates to {} as mentioned in the document: {}...",
            concept,
            take_chars(correct_context, EXPLANATION_EXCERPT_LEN)
        );

        match Question::multiple_choice(
            prompt,
            options,
            correct_answer,
            explanation,
            Some(concept.to_string()),
        ) {
            Ok(question) => questions.push(question),
            Err(e) => tracing::warn!(concept, error = %e, "discarding malformed question"),
        }
    }

    tracing::info!(
        requested = count,
        produced = questions.len(),
        "multiple-choice synthesis finished"
    );
    Synthesis::Questions(questions)
}

fn generic_distractors(concept: &str) -> Vec<String> {
    vec![
        "An unrelated concept not mentioned in the document".to_string(),
        format!("A different topic entirely separate from {}", concept),
        "Information not covered in this document".to_string(),
    ]
}

/// Builds true/false items from the first `count` qualifying sentences in
/// source order, truncated to `count` items overall.
///
/// Each sentence yields a true item; when another sentence follows it, a
/// false item is also derived from the *same* sentence via
/// [`naive_negation`].
pub fn generate_true_false(text: &str, count: usize) -> Vec<Question> {
    let sentences = split_sentences(text, TF_SENTENCE_MIN_LEN);
    let mut questions = Vec::new();

    for (i, sentence) in sentences.iter().enumerate().take(count) {
        questions.push(Question::true_false(
            format!("True or False: {}", sentence),
            true,
            TRUE_EXPLANATION.to_string(),
        ));

        if i + 1 < sentences.len() {
            questions.push(Question::true_false(
                format!("True or False: {}", naive_negation(sentence)),
                false,
                FALSE_EXPLANATION.to_string(),
            ));
        }
    }

    questions.truncate(count);
    questions
}

/// Plain substring substitution: every `is` becomes `is not`, then every
/// `are` becomes `are not`, with no regard for word boundaries. Sentences
/// containing neither stay unchanged.
pub fn naive_negation(sentence: &str) -> String {
    sentence.replace("is", "is not").replace("are", "are not")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    pub num_questions: usize,
    pub kinds: BTreeSet<QuestionKind>,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            num_questions: DEFAULT_QUESTIONS,
            kinds: BTreeSet::from([QuestionKind::MultipleChoice]),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuizDraft {
    pub questions: Vec<Question>,
    pub warnings: Vec<String>,
}

pub struct QuizBuilder;

impl QuizBuilder {
    /// Runs the rule-based pipeline over raw extracted text.
    ///
    /// True/false items make up a quarter of the request (at least one); the
    /// combined set is shuffled and cut to `num_questions`.
    pub fn build<R: Rng + ?Sized>(
        raw_text: &str,
        settings: &QuizSettings,
        rng: &mut R,
    ) -> Result<QuizDraft> {
        let text = normalize_text(raw_text);
        if char_len(&text) < MIN_DOCUMENT_LEN {
            return Err(Error::InsufficientContent(
                "The document content is too short to generate meaningful questions".to_string(),
            ));
        }

        let mut draft = QuizDraft::default();

        if settings.kinds.contains(&QuestionKind::MultipleChoice) {
            match generate_multiple_choice(&text, settings.num_questions, rng) {
                Synthesis::Questions(questions) => {
                    if questions.len() < settings.num_questions {
                        draft.warnings.push(format!(
                            "Only {} of {} multiple-choice questions could be generated from this document.",
                            questions.len(),
                            settings.num_questions
                        ));
                    }
                    draft.questions.extend(questions);
                }
                Synthesis::InsufficientContent(shortfall) => {
                    tracing::warn!(?shortfall, "multiple-choice synthesis yielded nothing");
                    draft.warnings.push(shortfall.message());
                }
            }
        }

        if settings.kinds.contains(&QuestionKind::TrueFalse) {
            let tf_count = (settings.num_questions / 4).max(1);
            draft.questions.extend(generate_true_false(&text, tf_count));
        }

        draft.questions.shuffle(rng);
        draft.questions.truncate(settings.num_questions);

        if draft.questions.is_empty() {
            draft.warnings.push(
                "Failed to generate questions. The document content might not be suitable for quiz generation."
                    .to_string(),
            );
        }

        Ok(draft)
    }
}
