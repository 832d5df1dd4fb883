use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;
use validator::Validate;

use crate::dto::quiz_dto::{
    CreateSessionResponse, GenerateQuizParams, GenerateQuizResponse, PublicQuestion,
    RecordAnswerRequest, RecordAnswerResponse, SessionView, SubmitQuizRequest,
};
use crate::error::{Error, Result};
use crate::models::question::{Question, QuestionKind};
use crate::models::result::ScoredResult;
use crate::models::session::GenerationMode;
use crate::services::generator_service::{QuizBuilder, QuizSettings, MIN_DOCUMENT_LEN};
use crate::services::normalizer::normalize_text;
use crate::services::scoring_service::ScoringService;
use crate::utils::text::char_len;
use crate::AppState;

struct UploadForm {
    file_name: String,
    data: Bytes,
    params: GenerateQuizParams,
}

#[axum::debug_handler]
pub async fn create_session(State(state): State<AppState>) -> Result<Response> {
    let session = state.sessions.create()?;
    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id,
            created_at: session.created_at,
        }),
    )
        .into_response())
}

#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let session = state.sessions.get(id)?;
    Ok(Json(SessionView::from(&session)))
}

#[axum::debug_handler]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let view = state.sessions.update(id, |session| {
        session.reset();
        Ok(SessionView::from(&*session))
    })?;
    tracing::info!(session_id = %id, "session reset");
    Ok(Json(view))
}

async fn read_upload_form(multipart: &mut Multipart) -> Result<UploadForm> {
    let mut file: Option<(String, Bytes)> = None;
    let mut params = GenerateQuizParams::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("document").to_string();
                let data = field.bytes().await?;
                file = Some((file_name, data));
            }
            "num_questions" => {
                let raw = field.text().await?;
                params.num_questions = raw.trim().parse().map_err(|_| {
                    Error::BadRequest(format!("num_questions must be a number, got {:?}", raw))
                })?;
            }
            "question_types" => {
                for kind in field.text().await?.split(',').filter(|k| !k.trim().is_empty()) {
                    params.kinds.insert(kind.parse::<QuestionKind>()?);
                }
            }
            "mode" => params.mode = field.text().await?.parse()?,
            "difficulty" => params.difficulty = field.text().await?.parse()?,
            "api_key" => {
                let key = field.text().await?;
                params.api_key = Some(key.trim().to_string()).filter(|k| !k.is_empty());
            }
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| Error::BadRequest("A document must be uploaded in the 'file' field".into()))?;
    if params.kinds.is_empty() {
        params.kinds.insert(QuestionKind::MultipleChoice);
    }

    Ok(UploadForm {
        file_name,
        data,
        params,
    })
}

#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<GenerateQuizResponse>> {
    state.sessions.get(id)?;

    let UploadForm {
        file_name,
        data,
        params,
    } = read_upload_form(&mut multipart).await?;
    params.validate()?;
    tracing::info!(
        session_id = %id,
        file_name = %file_name,
        bytes = data.len(),
        mode = ?params.mode,
        requested = params.num_questions,
        "generating quiz"
    );

    let raw_text = state.extraction_service.extract(&file_name, &data).await?;

    let (questions, warnings) = match params.mode {
        GenerationMode::RuleBased => {
            let settings = QuizSettings {
                num_questions: params.num_questions,
                kinds: params.kinds.clone(),
            };
            let mut rng = StdRng::from_entropy();
            let draft = QuizBuilder::build(&raw_text, &settings, &mut rng)?;
            (draft.questions, draft.warnings)
        }
        GenerationMode::Ai => generate_with_ai(&state, &raw_text, &params).await?,
    };

    if questions.is_empty() {
        tracing::warn!(session_id = %id, ?warnings, "no questions generated");
    } else {
        let installed = questions.clone();
        let warnings = warnings.clone();
        state.sessions.update(id, move |session| {
            session.replace_questions(installed, Some(file_name), params.mode, warnings);
            Ok(())
        })?;
    }

    tracing::info!(session_id = %id, generated = questions.len(), "quiz generation finished");
    Ok(Json(GenerateQuizResponse {
        session_id: id,
        mode: params.mode,
        requested: params.num_questions,
        generated: questions.len(),
        questions: public_questions(&questions),
        warnings,
    }))
}

async fn generate_with_ai(
    state: &AppState,
    raw_text: &str,
    params: &GenerateQuizParams,
) -> Result<(Vec<Question>, Vec<String>)> {
    let text = normalize_text(raw_text);
    if char_len(&text) < MIN_DOCUMENT_LEN {
        return Err(Error::InsufficientContent(
            "The document content is too short to generate meaningful questions".to_string(),
        ));
    }

    let questions = state
        .ai_service
        .generate_questions(
            &text,
            params.num_questions,
            params.difficulty,
            params.api_key.as_deref(),
        )
        .await?;

    let mut warnings = Vec::new();
    if questions.len() < params.num_questions {
        warnings.push(format!(
            "The question service returned {} of {} requested questions.",
            questions.len(),
            params.num_questions
        ));
    }
    Ok((questions, warnings))
}

fn public_questions(questions: &[Question]) -> Vec<PublicQuestion> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| PublicQuestion::hidden(i, q))
        .collect()
}

#[axum::debug_handler]
pub async fn record_answer(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(req): Json<RecordAnswerRequest>,
) -> Result<Json<RecordAnswerResponse>> {
    req.validate()?;
    let (questions_answered, timestamp) = state.sessions.update(id, |session| {
        session.record_answer(index, req.answer)?;
        Ok((session.answers().len(), session.updated_at))
    })?;

    Ok(Json(RecordAnswerResponse {
        saved: true,
        question_index: index,
        questions_answered,
        timestamp,
    }))
}

/// Optionally records a final batch of answers, then locks the session and
/// returns the scored result. The batch is applied all-or-nothing.
#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ScoredResult>> {
    let req: SubmitQuizRequest = if body.iter().all(u8::is_ascii_whitespace) {
        SubmitQuizRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let result = state.sessions.update(id, |session| {
        let mut draft = session.clone();
        for (index, answer) in req.answers {
            draft.record_answer(index, answer)?;
        }
        draft.submit()?;
        let result = ScoringService::score(draft.questions(), draft.answers());
        *session = draft;
        Ok(result)
    })?;

    tracing::info!(
        session_id = %id,
        score = result.score,
        total = result.total_questions,
        percentage = result.percentage,
        "quiz submitted"
    );
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScoredResult>> {
    Ok(Json(submitted_result(&state, id)?))
}

pub(crate) fn submitted_result(state: &AppState, id: Uuid) -> Result<ScoredResult> {
    let session = state.sessions.get(id)?;
    if !session.is_submitted() {
        return Err(Error::Conflict("Quiz has not been submitted yet".to_string()));
    }
    Ok(ScoringService::score(session.questions(), session.answers()))
}
