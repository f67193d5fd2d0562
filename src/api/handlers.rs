//! HTTP 处理函数
//!
//! 只做请求解析与响应拼装，业务逻辑全部在 `services` 中。

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::response::success;
use super::AppState;
use crate::error::{AppError, AppResult, InputError};
use crate::models::{Difficulty, NewAttempt, SubjectArea};
use crate::services::QuizRequest;

/// 列表接口默认返回条数
const DEFAULT_LIST_LIMIT: usize = 20;

/// `params` 字段中的出题参数
#[derive(Debug, Default, Deserialize)]
struct UploadParams {
    #[serde(default, alias = "questionCount")]
    question_count: Option<usize>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    subject: Option<String>,
}

/// 表单中收集到的原始参数
#[derive(Debug, Default)]
pub struct RawParams {
    pub params_json: Option<String>,
    pub question_count: Option<String>,
    pub difficulty: Option<String>,
    pub subject: Option<String>,
}

/// 解析后的出题参数
#[derive(Debug, Default, PartialEq)]
pub struct GenerationParams {
    pub question_count: Option<usize>,
    pub difficulty: Option<Difficulty>,
    pub subject: Option<SubjectArea>,
}

impl RawParams {
    /// 合并 `params` JSON 与单独字段，JSON 中的值优先
    pub fn resolve(self) -> AppResult<GenerationParams> {
        let parsed: UploadParams = match self.params_json.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => serde_json::from_str(text)?,
            _ => UploadParams::default(),
        };

        let question_count = match parsed.question_count {
            Some(n) => Some(n),
            None => non_empty(self.question_count)
                .map(|v| {
                    v.parse::<usize>().map_err(|_| InputError::InvalidField {
                        field: "question_count".to_string(),
                        reason: format!("'{}' is not a positive integer", v),
                    })
                })
                .transpose()?,
        };

        let difficulty = non_empty(parsed.difficulty.or(self.difficulty))
            .map(|v| {
                Difficulty::from_str(&v).ok_or_else(|| InputError::InvalidField {
                    field: "difficulty".to_string(),
                    reason: format!("'{}' is not one of easy, medium, hard", v),
                })
            })
            .transpose()?;

        let subject = non_empty(parsed.subject.or(self.subject))
            .map(|v| {
                SubjectArea::from_str(&v).ok_or_else(|| InputError::InvalidField {
                    field: "subject".to_string(),
                    reason: format!("'{}' is not a known subject area", v),
                })
            })
            .transpose()?;

        Ok(GenerationParams {
            question_count,
            difficulty,
            subject,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        InputError::MalformedBody {
            reason: err.body_text(),
        }
        .into()
    }
}

async fn field_text(field: Field<'_>, limit: usize) -> AppResult<String> {
    field.text().await.map_err(|e| multipart_error(e, limit))
}

/// `GET /`
pub async fn root() -> Response {
    success(
        StatusCode::OK,
        json!({
            "message": "PDF Quiz Generator API",
            "status": "healthy",
        }),
    )
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Response {
    success(
        StatusCode::OK,
        json!({
            "status": "healthy",
            "service": "pdf-quiz-generator",
            "remote_generation_enabled": state.quiz_service.remote_enabled(),
        }),
    )
}

/// `POST /upload`、`POST /extract`
///
/// multipart 表单：`file`（或 `pdf`）为 PDF 文件；出题参数可放在 `params` JSON 中，
/// 也可作为单独的 `question_count` / `difficulty` / `subject` 字段。
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> AppResult<Response> {
    let limit = state.quiz_service.config().max_upload_bytes;
    let mut filename: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;
    let mut raw = RawParams::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" | "pdf" => {
                filename = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                if data.len() > limit {
                    return Err(AppError::PayloadTooLarge { limit });
                }
                bytes = Some(data.to_vec());
            }
            "params" => raw.params_json = Some(field_text(field, limit).await?),
            "question_count" | "questionCount" => {
                raw.question_count = Some(field_text(field, limit).await?)
            }
            "difficulty" => raw.difficulty = Some(field_text(field, limit).await?),
            "subject" => raw.subject = Some(field_text(field, limit).await?),
            other => debug!("忽略表单字段: {}", other),
        }
    }

    let bytes = bytes.ok_or(InputError::MissingFile)?;
    let params = raw.resolve()?;

    let generated = state
        .quiz_service
        .generate(QuizRequest {
            filename,
            bytes,
            question_count: params.question_count,
            difficulty: params.difficulty,
            subject: params.subject,
        })
        .await?;
    state.quizzes.add(&generated).await;

    let quiz = &generated.quiz;
    Ok(success(
        StatusCode::OK,
        json!({
            "success": true,
            "data": {
                "id": quiz.id,
                "questions": quiz.questions,
                "metadata": quiz.metadata,
            },
            "message": format!("Successfully generated {} questions", quiz.len()),
            "processing_time": generated.processing_time_secs,
            "file_info": {
                "filename": generated.filename,
                "pages": generated.pages,
                "text_length": generated.text_length,
                "cleaned_length": generated.cleaned_length,
                "source": generated.source,
            },
        }),
    ))
}

/// `POST /attempts`
pub async fn create_attempt(
    State(state): State<AppState>,
    payload: Result<Json<NewAttempt>, JsonRejection>,
) -> AppResult<Response> {
    let Json(new_attempt) = payload.map_err(|e| InputError::MalformedBody {
        reason: e.body_text(),
    })?;
    let attempt = state.attempts.add(new_attempt).await?;
    Ok(success(
        StatusCode::CREATED,
        json!({
            "success": true,
            "attempt": attempt,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct AttemptQuery {
    pub limit: Option<usize>,
}

/// `GET /attempts/:user_id`
pub async fn list_attempts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<AttemptQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let attempts = state.attempts.list_for_user(&user_id, limit).await;
    info!("📋 用户 {} 的答题记录: {} 条", user_id, attempts.len());
    success(
        StatusCode::OK,
        json!({
            "success": true,
            "total": attempts.len(),
            "attempts": attempts,
        }),
    )
}

#[derive(Debug, Deserialize)]
pub struct QuizListQuery {
    pub limit: Option<usize>,
    pub subject: Option<String>,
}

impl QuizListQuery {
    /// 解析学科过滤条件；空字符串视为未提供
    pub fn subject_filter(&self) -> AppResult<Option<SubjectArea>> {
        non_empty(self.subject.clone())
            .map(|v| {
                SubjectArea::from_str(&v).ok_or_else(|| {
                    AppError::from(InputError::InvalidField {
                        field: "subject".to_string(),
                        reason: format!("'{}' is not a known subject area", v),
                    })
                })
            })
            .transpose()
    }
}

/// `GET /extracted?limit=N&subject=S`
pub async fn list_quizzes(
    State(state): State<AppState>,
    Query(query): Query<QuizListQuery>,
) -> AppResult<Response> {
    let subject = query.subject_filter()?;
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let quizzes = state.quizzes.list(limit, subject).await;
    Ok(success(
        StatusCode::OK,
        json!({
            "success": true,
            "total": quizzes.len(),
            "data": quizzes,
        }),
    ))
}

/// `GET /extracted/:id`
pub async fn get_quiz(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let stored = state.quizzes.get(&id).await?;
    Ok(success(
        StatusCode::OK,
        json!({
            "success": true,
            "data": stored,
        }),
    ))
}

/// `GET /stats/:user_id`
pub async fn user_stats(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    let stats = state.attempts.stats_for_user(&user_id).await;
    success(
        StatusCode::OK,
        json!({
            "success": true,
            "stats": stats,
        }),
    )
}
