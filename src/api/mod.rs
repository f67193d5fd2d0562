//! API 模块
//!
//! HTTP 接口层，负责路由与请求/响应转换

pub mod handlers;
pub mod response;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::services::{AttemptStore, QuizService, QuizStore};

/// multipart 表单除文件外的额外开销
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// 各处理函数共享的状态
#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub attempts: Arc<AttemptStore>,
    pub quizzes: Arc<QuizStore>,
}

impl AppState {
    pub fn new(quiz_service: QuizService) -> Self {
        Self {
            quiz_service: Arc::new(quiz_service),
            attempts: Arc::new(AttemptStore::new()),
            quizzes: Arc::new(QuizStore::new()),
        }
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    let body_limit = state.quiz_service.config().max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/upload", post(handlers::upload))
        .route("/extract", post(handlers::upload))
        .route("/extracted", get(handlers::list_quizzes))
        .route("/extracted/:id", get(handlers::get_quiz))
        .route("/attempts", post(handlers::create_attempt))
        .route("/attempts/:user_id", get(handlers::list_attempts))
        .route("/stats/:user_id", get(handlers::user_stats))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
