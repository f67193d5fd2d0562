//! # PDF Quiz Generator
//!
//! 把上传的 PDF 讲义转换为选择题测验，并记录答题结果与用户统计
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 流水线层（Pipeline）
//! - `pipeline/` - 本地启发式出题，纯同步、无共享状态
//! - `normalizer` → `analyzer` → `synthesizers` → `assembler`
//! - `QuizPipeline` - 串起以上四个阶段的入口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `PdfTextExtractor` - PDF 按页提取文本
//! - `LlmService` - 远程大模型出题（限时 + 重试）
//! - `AttemptStore` - 答题记录存取与统计
//! - `QuizStore` - 已生成测验的保存与查询
//!
//! ### ③ 编排层（Orchestration）
//! - `QuizService` - 一次上传请求的完整流程，远程失败时必定回退本地流水线
//!
//! ### ④ 接口层（API）
//! - `api/` - axum 路由、multipart 解析、错误到状态码的映射
//!
//! ## 模块结构

pub mod api;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use api::{router, AppState};
pub use config::Config;
pub use error::{AppError, AppResult, InputError};
pub use models::{Question, Quiz, QuizMetadata};
pub use pipeline::QuizPipeline;
pub use services::{
    AttemptStore, GeneratedQuiz, QuizRequest, QuizService, QuizStore, TextExtractor,
};
