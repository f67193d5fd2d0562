//! 测验存储 - 业务能力层
//!
//! 保存每次生成的测验，支持按 ID 读取和按学科列出。

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::{GenerationSource, Quiz, SubjectArea};
use crate::services::quiz_service::GeneratedQuiz;

/// 一份已保存的测验
#[derive(Debug, Clone, Serialize)]
pub struct StoredQuiz {
    pub id: String,
    pub filename: String,
    pub subject_area: SubjectArea,
    pub question_count: usize,
    pub source: GenerationSource,
    pub pages: usize,
    pub created_at: DateTime<Utc>,
    pub quiz: Quiz,
}

/// 列表接口返回的摘要（不含题目）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSummary {
    pub id: String,
    pub filename: String,
    pub subject_area: SubjectArea,
    pub question_count: usize,
    pub source: GenerationSource,
    pub created_at: DateTime<Utc>,
}

impl From<&StoredQuiz> for QuizSummary {
    fn from(stored: &StoredQuiz) -> Self {
        Self {
            id: stored.id.clone(),
            filename: stored.filename.clone(),
            subject_area: stored.subject_area,
            question_count: stored.question_count,
            source: stored.source,
            created_at: stored.created_at,
        }
    }
}

/// 内存中的测验存储
#[derive(Debug, Default)]
pub struct QuizStore {
    quizzes: RwLock<Vec<StoredQuiz>>,
}

impl QuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存一次出题结果，ID 沿用测验自身的 ID
    pub async fn add(&self, generated: &GeneratedQuiz) -> StoredQuiz {
        let stored = StoredQuiz {
            id: generated.quiz.id.clone(),
            filename: generated.filename.clone(),
            subject_area: generated.quiz.metadata.subject_area,
            question_count: generated.quiz.len(),
            source: generated.source,
            pages: generated.pages,
            created_at: Utc::now(),
            quiz: generated.quiz.clone(),
        };
        self.quizzes.write().await.push(stored.clone());
        info!("💾 保存测验: {} ({} 道题)", stored.id, stored.question_count);
        stored
    }

    /// 按 ID 读取
    pub async fn get(&self, id: &str) -> AppResult<StoredQuiz> {
        self.quizzes
            .read()
            .await
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Quiz {}", id)))
    }

    /// 列出测验摘要，最新的在前
    ///
    /// # 参数
    /// - `limit`: 最多返回条数
    /// - `subject`: 只返回该学科的测验
    pub async fn list(&self, limit: usize, subject: Option<SubjectArea>) -> Vec<QuizSummary> {
        let quizzes = self.quizzes.read().await;
        let found: Vec<QuizSummary> = quizzes
            .iter()
            .rev()
            .filter(|q| subject.map_or(true, |s| q.subject_area == s))
            .take(limit)
            .map(QuizSummary::from)
            .collect();
        debug!("列出测验: {} 条", found.len());
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuizMetadata;

    fn generated(filename: &str, subject: SubjectArea) -> GeneratedQuiz {
        let metadata = QuizMetadata::from_questions(&[], subject, 1.0, Vec::new());
        GeneratedQuiz {
            quiz: Quiz::new(Vec::new(), metadata),
            source: GenerationSource::Heuristic,
            filename: filename.to_string(),
            pages: 2,
            text_length: 500,
            cleaned_length: 450,
            processing_time_secs: 0.1,
        }
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let store = QuizStore::new();
        let saved = store.add(&generated("cells.pdf", SubjectArea::Science)).await;

        let fetched = store.get(&saved.id).await.unwrap();
        assert_eq!(fetched.filename, "cells.pdf");
        assert_eq!(fetched.quiz.id, saved.id);
        assert_eq!(fetched.pages, 2);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = QuizStore::new();
        let err = store.get("missing-id").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Quiz missing-id not found");
    }

    #[tokio::test]
    async fn test_list_newest_first_filtered() {
        let store = QuizStore::new();
        store.add(&generated("a.pdf", SubjectArea::Science)).await;
        store.add(&generated("b.pdf", SubjectArea::History)).await;
        store.add(&generated("c.pdf", SubjectArea::Science)).await;

        let all = store.list(20, None).await;
        let names: Vec<&str> = all.iter().map(|s| s.filename.as_str()).collect();
        assert_eq!(names, vec!["c.pdf", "b.pdf", "a.pdf"]);

        let science = store.list(20, Some(SubjectArea::Science)).await;
        assert_eq!(science.len(), 2);
        assert!(science.iter().all(|s| s.subject_area == SubjectArea::Science));

        assert_eq!(store.list(1, None).await.len(), 1);
    }
}
