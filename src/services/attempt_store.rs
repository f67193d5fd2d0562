//! 答题记录存储 - 业务能力层
//!
//! 进程内文档存储，只提供追加、按用户查询和统计三种能力。

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppResult, InputError};
use crate::models::{NewAttempt, QuizAttempt, UserStats};

/// 内存中的答题记录存储
#[derive(Debug, Default)]
pub struct AttemptStore {
    attempts: RwLock<Vec<QuizAttempt>>,
}

impl AttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存一次答题记录
    ///
    /// # 参数
    /// - `new_attempt`: 请求体；未给出 `score` 时按正确率计算
    ///
    /// # 返回
    /// 返回带 ID 和完成时间的记录
    pub async fn add(&self, new_attempt: NewAttempt) -> AppResult<QuizAttempt> {
        let attempt = validate(new_attempt)?;
        self.attempts.write().await.push(attempt.clone());
        info!(
            "📝 保存答题记录: 用户 {}, 得分 {:.2}, {}/{}",
            attempt.user_id, attempt.score, attempt.correct_answers, attempt.total_questions
        );
        Ok(attempt)
    }

    /// 查询用户的答题记录，最新的在前
    pub async fn list_for_user(&self, user_id: &str, limit: usize) -> Vec<QuizAttempt> {
        let attempts = self.attempts.read().await;
        let found: Vec<QuizAttempt> = attempts
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .take(limit)
            .cloned()
            .collect();
        debug!("查询用户 {} 的答题记录: {} 条", user_id, found.len());
        found
    }

    /// 用户统计
    pub async fn stats_for_user(&self, user_id: &str) -> UserStats {
        let attempts = self.attempts.read().await;
        UserStats::from_attempts(attempts.iter().filter(|a| a.user_id == user_id))
    }
}

fn validate(new_attempt: NewAttempt) -> AppResult<QuizAttempt> {
    let user_id = new_attempt.user_id.trim().to_string();
    if user_id.is_empty() {
        return Err(InputError::MissingField {
            field: "user_id".to_string(),
        }
        .into());
    }
    if new_attempt.total_questions == 0 {
        return Err(InputError::InvalidField {
            field: "total_questions".to_string(),
            reason: "must be greater than 0".to_string(),
        }
        .into());
    }
    if new_attempt.correct_answers > new_attempt.total_questions {
        return Err(InputError::InvalidField {
            field: "correct_answers".to_string(),
            reason: "cannot exceed total_questions".to_string(),
        }
        .into());
    }

    let score = match new_attempt.score {
        Some(score) if !(0.0..=100.0).contains(&score) => {
            return Err(InputError::InvalidField {
                field: "score".to_string(),
                reason: "must be between 0 and 100".to_string(),
            }
            .into());
        }
        Some(score) => score,
        None => {
            let ratio = f64::from(new_attempt.correct_answers) / f64::from(new_attempt.total_questions);
            (ratio * 10000.0).round() / 100.0
        }
    };

    Ok(QuizAttempt {
        id: Uuid::new_v4().to_string(),
        user_id,
        quiz_id: new_attempt.quiz_id,
        score,
        correct_answers: new_attempt.correct_answers,
        total_questions: new_attempt.total_questions,
        time_spent_secs: new_attempt.time_spent_secs,
        completed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn new_attempt(user: &str, correct: u32, total: u32) -> NewAttempt {
        NewAttempt {
            user_id: user.to_string(),
            quiz_id: "quiz-1".to_string(),
            score: None,
            correct_answers: correct,
            total_questions: total,
            time_spent_secs: 60,
        }
    }

    #[tokio::test]
    async fn test_add_computes_score() {
        let store = AttemptStore::new();
        let saved = store.add(new_attempt("alice", 2, 3)).await.unwrap();
        assert_eq!(saved.score, 66.67);
        assert!(!saved.id.is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_limit() {
        let store = AttemptStore::new();
        for correct in 1..=3 {
            store.add(new_attempt("alice", correct, 5)).await.unwrap();
        }
        store.add(new_attempt("bob", 5, 5)).await.unwrap();

        let listed = store.list_for_user("alice", 2).await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].correct_answers, 3);
        assert_eq!(listed[1].correct_answers, 2);
        assert!(store.list_for_user("carol", 20).await.is_empty());
    }

    #[tokio::test]
    async fn test_stats_only_count_user() {
        let store = AttemptStore::new();
        store.add(new_attempt("alice", 8, 10)).await.unwrap();
        store.add(new_attempt("alice", 6, 10)).await.unwrap();
        store.add(new_attempt("bob", 0, 10)).await.unwrap();

        let stats = store.stats_for_user("alice").await;
        assert_eq!(stats.total_attempts, 2);
        assert_eq!(stats.average_score, 70.0);
        assert_eq!(stats.accuracy, 70.0);
        assert_eq!(stats.total_time_spent_secs, 120);

        assert_eq!(store.stats_for_user("nobody").await, UserStats::default());
    }

    #[tokio::test]
    async fn test_validation() {
        let store = AttemptStore::new();
        let err = store.add(new_attempt("  ", 1, 2)).await.unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::MissingField { .. })));

        let err = store.add(new_attempt("alice", 0, 0)).await.unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::InvalidField { .. })));

        let err = store.add(new_attempt("alice", 4, 3)).await.unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::InvalidField { .. })));

        let mut bad_score = new_attempt("alice", 1, 2);
        bad_score.score = Some(150.0);
        assert!(store.add(bad_score).await.is_err());
    }

    #[tokio::test]
    async fn test_stats_with_huge_time_spent() {
        let store = AttemptStore::new();
        for _ in 0..2 {
            let mut attempt = new_attempt("alice", 3, 4);
            attempt.time_spent_secs = u64::MAX;
            store.add(attempt).await.unwrap();
        }

        let stats = store.stats_for_user("alice").await;
        assert_eq!(stats.total_attempts, 2);
        assert_eq!(stats.total_time_spent_secs, u64::MAX);
    }
}
