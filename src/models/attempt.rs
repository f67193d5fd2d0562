use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一次答题记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String,
    /// 百分制得分
    pub score: f64,
    pub correct_answers: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub time_spent_secs: u64,
    pub completed_at: DateTime<Utc>,
}

/// 提交答题记录的请求体（ID 与时间由服务端生成）
#[derive(Debug, Clone, Deserialize)]
pub struct NewAttempt {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub quiz_id: String,
    #[serde(default)]
    pub score: Option<f64>,
    pub correct_answers: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub time_spent_secs: u64,
}

/// 用户答题统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_attempts: usize,
    pub average_score: f64,
    /// 正确率（百分比）
    pub accuracy: f64,
    pub total_correct_answers: u64,
    pub total_questions: u64,
    pub total_time_spent_secs: u64,
}

impl UserStats {
    pub fn from_attempts<'a>(attempts: impl IntoIterator<Item = &'a QuizAttempt>) -> Self {
        let mut stats = UserStats::default();
        let mut total_score = 0.0;

        for attempt in attempts {
            stats.total_attempts += 1;
            total_score += attempt.score;
            // 计数来自客户端，累加时饱和而不是溢出
            stats.total_correct_answers = stats
                .total_correct_answers
                .saturating_add(u64::from(attempt.correct_answers));
            stats.total_questions = stats
                .total_questions
                .saturating_add(u64::from(attempt.total_questions));
            stats.total_time_spent_secs = stats
                .total_time_spent_secs
                .saturating_add(attempt.time_spent_secs);
        }

        if stats.total_attempts > 0 {
            stats.average_score = round2(total_score / stats.total_attempts as f64);
        }
        if stats.total_questions > 0 {
            stats.accuracy =
                round2(stats.total_correct_answers as f64 / stats.total_questions as f64 * 100.0);
        }
        stats
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(score: f64, correct: u32, total: u32) -> QuizAttempt {
        QuizAttempt {
            id: "a".into(),
            user_id: "u1".into(),
            quiz_id: "q1".into(),
            score,
            correct_answers: correct,
            total_questions: total,
            time_spent_secs: 30,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_stats_empty() {
        let stats = UserStats::from_attempts(&Vec::<QuizAttempt>::new());
        assert_eq!(stats, UserStats::default());
    }

    #[test]
    fn test_stats_mean_and_accuracy() {
        let attempts = vec![attempt(80.0, 8, 10), attempt(70.0, 7, 10), attempt(66.666, 2, 3)];
        let stats = UserStats::from_attempts(&attempts);
        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.average_score, 72.22);
        assert_eq!(stats.total_correct_answers, 17);
        assert_eq!(stats.total_questions, 23);
        assert_eq!(stats.accuracy, 73.91);
        assert_eq!(stats.total_time_spent_secs, 90);
    }

    #[test]
    fn test_stats_time_saturates() {
        let mut long = attempt(50.0, 1, 2);
        long.time_spent_secs = u64::MAX;
        let attempts = vec![long.clone(), long];
        let stats = UserStats::from_attempts(&attempts);
        assert_eq!(stats.total_attempts, 2);
        assert_eq!(stats.total_time_spent_secs, u64::MAX);
        assert_eq!(stats.accuracy, 50.0);
    }
}
