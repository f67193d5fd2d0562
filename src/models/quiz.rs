use super::question::{BloomLevel, Category, Difficulty, Question};
use super::subject::SubjectArea;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// 题目来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    /// 本地启发式流水线
    Heuristic,
    /// 远程大模型
    Remote,
    /// 远程题目不足，由本地流水线补齐
    Mixed,
}

impl fmt::Display for GenerationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationSource::Heuristic => f.write_str("heuristic"),
            GenerationSource::Remote => f.write_str("remote"),
            GenerationSource::Mixed => f.write_str("mixed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyCounts {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyCounts {
    pub fn from_questions(questions: &[Question]) -> Self {
        let mut counts = Self::default();
        for q in questions {
            match q.difficulty {
                Difficulty::Easy => counts.easy += 1,
                Difficulty::Medium => counts.medium += 1,
                Difficulty::Hard => counts.hard += 1,
            }
        }
        counts
    }
}

/// 测验元数据
///
/// 所有分布字段总是包含全部键，没有题目的键计 0。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizMetadata {
    pub total_questions: usize,
    pub difficulty_distribution: DifficultyCounts,
    pub question_categories: BTreeMap<Category, usize>,
    pub bloom_taxonomy: BTreeMap<BloomLevel, usize>,
    pub subject_area: SubjectArea,
    pub complexity_score: f64,
    /// 出现频率最高的关键词（最多 10 个）
    pub key_topics: Vec<String>,
    /// 请求中的难度提示，未提供时为 null
    pub requested_difficulty: Option<Difficulty>,
    /// 请求中的学科提示，未提供时为 null
    pub requested_subject: Option<SubjectArea>,
    pub generated_at: DateTime<Utc>,
}

impl QuizMetadata {
    pub fn from_questions(
        questions: &[Question],
        subject_area: SubjectArea,
        complexity_score: f64,
        key_topics: Vec<String>,
    ) -> Self {
        let mut question_categories: BTreeMap<Category, usize> =
            Category::ALL.iter().map(|c| (*c, 0)).collect();
        let mut bloom_taxonomy: BTreeMap<BloomLevel, usize> =
            BloomLevel::ALL.iter().map(|b| (*b, 0)).collect();

        for q in questions {
            *question_categories.entry(q.category).or_insert(0) += 1;
            *bloom_taxonomy.entry(q.bloom_level).or_insert(0) += 1;
        }

        Self {
            total_questions: questions.len(),
            difficulty_distribution: DifficultyCounts::from_questions(questions),
            question_categories,
            bloom_taxonomy,
            subject_area,
            complexity_score,
            key_topics,
            requested_difficulty: None,
            requested_subject: None,
            generated_at: Utc::now(),
        }
    }

    /// 记录请求提示
    pub fn with_hints(mut self, difficulty: Option<Difficulty>, subject: Option<SubjectArea>) -> Self {
        self.requested_difficulty = difficulty;
        self.requested_subject = subject;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub questions: Vec<Question>,
    pub metadata: QuizMetadata,
}

impl Quiz {
    /// 创建测验并分配新的 ID
    pub fn new(questions: Vec<Question>, metadata: QuizMetadata) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            questions,
            metadata,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
