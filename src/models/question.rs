use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 题目类别，即产生该题的生成器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Definition,
    Factual,
    Application,
    Analysis,
    Comparison,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Definition,
        Category::Factual,
        Category::Application,
        Category::Analysis,
        Category::Comparison,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "definition" => Some(Category::Definition),
            "factual" => Some(Category::Factual),
            "application" => Some(Category::Application),
            "analysis" => Some(Category::Analysis),
            "comparison" => Some(Category::Comparison),
            _ => None,
        }
    }
}

/// 认知层级（布鲁姆分类）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BloomLevel {
    Remember,
    Understand,
    Apply,
    Analyze,
}

impl BloomLevel {
    pub const ALL: [BloomLevel; 4] = [
        BloomLevel::Remember,
        BloomLevel::Understand,
        BloomLevel::Apply,
        BloomLevel::Analyze,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "remember" => Some(BloomLevel::Remember),
            "understand" => Some(BloomLevel::Understand),
            "apply" => Some(BloomLevel::Apply),
            "analyze" | "analyse" => Some(BloomLevel::Analyze),
            _ => None,
        }
    }
}

/// 单道选择题
///
/// 不变量：`options.len() == 4` 且 `options[correct_index] == correct_answer`。
/// 只能通过 [`Question::new`] 构造，洗牌与下标记录在同一处完成。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub correct_index: usize,
    pub explanation: String,
    pub difficulty: Difficulty,
    pub category: Category,
    pub bloom_level: BloomLevel,
    #[serde(default)]
    pub source_sentence: String,
    #[serde(rename = "type", default = "default_question_type")]
    pub question_type: String,
}

fn default_question_type() -> String {
    "multiple_choice".to_string()
}

/// 构造题目所需的字段（选项已排好顺序）
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
    pub difficulty: Difficulty,
    pub category: Category,
    pub bloom_level: BloomLevel,
    pub source_sentence: String,
}

impl Question {
    /// 由草稿创建题目，分配新的唯一 ID
    ///
    /// `correct_index` 越界时返回 `None`
    pub fn new(draft: QuestionDraft) -> Option<Self> {
        let correct_answer = draft.options.get(draft.correct_index)?.clone();
        Some(Self {
            id: Uuid::new_v4().to_string(),
            question: draft.question,
            options: draft.options,
            correct_answer,
            correct_index: draft.correct_index,
            explanation: draft.explanation,
            difficulty: draft.difficulty,
            category: draft.category,
            bloom_level: draft.bloom_level,
            source_sentence: draft.source_sentence,
            question_type: default_question_type(),
        })
    }

    /// 检查选项不变量
    pub fn is_well_formed(&self) -> bool {
        self.options.len() == 4
            && self
                .options
                .get(self.correct_index)
                .is_some_and(|o| *o == self.correct_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(correct_index: usize) -> QuestionDraft {
        QuestionDraft {
            question: "What is 2 + 2?".into(),
            options: vec!["3".into(), "4".into(), "5".into(), "22".into()],
            correct_index,
            explanation: "Basic arithmetic.".into(),
            difficulty: Difficulty::Easy,
            category: Category::Factual,
            bloom_level: BloomLevel::Remember,
            source_sentence: "Two plus two is four.".into(),
        }
    }

    #[test]
    fn test_new_records_correct_answer() {
        let q = Question::new(draft(1)).unwrap();
        assert_eq!(q.correct_answer, "4");
        assert!(q.is_well_formed());
    }

    #[test]
    fn test_new_rejects_out_of_range_index() {
        assert!(Question::new(draft(4)).is_none());
    }

    #[test]
    fn test_json_shape() {
        let q = Question::new(draft(1)).unwrap();
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["correct_index"], 1);
        assert_eq!(value["difficulty"], "easy");
        assert_eq!(value["category"], "factual");
        assert_eq!(value["bloom_level"], "remember");
        assert_eq!(value["type"], "multiple_choice");
        assert_eq!(value["options"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_unique_ids() {
        let a = Question::new(draft(0)).unwrap();
        let b = Question::new(draft(0)).unwrap();
        assert_ne!(a.id, b.id);
    }
}
