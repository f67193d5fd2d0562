//! 内容分析结果
//!
//! `AnalyzedContent` 每份文档只生成一次，之后对所有生成器只读。

use super::subject::SubjectArea;
use serde::Serialize;

/// 实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityKind {
    /// 连续的首字母大写词
    Entity,
    /// 数字加单位
    Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Entity {
    pub text: String,
    pub kind: EntityKind,
}

/// 定义句：`term` + `definition`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefinitionRecord {
    pub term: String,
    pub definition: String,
    pub sentence: String,
}

/// 比较句及命中的比较标记
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub sentence: String,
    pub marker: String,
}

/// 因果句
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CauseEffectRecord {
    pub cause: String,
    pub effect: String,
    pub sentence: String,
}

/// 过程句及其关键词得分
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessRecord {
    pub sentence: String,
    pub score: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactualRecord {
    pub sentence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedContent {
    pub sentences: Vec<String>,
    /// 按词频降序，最多 30 个
    pub key_terms: Vec<String>,
    pub entities: Vec<Entity>,
    pub definitions: Vec<DefinitionRecord>,
    pub comparisons: Vec<ComparisonRecord>,
    pub cause_effects: Vec<CauseEffectRecord>,
    pub processes: Vec<ProcessRecord>,
    pub facts: Vec<FactualRecord>,
    pub subject_area: SubjectArea,
    pub complexity_score: f64,
}

impl AnalyzedContent {
    /// 空文档的分析结果
    pub fn empty() -> Self {
        Self {
            sentences: Vec::new(),
            key_terms: Vec::new(),
            entities: Vec::new(),
            definitions: Vec::new(),
            comparisons: Vec::new(),
            cause_effects: Vec::new(),
            processes: Vec::new(),
            facts: Vec::new(),
            subject_area: SubjectArea::General,
            complexity_score: 0.0,
        }
    }

    /// 前 `n` 个关键词
    pub fn top_terms(&self, n: usize) -> &[String] {
        &self.key_terms[..self.key_terms.len().min(n)]
    }
}
