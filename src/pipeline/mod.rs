//! 本地启发式出题流水线
//!
//! 归一化 → 内容分析 → 五个生成器 → 组装，单线程同步执行。
//! 所有随机选择都来自调用方注入的 `RngCore`。

pub mod analyzer;
pub mod assembler;
pub mod normalizer;
pub mod patterns;
pub mod synthesizers;

use rand::RngCore;
use tracing::info;

use crate::models::{AnalyzedContent, Question, Quiz, SubjectArea};

pub use analyzer::analyze;
pub use assembler::{assemble, rebalance_difficulty};
pub use normalizer::normalize;
pub use synthesizers::{synthesize_all, QuestionSynthesizer};

/// 归一化并分析过的文本
#[derive(Debug, Clone)]
pub struct PreparedText {
    pub cleaned_text: String,
    pub content: AnalyzedContent,
}

impl PreparedText {
    /// 清洗后文本的字符数
    pub fn cleaned_length(&self) -> usize {
        self.cleaned_text.chars().count()
    }
}

/// 本地流水线入口
///
/// `prepare` → `candidates` → `finish`；候选数量是否达到下限由调用方判断，
/// 远程生成的题目也经由 `finish` 组装。
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizPipeline {
    subject_hint: Option<SubjectArea>,
}

impl QuizPipeline {
    pub fn new(subject_hint: Option<SubjectArea>) -> Self {
        Self { subject_hint }
    }

    /// 归一化并分析原始文本
    pub fn prepare(&self, raw_text: &str) -> PreparedText {
        let cleaned_text = normalize(raw_text);
        let content = analyze(&cleaned_text);
        PreparedText {
            cleaned_text,
            content,
        }
    }

    /// 对已分析的内容运行全部生成器
    pub fn candidates(
        &self,
        content: &AnalyzedContent,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Question> {
        synthesize_all(content, count, self.subject_hint, rng)
    }

    /// 把候选题组装成测验
    ///
    /// # 参数
    /// - `candidates`: 候选题（本地、远程或两者混合）
    /// - `count`: 请求的题目数量
    /// - `content`: 分析结果，用于元数据
    /// - `rng`: 随机源
    pub fn finish(
        &self,
        candidates: Vec<Question>,
        count: usize,
        content: &AnalyzedContent,
        rng: &mut dyn RngCore,
    ) -> Quiz {
        let candidate_count = candidates.len();
        let quiz = assemble(candidates, count, content, rng);
        info!(
            "🧩 组装测验: {} 个句子, {} 道候选题, 入选 {} 道",
            content.sentences.len(),
            candidate_count,
            quiz.len()
        );
        quiz
    }
}
