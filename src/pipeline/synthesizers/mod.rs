//! 题目生成器
//!
//! 五个互相独立的生成器，各自读取 `AnalyzedContent` 中对应的句子桶，
//! 产出不多于请求数量的题目。素材不足时静默少出或不出。

pub mod analysis;
pub mod application;
pub mod comparison;
pub mod definition;
pub mod factual;
pub mod options;

use rand::RngCore;
use tracing::debug;

use crate::models::{AnalyzedContent, Category, Question, SubjectArea};

pub use analysis::AnalysisSynthesizer;
pub use application::ApplicationSynthesizer;
pub use comparison::ComparisonSynthesizer;
pub use definition::DefinitionSynthesizer;
pub use factual::FactualSynthesizer;

/// 题目生成器
pub trait QuestionSynthesizer {
    /// 产出题目的类别
    fn category(&self) -> Category;

    /// 最多生成 `count` 道题，不修改 `content`
    fn synthesize(
        &self,
        content: &AnalyzedContent,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Question>;
}

/// 全部生成器，顺序固定
pub fn all_synthesizers(subject_hint: Option<SubjectArea>) -> Vec<Box<dyn QuestionSynthesizer>> {
    vec![
        Box::new(DefinitionSynthesizer::new(subject_hint)),
        Box::new(FactualSynthesizer),
        Box::new(ApplicationSynthesizer),
        Box::new(AnalysisSynthesizer),
        Box::new(ComparisonSynthesizer),
    ]
}

/// 依次运行所有生成器并合并候选题
///
/// 每个生成器都以完整的 `count` 请求，截断由组装阶段完成。
pub fn synthesize_all(
    content: &AnalyzedContent,
    count: usize,
    subject_hint: Option<SubjectArea>,
    rng: &mut dyn RngCore,
) -> Vec<Question> {
    let mut candidates = Vec::new();
    for synthesizer in all_synthesizers(subject_hint) {
        let questions = synthesizer.synthesize(content, count, rng);
        debug!("{:?} 生成器产出 {} 道题", synthesizer.category(), questions.len());
        candidates.extend(questions);
    }
    candidates
}

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 从四个模板中随机选一个
pub(crate) fn pick_template<'a>(templates: &[&'a str], rng: &mut dyn RngCore) -> &'a str {
    use rand::seq::SliceRandom;
    templates.choose(rng).copied().unwrap_or("")
}
