use rand::seq::SliceRandom;
use rand::RngCore;
use unicode_segmentation::UnicodeSegmentation;

use super::options::{assemble_options, DISTRACTOR_COUNT};
use super::{pick_template, word_count, QuestionSynthesizer};
use crate::models::{
    AnalyzedContent, BloomLevel, Category, DefinitionRecord, Difficulty, Question, QuestionDraft,
    SubjectArea,
};
use crate::pipeline::patterns::TECHNICAL_WORDS;

/// 超过此长度的定义不出题
const MAX_DEFINITION_CHARS: usize = 150;
/// 作为干扰项复用的其他定义长度上限
const MAX_REUSED_DEFINITION_CHARS: usize = 100;
/// 最多复用的其他定义数量
const MAX_REUSED_DEFINITIONS: usize = 2;

const STEM_TEMPLATES: [&str; 4] = [
    "What is {term}?",
    "Which of the following best defines {term}?",
    "How does the text describe {term}?",
    "What does the term '{term}' refer to?",
];

/// 定义题生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct DefinitionSynthesizer {
    /// 检测结果为 general 时用于挑选干扰模板的学科
    subject_hint: Option<SubjectArea>,
}

impl DefinitionSynthesizer {
    pub fn new(subject_hint: Option<SubjectArea>) -> Self {
        Self { subject_hint }
    }

    fn template_subject(&self, detected: SubjectArea) -> SubjectArea {
        match (detected, self.subject_hint) {
            (SubjectArea::General, Some(hint)) => hint,
            _ => detected,
        }
    }

    fn build(
        &self,
        record: &DefinitionRecord,
        content: &AnalyzedContent,
        rng: &mut dyn RngCore,
    ) -> Option<Question> {
        let stem = pick_template(&STEM_TEMPLATES, rng).replace("{term}", &record.term);

        let mut reused: Vec<String> = Vec::new();
        for other in &content.definitions {
            let text = &other.definition;
            if text != &record.definition
                && text.chars().count() < MAX_REUSED_DEFINITION_CHARS
                && !reused.contains(text)
            {
                reused.push(text.clone());
            }
        }
        reused.shuffle(rng);
        reused.truncate(MAX_REUSED_DEFINITIONS);

        let generic = generic_distractors(self.template_subject(content.subject_area), &record.term);
        let fill = DISTRACTOR_COUNT - reused.len();
        let mut candidates = reused;
        candidates.extend(generic.iter().take(fill).cloned());
        let reserve: Vec<String> = generic.into_iter().skip(fill).collect();

        let (options, correct_index) = assemble_options(&record.definition, candidates, &reserve, rng);

        Question::new(QuestionDraft {
            question: stem,
            options,
            correct_index,
            explanation: format!(
                "According to the text, {} is defined as: {}.",
                record.term, record.definition
            ),
            difficulty: definition_difficulty(&record.term, &record.definition),
            category: Category::Definition,
            bloom_level: BloomLevel::Remember,
            source_sentence: record.sentence.clone(),
        })
    }
}

impl QuestionSynthesizer for DefinitionSynthesizer {
    fn category(&self) -> Category {
        Category::Definition
    }

    fn synthesize(
        &self,
        content: &AnalyzedContent,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Question> {
        content
            .definitions
            .iter()
            .take(count)
            .filter(|r| r.definition.chars().count() <= MAX_DEFINITION_CHARS)
            .filter_map(|r| self.build(r, content, rng))
            .collect()
    }
}

/// 按学科的通用干扰项模板
///
/// 只有 science / history / mathematics 有专门模板，其余学科使用通用模板。
pub fn generic_distractors(subject: SubjectArea, term: &str) -> Vec<String> {
    let templates: [&str; 5] = match subject {
        SubjectArea::Science => [
            "A chemical reaction that releases energy without involving {term}",
            "The physical structure that surrounds and protects {term}",
            "A biological process that occurs independently of {term}",
            "A unit of measurement used to quantify {term}",
            "An experimental error commonly mistaken for {term}",
        ],
        SubjectArea::History => [
            "A political movement that opposed {term}",
            "An economic policy introduced long after {term}",
            "A cultural tradition that predates {term}",
            "A military strategy associated with the rivals of {term}",
            "A treaty that formally ended {term}",
        ],
        SubjectArea::Mathematics => [
            "A numerical constant that is unrelated to {term}",
            "A geometric property that cannot be derived from {term}",
            "The inverse operation of {term}",
            "A statistical estimate that only approximates {term}",
            "A special case that contradicts {term}",
        ],
        _ => [
            "A common misconception about {term}",
            "An unrelated idea that is often confused with {term}",
            "The opposite of what {term} actually describes",
            "An outdated meaning of {term} no longer in use",
            "A minor detail mentioned alongside {term}",
        ],
    };
    templates.iter().map(|t| t.replace("{term}", term)).collect()
}

/// 难度规则
///
/// - 术语 ≤2 词、定义 ≤12 词且无技术词 → easy
/// - 术语 ≤4 词、定义 ≤25 词且无技术词 → medium
/// - 其余 → hard
pub fn definition_difficulty(term: &str, definition: &str) -> Difficulty {
    let term_words = word_count(term);
    let definition_words = word_count(definition);
    let technical = term
        .unicode_words()
        .chain(definition.unicode_words())
        .any(|w| TECHNICAL_WORDS.contains(w.to_lowercase().as_str()));

    if term_words <= 2 && definition_words <= 12 && !technical {
        Difficulty::Easy
    } else if term_words <= 4 && definition_words <= 25 && !technical {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}
