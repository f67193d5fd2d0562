use rand::RngCore;

use super::options::assemble_options;
use super::{pick_template, QuestionSynthesizer};
use crate::models::{
    AnalyzedContent, BloomLevel, CauseEffectRecord, Category, Difficulty, Question, QuestionDraft,
};
use crate::utils::truncate_text;

/// 题干与选项中因、果片段的最大字符数
const MAX_CLAUSE_CHARS: usize = 80;

const STEM_TEMPLATES: [&str; 4] = [
    "What is the relationship between {cause} and {effect}?",
    "Based on the text, how does {cause} affect {effect}?",
    "Which statement best describes the connection between {cause} and {effect}?",
    "According to the text, what role does {cause} play in {effect}?",
];

const DISTRACTORS: [&str; 3] = [
    "There is no relationship between {cause} and {effect}",
    "{effect} occurs independently of {cause}",
    "{cause} and {effect} are unrelated coincidences",
];

const RESERVE: [&str; 2] = [
    "{effect} prevents {cause} from happening",
    "The text does not connect {cause} with {effect}",
];

/// 分析题生成器：基于因果句
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisSynthesizer;

impl AnalysisSynthesizer {
    fn build(&self, record: &CauseEffectRecord, rng: &mut dyn RngCore) -> Option<Question> {
        let cause = truncate_text(&record.cause, MAX_CLAUSE_CHARS);
        let effect = truncate_text(&record.effect, MAX_CLAUSE_CHARS);
        let fill = |t: &str| t.replace("{cause}", &cause).replace("{effect}", &effect);

        let correct = format!("{} directly causes or leads to {}", cause, effect);
        let candidates = DISTRACTORS.iter().map(|t| fill(t)).collect();
        let reserve: Vec<String> = RESERVE.iter().map(|t| fill(t)).collect();
        let (options, correct_index) = assemble_options(&correct, candidates, &reserve, rng);

        Question::new(QuestionDraft {
            question: fill(pick_template(&STEM_TEMPLATES, rng)),
            options,
            correct_index,
            explanation: format!(
                "The text establishes a causal link: \"{}\"",
                record.sentence
            ),
            difficulty: Difficulty::Hard,
            category: Category::Analysis,
            bloom_level: BloomLevel::Analyze,
            source_sentence: record.sentence.clone(),
        })
    }
}

impl QuestionSynthesizer for AnalysisSynthesizer {
    fn category(&self) -> Category {
        Category::Analysis
    }

    fn synthesize(
        &self,
        content: &AnalyzedContent,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Question> {
        content
            .cause_effects
            .iter()
            .take(count)
            .filter_map(|r| self.build(r, rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(cause: &str, effect: &str) -> CauseEffectRecord {
        CauseEffectRecord {
            cause: cause.to_string(),
            effect: effect.to_string(),
            sentence: format!("{} causes {}.", cause, effect),
        }
    }

    #[test]
    fn test_causal_question() {
        let mut rng = StdRng::seed_from_u64(8);
        let q = AnalysisSynthesizer
            .build(&record("Heavy rainfall", "flooding in low areas"), &mut rng)
            .unwrap();

        assert!(q.is_well_formed());
        assert_eq!(
            q.correct_answer,
            "Heavy rainfall directly causes or leads to flooding in low areas"
        );
        assert_eq!(q.difficulty, Difficulty::Hard);
        assert_eq!(q.bloom_level, BloomLevel::Analyze);
        assert!(q.question.contains("Heavy rainfall"));
        assert!(q.options.contains(&"There is no relationship between Heavy rainfall and flooding in low areas".to_string()));
    }

    #[test]
    fn test_long_clauses_truncated() {
        let mut rng = StdRng::seed_from_u64(8);
        let long_cause = "x".repeat(200);
        let q = AnalysisSynthesizer
            .build(&record(&long_cause, "failure"), &mut rng)
            .unwrap();
        assert!(!q.correct_answer.contains(&long_cause));
        assert!(q.correct_answer.contains("..."));
    }

    #[test]
    fn test_synthesize_respects_count() {
        let mut content = AnalyzedContent::empty();
        content.cause_effects = vec![
            record("Heat", "expansion of metals"),
            record("Friction", "wear on moving parts"),
            record("Deforestation", "soil erosion"),
        ];
        let mut rng = StdRng::seed_from_u64(1);
        let questions = AnalysisSynthesizer.synthesize(&content, 2, &mut rng);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].source_sentence, content.cause_effects[0].sentence);
    }
}
