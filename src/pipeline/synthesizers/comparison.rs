use rand::RngCore;

use super::options::assemble_options;
use super::QuestionSynthesizer;
use crate::models::{
    AnalyzedContent, BloomLevel, Category, ComparisonRecord, Difficulty, Question, QuestionDraft,
};
use crate::utils::truncate_text;

/// 题干中引用原句的最大字符数
const MAX_QUOTED_CHARS: usize = 200;

const DISTRACTORS: [&str; 3] = [
    "The text does not make any meaningful comparison",
    "Both items are described as exactly identical in every respect",
    "The comparison is irrelevant to the main topic of the text",
];

const RESERVE: [&str; 2] = [
    "The text compares items only by their names",
    "No differences or similarities are mentioned",
];

/// 比较题生成器：基于含比较标记的句子
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonSynthesizer;

impl ComparisonSynthesizer {
    fn build(&self, record: &ComparisonRecord, rng: &mut dyn RngCore) -> Option<Question> {
        let stem = format!(
            "The text uses the comparison \"{}\" in the statement: \"{}\". What does this comparison show?",
            record.marker,
            truncate_text(&record.sentence, MAX_QUOTED_CHARS)
        );
        let correct = format!(
            "It highlights a relationship between the items using \"{}\"",
            record.marker
        );
        let candidates = DISTRACTORS.iter().map(|t| t.to_string()).collect();
        let reserve: Vec<String> = RESERVE.iter().map(|t| t.to_string()).collect();
        let (options, correct_index) = assemble_options(&correct, candidates, &reserve, rng);

        Question::new(QuestionDraft {
            question: stem,
            options,
            correct_index,
            explanation: format!(
                "The word \"{}\" signals a comparison in: \"{}\"",
                record.marker, record.sentence
            ),
            difficulty: Difficulty::Medium,
            category: Category::Comparison,
            bloom_level: BloomLevel::Understand,
            source_sentence: record.sentence.clone(),
        })
    }
}

impl QuestionSynthesizer for ComparisonSynthesizer {
    fn category(&self) -> Category {
        Category::Comparison
    }

    fn synthesize(
        &self,
        content: &AnalyzedContent,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Question> {
        content
            .comparisons
            .iter()
            .take(count)
            .filter_map(|r| self.build(r, rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analyzer::analyze;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_comparison_question_references_marker() {
        let content = analyze(
            "Unlike cats, dogs are pack animals that enjoy company. \
             Whereas rivers flow continuously, lakes hold still water for long periods.",
        );
        assert_eq!(content.comparisons.len(), 2);

        let mut rng = StdRng::seed_from_u64(6);
        let questions = ComparisonSynthesizer.synthesize(&content, 5, &mut rng);
        assert_eq!(questions.len(), 2);

        let q = &questions[0];
        assert!(q.is_well_formed());
        assert!(q.question.contains("\"unlike\""));
        assert!(q.correct_answer.contains("unlike"));
        assert_eq!(q.difficulty, Difficulty::Medium);
        assert_eq!(q.bloom_level, BloomLevel::Understand);
        assert!(q
            .options
            .contains(&"The text does not make any meaningful comparison".to_string()));
    }

    #[test]
    fn test_no_comparisons_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(6);
        let questions = ComparisonSynthesizer.synthesize(&AnalyzedContent::empty(), 5, &mut rng);
        assert!(questions.is_empty());
    }
}
