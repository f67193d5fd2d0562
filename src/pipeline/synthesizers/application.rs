use rand::RngCore;

use super::options::assemble_options;
use super::{pick_template, QuestionSynthesizer};
use crate::models::{
    AnalyzedContent, BloomLevel, Category, Difficulty, ProcessRecord, Question, QuestionDraft,
};

/// 匹配过程句时考虑的关键词数量
const TOP_TERMS: usize = 10;

const STEM_TEMPLATES: [&str; 4] = [
    "How would you apply {term} based on the information in the text?",
    "Which situation best demonstrates the use of {term} as described?",
    "According to the text, what role does {term} play in the process?",
    "If you needed to use {term} in practice, what would the text suggest?",
];

const DISTRACTORS: [&str; 3] = [
    "{term} is not relevant to the process described in the text",
    "{term} should be replaced by an unrelated method",
    "{term} only applies in theory and has no practical use",
];

const RESERVE: [&str; 2] = [
    "{term} is mentioned only as a historical footnote",
    "{term} works against the process described",
];

/// 应用题生成器：基于包含高频关键词的过程句
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationSynthesizer;

impl ApplicationSynthesizer {
    fn build(&self, record: &ProcessRecord, term: &str, rng: &mut dyn RngCore) -> Option<Question> {
        let fill = |t: &str| t.replace("{term}", term);
        let correct = format!(
            "Apply {} following the process or concept described: {}",
            term, record.sentence
        );
        let candidates = DISTRACTORS.iter().map(|t| fill(t)).collect();
        let reserve: Vec<String> = RESERVE.iter().map(|t| fill(t)).collect();
        let (options, correct_index) = assemble_options(&correct, candidates, &reserve, rng);

        Question::new(QuestionDraft {
            question: fill(pick_template(&STEM_TEMPLATES, rng)),
            options,
            correct_index,
            explanation: format!("The text describes this process: \"{}\"", record.sentence),
            difficulty: Difficulty::Medium,
            category: Category::Application,
            bloom_level: BloomLevel::Apply,
            source_sentence: record.sentence.clone(),
        })
    }
}

impl QuestionSynthesizer for ApplicationSynthesizer {
    fn category(&self) -> Category {
        Category::Application
    }

    fn synthesize(
        &self,
        content: &AnalyzedContent,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Question> {
        let terms = content.top_terms(TOP_TERMS);
        content
            .processes
            .iter()
            .take(count)
            .filter_map(|record| {
                let term = first_matching_term(&record.sentence, terms)?;
                self.build(record, term, rng)
            })
            .collect()
    }
}

/// 返回句中出现的第一个关键词（按关键词排名）
fn first_matching_term<'a>(sentence: &str, terms: &'a [String]) -> Option<&'a str> {
    let lowered = sentence.to_lowercase();
    terms
        .iter()
        .find(|term| lowered.contains(term.as_str()))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analyzer::analyze;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const PROCESS_TEXT: &str = "Photosynthesis converts sunlight into chemical energy. \
        First the plant absorbs sunlight through chlorophyll in its leaves. \
        Then the chlorophyll transfers sunlight energy to the reaction centers. \
        Finally glucose is produced and stored as energy for the plant.";

    #[test]
    fn test_application_questions() {
        let content = analyze(PROCESS_TEXT);
        assert!(!content.processes.is_empty());
        let mut rng = StdRng::seed_from_u64(4);

        let questions = ApplicationSynthesizer.synthesize(&content, 10, &mut rng);
        assert!(!questions.is_empty());
        for q in &questions {
            assert!(q.is_well_formed());
            assert_eq!(q.difficulty, Difficulty::Medium);
            assert_eq!(q.bloom_level, BloomLevel::Apply);
            assert_eq!(q.category, Category::Application);
            assert!(q.correct_answer.contains("the process or concept described"));
            assert!(content.processes.iter().any(|p| p.sentence == q.source_sentence));
        }
    }

    #[test]
    fn test_first_matching_term_follows_rank() {
        let terms = vec!["sunlight".to_string(), "plant".to_string()];
        assert_eq!(
            first_matching_term("The plant absorbs Sunlight.", &terms),
            Some("sunlight")
        );
        assert_eq!(first_matching_term("Nothing relevant here.", &terms), None);
    }

    #[test]
    fn test_count_limits_output() {
        let content = analyze(PROCESS_TEXT);
        let mut rng = StdRng::seed_from_u64(4);
        assert!(ApplicationSynthesizer.synthesize(&content, 1, &mut rng).len() <= 1);
        assert!(ApplicationSynthesizer.synthesize(&content, 0, &mut rng).is_empty());
    }
}
