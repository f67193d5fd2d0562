use rand::{Rng, RngCore};
use regex::Regex;

use super::options::assemble_options;
use super::QuestionSynthesizer;
use crate::models::{
    AnalyzedContent, BloomLevel, Category, Difficulty, FactualRecord, Question, QuestionDraft,
};
use crate::pipeline::patterns::{strip_terminal_punctuation, NUMBER_TOKEN};

/// 超过此长度的数字不出题
const MAX_NUMBER_CHARS: usize = 6;

/// 数字无法解析时的固定干扰项
const FALLBACK_DISTRACTORS: [&str; 3] = ["50", "100", "25"];
const FALLBACK_RESERVE: [&str; 4] = ["10", "75", "200", "500"];

const BLANK: &str = "_____";

/// 事实题生成器：把句中第一个数字挖空
#[derive(Debug, Clone, Copy, Default)]
pub struct FactualSynthesizer;

impl FactualSynthesizer {
    fn build(&self, record: &FactualRecord, rng: &mut dyn RngCore) -> Option<Question> {
        let number = NUMBER_TOKEN.find(&record.sentence)?.as_str().to_string();
        if number.chars().count() > MAX_NUMBER_CHARS {
            return None;
        }

        let stem = context_stem(&record.sentence, &number)
            .unwrap_or_else(|| generic_stem(&record.sentence, &number));
        let candidates = numeric_distractors(&number, rng);
        let reserve = numeric_reserve(&number);
        let (options, correct_index) = assemble_options(&number, candidates, &reserve, rng);

        Question::new(QuestionDraft {
            question: stem,
            options,
            correct_index,
            explanation: format!("The text states: \"{}\"", record.sentence),
            difficulty: Difficulty::Easy,
            category: Category::Factual,
            bloom_level: BloomLevel::Remember,
            source_sentence: record.sentence.clone(),
        })
    }
}

impl QuestionSynthesizer for FactualSynthesizer {
    fn category(&self) -> Category {
        Category::Factual
    }

    fn synthesize(
        &self,
        content: &AnalyzedContent,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Question> {
        content
            .facts
            .iter()
            .take(count)
            .filter_map(|r| self.build(r, rng))
            .collect()
    }
}

/// 取数字前后各至多 3 个词组成填空题干；两侧都没有词时返回 `None`
fn context_stem(sentence: &str, number: &str) -> Option<String> {
    let pattern = format!(
        r"((?:[\w'-]+[,;]?\s+){{0,3}}){}((?:\s+[\w'-]+[,;]?){{0,3}})",
        regex::escape(number)
    );
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(sentence)?;

    let before = caps.get(1).map_or("", |m| m.as_str()).trim();
    let after = strip_terminal_punctuation(caps.get(2).map_or("", |m| m.as_str()));
    if before.is_empty() && after.is_empty() {
        return None;
    }

    let window = [before, BLANK, after]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    Some(format!("According to the text, which value completes the statement: \"{}\"?", window))
}

fn generic_stem(sentence: &str, number: &str) -> String {
    format!(
        "Which value is missing from the following statement: \"{}\"?",
        sentence.replacen(number, BLANK, 1)
    )
}

/// 生成 3 个数值干扰项
///
/// - 整数 n：`n + rand(1..=10)`、`n - rand(1..=5)`（n ≤ 5 时为 `n + 5`）、`n × 2`
/// - 小数 n：`n + 1.5`、`n - 0.5`（n ≤ 1 时为 `n + 2`）、`n × 2`，保留一位小数
/// - 无法解析：固定的 "50" / "100" / "25"
pub fn numeric_distractors(number: &str, rng: &mut dyn RngCore) -> Vec<String> {
    if number.contains('.') {
        if let Ok(n) = number.parse::<f64>() {
            let lower = if n > 1.0 { n - 0.5 } else { n + 2.0 };
            return vec![
                format!("{:.1}", n + 1.5),
                format!("{:.1}", lower),
                format!("{:.1}", n * 2.0),
            ];
        }
    } else if let Ok(n) = number.parse::<i64>() {
        let lower = if n > 5 { n - rng.gen_range(1..=5) } else { n + 5 };
        return vec![
            (n + rng.gen_range(1..=10)).to_string(),
            lower.to_string(),
            (n * 2).to_string(),
        ];
    }
    FALLBACK_DISTRACTORS.iter().map(|s| s.to_string()).collect()
}

/// 干扰项冲突时的备选值，格式与 [`numeric_distractors`] 一致
fn numeric_reserve(number: &str) -> Vec<String> {
    if number.contains('.') {
        if let Ok(n) = number.parse::<f64>() {
            return (1..=4).map(|k| format!("{:.1}", n + 2.5 * k as f64)).collect();
        }
    } else if let Ok(n) = number.parse::<i64>() {
        return (1..=4).map(|k| (n + 11 * k).to_string()).collect();
    }
    FALLBACK_RESERVE.iter().map(|s| s.to_string()).collect()
}
