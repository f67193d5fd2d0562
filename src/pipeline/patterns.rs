//! 句式模式表
//!
//! 定义句和因果句各有一张有序的 (正则, 抽取方式) 表，按顺序逐条尝试，
//! 由调用方决定是否接受抽取结果。其余分类使用固定关键词表。

use lazy_static::lazy_static;
use phf::phf_set;
use regex::{Captures, Regex};

/// 两个捕获组在结果中的顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOrder {
    /// 第 1 组在前：(term, definition) / (cause, effect)
    Forward,
    /// 第 2 组在前，例如 "Y because X" 中 X 才是原因
    Reversed,
}

/// 一条有名字的表层句式
#[derive(Debug)]
pub struct SurfacePattern {
    pub name: &'static str,
    regex: Regex,
    order: CaptureOrder,
}

impl SurfacePattern {
    fn new(name: &'static str, pattern: &str, order: CaptureOrder) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("static surface pattern must compile"),
            order,
        }
    }

    /// 尝试在句子上抽取两个字段，结果已去掉首尾空白
    pub fn extract(&self, sentence: &str) -> Option<(String, String)> {
        let caps = self.regex.captures(sentence)?;
        let (first, second) = (group(&caps, 1)?, group(&caps, 2)?);
        match self.order {
            CaptureOrder::Forward => Some((first, second)),
            CaptureOrder::Reversed => Some((second, first)),
        }
    }
}

fn group(caps: &Captures<'_>, index: usize) -> Option<String> {
    let text = caps.get(index)?.as_str().trim().trim_matches(',').trim();
    (!text.is_empty()).then(|| text.to_string())
}

lazy_static! {
    /// 定义句式，顺序即优先级
    pub static ref DEFINITION_PATTERNS: Vec<SurfacePattern> = vec![
        SurfacePattern::new("is", r"(?i)^(.+?)\s+is\s+(.+)$", CaptureOrder::Forward),
        SurfacePattern::new("are", r"(?i)^(.+?)\s+are\s+(.+)$", CaptureOrder::Forward),
        SurfacePattern::new("means", r"(?i)^(.+?)\s+means\s+(.+)$", CaptureOrder::Forward),
        SurfacePattern::new("refers to", r"(?i)^(.+?)\s+refers?\s+to\s+(.+)$", CaptureOrder::Forward),
        SurfacePattern::new(
            "can be defined as",
            r"(?i)^(.+?)\s+can\s+be\s+defined\s+as\s+(.+)$",
            CaptureOrder::Forward,
        ),
        SurfacePattern::new("is known as", r"(?i)^(.+?)\s+is\s+known\s+as\s+(.+)$", CaptureOrder::Forward),
        SurfacePattern::new("represents", r"(?i)^(.+?)\s+represents?\s+(.+)$", CaptureOrder::Forward),
        SurfacePattern::new("involves", r"(?i)^(.+?)\s+involves?\s+(.+)$", CaptureOrder::Forward),
    ];

    /// 因果句式，顺序即优先级；抽取结果为 (cause, effect)
    pub static ref CAUSE_EFFECT_PATTERNS: Vec<SurfacePattern> = vec![
        SurfacePattern::new("causes", r"(?i)^(.+?)\s+causes?\s+(.+)$", CaptureOrder::Forward),
        SurfacePattern::new("results in", r"(?i)^(.+?)\s+results?\s+in\s+(.+)$", CaptureOrder::Forward),
        SurfacePattern::new("leads to", r"(?i)^(.+?)\s+leads?\s+to\s+(.+)$", CaptureOrder::Forward),
        SurfacePattern::new("because of", r"(?i)^because\s+of\s+(.+?),\s*(.+)$", CaptureOrder::Forward),
        SurfacePattern::new("due to", r"(?i)^due\s+to\s+(.+?),\s*(.+)$", CaptureOrder::Forward),
        SurfacePattern::new("as a result of", r"(?i)^as\s+a\s+result\s+of\s+(.+?),\s*(.+)$", CaptureOrder::Forward),
        SurfacePattern::new("is caused by", r"(?i)^(.+?)\s+(?:is|are|was|were)\s+caused\s+by\s+(.+)$", CaptureOrder::Reversed),
        SurfacePattern::new("because", r"(?i)^(.+?)\s+because\s+(.+)$", CaptureOrder::Reversed),
    ];

    /// 比较标记
    pub static ref COMPARISON_MARKERS: Regex = Regex::new(
        r"(?i)\b(unlike|whereas|compared to|compared with|in contrast|versus|vs|similar to|different from|on the other hand|more than|less than|rather than|similarly)\b"
    ).expect("static regex must compile");

    /// 过程关键词，每次出现计 1 分
    pub static ref PROCESS_KEYWORDS: Regex = Regex::new(
        r"(?i)\b(first|second|third|then|next|finally|step|steps|process|procedure|stage|phase|after|before|followed by|subsequently|begins|ends)\b"
    ).expect("static regex must compile");

    /// 事实句信号：数字、四位年份、日期、百分比、事实指示词
    pub static ref FACT_SIGNALS: Vec<Regex> = vec![
        Regex::new(r"\d").expect("static regex must compile"),
        Regex::new(r"\b(1[0-9]{3}|20[0-9]{2})\b").expect("static regex must compile"),
        Regex::new(r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}\b")
            .expect("static regex must compile"),
        Regex::new(r"\d+(?:\.\d+)?\s*%").expect("static regex must compile"),
        Regex::new(r"(?i)\b(approximately|exactly|about|around|nearly|roughly|estimated|measured|recorded|total|percent|average)\b")
            .expect("static regex must compile"),
    ];

    /// 连续的首字母大写词
    pub static ref CAPITALIZED_SEQUENCE: Regex =
        Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").expect("static regex must compile");

    /// 数字后紧跟单位
    pub static ref QUANTITY: Regex = Regex::new(
        r"(?i)\b\d+(?:\.\d+)?(?:\s*%|\s*(?:percent|degrees|meters|metres|kilometers|km|kilograms|kg|grams|liters|litres|miles|years|hours|minutes|seconds|celsius|fahrenheit)\b)"
    ).expect("static regex must compile");

    /// 第一个数字记号
    pub static ref NUMBER_TOKEN: Regex =
        Regex::new(r"\d+(?:[.,]\d+)*").expect("static regex must compile");
}

/// 停用词（另外长度 ≤ 3 的词一律剔除）
pub static STOP_WORDS: phf::Set<&'static str> = phf_set! {
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "his", "how", "its", "who", "did", "yes", "she", "him", "may",
    "about", "above", "after", "again", "against", "also", "because", "been", "before", "being",
    "below", "between", "both", "could", "does", "doing", "down", "during", "each", "from",
    "further", "have", "having", "here", "hers", "herself", "himself", "into", "itself", "just",
    "more", "most", "myself", "only", "other", "ours", "over", "same", "should", "some", "such",
    "than", "that", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "this", "those", "through", "under", "until", "very", "were", "what", "when", "where",
    "which", "while", "whom", "will", "with", "would", "your", "yours", "yourself", "within",
    "without", "upon", "onto", "many", "much", "often", "used", "using", "like", "well",
};

/// 不作为实体开头的句首功能词
pub static ENTITY_EXCLUSIONS: phf::Set<&'static str> = phf_set! {
    "The", "This", "That", "These", "Those", "When", "Where", "What", "How", "Why",
};

/// 出现即视为较难的技术性词汇
pub static TECHNICAL_WORDS: phf::Set<&'static str> = phf_set! {
    "process", "mechanism", "function", "structure", "system", "theory", "principle",
    "analysis", "synthesis", "hypothesis", "algorithm", "molecule", "molecular", "equation",
    "coefficient", "derivative", "integral", "enzyme", "protein", "quantum", "thermodynamic",
    "metabolism", "photosynthesis", "infrastructure", "methodology", "paradigm",
};

/// 去掉开头的冠词
pub fn strip_leading_article(term: &str) -> &str {
    let trimmed = term.trim();
    for article in ["the ", "a ", "an "] {
        if trimmed.len() <= article.len() {
            continue;
        }
        if let (Some(head), Some(rest)) = (trimmed.get(..article.len()), trimmed.get(article.len()..)) {
            if head.eq_ignore_ascii_case(article) {
                return rest.trim_start();
            }
        }
    }
    trimmed
}

/// 去掉句末标点
pub fn strip_terminal_punctuation(sentence: &str) -> &str {
    sentence
        .trim()
        .trim_end_matches(['.', '!', '?', ';', ':'])
        .trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_pattern_order() {
        let names: Vec<_> = DEFINITION_PATTERNS.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["is", "are", "means", "refers to", "can be defined as", "is known as", "represents", "involves"]
        );
        assert_eq!(CAUSE_EFFECT_PATTERNS.len(), 8);
    }

    #[test]
    fn test_reversed_capture_order() {
        let because = CAUSE_EFFECT_PATTERNS.iter().find(|p| p.name == "because").unwrap();
        let (cause, effect) = because
            .extract("The river flooded because heavy rain fell for days")
            .unwrap();
        assert_eq!(cause, "heavy rain fell for days");
        assert_eq!(effect, "The river flooded");
    }

    #[test]
    fn test_because_of_leading_clause() {
        let (cause, effect) = CAUSE_EFFECT_PATTERNS
            .iter()
            .find_map(|p| p.extract("Because of the drought, crops failed across the region"))
            .unwrap();
        assert_eq!(cause, "the drought");
        assert_eq!(effect, "crops failed across the region");
    }

    #[test]
    fn test_strip_leading_article() {
        assert_eq!(strip_leading_article("The mitochondria"), "mitochondria");
        assert_eq!(strip_leading_article("an enzyme"), "enzyme");
        assert_eq!(strip_leading_article("Atoms"), "Atoms");
        assert_eq!(strip_leading_article("Theory"), "Theory");
    }

    #[test]
    fn test_strip_terminal_punctuation() {
        assert_eq!(strip_terminal_punctuation("It works."), "It works");
        assert_eq!(strip_terminal_punctuation("Really?! "), "Really");
    }

    #[test]
    fn test_quantity_matches_units() {
        let found: Vec<_> = QUANTITY
            .find_iter("About 37 percent of 12 cells, 4.5 kg and 20% here")
            .map(|m| m.as_str().to_string())
            .collect();
        assert_eq!(found, vec!["37 percent", "4.5 kg", "20%"]);
    }
}
