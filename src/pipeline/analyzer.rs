//! 内容分析
//!
//! 把清洗后的文本切分成句子和词，统计关键词、抽取实体，并把句子归入
//! 定义 / 比较 / 因果 / 过程 / 事实五个桶，最后检测学科并计算复杂度。

use std::collections::{HashMap, HashSet};

use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use super::patterns::{
    strip_leading_article, strip_terminal_punctuation, CAPITALIZED_SEQUENCE,
    CAUSE_EFFECT_PATTERNS, COMPARISON_MARKERS, DEFINITION_PATTERNS, ENTITY_EXCLUSIONS,
    FACT_SIGNALS, PROCESS_KEYWORDS, QUANTITY, STOP_WORDS,
};
use crate::models::{
    AnalyzedContent, CauseEffectRecord, ComparisonRecord, DefinitionRecord, Entity, EntityKind,
    FactualRecord, ProcessRecord, SubjectArea,
};

pub const MAX_KEY_TERMS: usize = 30;
pub const MAX_ENTITIES: usize = 20;
pub const MAX_DEFINITIONS: usize = 15;
pub const MAX_COMPARISONS: usize = 10;
pub const MAX_CAUSE_EFFECTS: usize = 10;
pub const MAX_PROCESSES: usize = 10;
pub const MAX_FACTS: usize = 15;

/// 复杂度上限
pub const MAX_COMPLEXITY: f64 = 10.0;

const MAX_TERM_WORDS: usize = 6;
const MIN_DEFINITION_WORDS: usize = 3;
const MIN_COMPARISON_WORDS: usize = 9;
const MIN_PROCESS_WORDS: usize = 7;
const MIN_FACT_WORDS: usize = 6;

/// 分析文本
///
/// 短文本不会被拒绝，长度下限由调用方检查。
pub fn analyze(text: &str) -> AnalyzedContent {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        debug!("文本为空，返回空分析结果");
        return AnalyzedContent::empty();
    }

    let key_terms = extract_key_terms(text);
    let complexity_score = complexity_score(&sentences, key_terms.len());

    let content = AnalyzedContent {
        entities: extract_entities(text),
        definitions: detect_definitions(&sentences),
        comparisons: detect_comparisons(&sentences),
        cause_effects: detect_cause_effects(&sentences),
        processes: detect_processes(&sentences),
        facts: detect_facts(&sentences),
        subject_area: detect_subject(text),
        complexity_score,
        key_terms,
        sentences,
    };

    debug!(
        "内容分析: {} 句, {} 关键词, {} 实体, 定义 {} / 比较 {} / 因果 {} / 过程 {} / 事实 {}, 学科 {}, 复杂度 {:.2}",
        content.sentences.len(),
        content.key_terms.len(),
        content.entities.len(),
        content.definitions.len(),
        content.comparisons.len(),
        content.cause_effects.len(),
        content.processes.len(),
        content.facts.len(),
        content.subject_area,
        content.complexity_score
    );

    content
}

pub fn split_sentences(text: &str) -> Vec<String> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 按词频降序取关键词，频次相同按首次出现顺序
pub fn extract_key_terms(text: &str) -> Vec<String> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for word in text.unicode_words() {
        let word = word.to_lowercase();
        if word.chars().count() <= 3
            || !word.chars().all(char::is_alphabetic)
            || STOP_WORDS.contains(word.as_str())
        {
            continue;
        }
        match index.get(&word) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(word.clone(), order.len());
                order.push((word, 1));
            }
        }
    }

    // 稳定排序保留首次出现顺序
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(MAX_KEY_TERMS)
        .map(|(word, _)| word)
        .collect()
}

pub fn extract_entities(text: &str) -> Vec<Entity> {
    let mut seen = HashSet::new();
    let mut entities = Vec::new();

    for m in CAPITALIZED_SEQUENCE.find_iter(text) {
        let words: Vec<&str> = m
            .as_str()
            .split_whitespace()
            .skip_while(|w| ENTITY_EXCLUSIONS.contains(*w))
            .collect();
        if words.is_empty() {
            continue;
        }
        let entity = Entity {
            text: words.join(" "),
            kind: EntityKind::Entity,
        };
        if seen.insert(entity.clone()) {
            entities.push(entity);
        }
    }

    for m in QUANTITY.find_iter(text) {
        let entity = Entity {
            text: m.as_str().to_string(),
            kind: EntityKind::Quantity,
        };
        if seen.insert(entity.clone()) {
            entities.push(entity);
        }
    }

    entities.truncate(MAX_ENTITIES);
    entities
}

/// 每句最多产出一条定义：按模式顺序尝试，第一条满足长度约束的胜出
pub fn detect_definitions(sentences: &[String]) -> Vec<DefinitionRecord> {
    let mut records = Vec::new();

    for sentence in sentences {
        if records.len() >= MAX_DEFINITIONS {
            break;
        }
        let body = strip_terminal_punctuation(sentence);

        let found = DEFINITION_PATTERNS.iter().find_map(|pattern| {
            let (term, definition) = pattern.extract(body)?;
            let term = strip_leading_article(&term).to_string();
            let acceptable = !term.is_empty()
                && word_count(&term) <= MAX_TERM_WORDS
                && word_count(&definition) >= MIN_DEFINITION_WORDS;
            acceptable.then_some((term, definition))
        });

        if let Some((term, definition)) = found {
            records.push(DefinitionRecord {
                term,
                definition,
                sentence: sentence.clone(),
            });
        }
    }

    records
}

pub fn detect_comparisons(sentences: &[String]) -> Vec<ComparisonRecord> {
    sentences
        .iter()
        .filter(|s| word_count(s) >= MIN_COMPARISON_WORDS)
        .filter_map(|s| {
            let marker = COMPARISON_MARKERS.find(s)?;
            Some(ComparisonRecord {
                sentence: s.clone(),
                marker: marker.as_str().to_lowercase(),
            })
        })
        .take(MAX_COMPARISONS)
        .collect()
}

pub fn detect_cause_effects(sentences: &[String]) -> Vec<CauseEffectRecord> {
    sentences
        .iter()
        .filter_map(|s| {
            let body = strip_terminal_punctuation(s);
            let (cause, effect) = CAUSE_EFFECT_PATTERNS.iter().find_map(|p| p.extract(body))?;
            Some(CauseEffectRecord {
                cause,
                effect,
                sentence: s.clone(),
            })
        })
        .take(MAX_CAUSE_EFFECTS)
        .collect()
}

/// 按关键词得分降序，得分相同保持原文顺序
pub fn detect_processes(sentences: &[String]) -> Vec<ProcessRecord> {
    let mut records: Vec<ProcessRecord> = sentences
        .iter()
        .filter(|s| word_count(s) >= MIN_PROCESS_WORDS)
        .filter_map(|s| {
            let score = PROCESS_KEYWORDS.find_iter(s).count();
            (score >= 1).then(|| ProcessRecord {
                sentence: s.clone(),
                score,
            })
        })
        .collect();

    records.sort_by(|a, b| b.score.cmp(&a.score));
    records.truncate(MAX_PROCESSES);
    records
}

pub fn detect_facts(sentences: &[String]) -> Vec<FactualRecord> {
    sentences
        .iter()
        .filter(|s| word_count(s) >= MIN_FACT_WORDS)
        .filter(|s| FACT_SIGNALS.iter().any(|re| re.is_match(s)))
        .take(MAX_FACTS)
        .map(|s| FactualRecord { sentence: s.clone() })
        .collect()
}

/// 关键词计数最高的学科；全为 0 时为 General，并列时枚举顺序靠前者胜出
pub fn detect_subject(text: &str) -> SubjectArea {
    let lowered = text.to_lowercase();
    let mut best = (SubjectArea::General, 0usize);

    for subject in SubjectArea::DETECTABLE {
        let count: usize = subject
            .keywords()
            .iter()
            .map(|kw| lowered.matches(kw).count())
            .sum();
        if count > best.1 {
            best = (subject, count);
        }
    }

    best.0
}

/// `0.1 × 平均句长 + 0.5 × 关键词数 / 句数`，上限 10
pub fn complexity_score(sentences: &[String], key_term_count: usize) -> f64 {
    if sentences.is_empty() {
        return 0.0;
    }
    let n = sentences.len() as f64;
    let total_words: usize = sentences.iter().map(|s| word_count(s)).sum();
    let score = 0.1 * (total_words as f64 / n) + 0.5 * (key_term_count as f64 / n);
    score.min(MAX_COMPLEXITY)
}
