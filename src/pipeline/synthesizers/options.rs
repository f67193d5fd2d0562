//! 选项组装：干扰项去重、洗牌并记录正确答案下标

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::RngCore;

/// 每题的干扰项数量
pub const DISTRACTOR_COUNT: usize = 3;

const LAST_RESORT: &str = "None of the above";

fn option_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// 保证干扰项互不相同且不等于正确答案
///
/// 冲突项依次用 `reserve` 中未使用的条目替换；`reserve` 用尽时保留重复项。
/// 返回恰好 [`DISTRACTOR_COUNT`] 个干扰项。
pub fn ensure_distinct(correct: &str, candidates: Vec<String>, reserve: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(option_key(correct));

    let mut reserve = reserve.iter();
    let mut next_unused = |seen: &mut HashSet<String>| -> Option<String> {
        reserve
            .by_ref()
            .find(|r| !seen.contains(&option_key(r)))
            .cloned()
    };

    let mut chosen = Vec::with_capacity(DISTRACTOR_COUNT);
    for candidate in candidates.into_iter().take(DISTRACTOR_COUNT) {
        let pick = if seen.contains(&option_key(&candidate)) {
            next_unused(&mut seen).unwrap_or(candidate)
        } else {
            candidate
        };
        seen.insert(option_key(&pick));
        chosen.push(pick);
    }

    while chosen.len() < DISTRACTOR_COUNT {
        let pick = next_unused(&mut seen).unwrap_or_else(|| LAST_RESORT.to_string());
        seen.insert(option_key(&pick));
        chosen.push(pick);
    }

    chosen
}

/// 洗牌正确答案与干扰项，返回 (选项, 正确答案下标)
pub fn shuffle_options(
    correct: &str,
    distractors: Vec<String>,
    rng: &mut dyn RngCore,
) -> (Vec<String>, usize) {
    let mut tagged: Vec<(bool, String)> = Vec::with_capacity(distractors.len() + 1);
    tagged.push((true, correct.to_string()));
    tagged.extend(distractors.into_iter().map(|d| (false, d)));
    tagged.shuffle(rng);

    let correct_index = tagged.iter().position(|(is_correct, _)| *is_correct).unwrap_or(0);
    let options = tagged.into_iter().map(|(_, text)| text).collect();
    (options, correct_index)
}

/// 去重 + 洗牌
pub fn assemble_options(
    correct: &str,
    candidates: Vec<String>,
    reserve: &[String],
    rng: &mut dyn RngCore,
) -> (Vec<String>, usize) {
    let distractors = ensure_distinct(correct, candidates, reserve);
    shuffle_options(correct, distractors, rng)
}
