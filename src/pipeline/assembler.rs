//! 测验组装：合并候选题、洗牌截断、难度再平衡、生成元数据

use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::debug;

use crate::models::{AnalyzedContent, Difficulty, Question, Quiz, QuizMetadata};

/// 元数据中保留的关键词数量
const KEY_TOPIC_COUNT: usize = 10;

/// 组装测验
///
/// # 参数
/// - `candidates`: 所有生成器的候选题
/// - `count`: 请求的题目数量 N
/// - `content`: 用于元数据的分析结果
/// - `rng`: 随机源
///
/// # 返回
/// 题目数不超过 N 的测验。候选不足时原样返回全部候选，是否报错由调用方决定。
pub fn assemble(
    mut candidates: Vec<Question>,
    count: usize,
    content: &AnalyzedContent,
    rng: &mut dyn RngCore,
) -> Quiz {
    let pool = candidates.len();
    candidates.shuffle(rng);
    candidates.truncate(count);
    rebalance_difficulty(&mut candidates, count);

    debug!("组装完成: 候选 {} 道, 请求 {} 道, 入选 {} 道", pool, count, candidates.len());

    let metadata = QuizMetadata::from_questions(
        &candidates,
        content.subject_area,
        content.complexity_score,
        content.top_terms(KEY_TOPIC_COUNT).to_vec(),
    );
    Quiz::new(candidates, metadata)
}

/// 难度再平衡的目标数量 (easy, medium)
///
/// easy ≥ N/3，medium ≥ N/2（向下取整，N ≥ 1 时至少为 1）。
pub fn difficulty_targets(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    ((count / 3).max(1), (count / 2).max(1))
}

/// 尽力而为的难度再平衡，只改 `difficulty` 标签
///
/// 先按顺序把非 easy 的题改为 easy 直到达到 easy 目标，
/// 再把 hard 题改为 medium 直到达到 medium 目标。
pub fn rebalance_difficulty(questions: &mut [Question], count: usize) {
    let (easy_target, medium_target) = difficulty_targets(count);

    let mut easy = questions.iter().filter(|q| q.difficulty == Difficulty::Easy).count();
    for q in questions.iter_mut() {
        if easy >= easy_target {
            break;
        }
        if q.difficulty != Difficulty::Easy {
            q.difficulty = Difficulty::Easy;
            easy += 1;
        }
    }

    let mut medium = questions.iter().filter(|q| q.difficulty == Difficulty::Medium).count();
    for q in questions.iter_mut() {
        if medium >= medium_target {
            break;
        }
        if q.difficulty == Difficulty::Hard {
            q.difficulty = Difficulty::Medium;
            medium += 1;
        }
    }
}
