//! 组卷模块：按筛选条件抽取条目，为每个条目生成带干扰项的选择题

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::constants::{MIN_POOL_SIZE, OPTIONS_PER_QUESTION};

use super::item::{AnswerMatch, Direction, StudyItem};
use super::repository::TrackedItem;
use super::types::ItemFilter;
use super::SrsError;

/// 单道选择题（不持久化）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub target_item_id: String,
    pub direction: Direction,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub answer_match: AnswerMatch,
}

impl Question {
    pub fn is_correct(&self, submitted: &str) -> bool {
        self.answer_match.accepts(submitted, &self.correct_answer)
    }
}

fn option_key(text: &str, answer_match: AnswerMatch) -> String {
    match answer_match {
        AnswerMatch::Exact => text.to_string(),
        AnswerMatch::Normalized => text.trim().to_lowercase(),
    }
}

/// 按筛选条件过滤，按 ID 去重并保持原有顺序
pub fn eligible<'a, T: StudyItem>(
    pool: &[&'a TrackedItem<T>],
    filter: &ItemFilter,
) -> Vec<&'a TrackedItem<T>> {
    let mut seen = HashSet::new();
    pool.iter()
        .copied()
        .filter(|tracked| filter.matches(tracked.item.tags(), &tracked.schedule))
        .filter(|&tracked| seen.insert(tracked.id()))
        .collect()
}

fn pick_direction<T: StudyItem, R: Rng + ?Sized>(item: &T, rng: &mut R) -> Direction {
    if item.supports_reverse() && rng.gen_bool(0.5) {
        Direction::AnswerToPrompt
    } else {
        Direction::PromptToAnswer
    }
}

/// 从整个池中（而非已选子集）抽取干扰项，同类条目优先。
/// 文本与已选选项重复的候选直接跳过、继续抽取下一个。
fn draw_options<T: StudyItem, R: Rng + ?Sized>(
    target: &T,
    direction: Direction,
    pool: &[&TrackedItem<T>],
    rng: &mut R,
) -> Option<Vec<String>> {
    let answer_match = target.answer_match();
    let correct = target.option_text(direction).to_string();

    let (mut same_class, mut others): (Vec<&T>, Vec<&T>) = pool
        .iter()
        .map(|tracked| &tracked.item)
        .filter(|item| item.id() != target.id())
        .partition(|item| target.tags().same_classification(item.tags()));
    same_class.shuffle(rng);
    others.shuffle(rng);

    let mut taken: HashSet<String> = HashSet::new();
    taken.insert(option_key(&correct, answer_match));
    let mut options = Vec::with_capacity(OPTIONS_PER_QUESTION);

    for candidate in same_class.into_iter().chain(others) {
        if options.len() == OPTIONS_PER_QUESTION - 1 {
            break;
        }
        let text = candidate.option_text(direction);
        if text.trim().is_empty() {
            continue;
        }
        if taken.insert(option_key(text, answer_match)) {
            options.push(text.to_string());
        }
    }

    if options.len() < OPTIONS_PER_QUESTION - 1 {
        return None;
    }
    options.push(correct);
    options.shuffle(rng);
    Some(options)
}

/// 生成一组题目。筛选后不足 4 个条目时返回 `InsufficientPool`；
/// 条目少于 `count` 时题目数相应减少，不视为错误。
pub fn build_question_set<T: StudyItem, R: Rng + ?Sized>(
    pool: &[&TrackedItem<T>],
    filter: &ItemFilter,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Question>, SrsError> {
    let mut candidates = eligible(pool, filter);
    if candidates.len() < MIN_POOL_SIZE {
        tracing::info!(
            available = candidates.len(),
            required = MIN_POOL_SIZE,
            "Not enough items for a question set"
        );
        return Err(SrsError::InsufficientPool {
            required: MIN_POOL_SIZE,
            available: candidates.len(),
        });
    }

    candidates.shuffle(rng);
    candidates.truncate(count);

    let mut questions = Vec::with_capacity(candidates.len());
    for tracked in candidates {
        let item = &tracked.item;
        let direction = pick_direction(item, rng);
        let Some(options) = draw_options(item, direction, pool, rng) else {
            tracing::warn!(
                item_id = item.id(),
                ?direction,
                "Could not assemble distinct options, skipping item"
            );
            continue;
        };
        questions.push(Question {
            target_item_id: item.id().to_string(),
            direction,
            prompt: item.question_text(direction).to_string(),
            options,
            correct_answer: item.option_text(direction).to_string(),
            answer_match: item.answer_match(),
        });
    }

    if questions.is_empty() {
        return Err(SrsError::InsufficientPool {
            required: MIN_POOL_SIZE,
            available: 0,
        });
    }

    tracing::debug!(questions = questions.len(), "Question set built");
    Ok(questions)
}
