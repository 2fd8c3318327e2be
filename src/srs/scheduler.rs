//! SM-2 Spaced Repetition Scheduler
//!
//! Pure functions only: "today" is always passed in, never read from the clock.
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout
//! - 1: Incorrect, but recognized once shown
//! - 2: Incorrect, but the answer felt familiar
//! - 3: Correct with serious difficulty
//! - 4: Correct after hesitation
//! - 5: Perfect recall

use chrono::{Days, NaiveDate};

use crate::constants::{
    FAILED_INTERVAL_DAYS, FAMILIAR_INTERVAL_DAYS, FIRST_PASS_INTERVAL_DAYS, MASTERED_INTERVAL_DAYS,
    MASTERED_MIN_REPETITIONS, MAX_INTERVAL_DAYS, MIN_EASE, SECOND_PASS_INTERVAL_DAYS,
};

use super::types::{FlashcardRating, MasteryLevel, Quality, SchedulingState};

/// EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)), floored at 1.3
fn next_ease(ease: f64, quality: Quality) -> f64 {
    let miss = (5 - quality.value()) as f64;
    (ease + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE)
}

fn next_interval(state: &SchedulingState, quality: Quality) -> u32 {
    if !quality.is_pass() {
        return FAILED_INTERVAL_DAYS;
    }
    match state.repetitions {
        0 => FIRST_PASS_INTERVAL_DAYS,
        1 => SECOND_PASS_INTERVAL_DAYS,
        _ => {
            // 使用复习前的 ease；上限不低于当前间隔，保证连续通过时间隔不缩短
            let grown = (state.interval as f64 * state.ease.max(MIN_EASE)).round();
            let cap = MAX_INTERVAL_DAYS.max(state.interval);
            if grown >= cap as f64 {
                cap
            } else {
                grown as u32
            }
        }
    }
}

fn add_days(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(days as u64))
        .unwrap_or(NaiveDate::MAX)
}

/// 根据一次复习结果计算新的调度状态
pub fn review(state: &SchedulingState, quality: Quality, today: NaiveDate) -> SchedulingState {
    let interval = next_interval(state, quality);
    let repetitions = if quality.is_pass() {
        state.repetitions.saturating_add(1)
    } else {
        0
    };

    SchedulingState {
        ease: next_ease(state.ease, quality),
        interval,
        repetitions,
        next_review_date: add_days(today, interval),
        last_review_date: Some(today),
    }
}

/// 掌握度分级，只取决于 (repetitions, interval)。
/// repetitions < 3 但 interval ≥ 21 的状态正常流程中不会出现，归为 Familiar。
pub fn classify(repetitions: u32, interval: u32) -> MasteryLevel {
    if repetitions == 0 {
        MasteryLevel::New
    } else if interval < FAMILIAR_INTERVAL_DAYS {
        MasteryLevel::Learning
    } else if repetitions >= MASTERED_MIN_REPETITIONS && interval >= MASTERED_INTERVAL_DAYS {
        MasteryLevel::Mastered
    } else {
        MasteryLevel::Familiar
    }
}

/// Interval each flashcard rating would produce, in `FlashcardRating::ALL` order.
pub fn preview_intervals(state: &SchedulingState) -> [u32; 4] {
    FlashcardRating::ALL.map(|rating| next_interval(state, rating.quality()))
}

pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{days}d"),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}
