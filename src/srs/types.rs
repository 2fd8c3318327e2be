use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EASE, MAX_QUALITY, PASS_QUALITY};

use super::SrsError;

/// 单个条目的 SM-2 调度状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingState {
    pub ease: f64,
    /// 距离下次复习的天数
    pub interval: u32,
    /// 自上次失败以来的连续成功次数
    pub repetitions: u32,
    pub next_review_date: NaiveDate,
    #[serde(default)]
    pub last_review_date: Option<NaiveDate>,
}

impl SchedulingState {
    /// 新条目：创建当天即到期
    pub fn new(today: NaiveDate) -> Self {
        Self {
            ease: DEFAULT_EASE,
            interval: 0,
            repetitions: 0,
            next_review_date: today,
            last_review_date: None,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review_date <= today
    }

    pub fn mastery(&self) -> MasteryLevel {
        super::scheduler::classify(self.repetitions, self.interval)
    }
}

/// 回忆质量评分，取值 0..=5，低于 3 视为失败
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: i64) -> Result<Self, SrsError> {
        if (0..=MAX_QUALITY as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(SrsError::InvalidQuality(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_pass(self) -> bool {
        self.0 >= PASS_QUALITY
    }
}

impl TryFrom<i64> for Quality {
    type Error = SrsError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// 闪卡四档评分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashcardRating {
    Again,
    Hard,
    Good,
    Easy,
}

impl FlashcardRating {
    pub const ALL: [FlashcardRating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// 1..=4 分制 → 评分
    pub fn from_scale(value: i64) -> Result<Self, SrsError> {
        match value {
            1 => Ok(Self::Again),
            2 => Ok(Self::Hard),
            3 => Ok(Self::Good),
            4 => Ok(Self::Easy),
            other => Err(SrsError::InvalidRating(other)),
        }
    }

    /// 映射到 SM-2 质量评分：{1→1, 2→2, 3→4, 4→5}。
    /// Again/Hard 落在及格线以下，Good/Easy 在及格线以上。
    pub fn quality(self) -> Quality {
        match self {
            Self::Again => Quality(1),
            Self::Hard => Quality(2),
            Self::Good => Quality(4),
            Self::Easy => Quality(5),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MasteryLevel {
    New,
    Learning,
    Familiar,
    Mastered,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryStats {
    pub new: u64,
    pub learning: u64,
    pub familiar: u64,
    pub mastered: u64,
    pub due: u64,
}

impl MasteryStats {
    pub fn from_states<'a>(
        states: impl IntoIterator<Item = &'a SchedulingState>,
        today: NaiveDate,
    ) -> Self {
        let mut stats = Self::default();
        for state in states {
            match state.mastery() {
                MasteryLevel::New => stats.new += 1,
                MasteryLevel::Learning => stats.learning += 1,
                MasteryLevel::Familiar => stats.familiar += 1,
                MasteryLevel::Mastered => stats.mastered += 1,
            }
            if state.is_due(today) {
                stats.due += 1;
            }
        }
        stats
    }

    pub fn total(&self) -> u64 {
        self.new + self.learning + self.familiar + self.mastered
    }
}

/// 分类标签，仅用于筛选，调度器从不读取
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl ItemTags {
    /// 两个条目是否属于同一分类（用于优先挑选同类干扰项）
    pub fn same_classification(&self, other: &ItemTags) -> bool {
        fn shared(a: &Option<String>, b: &Option<String>) -> bool {
            matches!((a, b), (Some(x), Some(y)) if x == y)
        }
        shared(&self.category, &other.category)
            || shared(&self.topic, &other.topic)
            || shared(&self.level, &other.level)
    }
}

/// 组卷筛选条件；`None` 表示不限
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilter {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    /// 仅保留在该日期（含）之前到期的条目
    #[serde(default)]
    pub due_by: Option<NaiveDate>,
}

impl ItemFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn due_by(mut self, date: NaiveDate) -> Self {
        self.due_by = Some(date);
        self
    }

    pub fn matches_tags(&self, tags: &ItemTags) -> bool {
        fn accepts(wanted: &Option<String>, actual: &Option<String>) -> bool {
            match wanted {
                None => true,
                Some(w) => actual.as_deref() == Some(w.as_str()),
            }
        }
        accepts(&self.level, &tags.level)
            && accepts(&self.category, &tags.category)
            && accepts(&self.topic, &tags.topic)
    }

    pub fn matches(&self, tags: &ItemTags, state: &SchedulingState) -> bool {
        self.matches_tags(tags) && self.due_by.map_or(true, |date| state.is_due(date))
    }
}
