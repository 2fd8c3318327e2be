//! 间隔重复引擎：SM-2 调度、条目仓库、组卷与测验会话状态机。
//!
//! 三个内容域（词汇、分级词库、语法题）共用同一套引擎，
//! 各内容域只需实现 [`item::StudyItem`]。

pub mod clock;
pub mod item;
pub mod repository;
pub mod scheduler;
pub mod selector;
pub mod session;
pub mod types;

use thiserror::Error;

pub use clock::{Clock, FixedClock, SystemClock};
pub use item::{AnswerMatch, Direction, StudyItem};
pub use repository::{
    IngestReport, ItemRepository, RepositoryEvent, RepositorySnapshot, TrackedItem,
};
pub use scheduler::{classify, format_interval, preview_intervals, review};
pub use selector::{build_question_set, eligible, Question};
pub use session::{
    AnswerOutcome, AnswerRecord, Card, NoReward, RewardSink, Session, SessionEngine, SessionMode,
    SessionPhase, SessionSummary,
};
pub use types::{
    FlashcardRating, ItemFilter, ItemTags, MasteryLevel, MasteryStats, Quality, SchedulingState,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SrsError {
    #[error("insufficient pool: need at least {required} eligible items, found {available}")]
    InsufficientPool { required: usize, available: usize },
    #[error("invalid transition: {operation} ({reason})")]
    InvalidTransition {
        operation: &'static str,
        reason: String,
    },
    #[error("unknown item id: {0}")]
    UnknownItemId(String),
    #[error("quality {0} outside 0..=5")]
    InvalidQuality(i64),
    #[error("flashcard rating {0} outside 1..=4")]
    InvalidRating(i64),
    #[error("invalid item {id}: {reason}")]
    InvalidItem { id: String, reason: String },
    #[error("duplicate item id in snapshot: {0}")]
    DuplicateItemId(String),
    #[error("unsupported snapshot version {found}, supported {supported}")]
    UnsupportedSnapshotVersion { found: u32, supported: u32 },
}

impl SrsError {
    pub(crate) fn invalid_transition(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidTransition {
            operation,
            reason: reason.into(),
        }
    }

    /// 可恢复错误属于数据条件（调用方可放宽筛选条件后重试），
    /// 其余均为调用方违反契约。
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientPool { .. })
    }
}
