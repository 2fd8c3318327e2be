//! 测验会话状态机：Idle → Active → Completed → Idle。
//!
//! 每个引擎独占一个条目仓库，同一时刻最多一个进行中的会话。
//! 会话不持久化；已记录答案触发的复习结果在放弃会话时不会回滚。

use std::fmt;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::SessionConfig;
use crate::constants::{CORRECT_ANSWER_QUALITY, WRONG_ANSWER_QUALITY};

use super::clock::{Clock, SystemClock};
use super::item::StudyItem;
use super::repository::{ItemRepository, TrackedItem};
use super::selector::{build_question_set, eligible, Question};
use super::types::{FlashcardRating, ItemFilter, Quality, SchedulingState};
use super::SrsError;

/// 答对时的奖励回调，金额为 XP
pub trait RewardSink {
    fn on_correct_answer(&mut self, amount: u32);
}

impl<F: FnMut(u32)> RewardSink for F {
    fn on_correct_answer(&mut self, amount: u32) {
        self(amount)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoReward;

impl RewardSink for NoReward {
    fn on_correct_answer(&mut self, _amount: u32) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    MultipleChoice,
    Flashcard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Active,
    Completed,
}

/// 闪卡：先显示正面，翻面后给出四档评分
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub item_id: String,
    pub front: String,
    pub back: String,
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,
    pub submitted_answer: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub xp_awarded: u32,
    pub schedule: SchedulingState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub mode: SessionMode,
    pub score: u32,
    pub answered: usize,
    pub total: usize,
    pub completed: bool,
    /// 已作答题目中的正确率，未作答时为 0
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: String,
    mode: SessionMode,
    filter: ItemFilter,
    questions: Vec<Question>,
    cards: Vec<Card>,
    current_index: usize,
    score: u32,
    answer_log: Vec<AnswerRecord>,
    answered: bool,
    revealed: bool,
    started_on: NaiveDate,
}

impl Session {
    fn new(mode: SessionMode, filter: ItemFilter, started_on: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mode,
            filter,
            questions: Vec::new(),
            cards: Vec::new(),
            current_index: 0,
            score: 0,
            answer_log: Vec::new(),
            answered: false,
            revealed: false,
            started_on,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        match self.mode {
            SessionMode::MultipleChoice => self.questions.len(),
            SessionMode::Flashcard => self.cards.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answer_log(&self) -> &[AnswerRecord] {
        &self.answer_log
    }

    /// 当前题目是否已作答
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn started_on(&self) -> NaiveDate {
        self.started_on
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.cards.get(self.current_index)
    }

    fn summary(&self, completed: bool) -> SessionSummary {
        let answered = self.answer_log.len();
        let accuracy = if answered == 0 {
            0.0
        } else {
            self.score as f64 / answered as f64
        };
        SessionSummary {
            session_id: self.id.clone(),
            mode: self.mode,
            score: self.score,
            answered,
            total: self.len(),
            completed,
            accuracy,
        }
    }
}

enum SessionState {
    Idle,
    Active(Session),
    Completed(Session),
}

impl SessionState {
    fn phase(&self) -> SessionPhase {
        match self {
            Self::Idle => SessionPhase::Idle,
            Self::Active(_) => SessionPhase::Active,
            Self::Completed(_) => SessionPhase::Completed,
        }
    }
}

fn reject<T>(operation: &'static str, reason: &str) -> Result<T, SrsError> {
    tracing::warn!(operation, reason, "Rejected session operation");
    Err(SrsError::invalid_transition(operation, reason))
}

fn build_cards<T: StudyItem>(
    pool: &[&TrackedItem<T>],
    filter: &ItemFilter,
    count: usize,
    rng: &mut StdRng,
) -> Result<Vec<Card>, SrsError> {
    let mut candidates = eligible(pool, filter);
    if candidates.is_empty() {
        return Err(SrsError::InsufficientPool {
            required: 1,
            available: 0,
        });
    }
    candidates.shuffle(rng);
    candidates.truncate(count);
    Ok(candidates
        .into_iter()
        .map(|tracked| Card {
            item_id: tracked.item.id().to_string(),
            front: tracked.item.prompt().to_string(),
            back: tracked.item.answer().to_string(),
            example: tracked.item.example().map(str::to_string),
        })
        .collect())
}

/// 会话引擎：持有仓库、时钟与奖励回调，驱动单个测验会话
pub struct SessionEngine<T> {
    repository: ItemRepository<T>,
    state: SessionState,
    config: SessionConfig,
    clock: Box<dyn Clock>,
    reward: Box<dyn RewardSink>,
    rng: StdRng,
}

impl<T> fmt::Debug for SessionEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("repository", &self.repository)
            .field("phase", &self.state.phase())
            .field("config", &self.config)
            .finish()
    }
}

impl<T: StudyItem> SessionEngine<T> {
    pub fn new(repository: ItemRepository<T>, config: SessionConfig) -> Self {
        Self {
            repository,
            state: SessionState::Idle,
            config,
            clock: Box::new(SystemClock),
            reward: Box::new(NoReward),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_reward(mut self, reward: impl RewardSink + 'static) -> Self {
        self.reward = Box::new(reward);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn repository(&self) -> &ItemRepository<T> {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut ItemRepository<T> {
        &mut self.repository
    }

    pub fn into_repository(self) -> ItemRepository<T> {
        self.repository
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Active(session) | SessionState::Completed(session) => Some(session),
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            SessionState::Active(session) => session.current_question(),
            _ => None,
        }
    }

    pub fn current_card(&self) -> Option<&Card> {
        match &self.state {
            SessionState::Active(session) => session.current_card(),
            _ => None,
        }
    }

    /// 以配置中的题目数开始会话
    pub fn start(&mut self, mode: SessionMode, filter: ItemFilter) -> Result<&Session, SrsError> {
        let count = self.config.question_count;
        self.start_with_count(mode, filter, count)
    }

    /// 开始会话。题目只在此时生成一次；条目不足时保持 Idle，不会产生半成品会话。
    pub fn start_with_count(
        &mut self,
        mode: SessionMode,
        filter: ItemFilter,
        count: usize,
    ) -> Result<&Session, SrsError> {
        match self.state.phase() {
            SessionPhase::Idle => {}
            SessionPhase::Active => return reject("start", "a session is already active"),
            SessionPhase::Completed => {
                return reject("start", "completed session has not been ended")
            }
        }
        if count == 0 {
            return reject("start", "question count must be positive");
        }

        let today = self.clock.today();
        let pool: Vec<&TrackedItem<T>> = self.repository.iter().collect();
        let mut session = Session::new(mode, filter, today);
        match mode {
            SessionMode::MultipleChoice => {
                session.questions =
                    build_question_set(&pool, &session.filter, count, &mut self.rng)?;
            }
            SessionMode::Flashcard => {
                session.cards = build_cards(&pool, &session.filter, count, &mut self.rng)?;
            }
        }

        tracing::info!(
            session_id = %session.id,
            ?mode,
            items = session.len(),
            "Session started"
        );
        self.state = SessionState::Active(session);
        match &self.state {
            SessionState::Active(session) => Ok(session),
            _ => reject("start", "session was not activated"),
        }
    }

    /// 选择题作答。每题只接受一次，答案写入日志并立即更新调度状态。
    pub fn answer(&mut self, submitted: &str) -> Result<AnswerOutcome, SrsError> {
        let SessionState::Active(session) = &mut self.state else {
            return reject("answer", "no active session");
        };
        if session.mode != SessionMode::MultipleChoice {
            return reject("answer", "flashcard sessions are rated, not answered");
        }
        if session.answered {
            return reject("answer", "current question already answered");
        }
        let Some(question) = session.current_question() else {
            return reject("answer", "no current question");
        };

        let correct = question.is_correct(submitted);
        let target = question.target_item_id.clone();
        let correct_answer = question.correct_answer.clone();
        let grade = if correct {
            CORRECT_ANSWER_QUALITY
        } else {
            WRONG_ANSWER_QUALITY
        };
        let quality = Quality::new(i64::from(grade))?;

        let schedule = self.repository.review(&target, quality, self.clock.today())?;

        session.answered = true;
        session.answer_log.push(AnswerRecord {
            question_id: target.clone(),
            submitted_answer: submitted.to_string(),
            correct,
        });
        let xp_awarded = if correct {
            session.score += 1;
            self.reward.on_correct_answer(self.config.xp_per_correct);
            self.config.xp_per_correct
        } else {
            0
        };

        tracing::debug!(
            session_id = %session.id,
            item_id = %target,
            correct,
            "Answer recorded"
        );
        Ok(AnswerOutcome {
            correct,
            correct_answer,
            xp_awarded,
            schedule,
        })
    }

    /// 闪卡翻面
    pub fn reveal(&mut self) -> Result<&Card, SrsError> {
        let SessionState::Active(session) = &mut self.state else {
            return reject("reveal", "no active session");
        };
        if session.mode != SessionMode::Flashcard {
            return reject("reveal", "only flashcard sessions have cards");
        }
        session.revealed = true;
        match session.current_card() {
            Some(card) => Ok(card),
            None => reject("reveal", "no current card"),
        }
    }

    /// 闪卡评分：需先翻面，每张卡只评一次
    pub fn rate(&mut self, rating: FlashcardRating) -> Result<AnswerOutcome, SrsError> {
        let SessionState::Active(session) = &mut self.state else {
            return reject("rate", "no active session");
        };
        if session.mode != SessionMode::Flashcard {
            return reject("rate", "multiple-choice sessions are answered, not rated");
        }
        if !session.revealed {
            return reject("rate", "card must be revealed before rating");
        }
        if session.answered {
            return reject("rate", "current card already rated");
        }
        let Some(card) = session.current_card() else {
            return reject("rate", "no current card");
        };

        let target = card.item_id.clone();
        let correct_answer = card.back.clone();
        let quality = rating.quality();
        let passed = quality.is_pass();

        let schedule = self.repository.review(&target, quality, self.clock.today())?;

        session.answered = true;
        session.answer_log.push(AnswerRecord {
            question_id: target,
            submitted_answer: rating.label().to_string(),
            correct: passed,
        });
        let xp_awarded = if passed {
            session.score += 1;
            self.reward.on_correct_answer(self.config.xp_per_correct);
            self.config.xp_per_correct
        } else {
            0
        };

        Ok(AnswerOutcome {
            correct: passed,
            correct_answer,
            xp_awarded,
            schedule,
        })
    }

    /// 前进到下一题；最后一题之后进入 Completed
    pub fn advance(&mut self) -> Result<SessionPhase, SrsError> {
        let SessionState::Active(session) = &mut self.state else {
            return reject("advance", "no active session");
        };

        if session.current_index + 1 < session.len() {
            session.current_index += 1;
            session.answered = false;
            session.revealed = false;
            return Ok(SessionPhase::Active);
        }

        if let SessionState::Active(session) = std::mem::replace(&mut self.state, SessionState::Idle)
        {
            tracing::info!(
                session_id = %session.id,
                score = session.score,
                answered = session.answer_log.len(),
                "Session completed"
            );
            self.state = SessionState::Completed(session);
        }
        Ok(SessionPhase::Completed)
    }

    /// 结束并丢弃会话（进行中调用即为放弃，已生效的复习结果保留）
    pub fn end(&mut self) -> Result<SessionSummary, SrsError> {
        let summary = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Idle => return reject("end", "no session to end"),
            SessionState::Active(session) => {
                tracing::info!(
                    session_id = %session.id,
                    answered = session.answer_log.len(),
                    total = session.len(),
                    "Session abandoned"
                );
                session.summary(false)
            }
            SessionState::Completed(session) => session.summary(true),
        };
        Ok(summary)
    }
}
