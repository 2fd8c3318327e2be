mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::fixtures::{bank_words, day, engine, seeded_repository, today, vocabulary};
use learning_core::srs::{
    preview_intervals, FlashcardRating, ItemFilter, MasteryLevel, SessionMode, SessionPhase,
    SrsError,
};

#[test]
fn at_multiple_choice_session_end_to_end() {
    let xp: Rc<RefCell<Vec<u32>>> = Rc::default();
    let sink = xp.clone();
    let mut engine = engine(seeded_repository(vocabulary(6, "food"), today()), today(), 7)
        .with_reward(move |amount: u32| sink.borrow_mut().push(amount));

    let total = engine
        .start(SessionMode::MultipleChoice, ItemFilter::all())
        .unwrap()
        .len();
    assert_eq!(total, 6);
    assert_eq!(engine.phase(), SessionPhase::Active);

    let err = engine
        .start(SessionMode::MultipleChoice, ItemFilter::all())
        .unwrap_err();
    assert!(matches!(err, SrsError::InvalidTransition { operation: "start", .. }));

    let mut answered_correctly = Vec::new();
    for index in 0..total {
        let question = engine.current_question().unwrap().clone();
        let submitted = if index % 2 == 0 {
            question.correct_answer.clone()
        } else {
            question
                .options
                .iter()
                .find(|option| **option != question.correct_answer)
                .cloned()
                .unwrap()
        };
        let outcome = engine.answer(&submitted).unwrap();
        if outcome.correct {
            answered_correctly.push(question.target_item_id.clone());
        }
        engine.advance().unwrap();
    }

    assert_eq!(engine.phase(), SessionPhase::Completed);
    let summary = engine.end().unwrap();
    assert_eq!(summary.score, 3);
    assert_eq!(summary.answered, 6);
    assert!((summary.accuracy - 0.5).abs() < 1e-9);
    assert_eq!(*xp.borrow(), vec![10, 10, 10]);

    let stats = engine.repository().mastery_stats(today());
    assert_eq!(stats.learning, 3);
    assert_eq!(stats.new, 3);
    for id in &answered_correctly {
        let tracked = engine.repository().get(id).unwrap();
        assert_eq!(tracked.mastery(), MasteryLevel::Learning);
        assert_eq!(tracked.schedule.next_review_date, day(2024, 3, 2));
    }
}

#[test]
fn at_insufficient_pool_is_recoverable_after_adding_items() {
    let mut engine = engine(seeded_repository(vocabulary(3, "food"), today()), today(), 11);

    let err = engine
        .start(SessionMode::MultipleChoice, ItemFilter::all())
        .unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(engine.phase(), SessionPhase::Idle);

    engine
        .repository_mut()
        .add_items(vocabulary(5, "food"), today());
    assert_eq!(engine.repository().len(), 5);
    assert!(engine
        .start(SessionMode::MultipleChoice, ItemFilter::all())
        .is_ok());
}

#[test]
fn at_flashcard_review_over_several_days() {
    let mut repository = seeded_repository(bank_words(1, "cet4"), today());
    let id = repository.iter().next().unwrap().id().to_string();
    let mut date = today();

    // 连续三次 Good：1 天、6 天、15 天
    for expected in [1, 6, 15] {
        let mut engine = engine(repository, date, 3);
        engine
            .start(SessionMode::Flashcard, ItemFilter::all().level("cet4").due_by(date))
            .unwrap();
        let card = engine.reveal().unwrap().clone();
        assert_eq!(card.item_id, id);
        let outcome = engine.rate(FlashcardRating::Good).unwrap();
        assert_eq!(outcome.schedule.interval, expected);
        engine.advance().unwrap();
        engine.end().unwrap();

        repository = engine.into_repository();
        date = repository.get(&id).unwrap().schedule.next_review_date;
    }

    let state = &repository.get(&id).unwrap().schedule;
    assert_eq!(state.repetitions, 3);
    assert_eq!(preview_intervals(state)[0], 1);
    assert_eq!(state.mastery(), MasteryLevel::Familiar);

    // 未到期时按到期筛选没有可复习的卡片
    let mut engine = engine(repository, today(), 3);
    let err = engine
        .start(SessionMode::Flashcard, ItemFilter::all().due_by(today()))
        .unwrap_err();
    assert_eq!(
        err,
        SrsError::InsufficientPool {
            required: 1,
            available: 0
        }
    );
}

#[test]
fn at_abandoned_session_keeps_reviews() {
    let mut engine = engine(seeded_repository(vocabulary(5, "food"), today()), today(), 5);
    engine
        .start(SessionMode::MultipleChoice, ItemFilter::all())
        .unwrap();
    let question = engine.current_question().unwrap().clone();
    engine.answer(&question.correct_answer).unwrap();

    let summary = engine.end().unwrap();
    assert!(!summary.completed);
    assert_eq!(summary.answered, 1);
    assert_eq!(
        engine
            .repository()
            .get(&question.target_item_id)
            .unwrap()
            .schedule
            .repetitions,
        1
    );
    assert!(matches!(
        engine.end(),
        Err(SrsError::InvalidTransition { operation: "end", .. })
    ));
}
