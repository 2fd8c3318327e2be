use chrono::NaiveDate;

use learning_core::config::SessionConfig;
use learning_core::content::{BankWord, GrammarQuestion, VocabularyEntry};
use learning_core::srs::{FixedClock, ItemRepository, SessionEngine};

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn today() -> NaiveDate {
    day(2024, 3, 1)
}

pub fn vocabulary(count: usize, category: &str) -> Vec<VocabularyEntry> {
    (0..count)
        .map(|idx| {
            VocabularyEntry::with_id(
                &format!("{category}-{idx}"),
                &format!("{category}-term-{idx}"),
                &format!("{category}-meaning-{idx}"),
            )
            .category(category)
        })
        .collect()
}

pub fn bank_words(count: usize, level: &str) -> Vec<BankWord> {
    (0..count)
        .map(|idx| {
            BankWord::new(
                &format!("{level}-{idx}"),
                level,
                &format!("word-{level}-{idx}"),
                &format!("释义-{level}-{idx}"),
            )
        })
        .collect()
}

pub fn grammar(answers: &[&str]) -> Vec<GrammarQuestion> {
    answers
        .iter()
        .enumerate()
        .map(|(idx, answer)| GrammarQuestion::new(&format!("g{idx}"), "She ___ to school.", answer))
        .collect()
}

pub fn seeded_repository<T: learning_core::srs::StudyItem>(
    items: Vec<T>,
    today: NaiveDate,
) -> ItemRepository<T> {
    let mut repository = ItemRepository::new();
    let report = repository.add_items(items, today);
    assert!(report.rejected.is_empty(), "fixture items must be valid");
    repository
}

pub fn engine<T: learning_core::srs::StudyItem>(
    repository: ItemRepository<T>,
    today: NaiveDate,
    seed: u64,
) -> SessionEngine<T> {
    SessionEngine::new(repository, SessionConfig::default())
        .with_clock(FixedClock(today))
        .with_seed(seed)
}
