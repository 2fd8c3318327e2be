//! 三个内容域：通用词汇、分级词库、语法题库。
//! 各自只提供内容结构与 [`StudyItem`](crate::srs::StudyItem) 实现，调度与出题逻辑共用引擎。

pub mod grammar;
pub mod vocabulary;
pub mod word_bank;

pub use grammar::GrammarQuestion;
pub use vocabulary::VocabularyEntry;
pub use word_bank::BankWord;

/// 持久化键中使用的内容域名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Vocabulary,
    WordBank,
    Grammar,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Self::Vocabulary, Self::WordBank, Self::Grammar];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vocabulary => "vocabulary",
            Self::WordBank => "word_bank",
            Self::Grammar => "grammar",
        }
    }
}
