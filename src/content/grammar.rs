use serde::{Deserialize, Serialize};

use crate::srs::{AnswerMatch, ItemTags, StudyItem};

/// 语法填空题：句子中留空，答案为应填入的词形
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarQuestion {
    pub id: String,
    /// 含空位的句子，如 "Yesterday I ___ to school."
    pub sentence: String,
    pub answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub tags: ItemTags,
}

impl GrammarQuestion {
    pub fn new(id: &str, sentence: &str, answer: &str) -> Self {
        Self {
            id: id.to_string(),
            sentence: sentence.to_string(),
            answer: answer.to_string(),
            explanation: None,
            tags: ItemTags::default(),
        }
    }

    pub fn level(mut self, level: &str) -> Self {
        self.tags.level = Some(level.to_string());
        self
    }

    pub fn topic(mut self, topic: &str) -> Self {
        self.tags.topic = Some(topic.to_string());
        self
    }
}

impl StudyItem for GrammarQuestion {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &ItemTags {
        &self.tags
    }

    fn prompt(&self) -> &str {
        &self.sentence
    }

    fn answer(&self) -> &str {
        &self.answer
    }

    fn example(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    // 填空答案允许自由输入
    fn answer_match(&self) -> AnswerMatch {
        AnswerMatch::Normalized
    }

    fn supports_reverse(&self) -> bool {
        false
    }
}
