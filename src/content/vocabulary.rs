use serde::{Deserialize, Serialize};

use crate::srs::{ItemTags, StudyItem};

/// 通用词汇条目：目标语词条与母语释义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub id: String,
    pub term: String,
    pub translation: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub tags: ItemTags,
}

impl VocabularyEntry {
    pub fn new(term: &str, translation: &str) -> Self {
        Self::with_id(&uuid::Uuid::new_v4().to_string(), term, translation)
    }

    pub fn with_id(id: &str, term: &str, translation: &str) -> Self {
        Self {
            id: id.to_string(),
            term: term.to_string(),
            translation: translation.to_string(),
            example: None,
            tags: ItemTags::default(),
        }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.tags.category = Some(category.to_string());
        self
    }

    pub fn topic(mut self, topic: &str) -> Self {
        self.tags.topic = Some(topic.to_string());
        self
    }

    pub fn with_example(mut self, example: &str) -> Self {
        self.example = Some(example.to_string());
        self
    }
}

impl StudyItem for VocabularyEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &ItemTags {
        &self.tags
    }

    fn prompt(&self) -> &str {
        &self.term
    }

    fn answer(&self) -> &str {
        &self.translation
    }

    fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }
}
