use serde::{Deserialize, Serialize};

use crate::srs::{ItemTags, StudyItem};

/// 分级词库中的单词，按水平等级（如 A1、N5、HSK3）归类
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankWord {
    pub id: String,
    pub text: String,
    pub meaning: String,
    #[serde(default)]
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub tags: ItemTags,
}

impl BankWord {
    pub fn new(id: &str, level: &str, text: &str, meaning: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            meaning: meaning.to_string(),
            pronunciation: None,
            part_of_speech: None,
            examples: Vec::new(),
            tags: ItemTags {
                level: Some(level.to_string()),
                ..ItemTags::default()
            },
        }
    }

    pub fn level(&self) -> Option<&str> {
        self.tags.level.as_deref()
    }
}

impl StudyItem for BankWord {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &ItemTags {
        &self.tags
    }

    fn prompt(&self) -> &str {
        &self.text
    }

    fn answer(&self) -> &str {
        &self.meaning
    }

    fn example(&self) -> Option<&str> {
        self.examples.first().map(String::as_str)
    }
}
