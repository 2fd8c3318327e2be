use serde::{Deserialize, Serialize};

use super::types::ItemTags;

/// 出题方向：正向显示提示、考答案；反向显示答案、考提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    PromptToAnswer,
    AnswerToPrompt,
}

/// 提交答案的比对规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerMatch {
    /// 选项原文逐字比对
    Exact,
    /// 去除首尾空白、忽略大小写（语法填空）
    Normalized,
}

impl AnswerMatch {
    pub fn accepts(self, submitted: &str, expected: &str) -> bool {
        match self {
            Self::Exact => submitted == expected,
            Self::Normalized => submitted.trim().to_lowercase() == expected.trim().to_lowercase(),
        }
    }
}

/// 引擎对学习条目的全部要求。内容本身对引擎不透明，
/// 只有出题（题干/选项文本）会读取。
pub trait StudyItem {
    fn id(&self) -> &str;

    fn tags(&self) -> &ItemTags;

    fn prompt(&self) -> &str;

    fn answer(&self) -> &str;

    fn example(&self) -> Option<&str> {
        None
    }

    fn answer_match(&self) -> AnswerMatch {
        AnswerMatch::Exact
    }

    /// 是否允许反向出题
    fn supports_reverse(&self) -> bool {
        true
    }

    fn question_text(&self, direction: Direction) -> &str {
        match direction {
            Direction::PromptToAnswer => self.prompt(),
            Direction::AnswerToPrompt => self.answer(),
        }
    }

    /// 作为正确答案或干扰项出现时的选项文本
    fn option_text(&self, direction: Direction) -> &str {
        match direction {
            Direction::PromptToAnswer => self.answer(),
            Direction::AnswerToPrompt => self.prompt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_case_sensitive() {
        assert!(AnswerMatch::Exact.accepts("der Hund", "der Hund"));
        assert!(!AnswerMatch::Exact.accepts("Der Hund", "der Hund"));
        assert!(!AnswerMatch::Exact.accepts(" der Hund", "der Hund"));
    }

    #[test]
    fn normalized_match_ignores_case_and_padding() {
        assert!(AnswerMatch::Normalized.accepts("  Went ", "went"));
        assert!(!AnswerMatch::Normalized.accepts("gone", "went"));
    }
}
