//! 条目入库校验
//! 提供 ID、题面和答案的基本格式检查，供仓库批量导入时共用。

use crate::srs::StudyItem;

const MAX_ID_LEN: usize = 128;

/// 验证条目 ID：非空、最多 128 字符。ID 对引擎不透明，只存在于快照内容中
pub fn validate_item_id(id: &str) -> Result<(), &'static str> {
    if id.trim().is_empty() {
        return Err("条目 ID 不能为空");
    }
    if id.chars().count() > MAX_ID_LEN {
        return Err("条目 ID 不能超过128个字符");
    }
    Ok(())
}

/// 验证档案 ID：会拼进 `{profile_id}:{domain}` 存储键，因此不能含冒号
pub fn validate_profile_id(id: &str) -> Result<(), &'static str> {
    if id.trim().is_empty() {
        return Err("档案 ID 不能为空");
    }
    if id.chars().count() > MAX_ID_LEN {
        return Err("档案 ID 不能超过128个字符");
    }
    if id.contains(':') {
        return Err("档案 ID 不能包含冒号");
    }
    Ok(())
}

/// 验证条目内容：ID 合法，题面与答案去除空白后非空
pub fn validate_item<T: StudyItem + ?Sized>(item: &T) -> Result<(), &'static str> {
    validate_item_id(item.id())?;
    if item.prompt().trim().is_empty() {
        return Err("题面不能为空");
    }
    if item.answer().trim().is_empty() {
        return Err("答案不能为空");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_id() {
        assert!(validate_item_id("w-001").is_ok());
        assert!(validate_item_id("").is_err());
        assert!(validate_item_id("   ").is_err());
        assert!(validate_item_id("n5:taberu").is_ok());
        assert!(validate_item_id(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_profile_id() {
        assert!(validate_profile_id("alice").is_ok());
        assert!(validate_profile_id("a:b").is_err());
        assert!(validate_profile_id(" ").is_err());
    }
}
