use crate::content::Domain;
use crate::store::StoreError;
use crate::validation::validate_profile_id;

/// 快照键：`{profile_id}:{domain}`。profile_id 不得含冒号，否则无法反解。
pub fn snapshot_key(profile_id: &str, domain: Domain) -> Result<String, StoreError> {
    validate_profile_id(profile_id).map_err(|reason| StoreError::InvalidKey {
        key: profile_id.to_string(),
        reason: reason.to_string(),
    })?;
    Ok(format!("{}:{}", profile_id, domain.as_str()))
}

pub fn snapshot_prefix(profile_id: &str) -> String {
    format!("{}:", profile_id)
}

/// 反解快照键，未知内容域返回 None
pub fn parse_snapshot_key(key: &str) -> Option<(&str, Domain)> {
    let (profile_id, domain) = key.split_once(':')?;
    let domain = Domain::ALL.into_iter().find(|d| d.as_str() == domain)?;
    Some((profile_id, domain))
}
