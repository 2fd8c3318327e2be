use std::env;
use std::str::FromStr;

use crate::constants::{DEFAULT_PROFILE_ID, DEFAULT_QUESTION_COUNT, DEFAULT_XP_PER_CORRECT};

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub profile_id: String,
    pub session: SessionConfig,
}

/// 测验会话参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub question_count: usize,
    pub xp_per_correct: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            xp_per_correct: DEFAULT_XP_PER_CORRECT,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
            sled_path: "./data/learning.sled".to_string(),
            profile_id: DEFAULT_PROFILE_ID.to_string(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: env_or("RUST_LOG", &defaults.log_level),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", defaults.enable_file_logs),
            log_dir: env_or("LOG_DIR", &defaults.log_dir),
            sled_path: env_or("SLED_PATH", &defaults.sled_path),
            profile_id: env_or("PROFILE_ID", &defaults.profile_id),
            session: SessionConfig {
                question_count: env_or_parse(
                    "SESSION_QUESTION_COUNT",
                    defaults.session.question_count,
                ),
                xp_per_correct: env_or_parse(
                    "XP_PER_CORRECT_ANSWER",
                    defaults.session.xp_per_correct,
                ),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use super::*;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn managed_keys() -> &'static [&'static str] {
        &[
            "RUST_LOG",
            "ENABLE_FILE_LOGS",
            "SLED_PATH",
            "PROFILE_ID",
            "SESSION_QUESTION_COUNT",
            "XP_PER_CORRECT_ANSWER",
        ]
    }

    fn clear_keys(keys: &[&str]) {
        for key in keys {
            env::remove_var(key);
        }
    }

    #[test]
    fn loads_defaults_when_missing() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        let cfg = Config::from_env();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.profile_id, "default");
        assert_eq!(cfg.session, SessionConfig::default());
        assert!(!cfg.enable_file_logs);
    }

    #[test]
    fn parses_numeric_values() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("SESSION_QUESTION_COUNT", "15");
        env::set_var("XP_PER_CORRECT_ANSWER", "25");

        let cfg = Config::from_env();
        assert_eq!(cfg.session.question_count, 15);
        assert_eq!(cfg.session.xp_per_correct, 25);
    }

    #[test]
    fn invalid_values_fall_back() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("SESSION_QUESTION_COUNT", "ten");
        env::set_var("XP_PER_CORRECT_ANSWER", "-3");
        env::set_var("ENABLE_FILE_LOGS", "maybe");

        let cfg = Config::from_env();
        assert_eq!(cfg.session.question_count, DEFAULT_QUESTION_COUNT);
        assert_eq!(cfg.session.xp_per_correct, DEFAULT_XP_PER_CORRECT);
        assert!(!cfg.enable_file_logs);
    }
}
