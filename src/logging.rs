//! 日志初始化：EnvFilter + 标准输出，可选按天滚动的 JSON 文件日志。

use thiserror::Error;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "learning-core";
const MAX_LOG_FILES: usize = 30;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level directive {directive:?}: {source}")]
    Filter {
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("cannot create log files in {dir}: {source}")]
    Appender {
        dir: String,
        #[source]
        source: InitError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

/// RUST_LOG 优先；不可用时使用配置中的级别
fn level_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|source| LoggingError::Filter {
        directive: level.to_string(),
        source,
    })
}

fn file_appender(log_dir: &str) -> Result<RollingFileAppender, LoggingError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
        .map_err(|source| LoggingError::Appender {
            dir: log_dir.to_string(),
            source,
        })
}

/// 安装全局 subscriber。已有全局 subscriber（测试或宿主程序先初始化）时
/// 不做任何事并返回 `Ok(false)`。
pub fn init_tracing(config: &Config) -> Result<bool, LoggingError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.log_level)?,
    };
    let file_layer = if config.enable_file_logs {
        let writer = file_appender(&config.log_dir)?;
        Some(fmt::layer().with_writer(writer).with_ansi(false).json())
    } else {
        None
    };

    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(file_layer)
        .try_init()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use tempfile::{tempdir, NamedTempFile};

    use super::*;

    #[test]
    fn init_is_idempotent() {
        let config = Config::default();
        init_tracing(&config).unwrap();
        assert!(!init_tracing(&config).unwrap());
    }

    #[test]
    fn bad_level_directive_is_an_error() {
        assert!(level_filter("debug").is_ok());
        assert!(matches!(
            level_filter("learning_core=loudest"),
            Err(LoggingError::Filter { .. })
        ));
    }

    #[test]
    fn file_appender_reports_unusable_directory() {
        let dir = tempdir().unwrap();
        assert!(file_appender(dir.path().join("logs").to_str().unwrap()).is_ok());

        let not_a_dir = NamedTempFile::new().unwrap();
        let err = file_appender(not_a_dir.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LoggingError::Appender { .. }));
    }
}
