//! 日志初始化
//!
//! 终端被 TUI 占用，日志写入 ~/.local/share/vitae/vitae.log。
//! `RUST_LOG` 优先于配置文件中的级别。

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{Directive, EnvFilter};

use crate::error::AppError;

const LOG_FILE: &str = "vitae.log";

/// 日志目录
pub fn log_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("vitae"))
}

/// 初始化文件日志，返回日志文件路径和写入线程的 guard
///
/// guard 必须存活到程序结束，否则尚未写出的日志会丢失
pub fn init(level: &str, dir: &Path) -> Result<(PathBuf, WorkerGuard), AppError> {
    fs::create_dir_all(dir)?;

    let directive: Directive = level
        .parse()
        .map_err(|e| AppError::Logging(format!("无效的日志级别 `{}`: {}", level, e)))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(file_writer)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))?;

    Ok((dir.join(LOG_FILE), guard))
}
