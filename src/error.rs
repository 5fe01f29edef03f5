use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 启动阶段错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("配置文件 {} 解析失败: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("配置文件 {} 无效: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },
    #[error("日志初始化失败: {0}")]
    Logging(String),
}
