use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;

/// 每行字符数的允许范围
pub const MIN_COLUMNS: usize = 20;
pub const MAX_COLUMNS: usize = 400;
/// 放大倍数上限
pub const MAX_SCALE: u32 = 8;

/// 配置文件 (~/.config/vitae/config.toml)，所有键均可省略
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub export: ExportConfig,
    pub print: PrintConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    /// 光栅化放大倍数
    pub scale: u32,
    /// 每行字符数
    pub columns: usize,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// 非拉丁字符使用的轮廓字体，未设置时在系统字体中查找
    pub font_path: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: dirs::document_dir().unwrap_or_else(|| PathBuf::from(".")),
            scale: 2,
            columns: 88,
            page_width_mm: 210.0,
            page_height_mm: 295.0,
            font_path: None,
        }
    }
}

impl ExportConfig {
    /// 检查版面参数，返回错误原因
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_SCALE).contains(&self.scale) {
            return Err(format!(
                "export.scale 应在 1 到 {} 之间，当前为 {}",
                MAX_SCALE, self.scale
            ));
        }
        if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&self.columns) {
            return Err(format!(
                "export.columns 应在 {} 到 {} 之间，当前为 {}",
                MIN_COLUMNS, MAX_COLUMNS, self.columns
            ));
        }
        for (key, value) in [
            ("page_width_mm", self.page_width_mm),
            ("page_height_mm", self.page_height_mm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("export.{} 必须为正数，当前为 {}", key, value));
            }
        }
        if let Some(path) = &self.font_path
            && !path.is_file()
        {
            return Err(format!("export.font_path 不存在: {}", path.display()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    pub command: Vec<String>,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            command: vec!["lp".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// 配置文件路径
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vitae").join("config.toml"))
}

impl Config {
    /// 从默认位置加载，文件不存在时使用默认值
    pub fn load() -> Result<Self, AppError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config
            .export
            .validate()
            .map_err(|reason| AppError::InvalidConfig {
                path: path.to_path_buf(),
                reason,
            })?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
