//! 导出模块
//!
//! 流程：Document -> 光栅化长图 -> 按页高切片 -> 多页 PDF。
//! PDF 在内存中完整生成后才一次性写盘，失败不会留下残缺文件。

pub mod font;
pub mod paginate;
pub mod pdf;
pub mod print;
pub mod raster;

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::config::ExportConfig;
use crate::models::{PersonalInfo, ResumeData};
use crate::preview;
use paginate::{page_height_px, split_pages};
use raster::{GlyphRasterizer, Rasterizer};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("没有可导出的内容")]
    Empty,
    #[error("无效的版面参数: {0}")]
    Layout(String),
    #[error("光栅化失败: {0}")]
    Raster(String),
    #[error("生成 PDF 失败: {0}")]
    Pdf(String),
    #[error("打印失败: {0}")]
    Print(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// `<名>_<姓>_Resume.pdf`
pub fn export_file_name(info: &PersonalInfo) -> String {
    format!(
        "{}_{}_Resume.pdf",
        sanitize(&info.first_name),
        sanitize(&info.last_name)
    )
}

fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

/// PDF 导出器
pub struct Exporter<R = GlyphRasterizer> {
    rasterizer: R,
    settings: ExportConfig,
}

impl Exporter<GlyphRasterizer> {
    pub fn new(settings: ExportConfig) -> Self {
        let rasterizer = GlyphRasterizer::new(settings.columns, settings.scale)
            .with_font_path(settings.font_path.clone());
        Self::with_rasterizer(rasterizer, settings)
    }
}

impl<R: Rasterizer> Exporter<R> {
    pub fn with_rasterizer(rasterizer: R, settings: ExportConfig) -> Self {
        Self {
            rasterizer,
            settings,
        }
    }

    /// 生成 PDF 字节
    pub fn render_pdf(&self, resume: &ResumeData) -> Result<Vec<u8>, ExportError> {
        let doc = preview::build(resume).ok_or(ExportError::Empty)?;
        self.settings.validate().map_err(ExportError::Layout)?;
        let bitmap = self.rasterizer.rasterize(&doc)?;

        let page_height = page_height_px(
            bitmap.width(),
            self.settings.page_width_mm,
            self.settings.page_height_mm,
        );
        let pages = split_pages(&bitmap, page_height);
        info!(
            width = bitmap.width(),
            height = bitmap.height(),
            page_height,
            pages = pages.len(),
            "rasterized resume"
        );

        let title = format!("{} Resume", resume.personal_info.full_name());
        pdf::write_pdf(
            title.trim(),
            &pages,
            self.settings.page_width_mm,
            self.settings.page_height_mm,
        )
    }

    /// 导出到输出目录，返回文件路径
    pub fn export(&self, resume: &ResumeData) -> Result<PathBuf, ExportError> {
        let bytes = self.render_pdf(resume)?;

        fs::create_dir_all(&self.settings.output_dir)?;
        let path = self
            .settings
            .output_dir
            .join(export_file_name(&resume.personal_info));
        fs::write(&path, bytes)?;

        info!(path = %path.display(), "resume exported");
        Ok(path)
    }
}
