//! 文档光栅化
//!
//! 拉丁字符用 8x8 点阵字体绘制，其余字符（中文等）用轮廓字体绘制，
//! 整份文档画成一张灰度长图。

use std::cell::OnceCell;
use std::path::PathBuf;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{GrayImage, Luma};
use unicode_width::UnicodeWidthChar;

use super::{ExportError, font};
use crate::config::{MAX_COLUMNS, MIN_COLUMNS};
use crate::preview::{Document, LineStyle, display_width, wrap_words};

const GLYPH: u32 = 8;
const LEADING: u32 = 4;
const MARGIN: u32 = 24;
/// 放大前的最大高度
const MAX_BASE_HEIGHT: u64 = 1 << 15;
/// 放大后的最大像素数
const MAX_PIXELS: u64 = 1 << 27;

const WHITE: u8 = 255;

/// 把文档画成位图
pub trait Rasterizer {
    fn rasterize(&self, doc: &Document) -> Result<GrayImage, ExportError>;
}

/// 点阵 + 轮廓字体光栅化器
pub struct GlyphRasterizer {
    columns: usize,
    scale: u32,
    font_path: Option<PathBuf>,
    // 首次遇到非拉丁字符时加载
    font: OnceCell<Option<FontVec>>,
}

struct Row {
    style: LineStyle,
    text: String,
    size: u32,
}

impl Row {
    fn height(&self) -> u64 {
        u64::from(GLYPH * self.size + LEADING)
    }
}

impl GlyphRasterizer {
    pub fn new(columns: usize, scale: u32) -> Self {
        Self {
            columns,
            scale,
            font_path: None,
            font: OnceCell::new(),
        }
    }

    /// 指定轮廓字体文件；为 None 时在系统字体中查找
    pub fn with_font_path(mut self, path: Option<PathBuf>) -> Self {
        self.font_path = path;
        self
    }

    #[cfg(test)]
    fn with_font(self, font: Option<FontVec>) -> Self {
        let _ = self.font.set(font);
        self
    }

    fn outline_font(&self) -> Result<Option<&FontVec>, ExportError> {
        if let Some(font) = self.font.get() {
            return Ok(font.as_ref());
        }
        let loaded = font::resolve(self.font_path.as_deref())?;
        Ok(self.font.get_or_init(|| loaded).as_ref())
    }

    fn layout(&self, doc: &Document) -> Vec<Row> {
        let mut rows = Vec::new();
        for line in &doc.lines {
            let size = if line.style == LineStyle::Name { 2 } else { 1 };
            let width = self.columns / size as usize;
            let text = if line.style == LineStyle::Heading {
                line.text.to_uppercase()
            } else {
                line.text.clone()
            };
            for piece in wrap_words(&text, width) {
                rows.push(Row {
                    style: line.style,
                    text: piece,
                    size,
                });
            }
        }
        rows
    }

    fn text_width(&self) -> u32 {
        self.columns as u32 * GLYPH
    }
}

impl Rasterizer for GlyphRasterizer {
    fn rasterize(&self, doc: &Document) -> Result<GrayImage, ExportError> {
        if self.scale == 0 || !(MIN_COLUMNS..=MAX_COLUMNS).contains(&self.columns) {
            return Err(ExportError::Raster(format!(
                "无效的版面参数: columns={} scale={}",
                self.columns, self.scale
            )));
        }

        let rows = self.layout(doc);
        let base_height = u64::from(2 * MARGIN) + rows.iter().map(Row::height).sum::<u64>();
        if base_height > MAX_BASE_HEIGHT {
            return Err(ExportError::Raster(format!(
                "文档过长: {} 行",
                rows.len()
            )));
        }

        let s = self.scale;
        let size = (self.text_width() + 2 * MARGIN)
            .checked_mul(s)
            .zip((base_height as u32).checked_mul(s))
            .filter(|(w, h)| u64::from(*w) * u64::from(*h) <= MAX_PIXELS);
        let Some((width, height)) = size else {
            return Err(ExportError::Raster(format!(
                "位图过大: scale={} 行数={}",
                s,
                rows.len()
            )));
        };

        let needs_outline = rows
            .iter()
            .flat_map(|row| row.text.chars())
            .any(|c| bitmap_glyph(c).is_none());
        let outline = if needs_outline {
            self.outline_font()?
        } else {
            None
        };

        let mut canvas = GrayImage::from_pixel(width, height, Luma([WHITE]));
        let mut pen = Pen {
            canvas: &mut canvas,
            outline,
        };

        let mut y = MARGIN;
        for row in &rows {
            let glyph_px = GLYPH * row.size;
            let text_px = display_width(&row.text) as u32 * glyph_px;
            let x = if row.style.is_centered() {
                MARGIN + self.text_width().saturating_sub(text_px) / 2
            } else {
                MARGIN
            };

            let bold = matches!(
                row.style,
                LineStyle::Name | LineStyle::Heading | LineStyle::Title
            );
            pen.draw_text(x * s, y * s, &row.text, row.size * s, shade(row.style), bold)?;

            if row.style == LineStyle::Heading {
                // 标题下划线
                let rule_y = (y + glyph_px + 1) * s;
                fill_rect(&mut *pen.canvas, MARGIN * s, rule_y, self.text_width() * s, s, 0);
            }
            y += GLYPH * row.size + LEADING;
        }

        Ok(canvas)
    }
}

fn shade(style: LineStyle) -> u8 {
    match style {
        LineStyle::Name | LineStyle::Heading | LineStyle::Title => 0,
        LineStyle::Body => 40,
        LineStyle::Subtitle | LineStyle::Contact => 80,
        LineStyle::Date => 110,
        LineStyle::Blank => WHITE,
    }
}

/// 点阵字体中的字形
fn bitmap_glyph(c: char) -> Option<[u8; 8]> {
    let c = match c {
        '•' => '·',
        '–' | '—' => '-',
        other => other,
    };
    BASIC_FONTS.get(c).or_else(|| LATIN_FONTS.get(c))
}

struct Pen<'a> {
    canvas: &'a mut GrayImage,
    outline: Option<&'a FontVec>,
}

impl Pen<'_> {
    /// `dot` 为每个点阵点的像素边长，一列宽 8 * dot
    fn draw_text(
        &mut self,
        x: u32,
        y: u32,
        text: &str,
        dot: u32,
        value: u8,
        bold: bool,
    ) -> Result<(), ExportError> {
        let cell = GLYPH * dot;
        let mut origin_x = x;
        for c in text.chars() {
            let columns = c.width().unwrap_or(0) as u32;
            if columns == 0 {
                continue;
            }

            if let Some(bits) = bitmap_glyph(c) {
                self.draw_bitmap(origin_x, y, &bits, dot, value, bold);
            } else {
                let font = self
                    .outline
                    .filter(|font| font.glyph_id(c).0 != 0)
                    .ok_or_else(|| {
                        ExportError::Raster(format!(
                            "缺少字形 '{}' (U+{:04X})，请在配置中设置 export.font_path",
                            c, c as u32
                        ))
                    })?;
                self.draw_outline(font, c, origin_x, y, cell, value);
            }
            origin_x += columns * cell;
        }
        Ok(())
    }

    fn draw_bitmap(&mut self, x: u32, y: u32, bits: &[u8; 8], dot: u32, value: u8, bold: bool) {
        for (gy, row) in bits.iter().enumerate() {
            for gx in 0..GLYPH {
                if row & (1u8 << gx) == 0 {
                    continue;
                }
                let px = x + gx * dot;
                let py = y + gy as u32 * dot;
                fill_rect(self.canvas, px, py, dot, dot, value);
                if bold {
                    fill_rect(self.canvas, px + dot.div_ceil(2), py, dot, dot, value);
                }
            }
        }
    }

    /// 轮廓字形按覆盖率混合，字高等于一行点阵高度
    fn draw_outline(&mut self, font: &FontVec, c: char, x: u32, y: u32, cell: u32, value: u8) {
        let scale = PxScale::from(cell as f32);
        let ascent = font.as_scaled(scale).ascent();
        let glyph = font
            .glyph_id(c)
            .with_scale_and_position(scale, point(x as f32, y as f32 + ascent));
        let Some(outlined) = font.outline_glyph(glyph) else {
            return;
        };

        let bounds = outlined.px_bounds();
        let canvas = &mut *self.canvas;
        let (width, height) = canvas.dimensions();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i64 + i64::from(gx);
            let py = bounds.min.y as i64 + i64::from(gy);
            if px < 0 || py < 0 || px >= i64::from(width) || py >= i64::from(height) {
                return;
            }
            let ink = f32::from(WHITE) - coverage.clamp(0.0, 1.0) * f32::from(WHITE - value);
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            pixel.0[0] = pixel.0[0].min(ink as u8);
        });
    }
}

fn fill_rect(canvas: &mut GrayImage, x: u32, y: u32, w: u32, h: u32, value: u8) {
    let x_end = x.saturating_add(w).min(canvas.width());
    let y_end = y.saturating_add(h).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, Luma([value]));
        }
    }
}
