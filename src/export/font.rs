//! 轮廓字体加载
//!
//! 点阵字体只覆盖拉丁字符，中文等字符需要一份轮廓字体。
//! 优先使用配置中的 `export.font_path`，否则在常见的系统位置查找。

use std::fs;
use std::path::Path;

use ab_glyph::FontVec;
use tracing::{debug, info};

use super::ExportError;

/// 常见的 CJK 字体位置
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-zenhei.ttc",
    "/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
];

/// 读取字体文件（字体集合取第一个）
pub fn load(path: &Path) -> Result<FontVec, ExportError> {
    let data = fs::read(path)
        .map_err(|e| ExportError::Raster(format!("无法读取字体 {}: {}", path.display(), e)))?;
    FontVec::try_from_vec_and_index(data, 0)
        .map_err(|e| ExportError::Raster(format!("无法解析字体 {}: {}", path.display(), e)))
}

/// 在系统字体目录中查找第一个可用的 CJK 字体
pub fn discover() -> Option<FontVec> {
    SYSTEM_FONTS
        .iter()
        .map(Path::new)
        .filter(|path| path.exists())
        .find_map(|path| match load(path) {
            Ok(font) => {
                info!(font = %path.display(), "outline font loaded");
                Some(font)
            }
            Err(err) => {
                debug!(error = %err, "skipping font");
                None
            }
        })
}

/// 配置了路径时必须能加载；否则退回系统查找，找不到返回 None
pub fn resolve(configured: Option<&Path>) -> Result<Option<FontVec>, ExportError> {
    match configured {
        Some(path) => load(path).map(Some),
        None => Ok(discover()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_font_must_load() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.ttf");
        assert!(matches!(resolve(Some(missing.as_path())), Err(ExportError::Raster(_))));

        let garbage = dir.path().join("garbage.ttf");
        fs::write(&garbage, b"not a font").unwrap();
        assert!(matches!(load(&garbage), Err(ExportError::Raster(_))));
    }
}
