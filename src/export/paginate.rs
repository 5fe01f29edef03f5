//! 位图分页
//!
//! 自上而下按固定页高切片，不感知内容，可能把一行文字截在两页之间。

use image::{GrayImage, imageops};

/// 一页对应的位图区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    pub offset: u32,
    pub height: u32,
}

/// 按纸张比例换算页高（像素）
pub fn page_height_px(image_width: u32, page_width_mm: f32, page_height_mm: f32) -> u32 {
    (page_height_mm * image_width as f32 / page_width_mm).round() as u32
}

/// 计算各页区间；页数为 ceil(H / P)，最后一页止于 H
pub fn page_slices(image_height: u32, page_height: u32) -> Vec<PageSlice> {
    let mut slices = Vec::new();
    if page_height == 0 {
        return slices;
    }

    let mut offset = 0;
    while offset < image_height {
        let height = page_height.min(image_height - offset);
        slices.push(PageSlice { offset, height });
        offset += page_height;
    }
    slices
}

/// 把长图切成逐页位图
pub fn split_pages(image: &GrayImage, page_height: u32) -> Vec<GrayImage> {
    page_slices(image.height(), page_height)
        .into_iter()
        .map(|slice| imageops::crop_imm(image, 0, slice.offset, image.width(), slice.height).to_image())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_page_count_is_ceil() {
        assert_eq!(page_slices(1000, 300).len(), 4);
        assert_eq!(page_slices(900, 300).len(), 3);
        assert_eq!(page_slices(901, 300).len(), 4);
        assert_eq!(page_slices(200, 300).len(), 1);
        assert!(page_slices(0, 300).is_empty());
        assert!(page_slices(100, 0).is_empty());
    }

    #[test]
    fn test_last_page_ends_at_height() {
        let slices = page_slices(1000, 300);
        let last = slices.last().unwrap();
        assert_eq!(last.offset + last.height, 1000);
        assert_eq!(last.height, 100);

        // 中间页连续、不重叠
        for pair in slices.windows(2) {
            assert_eq!(pair[0].offset + pair[0].height, pair[1].offset);
        }
    }

    #[test]
    fn test_page_height_px_keeps_aspect() {
        assert_eq!(page_height_px(210, 210.0, 295.0), 295);
        assert_eq!(page_height_px(420, 210.0, 297.0), 594);
    }

    #[test]
    fn test_split_pages_reveals_each_slice() {
        let mut image = GrayImage::from_pixel(4, 10, Luma([255]));
        // 每行写入行号，便于校验切片位置
        for y in 0..10 {
            image.put_pixel(0, y, Luma([y as u8]));
        }

        let pages = split_pages(&image, 4);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].get_pixel(0, 0).0[0], 4);
        assert_eq!(pages[2].height(), 2);
        assert_eq!(pages[2].get_pixel(0, 1).0[0], 9);
        assert!(pages.iter().all(|p| p.width() == 4));
    }
}
