//! 逐页位图写入 PDF

use image::{DynamicImage, GrayImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument, PdfLayerReference};

use super::ExportError;

const MM_PER_INCH: f32 = 25.4;

/// 每页放一张切片，宽度铺满页宽、顶端对齐
pub fn write_pdf(
    title: &str,
    pages: &[GrayImage],
    page_width_mm: f32,
    page_height_mm: f32,
) -> Result<Vec<u8>, ExportError> {
    let (first, rest) = pages.split_first().ok_or(ExportError::Empty)?;

    let (doc, page, layer) = PdfDocument::new(
        title,
        Mm(page_width_mm),
        Mm(page_height_mm),
        "Page 1",
    );
    place(
        doc.get_page(page).get_layer(layer),
        first,
        page_width_mm,
        page_height_mm,
    );

    for (i, slice) in rest.iter().enumerate() {
        let (page, layer) = doc.add_page(
            Mm(page_width_mm),
            Mm(page_height_mm),
            format!("Page {}", i + 2),
        );
        place(
            doc.get_page(page).get_layer(layer),
            slice,
            page_width_mm,
            page_height_mm,
        );
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

fn place(layer: PdfLayerReference, slice: &GrayImage, page_width_mm: f32, page_height_mm: f32) {
    let dpi = slice.width() as f32 * MM_PER_INCH / page_width_mm;
    let height_mm = slice.height() as f32 * MM_PER_INCH / dpi;

    let rgb = DynamicImage::ImageLuma8(slice.clone()).to_rgb8();
    Image::from_dynamic_image(&DynamicImage::ImageRgb8(rgb)).add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            // PDF 原点在左下角
            translate_y: Some(Mm(page_height_mm - height_mm)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}
