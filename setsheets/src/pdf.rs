use image::imageops::overlay;
use image::{DynamicImage, Rgba, RgbaImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use crate::error::{Error, Result};

const A4_WIDTH: Mm = Mm(210.0);
const A4_HEIGHT: Mm = Mm(297.0);
const MARGIN: Mm = Mm(10.0);

const MM_PER_INCH: f32 = 25.4;

// transparent cells would come out black in the pdf
fn on_white(sheet: &RgbaImage) -> DynamicImage {
    let mut page = RgbaImage::from_pixel(sheet.width(), sheet.height(), Rgba([255, 255, 255, 255]));
    overlay(&mut page, sheet, 0, 0);
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(page).to_rgb8())
}

/// Resolution at which a `width` x `height` pixel sheet just fits inside the
/// page margins.
fn fitting_dpi(width: u32, height: u32) -> f32 {
    let available_width = (A4_WIDTH.0 - 2.0 * MARGIN.0) / MM_PER_INCH;
    let available_height = (A4_HEIGHT.0 - 2.0 * MARGIN.0) / MM_PER_INCH;
    (width as f32 / available_width).max(height as f32 / available_height)
}

fn centered(sheet: &RgbaImage) -> ImageTransform {
    let dpi = fitting_dpi(sheet.width(), sheet.height());
    let width = Mm(sheet.width() as f32 / dpi * MM_PER_INCH);
    let height = Mm(sheet.height() as f32 / dpi * MM_PER_INCH);
    ImageTransform {
        dpi: Some(dpi),
        translate_x: Some((A4_WIDTH - width) / 2.0),
        translate_y: Some((A4_HEIGHT - height) / 2.0),
        ..Default::default()
    }
}

/// One A4 page per sheet, each sheet scaled down to fit and centred.
pub fn sheets_to_pdf(title: &str, sheets: &[RgbaImage]) -> Result<Vec<u8>> {
    let Some((first, rest)) = sheets.split_first() else {
        return Err(Error::Pdf("there are no sheets to print".to_string()));
    };
    let (doc, page1, layer1) = PdfDocument::new(title, A4_WIDTH, A4_HEIGHT, "Layer 1");

    let current_layer = doc.get_page(page1).get_layer(layer1);
    Image::from_dynamic_image(&on_white(first)).add_to_layer(current_layer, centered(first));

    for sheet in rest {
        let (added_page, added_layer) = doc.add_page(A4_WIDTH, A4_HEIGHT, "Layer 1");
        let current_layer = doc.get_page(added_page).get_layer(added_layer);
        Image::from_dynamic_image(&on_white(sheet)).add_to_layer(current_layer, centered(sheet));
    }
    doc.save_to_bytes().map_err(|e| Error::Pdf(e.to_string()))
}
