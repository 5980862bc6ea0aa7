//! A4 presentation sheet: framed page, colored banner with a title, and the
//! rasterized plan diagram centered below it.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use thiserror::Error;
use tracing::debug;

use crate::raster::RasterImage;

/// A4 in PDF points.
pub const PAGE_W: f32 = 595.2756;
pub const PAGE_H: f32 = 841.8898;
const MARGIN: f32 = 30.0;
const FRAME_WIDTH: f32 = 4.0;
const BANNER_H: f32 = 60.0;
const TITLE_SIZE: f32 = 18.0;
const BANNER_RGB: (f32, f32, f32) = (1.0, 0.576, 0.118); // #ff931e

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("diagram image is empty")]
    EmptyImage,
}

/// Where the diagram lands on the page, in points from the bottom-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Scale the image into the area under the banner, keeping its proportions.
pub fn place_image(img_w: u32, img_h: u32) -> Placement {
    let avail_w = PAGE_W - 40.0;
    let avail_h = PAGE_H - BANNER_H - 60.0;
    let scale = (avail_w / img_w as f32).min(avail_h / img_h as f32);
    let w = img_w as f32 * scale;
    let h = img_h as f32 * scale;
    Placement {
        x: (PAGE_W - w) / 2.0,
        y: (PAGE_H - BANNER_H - h) / 2.0,
        w,
        h,
    }
}

// Helvetica-Bold advance widths (1/1000 em) for ASCII 32..=126.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 278, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    278, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Titles are set in a standard font without embedding, so only printable
/// ASCII survives; anything else becomes '?'.
fn title_bytes(title: &str) -> Vec<u8> {
    title
        .chars()
        .map(|c| if (' '..='~').contains(&c) { c as u8 } else { b'?' })
        .collect()
}

/// Width of `text` in points when set in Helvetica-Bold at `size`.
pub fn text_width(text: &[u8], size: f32) -> f32 {
    let units: u32 = text
        .iter()
        .map(|&b| {
            HELVETICA_BOLD_WIDTHS
                .get(usize::from(b.wrapping_sub(32)))
                .copied()
                .unwrap_or(556) as u32
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Write a one-page PDF holding the diagram under a titled banner.
pub fn build_sheet(image: &RasterImage, title: &str) -> Result<Vec<u8>, SheetError> {
    if image.width == 0 || image.height == 0 || image.rgba.is_empty() {
        return Err(SheetError::EmptyImage);
    }

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let font_id = Ref::new(4);
    let image_id = Ref::new(5);
    let content_id = Ref::new(6);
    let font_name = Name(b"F1");
    let image_name = Name(b"Im1");

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, PAGE_W, PAGE_H));
    page.parent(page_tree_id);
    page.contents(content_id);
    let mut resources = page.resources();
    resources.fonts().pair(font_name, font_id);
    resources.x_objects().pair(image_name, image_id);
    resources.finish();
    page.finish();

    pdf.type1_font(font_id).base_font(Name(b"Helvetica-Bold"));

    let rgb = image.to_rgb();
    let mut xobj = pdf.image_xobject(image_id, &rgb);
    xobj.width(image.width as i32);
    xobj.height(image.height as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    xobj.finish();

    let mut content = Content::new();

    content.set_stroke_rgb(0.0, 0.0, 0.0);
    content.set_line_width(FRAME_WIDTH);
    content.rect(MARGIN, MARGIN, PAGE_W - 2.0 * MARGIN, PAGE_H - 2.0 * MARGIN);
    content.stroke();

    let (r, g, b) = BANNER_RGB;
    content.set_fill_rgb(r, g, b);
    content.rect(0.0, PAGE_H - BANNER_H, PAGE_W, BANNER_H);
    content.fill_nonzero();

    let title = title_bytes(title);
    let tx = (PAGE_W - text_width(&title, TITLE_SIZE)) / 2.0;
    let ty = PAGE_H - BANNER_H + 25.0;
    content.set_fill_rgb(1.0, 1.0, 1.0);
    content.begin_text();
    content.set_font(font_name, TITLE_SIZE);
    content.next_line(tx, ty);
    content.show(Str(&title));
    content.end_text();

    let at = place_image(image.width, image.height);
    debug!(x = at.x, y = at.y, w = at.w, h = at.h, "Placing diagram on sheet");
    content.save_state();
    content.transform([at.w, 0.0, 0.0, at.h, at.x, at.y]);
    content.x_object(image_name);
    content.restore_state();

    pdf.stream(content_id, &content.finish());
    Ok(pdf.finish())
}
