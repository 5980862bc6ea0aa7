use std::sync::Arc;

use blueprint_core::{BlueprintError, encode_rgba_to_png_bytes};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("SVG parse error: {0}")]
    Svg(#[from] usvg::Error),

    #[error("pixmap alloc failed ({width}x{height})")]
    PixmapAlloc { width: u32, height: u32 },

    #[error(transparent)]
    Encode(#[from] BlueprintError),
}

/// Rendered diagram, RGBA with premultiplied alpha over a white background.
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RasterImage {
    pub fn to_png(&self) -> Result<Vec<u8>, RasterError> {
        Ok(encode_rgba_to_png_bytes(self.width, self.height, &self.rgba)?)
    }

    /// Drop alpha by compositing over white.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.rgba.len() / 4 * 3);
        for px in self.rgba.chunks_exact(4) {
            let cover = 255 - px[3];
            out.extend(px[..3].iter().map(|&c| c.saturating_add(cover)));
        }
        out
    }
}

/// Render `svg` into a `width`×`height` image, keeping its aspect ratio and
/// centering it on white.
pub fn rasterize(svg: &str, width: u32, height: u32) -> Result<RasterImage, RasterError> {
    let mut opt = usvg::Options::default();
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    // Map generic 'sans-serif' to whatever face is installed first
    let family_name = fontdb
        .faces()
        .next()
        .and_then(|face| face.families.first().map(|(n, _)| n.clone()));
    if let Some(name) = family_name {
        fontdb.set_sans_serif_family(name);
    }
    opt.fontdb = Arc::new(fontdb);

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterError::PixmapAlloc { width, height })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let size = tree.size();
    let scale = (width as f32 / size.width()).min(height as f32 / size.height());
    let dx = (width as f32 - size.width() * scale) / 2.0;
    let dy = (height as f32 - size.height() * scale) / 2.0;
    debug!(width, height, scale, "Rasterizing diagram");
    let transform = tiny_skia::Transform::from_scale(scale, scale).post_translate(dx, dy);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Ok(RasterImage {
        width,
        height,
        rgba: pixmap.take(),
    })
}
