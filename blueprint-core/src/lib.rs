pub mod error;

pub use error::{BlueprintError, BlueprintResult};

use png::{BitDepth, ColorType, Encoder};
use shelf_core::{Plan, Room, Wall};
use tracing::debug;

/// Diagram canvas in SVG user units.
pub const VIEW_W: f64 = 820.0;
pub const VIEW_H: f64 = 620.0;
/// Nominal output size written on the `<svg>` element.
pub const OUT_W: u32 = 900;
pub const OUT_H: u32 = 680;
const PAD: f64 = 40.0;
const GRID_CM: f64 = 50.0;
// A wall counts as fully shelved when its planned run is this close to its raw length.
const FULL_TOLERANCE_CM: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub fn from_tag(tag: &str) -> Self {
        let t = tag.to_ascii_lowercase();
        if t == "es" || t.starts_with("es-") || t.starts_with("es_") {
            Language::Es
        } else {
            Language::En
        }
    }

    fn legend(self) -> &'static str {
        match self {
            Language::En => "Approximate scale. Grid every 50 cm.",
            Language::Es => "Escala aproximada. Cuadrícula cada 50 cm.",
        }
    }

    /// Title printed on the assembled sheet.
    pub fn sheet_title(self) -> &'static str {
        match self {
            Language::En => "PROPOSED LAYOUT",
            Language::Es => "PLANO PROPUESTO",
        }
    }
}

/// Room outline placed on the canvas: top-left corner, size and cm→unit scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub x0: f64,
    pub y0: f64,
    pub w: f64,
    pub h: f64,
    pub scale: f64,
}

impl Frame {
    /// Fit the room (A wide, max(B, E) deep) into the padded canvas, centered.
    pub fn fit(room: &Room) -> Self {
        let base_w = room.a.max(1.0);
        let base_h = room.b.max(room.e).max(1.0);
        let sx = (VIEW_W - 2.0 * PAD) / base_w;
        let sy = (VIEW_H - 2.0 * PAD) / base_h;
        let scale = sx.min(sy);
        let w = base_w * scale;
        let h = base_h * scale;
        Frame {
            x0: (VIEW_W - w) / 2.0,
            y0: (VIEW_H - h) / 2.0,
            w,
            h,
            scale,
        }
    }
}

/// A shelf run drawn on one wall, with the caption placed next to it.
#[derive(Clone, Debug, PartialEq)]
pub struct ShelfRect {
    pub wall: Wall,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub label: String,
    pub label_x: f64,
    pub label_y: f64,
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= FULL_TOLERANCE_CM
}

/// Shelf rectangles in B, A, E order. Walls without segments are skipped.
pub fn shelf_rects(room: &Room, plan: &Plan, f: &Frame) -> Vec<ShelfRect> {
    let s = f.scale;
    let depth = |w: Wall| f64::from(plan.wall_depth(w).unwrap_or(0));
    let has_a = plan.has_wall(Wall::A);
    let has_b = plan.has_wall(Wall::B);
    let has_e = plan.has_wall(Wall::E);
    let d_a = if has_a { depth(Wall::A) * s } else { 0.0 };

    // Side walls start below A's shelf when they do not run the full length
    // and A only meets this one side.
    let side_start = |wall: Wall, opposite: bool| -> f64 {
        let fills_full = approx_eq(plan.wall_total(wall), room.raw_len(wall));
        if !fills_full && has_a && !opposite {
            f.y0 + d_a
        } else {
            f.y0
        }
    };

    let mut out = Vec::new();
    let total_b = plan.wall_total(Wall::B);
    if total_b > 0.0 {
        let d = depth(Wall::B) * s;
        let y = side_start(Wall::B, has_e);
        out.push(ShelfRect {
            wall: Wall::B,
            x: f.x0 + f.w - d,
            y,
            w: d,
            h: total_b.min(room.b) * s,
            label: format!("{} × {}", fmt_cm(total_b), depth(Wall::B)),
            label_x: f.x0 + f.w - d / 2.0,
            label_y: y - 6.0,
        });
    }
    if plan.wall_total(Wall::A) > 0.0 {
        let len_a = plan.meta.len_a;
        let l = len_a.min(room.a) * s;
        let e_full = has_e && approx_eq(plan.wall_total(Wall::E), room.e);
        let x = if e_full {
            f.x0 + depth(Wall::E) * s
        } else {
            f.x0
        };
        out.push(ShelfRect {
            wall: Wall::A,
            x,
            y: f.y0,
            w: l,
            h: d_a,
            label: format!("{} × {}", fmt_cm(len_a), depth(Wall::A)),
            label_x: x + l / 2.0,
            label_y: f.y0 + d_a + 14.0,
        });
    }
    let total_e = plan.wall_total(Wall::E);
    if total_e > 0.0 {
        let d = depth(Wall::E) * s;
        let y = side_start(Wall::E, has_b);
        out.push(ShelfRect {
            wall: Wall::E,
            x: f.x0,
            y,
            w: d,
            h: total_e.min(room.e) * s,
            label: format!("{} × {}", fmt_cm(total_e), depth(Wall::E)),
            label_x: f.x0 + d / 2.0,
            label_y: y - 6.0,
        });
    }
    out
}

/// Draw the room outline, a 50 cm grid, the planned shelves and their sizes.
///
/// Returns the SVG text and its nominal pixel size.
pub fn build_plan_svg(room: &Room, plan: &Plan, lang: Language) -> (String, u32, u32) {
    let f = Frame::fit(room);
    let rects = shelf_rects(room, plan, &f);
    debug!(scale = f.scale, shelves = rects.len(), "Building plan diagram");

    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    s.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\" width=\"{}\" height=\"{}\" text-rendering=\"optimizeLegibility\">\n",
        VIEW_W, VIEW_H, OUT_W, OUT_H
    ));
    s.push_str(concat!(
        "<style>\n",
        "  text { font-family: sans-serif; fill:#111; }\n",
        "  .legend { font-size:13px; fill:#555; }\n",
        "  .walllbl { font-size:12px; }\n",
        "</style>\n"
    ));

    // 50 cm grid
    s.push_str("<g class=\"grid\" stroke=\"#ddd\" stroke-width=\"1\">\n");
    let step = f.scale * GRID_CM;
    let cols = (f.w / step + 1e-9).floor() as usize;
    for i in 0..=cols {
        let x = f.x0 + i as f64 * step;
        s.push_str(&line(x, f.y0, x, f.y0 + f.h));
    }
    let rows = (f.h / step + 1e-9).floor() as usize;
    for i in 0..=rows {
        let y = f.y0 + i as f64 * step;
        s.push_str(&line(f.x0, y, f.x0 + f.w, y));
    }
    s.push_str("</g>\n");

    s.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"#111\" stroke-width=\"4\"/>\n",
        f.x0, f.y0, f.w, f.h
    ));

    // wall captions
    let caption = |wall: Wall, len: f64| svg_escape(&format!("{} ({} cm)", wall, fmt_cm(len)));
    s.push_str(&text(
        "walllbl",
        f.x0 + f.w / 2.0,
        f.y0 - 10.0,
        "middle",
        &caption(Wall::A, room.a),
    ));
    s.push_str(&text(
        "walllbl",
        f.x0 + f.w + 10.0,
        f.y0 + f.h / 2.0,
        "start",
        &caption(Wall::B, room.b),
    ));
    s.push_str(&text(
        "walllbl",
        f.x0 - 10.0,
        f.y0 + f.h / 2.0,
        "end",
        &caption(Wall::E, room.e),
    ));

    s.push_str("<g fill=\"#e43\" fill-opacity=\"0.15\" stroke=\"#e43\" stroke-width=\"3\">\n");
    for r in &rects {
        s.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/>\n",
            r.x, r.y, r.w, r.h
        ));
    }
    s.push_str("</g>\n");

    // shelf captions stay outside the tinted group so they render black
    for r in &rects {
        s.push_str(&text(
            "legend",
            r.label_x,
            r.label_y,
            "middle",
            &svg_escape(&r.label),
        ));
    }

    s.push_str(&text(
        "legend",
        f.x0,
        f.y0 + f.h + 28.0,
        "start",
        &svg_escape(lang.legend()),
    ));
    s.push_str("</svg>\n");
    (s, OUT_W, OUT_H)
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> String {
    format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>\n",
        x1, y1, x2, y2
    )
}

fn text(class: &str, x: f64, y: f64, anchor: &str, body: &str) -> String {
    format!(
        "<text class=\"{}\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{}\">{}</text>\n",
        class, x, y, anchor, body
    )
}

// Shared PNG encoder: RGBA -> PNG bytes (deterministic for same input)
pub fn encode_rgba_to_png_bytes(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> BlueprintResult<Vec<u8>> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(BlueprintError::BufferSize {
            width,
            height,
            expected,
            actual: rgba.len(),
        });
    }
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        let mut writer = enc.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(buf)
}

// Format centimetres:
// - Near-integers (1e-6) as integers
// - Else one decimal, trailing zero trimmed
pub fn fmt_cm(v: f64) -> String {
    if (v - v.round()).abs() < 1e-6 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

pub fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
