//! Glyph contour extraction and path serialization.
//!
//! Outlines are serialized as an SVG-path mini-language (`M`/`L`/`Q`/`C`/`Z`)
//! with 3-decimal precision, y growing downward and the baseline at the pen's
//! y coordinate. The bounding box is tight: curve extrema are solved, not
//! approximated by control points.

mod path;

pub use path::PathBuilder;

use swash::zeno::Verb;

/// Axis-aligned bounding box in output (y-down) path space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BBox {
    /// Degenerate box at a single point.
    pub fn point(x: f32, y: f32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x,
            y2: y,
        }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

/// A glyph's serialized contour plus its tight bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphOutline {
    /// SVG-path command string; empty for blank glyphs (e.g. space).
    pub path_data: String,
    pub bbox: BBox,
}

impl GlyphOutline {
    /// Blank outline at the pen position (space and other ink-free glyphs).
    pub fn empty_at(x: f32, y: f32) -> Self {
        Self {
            path_data: String::new(),
            bbox: BBox::point(x, y),
        }
    }
}

/// The seam between the resolver and the font program.
///
/// Production code uses `FontFace`; tests substitute a stub so resolution
/// logic (including forced splits) runs without a real font.
pub trait OutlineSource {
    /// Character-to-glyph lookup via the font's cmap. None when unmapped.
    fn glyph_for_char(&self, c: char) -> Option<u16>;

    /// Horizontal advance for a glyph, scaled to the requested size.
    fn advance(&self, glyph_id: u16, size: f32) -> f32;

    /// Extract a glyph outline positioned at (x, y) with baseline at y.
    fn outline_glyph(&self, glyph_id: u16, x: f32, y: f32, size: f32) -> GlyphOutline;
}

/// Convert a swash outline (y-up, already scaled by the scaler) into path
/// space at the pen position (x, y).
pub(crate) fn from_swash(
    outline: &swash::scale::outline::Outline,
    x: f32,
    y: f32,
) -> GlyphOutline {
    let points = outline.points();
    let verbs = outline.verbs();
    if verbs.is_empty() {
        return GlyphOutline::empty_at(x, y);
    }

    let mut builder = PathBuilder::new();
    let mut p = 0;
    let at = |i: usize| {
        let v = points[i];
        (x + v.x, y - v.y)
    };

    for verb in verbs {
        match verb {
            Verb::MoveTo => {
                let (px, py) = at(p);
                builder.move_to(px, py);
                p += 1;
            }
            Verb::LineTo => {
                let (px, py) = at(p);
                builder.line_to(px, py);
                p += 1;
            }
            Verb::QuadTo => {
                let (cx, cy) = at(p);
                let (px, py) = at(p + 1);
                builder.quad_to(cx, cy, px, py);
                p += 2;
            }
            Verb::CurveTo => {
                let (c1x, c1y) = at(p);
                let (c2x, c2y) = at(p + 1);
                let (px, py) = at(p + 2);
                builder.curve_to(c1x, c1y, c2x, c2y, px, py);
                p += 3;
            }
            Verb::Close => builder.close(),
        }
    }

    builder.finish(x, y)
}
