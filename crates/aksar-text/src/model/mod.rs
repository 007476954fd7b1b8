//! The interactive glyph model: what the pipeline hands to a host UI.

pub mod hit;

use crate::outline::BBox;
use crate::overrides::ZoneRegion;
use crate::unicode::cluster::ClusterKind;

/// One render-order glyph annotated with its logical character, role, and
/// vector geometry. Consumed immediately by the presentation layer; not
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGlyph {
    /// Stable id, assigned in render (visual) order.
    pub id: usize,
    /// Resolved logical character. Never the coeng mark.
    pub ch: char,
    /// Kind of the owning logical cluster.
    pub role: ClusterKind,
    /// True when the glyph renders a coeng+consonant subscript.
    pub is_subscript: bool,
    /// Owning logical cluster, if one matched (None only for the
    /// best-effort fallback units).
    pub cluster_id: Option<usize>,
    /// First owned codepoint index in the source string; sort by this to
    /// recover logical reading order.
    pub source_index: usize,
    /// SVG-path outline in y-down space; empty for ink-free glyphs.
    pub path_data: String,
    /// Tight bounding box of the outline.
    pub bbox: BBox,
    /// Pen position the outline was laid out at (baseline at `y`).
    pub x: f32,
    pub y: f32,
    /// Advances in pixels (engine-native sign: y positive = up).
    pub x_advance: f32,
    pub y_advance: f32,
    /// Hit zones attached by an override rule; empty = whole box.
    pub hit_zones: Vec<ZoneRegion>,
}

/// Viewport framing for the consuming UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    pub fn zero() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }
}

/// The fully resolved layout of one shaped word.
#[derive(Debug, Clone, PartialEq)]
pub struct WordLayout {
    /// Normalized input text the layout was produced from.
    pub text: String,
    pub font_size: f32,
    /// Glyphs in render order.
    pub glyphs: Vec<ResolvedGlyph>,
    /// Total advance width of the word in pixels.
    pub width: f32,
}

impl WordLayout {
    /// Layout for empty input: no glyphs, no failure.
    pub fn empty(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            glyphs: Vec::new(),
            width: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Union of all inked glyph boxes, expanded by `padding` on every
    /// side. A layout with no ink yields a zero box.
    pub fn view_box(&self, padding: f32) -> ViewBox {
        let mut union: Option<BBox> = None;
        for glyph in &self.glyphs {
            if glyph.bbox.is_empty() {
                continue;
            }
            union = Some(match union {
                Some(b) => b.union(&glyph.bbox),
                None => glyph.bbox,
            });
        }
        match union {
            Some(b) => ViewBox {
                min_x: b.x1 - padding,
                min_y: b.y1 - padding,
                width: b.width() + padding * 2.0,
                height: b.height() + padding * 2.0,
            },
            None => ViewBox::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(id: usize, bbox: BBox) -> ResolvedGlyph {
        ResolvedGlyph {
            id,
            ch: 'ក',
            role: ClusterKind::Consonant,
            is_subscript: false,
            cluster_id: Some(0),
            source_index: 0,
            path_data: "M0 0".into(),
            bbox,
            x: 0.0,
            y: 0.0,
            x_advance: 10.0,
            y_advance: 0.0,
            hit_zones: Vec::new(),
        }
    }

    #[test]
    fn view_box_unions_and_pads() {
        let layout = WordLayout {
            text: "កក".into(),
            font_size: 100.0,
            glyphs: vec![
                glyph(0, BBox {
                    x1: 0.0,
                    y1: -80.0,
                    x2: 50.0,
                    y2: 0.0,
                }),
                glyph(1, BBox {
                    x1: 50.0,
                    y1: -90.0,
                    x2: 110.0,
                    y2: 10.0,
                }),
            ],
            width: 110.0,
        };
        let vb = layout.view_box(20.0);
        assert_eq!(vb.min_x, -20.0);
        assert_eq!(vb.min_y, -110.0);
        assert_eq!(vb.width, 150.0);
        assert_eq!(vb.height, 140.0);
    }

    #[test]
    fn blank_glyphs_do_not_stretch_the_frame() {
        let mut space = glyph(1, BBox::point(60.0, 0.0));
        space.path_data.clear();
        let layout = WordLayout {
            text: "ក ".into(),
            font_size: 100.0,
            glyphs: vec![
                glyph(0, BBox {
                    x1: 0.0,
                    y1: -80.0,
                    x2: 50.0,
                    y2: 0.0,
                }),
                space,
            ],
            width: 90.0,
        };
        let vb = layout.view_box(0.0);
        assert_eq!(vb.width, 50.0);
    }

    #[test]
    fn empty_layout_has_zero_view_box() {
        let layout = WordLayout::empty("", 100.0);
        assert_eq!(layout.view_box(40.0), ViewBox::zero());
        assert!(layout.is_empty());
    }
}
