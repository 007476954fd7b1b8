//! Hit-testing helpers for the consuming UI.

use super::{ResolvedGlyph, WordLayout};
use crate::outline::BBox;
use crate::overrides::ZoneRegion;

/// Find the glyph under a point, scanning in reverse render order so the
/// glyph painted last (on top) wins. Blank glyphs never hit.
pub fn hit_test(layout: &WordLayout, x: f32, y: f32) -> Option<&ResolvedGlyph> {
    layout.glyphs.iter().rev().find(|g| glyph_hit(g, x, y))
}

fn glyph_hit(glyph: &ResolvedGlyph, x: f32, y: f32) -> bool {
    if glyph.bbox.is_empty() {
        return false;
    }
    if glyph.hit_zones.is_empty() {
        return glyph.bbox.contains(x, y);
    }
    glyph
        .hit_zones
        .iter()
        .any(|&zone| zone_rect(&glyph.bbox, zone).contains(x, y))
}

/// Sub-rectangle of a bounding box addressed by a zone region: vertical
/// halves for Top/Bottom, the middle vertical band for Center.
pub fn zone_rect(bbox: &BBox, region: ZoneRegion) -> BBox {
    let mid_y = (bbox.y1 + bbox.y2) / 2.0;
    match region {
        ZoneRegion::Top => BBox {
            x1: bbox.x1,
            y1: bbox.y1,
            x2: bbox.x2,
            y2: mid_y,
        },
        ZoneRegion::Bottom => BBox {
            x1: bbox.x1,
            y1: mid_y,
            x2: bbox.x2,
            y2: bbox.y2,
        },
        ZoneRegion::Center => {
            let quarter = bbox.height() / 4.0;
            BBox {
                x1: bbox.x1,
                y1: bbox.y1 + quarter,
                x2: bbox.x2,
                y2: bbox.y2 - quarter,
            }
        }
    }
}

/// Ray-casting point-in-polygon test for authored hit polygons.
pub fn point_in_polygon(x: f32, y: f32, polygon: &[[f32; 2]]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
