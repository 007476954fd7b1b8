//! Standalone SVG document assembly from a resolved layout.

use aksar_text::{ClusterKind, ResolvedGlyph, WordLayout};

/// Fill color per role, matching the lesson UI palette.
fn fill(glyph: &ResolvedGlyph) -> &'static str {
    if glyph.is_subscript {
        return "#60a5fa";
    }
    match glyph.role {
        ClusterKind::Consonant => "#4ade80",
        ClusterKind::Subscript => "#60a5fa",
        ClusterKind::Vowel => "#fbbf24",
        ClusterKind::Diacritic => "#c084fc",
        ClusterKind::Numeral => "#f87171",
        ClusterKind::Compound => "#22d3ee",
        ClusterKind::Punctuation | ClusterKind::Other => "#d1d5db",
    }
}

/// Build a standalone `<svg>` document with one colored path per glyph
/// and the union view box (plus padding) as the frame.
pub fn document(layout: &WordLayout, padding: f32) -> String {
    let vb = layout.view_box(padding);
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        vb.min_x, vb.min_y, vb.width, vb.height
    );
    for glyph in &layout.glyphs {
        if glyph.path_data.is_empty() {
            continue;
        }
        out.push_str(&format!(
            r#"<path d="{}" fill="{}" data-id="{}" data-char="{}"/>"#,
            glyph.path_data,
            fill(glyph),
            glyph.id,
            glyph.ch,
        ));
    }
    out.push_str("</svg>");
    out
}
