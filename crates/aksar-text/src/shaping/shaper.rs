use harfrust::{
    Direction as HbDirection,
    Feature as HbFeature,
    FontRef as HbFontRef,
    Script as HbScript,
    ShaperData,
    ShaperInstance,
    Tag as HbTag,
    UnicodeBuffer as HbUnicodeBuffer,
};

use crate::error::ShapeError;
use crate::font::FontFace;

use super::{FeatureSetting, ShapeOptions, ShapedGlyph};

const LIGATURE_TAGS: [&[u8; 4]; 3] = [b"liga", b"clig", b"rlig"];
const KHMER_FEATURE_TAGS: [&[u8; 4]; 8] = [
    b"ccmp", b"pref", b"blwf", b"pstf", b"abvf", b"abvs", b"pres", b"psts",
];

/// Khmer text shaper built on harfrust (pure-Rust HarfBuzz port).
pub struct KhmerShaper;

impl KhmerShaper {
    /// Shape a UTF-8 string with the Khmer script tag, left-to-right.
    ///
    /// Returns glyphs in visual order with positions scaled to pixels and
    /// cluster references normalized to codepoint indices. Fails with
    /// `ShapingUnavailable` when the engine cannot read the font; never
    /// returns a partial glyph list.
    pub fn shape(
        font: &FontFace,
        text: &str,
        size: f32,
        options: &ShapeOptions,
    ) -> Result<Vec<ShapedGlyph>, ShapeError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let font_data = font.as_bytes();
        let font_ref = HbFontRef::from_index(&font_data, font.index())
            .map_err(|e| ShapeError::ShapingUnavailable(format!("engine rejected font: {e}")))?;

        // Shaper configuration with default (no variations) instance.
        let data = ShaperData::new(&font_ref);
        let instance = ShaperInstance::from_variations(
            &font_ref,
            core::iter::empty::<harfrust::Variation>(),
        );
        let shaper = data
            .shaper(&font_ref)
            .instance(Some(&instance))
            .point_size(None)
            .build();

        let mut buffer = HbUnicodeBuffer::new();
        buffer.push_str(text);
        buffer.set_direction(HbDirection::LeftToRight);
        if let Some(script) = HbScript::from_iso15924_tag(HbTag::new(b"Khmr")) {
            buffer.set_script(script);
        }
        buffer.guess_segment_properties();

        let features = build_features(options);
        let glyph_buffer = shaper.shape(buffer, &features);
        let infos = glyph_buffer.glyph_infos();
        let positions = glyph_buffer.glyph_positions();

        // harfrust works in design units; scale to pixels via units-per-em.
        let metrics = font.metrics();
        let scale = if metrics.units_per_em != 0 {
            size / metrics.units_per_em as f32
        } else {
            1.0
        };

        // The engine reports clusters as UTF-8 byte offsets (`push_str`
        // assigns `char_indices`); this is the single place where byte
        // offsets are converted to codepoint indices.
        let byte_to_char = byte_to_char_table(text);
        let char_count = byte_to_char.last().map(|&c| c + 1).unwrap_or(0);

        let mut glyphs = Vec::with_capacity(infos.len());
        for (info, pos) in infos.iter().zip(positions.iter()) {
            let byte = info.cluster as usize;
            let cluster = if byte < byte_to_char.len() {
                byte_to_char[byte]
            } else {
                tracing::warn!(byte, "cluster byte offset past end of input");
                char_count.saturating_sub(1)
            };

            glyphs.push(ShapedGlyph {
                glyph_id: info.glyph_id as u16,
                cluster,
                x_advance: pos.x_advance as f32 * scale,
                y_advance: pos.y_advance as f32 * scale,
                x_offset: pos.x_offset as f32 * scale,
                y_offset: pos.y_offset as f32 * scale,
            });
        }

        Ok(glyphs)
    }
}

fn build_features(options: &ShapeOptions) -> Vec<HbFeature> {
    if !options.features.is_empty() {
        return options
            .features
            .iter()
            .map(|&FeatureSetting { tag, value }| HbFeature::new(HbTag::new(&tag), value, 0..))
            .collect();
    }

    let mut features = Vec::new();
    if options.disable_ligatures {
        features.extend(
            LIGATURE_TAGS
                .iter()
                .map(|tag| HbFeature::new(HbTag::new(tag), 0, 0..)),
        );
    }
    if options.disable_khmer_features {
        features.extend(
            KHMER_FEATURE_TAGS
                .iter()
                .map(|tag| HbFeature::new(HbTag::new(tag), 0, 0..)),
        );
    }
    features
}

/// Map every byte offset of `text` to the index of the codepoint
/// containing it.
fn byte_to_char_table(text: &str) -> Vec<usize> {
    let mut table = vec![0usize; text.len()];
    for (ci, (bi, c)) in text.char_indices().enumerate() {
        for slot in table.iter_mut().skip(bi).take(c.len_utf8()) {
            *slot = ci;
        }
    }
    table
}
