//! One-call facade over the shaping pipeline.

use std::sync::Arc;

use crate::error::Result;
use crate::font::{FontCache, FontFace, FontKey};
use crate::model::WordLayout;
use crate::overrides::OverrideTable;
use crate::resolve;
use crate::shaping::{KhmerShaper, ShapeOptions};
use crate::unicode::cluster::{ManualUnit, tokenize, tokenize_with_units};
use crate::unicode::normalize::normalize_khmer;

/// A fully specified render request: text, font identity, target size.
#[derive(Debug, Clone)]
pub struct ShapeRequest {
    pub text: String,
    pub font: FontKey,
    /// Target size in pixels per em.
    pub size: f32,
    pub options: ShapeOptions,
}

impl ShapeRequest {
    pub fn new(text: impl Into<String>, font: FontKey, size: f32) -> Self {
        Self {
            text: text.into(),
            font,
            size,
            options: ShapeOptions::default(),
        }
    }
}

/// Process-wide engine: the shared font cache plus the override table.
///
/// Construct once at application start and share by reference; rendering
/// distinct words concurrently is safe because a render is a pure function
/// of its request and the read-only cached font state.
#[derive(Debug, Default)]
pub struct GlyphEngine {
    fonts: FontCache,
    overrides: OverrideTable,
}

impl GlyphEngine {
    pub fn new(overrides: OverrideTable) -> Self {
        Self {
            fonts: FontCache::new(),
            overrides,
        }
    }

    /// The shared font cache, for pre-registering in-memory fonts.
    pub fn fonts(&self) -> &FontCache {
        &self.fonts
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Run the full pipeline for one word.
    ///
    /// Empty (or whitespace-only) input yields an empty layout, not an
    /// error. Font and shaping failures are the only errors a request can
    /// surface; everything else degrades per-glyph.
    pub fn render(&self, request: &ShapeRequest) -> Result<WordLayout> {
        self.render_with_units(request, &[])
    }

    /// Like [`render`](Self::render), with caller-authored units claiming
    /// their codepoints ahead of the automatic tokenizer.
    pub fn render_with_units(
        &self,
        request: &ShapeRequest,
        manual: &[ManualUnit],
    ) -> Result<WordLayout> {
        let text = normalize_khmer(&request.text);
        if text.is_empty() {
            return Ok(WordLayout::empty(text, request.size));
        }

        let face: Arc<FontFace> = self.fonts.get_or_load(&request.font)?;

        let clusters = if manual.is_empty() {
            tokenize(&text)
        } else {
            tokenize_with_units(&text, manual)
        };
        let shaped = KhmerShaper::shape(&face, &text, request.size, &request.options)?;
        tracing::debug!(text = %text, glyphs = shaped.len(), "shaped word");

        let font_name = request.font.name();
        let resolution = resolve::resolve(
            &text,
            &clusters,
            &shaped,
            &self.overrides,
            Some(&font_name),
            face.as_ref(),
            request.size,
        );

        Ok(WordLayout {
            text,
            font_size: request.size,
            glyphs: resolution.glyphs,
            width: resolution.width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShapeError;

    #[test]
    fn empty_input_is_not_an_error() {
        let engine = GlyphEngine::default();
        let request = ShapeRequest::new("", FontKey::new("/missing.ttf", 0), 120.0);
        let layout = engine.render(&request).expect("empty input renders");
        assert!(layout.is_empty());
        assert_eq!(layout.width, 0.0);
    }

    #[test]
    fn whitespace_only_input_is_empty_after_normalization() {
        let engine = GlyphEngine::default();
        let request = ShapeRequest::new("  \u{FEFF} ", FontKey::new("/missing.ttf", 0), 120.0);
        let layout = engine.render(&request).expect("renders");
        assert!(layout.is_empty());
    }

    #[test]
    fn missing_font_surfaces_font_unavailable() {
        let engine = GlyphEngine::default();
        let request = ShapeRequest::new("ក", FontKey::new("/definitely/missing.ttf", 0), 120.0);
        let err = engine.render(&request).unwrap_err();
        assert!(matches!(err, ShapeError::FontUnavailable(_)));
    }
}
