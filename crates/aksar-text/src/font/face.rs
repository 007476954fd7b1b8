use std::sync::Arc;

use swash::scale::ScaleContext;
use swash::{FontRef, GlyphId, Metrics};

use crate::font::{FontError, FontMetrics, Result, ScaledFontMetrics};
use crate::outline::{self, GlyphOutline, OutlineSource};

/// Loaded font face backed by a font file (TTF/OTF).
///
/// A thin wrapper around `swash::FontRef` that owns the underlying font
/// data and exposes metrics, character-to-glyph lookup, and glyph outline
/// extraction. The same bytes are handed to the shaping engine, so outline
/// and shaping views can never disagree about which font program is used.
#[derive(Debug, Clone)]
pub struct FontFace {
    /// Full font data.
    data: Arc<[u8]>,
    /// Font index within the file (for collections).
    index: u32,
    /// Offset to the table directory for this font.
    offset: u32,
    /// Cache key used internally by swash.
    key: swash::CacheKey,
    /// Extracted font metrics in font units.
    metrics: FontMetrics,
}

impl FontFace {
    /// Create a font face from raw bytes and a font index within the file.
    pub fn from_bytes(data: Arc<[u8]>, index: usize) -> Result<Self> {
        let font = FontRef::from_index(&data, index).ok_or(FontError::InvalidFont)?;
        let metrics = Self::metrics_from_swash(&font);
        let (offset, key) = (font.offset, font.key);
        Ok(Self {
            data,
            index: index as u32,
            offset,
            key,
            metrics,
        })
    }

    /// Create a font face from raw bytes owned by a `Vec<u8>`.
    pub fn from_vec(data: Vec<u8>, index: usize) -> Result<Self> {
        Self::from_bytes(Arc::from(data), index)
    }

    /// Create a font face from a font file on disk.
    pub fn from_path(path: impl AsRef<std::path::Path>, index: usize) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_vec(data, index)
    }

    /// Expose the raw font bytes for the shaping engine, which builds its
    /// own view over the same data.
    pub fn as_bytes(&self) -> Arc<[u8]> {
        self.data.clone()
    }

    /// Font index within the file.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Return a transient `FontRef` for interacting with swash APIs.
    fn as_swash_ref(&self) -> FontRef<'_> {
        FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        }
    }

    fn metrics_from_swash(font: &FontRef<'_>) -> FontMetrics {
        // Default (no variation) coordinates.
        let Metrics {
            units_per_em,
            ascent,
            descent,
            leading,
            ..
        } = font.metrics(&[]);

        FontMetrics {
            ascent,
            descent,
            line_gap: leading,
            units_per_em,
        }
    }

    /// Font metrics in font units.
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Font metrics scaled to the requested pixel size (px per em).
    pub fn scaled_metrics(&self, font_size: f32) -> ScaledFontMetrics {
        self.metrics.scale_to_pixels(font_size)
    }
}

impl OutlineSource for FontFace {
    fn glyph_for_char(&self, c: char) -> Option<u16> {
        let font = self.as_swash_ref();
        let gid: GlyphId = font.charmap().map(c);
        (gid != 0).then_some(gid)
    }

    fn advance(&self, glyph_id: u16, size: f32) -> f32 {
        let font = self.as_swash_ref();
        font.glyph_metrics(&[]).scale(size).advance_width(glyph_id)
    }

    fn outline_glyph(&self, glyph_id: u16, x: f32, y: f32, size: f32) -> GlyphOutline {
        let mut context = ScaleContext::new();
        let font = self.as_swash_ref();
        let mut scaler = context.builder(font).size(size).build();
        match scaler.scale_outline(glyph_id) {
            Some(o) => outline::from_swash(&o, x, y),
            None => GlyphOutline::empty_at(x, y),
        }
    }
}
