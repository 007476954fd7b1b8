//! Shaping engine adapter.
//!
//! Wraps the complex-script shaper behind one narrow call: encode the
//! string, shape with the Khmer script tag, and normalize engine-native
//! cluster references to codepoint indices before anything downstream
//! sees them.

pub mod shaper;

pub use shaper::KhmerShaper;

/// One positioned glyph as reported by the shaping engine, with its
/// cluster reference already normalized to a codepoint index and its
/// positions scaled to pixels at the requested size.
///
/// Ordering reflects visual (render) order, which can differ from logical
/// reading order: Khmer reorders pre-base vowels and stacks subscripts.
/// Offsets are engine-native (y positive = up); the resolver flips y when
/// it places outlines in y-down path space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph id in the font.
    pub glyph_id: u16,
    /// Codepoint index into the original input string.
    pub cluster: usize,
    pub x_advance: f32,
    pub y_advance: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

/// An explicit OpenType feature setting (diagnostic use).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSetting {
    pub tag: [u8; 4],
    pub value: u32,
}

/// Shaping controls. Defaults shape with the font's full Khmer feature
/// set; the disable switches exist for diagnostic rendering only.
#[derive(Debug, Clone, Default)]
pub struct ShapeOptions {
    /// Turn off discretionary/required ligatures (`liga`, `clig`, `rlig`).
    pub disable_ligatures: bool,
    /// Turn off the Khmer shaping features (`ccmp`, `pref`, `blwf`,
    /// `pstf`, `abvf`, `abvs`, `pres`, `psts`), yielding the decomposed
    /// "split" rendering used by authoring tools.
    pub disable_khmer_features: bool,
    /// Explicit feature list; overrides both switches when non-empty.
    pub features: Vec<FeatureSetting>,
}
