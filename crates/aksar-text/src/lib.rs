//! aksar-text: Khmer shaping-to-interactive-glyph engine.
//!
//! Takes a Unicode Khmer string, shapes it with a complex-script engine
//! (harfrust), maps the shaped glyph stream back to logical character
//! clusters, and produces per-glyph vector outlines with stable identity so
//! a host UI can render, color, and hit-test individual parts of a word.
//!
//! Pipeline stages:
//! - `unicode`: codepoint classification and logical cluster tokenization
//! - `shaping`: the shaping engine adapter (Khmer script, cluster
//!   normalization to codepoint indices)
//! - `resolve`: reconciling shaped glyphs against logical clusters
//! - `outline`: glyph contour extraction and path serialization
//! - `overrides`: the prioritized rule table for known font quirks
//! - `model`: the resolved glyph output contract and hit-test helpers
//! - `engine`: the one-call facade over the whole pipeline

pub mod engine;
pub mod error;
pub mod font;
pub mod model;
pub mod outline;
pub mod overrides;
pub mod resolve;
pub mod shaping;
pub mod unicode;

pub use engine::{GlyphEngine, ShapeRequest};
pub use error::{FontError, ShapeError};
pub use font::{
    face::FontFace,
    loader::{FontCache, FontKey},
    metrics::{FontMetrics, ScaledFontMetrics},
};
pub use model::{ResolvedGlyph, ViewBox, WordLayout, hit::hit_test};
pub use outline::{BBox, GlyphOutline, OutlineSource};
pub use resolve::{FORCE_SPLIT_VOWELS, Resolution, resolve};
pub use overrides::{OverrideAction, OverrideRule, OverrideTable, ZoneRegion};
pub use shaping::{FeatureSetting, KhmerShaper, ShapeOptions, ShapedGlyph};
pub use unicode::{
    classify::{Category, classify},
    cluster::{Cluster, ClusterKind, ManualUnit, tokenize, tokenize_with_units},
};
