//! Prioritized override rules for known shaping quirks.
//!
//! Shaping engines and fonts disagree about specific Khmer sequences in
//! ways that resist generalization; the rule table is the escape hatch for
//! those cases, keeping per-font special cases out of the resolver. Loaded
//! once at startup, read-only during a render pass.

use regex::Regex;

/// Region of a glyph's bounding box used for hit testing a shared glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneRegion {
    Top,
    Bottom,
    Center,
}

/// Effect of an override rule on matching clusters.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideAction {
    /// Force a fused glyph apart even when the trailing vowel is outside
    /// the force-split set.
    Split,
    /// Keep a fused glyph whole, suppressing the force-split heuristic.
    Merge,
    /// Replace the resolved character.
    SetPrimary(char),
    /// Attach hit zones to the emitted glyphs.
    SetHitZones(Vec<ZoneRegion>),
}

/// One override rule. `word` matches the cluster text exactly (NFC);
/// `pattern` matches it as a regex; `font` restricts either to one font.
#[derive(Debug, Clone)]
pub struct OverrideRule {
    pub word: Option<String>,
    pub pattern: Option<Regex>,
    pub font: Option<String>,
    pub action: OverrideAction,
}

impl OverrideRule {
    fn word_matches(&self, text: &str) -> bool {
        self.word.as_deref() == Some(text)
    }

    fn pattern_matches(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(text))
    }

    fn font_matches(&self, font: Option<&str>) -> bool {
        match (self.font.as_deref(), font) {
            (Some(rule_font), Some(font)) => rule_font == font,
            _ => false,
        }
    }
}

/// Static rule table with priority lookup.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    rules: Vec<OverrideRule>,
}

impl OverrideTable {
    pub fn new(rules: Vec<OverrideRule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Find the highest-priority rule for a cluster's text, if any.
    ///
    /// Priority: exact word + font > exact word only > pattern + font >
    /// pattern only. Within a tier the first listed rule wins; at most one
    /// rule ever applies.
    pub fn lookup(&self, cluster_text: &str, font: Option<&str>) -> Option<&OverrideRule> {
        self.rules
            .iter()
            .find(|r| r.word_matches(cluster_text) && r.font_matches(font))
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|r| r.word_matches(cluster_text) && r.font.is_none())
            })
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|r| r.pattern_matches(cluster_text) && r.font_matches(font))
            })
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|r| r.pattern_matches(cluster_text) && r.font.is_none())
            })
    }
}
