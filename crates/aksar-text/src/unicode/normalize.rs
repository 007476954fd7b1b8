//! Input text normalization.
//!
//! Lesson content arrives with stray dotted circles, zero-width joiners,
//! and BOMs from copy-paste; everything is stripped and NFC-normalized
//! before the pipeline sees it.

use unicode_normalization::UnicodeNormalization;

/// Codepoints stripped before shaping: dotted circle, ZWNJ, ZWJ, BOM.
const STRIP: [char; 4] = ['\u{25CC}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Strip control/placeholder codepoints, NFC-normalize, and trim.
pub fn normalize_khmer(text: &str) -> String {
    text.chars()
        .filter(|c| !STRIP.contains(c))
        .nfc()
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split a string into alternating non-space and whitespace segments,
/// preserving every character.
///
/// Spaces are not word separators in Khmer and are never dropped; a
/// renderer may use the whitespace segments as visual line-break points,
/// but each segment is shaped independently of that decision.
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let is_space = c.is_whitespace();
        match in_space {
            Some(prev) if prev == is_space => {}
            Some(_) => {
                segments.push(&text[start..i]);
                start = i;
                in_space = Some(is_space);
            }
            None => in_space = Some(is_space),
        }
    }
    if start < text.len() {
        segments.push(&text[start..]);
    }
    segments
}
