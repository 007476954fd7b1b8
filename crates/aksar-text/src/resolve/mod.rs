//! Glyph-to-cluster resolution.
//!
//! The shaping engine's glyph stream does not line up 1:1 with logical
//! clusters: Khmer fonts fuse a base consonant with certain vowel signs
//! into one glyph, render a coeng+consonant pair as one subscript glyph,
//! and reorder pre-base vowels ahead of their base. This module reconciles
//! the two views so every rendered glyph traces back to exactly one
//! logical cluster, with forced splits restoring per-cluster
//! interactivity for known fusing vowels.

use crate::model::ResolvedGlyph;
use crate::outline::OutlineSource;
use crate::overrides::{OverrideAction, OverrideTable, ZoneRegion};
use crate::shaping::ShapedGlyph;
use crate::unicode::classify::{COENG, is_consonant};
use crate::unicode::cluster::{Cluster, ClusterKind};

/// Dependent vowels empirically known to fuse with a preceding consonant
/// in common Khmer fonts. Hand-maintained; font-driven detection would be
/// a future improvement.
pub const FORCE_SPLIT_VOWELS: [char; 6] = [
    '\u{17B6}', // aa
    '\u{17C1}', // e
    '\u{17C2}', // ae
    '\u{17C3}', // ai
    '\u{17C4}', // oo
    '\u{17C5}', // au
];

/// Result of resolving one shaped word.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Glyphs in render order with geometry attached.
    pub glyphs: Vec<ResolvedGlyph>,
    /// Total advance width in pixels.
    pub width: f32,
}

/// Per-glyph claim over source codepoints, computed before layout.
struct Claim {
    /// Claimed char offsets, ascending. Empty when the engine reference
    /// could not be matched to the text at all.
    indices: Vec<usize>,
}

/// Reconcile shaped glyphs against logical clusters and attach outlines.
///
/// Output order matches visual (render) order; callers needing logical
/// order sort by `source_index`.
pub fn resolve(
    text: &str,
    clusters: &[Cluster],
    shaped: &[ShapedGlyph],
    overrides: &OverrideTable,
    font_name: Option<&str>,
    outlines: &dyn OutlineSource,
    size: f32,
) -> Resolution {
    let chars: Vec<char> = text.chars().collect();

    // char offset -> owning cluster id; total thanks to the tokenizer's
    // partition invariant.
    let mut owner = vec![usize::MAX; chars.len()];
    for cluster in clusters {
        for &ix in &cluster.indices {
            if ix < owner.len() {
                owner[ix] = cluster.id;
            }
        }
    }

    let claims = claim_codepoints(&chars, shaped, outlines);

    let mut out: Vec<ResolvedGlyph> = Vec::new();
    let mut pen_x = 0.0f32;
    let mut pen_y = 0.0f32;

    for (g, claim) in shaped.iter().zip(&claims) {
        let claimed_clusters = clusters_of(&claim.indices, &owner);
        if claimed_clusters.is_empty() {
            // Engine reference past the end of the text, or a codepoint no
            // cluster owns. Never drop the glyph: emit a best-effort Other
            // unit for its first reported codepoint.
            tracing::warn!(cluster = g.cluster, "shaped glyph matched no cluster");
            let source_index = claim
                .indices
                .first()
                .copied()
                .unwrap_or(chars.len().saturating_sub(1));
            let x = pen_x + g.x_offset;
            let y = pen_y - g.y_offset;
            let o = outlines.outline_glyph(g.glyph_id, x, y, size);
            out.push(ResolvedGlyph {
                id: out.len(),
                ch: chars.get(source_index).copied().unwrap_or('\u{FFFD}'),
                role: ClusterKind::Other,
                is_subscript: false,
                cluster_id: None,
                source_index,
                path_data: o.path_data,
                bbox: o.bbox,
                x,
                y,
                x_advance: g.x_advance,
                y_advance: g.y_advance,
                hit_zones: Vec::new(),
            });
            pen_x += g.x_advance;
            pen_y -= g.y_advance;
            continue;
        }

        let claimed_text: String = claim.indices.iter().map(|&ix| chars[ix]).collect();
        let trailing_ix = *claim.indices.last().unwrap_or(&0);
        let trailing = chars[trailing_ix];

        let rule = overrides.lookup(&claimed_text, font_name);
        let heuristic_split =
            claimed_clusters.len() > 1 && FORCE_SPLIT_VOWELS.contains(&trailing);

        let mut zones: Vec<ZoneRegion> = Vec::new();
        let mut primary_override: Option<char> = None;
        let do_split = match rule.map(|r| &r.action) {
            Some(OverrideAction::Merge) => false,
            Some(OverrideAction::Split) => claim.indices.len() >= 2,
            Some(OverrideAction::SetPrimary(c)) => {
                primary_override = Some(*c);
                false
            }
            Some(OverrideAction::SetHitZones(z)) => {
                zones = z.clone();
                heuristic_split
            }
            None => heuristic_split,
        };

        if do_split {
            if let Some(consumed) = split_fused(
                &claim.indices,
                &claimed_clusters,
                clusters,
                &chars,
                &owner,
                outlines,
                size,
                pen_x,
                pen_y,
                &zones,
                &mut out,
            ) {
                pen_x += consumed;
                continue;
            }
            // Unmappable parts: fall through and emit the fused glyph.
            tracing::debug!(text = %claimed_text, "force-split abandoned, emitting fused glyph");
        }

        // Direct resolution against the owning cluster(s).
        let primary = &clusters[claimed_clusters[0]];
        let ch = primary_override.unwrap_or_else(|| {
            if claimed_clusters.len() == 1 {
                primary.representative()
            } else {
                representative_of(&claimed_text)
            }
        });
        let role_cluster = claim
            .indices
            .iter()
            .find(|&&ix| chars[ix] == ch)
            .map(|&ix| &clusters[owner[ix]])
            .unwrap_or(primary);

        let x = pen_x + g.x_offset;
        let y = pen_y - g.y_offset;
        let o = outlines.outline_glyph(g.glyph_id, x, y, size);
        out.push(ResolvedGlyph {
            id: out.len(),
            ch,
            role: role_cluster.kind,
            is_subscript: role_cluster.kind == ClusterKind::Subscript,
            cluster_id: Some(role_cluster.id),
            source_index: role_cluster.first_index(),
            path_data: o.path_data,
            bbox: o.bbox,
            x,
            y,
            x_advance: g.x_advance,
            y_advance: g.y_advance,
            hit_zones: zones,
        });
        pen_x += g.x_advance;
        pen_y -= g.y_advance;
    }

    Resolution {
        glyphs: out,
        width: pen_x,
    }
}

/// Synthesize two independently positioned glyphs from one fused glyph.
///
/// The base and vowel are laid out via the outline source at the same pen
/// position, the vowel offset by the base's own advance; the pen then
/// advances by the sum of the two individual advances (not the fused
/// advance, which would double-count). Returns the consumed advance, or
/// None when either character has no cmap entry.
#[allow(clippy::too_many_arguments)]
fn split_fused(
    indices: &[usize],
    claimed_clusters: &[usize],
    clusters: &[Cluster],
    chars: &[char],
    owner: &[usize],
    outlines: &dyn OutlineSource,
    size: f32,
    pen_x: f32,
    pen_y: f32,
    zones: &[ZoneRegion],
    out: &mut Vec<ResolvedGlyph>,
) -> Option<f32> {
    let trailing_ix = *indices.last()?;
    let vowel_char = chars[trailing_ix];
    let base_cluster = &clusters[claimed_clusters[0]];
    let base_char = base_cluster.representative();

    let base_gid = outlines.glyph_for_char(base_char)?;
    let vowel_gid = outlines.glyph_for_char(vowel_char)?;

    let base_adv = outlines.advance(base_gid, size);
    let vowel_adv = outlines.advance(vowel_gid, size);

    let base_outline = outlines.outline_glyph(base_gid, pen_x, pen_y, size);
    out.push(ResolvedGlyph {
        id: out.len(),
        ch: base_char,
        role: base_cluster.kind,
        is_subscript: base_cluster.kind == ClusterKind::Subscript,
        cluster_id: Some(base_cluster.id),
        source_index: base_cluster.first_index(),
        path_data: base_outline.path_data,
        bbox: base_outline.bbox,
        x: pen_x,
        y: pen_y,
        x_advance: base_adv,
        y_advance: 0.0,
        hit_zones: zones.to_vec(),
    });

    let vowel_cluster = &clusters[owner[trailing_ix]];
    let vowel_outline = outlines.outline_glyph(vowel_gid, pen_x + base_adv, pen_y, size);
    out.push(ResolvedGlyph {
        id: out.len(),
        ch: vowel_char,
        role: vowel_cluster.kind,
        is_subscript: vowel_cluster.kind == ClusterKind::Subscript,
        cluster_id: Some(vowel_cluster.id),
        source_index: trailing_ix,
        path_data: vowel_outline.path_data,
        bbox: vowel_outline.bbox,
        x: pen_x + base_adv,
        y: pen_y,
        x_advance: vowel_adv,
        y_advance: 0.0,
        hit_zones: zones.to_vec(),
    });

    Some(base_adv + vowel_adv)
}

/// Assign every shaped glyph its source codepoints.
///
/// Glyphs sharing one engine cluster value form a segment covering the
/// chars from that value to the next distinct value. Within a segment,
/// glyphs are first matched to chars through the font's cmap (identity
/// forms: reordered pre-base vowels, plain consonants); glyphs the cmap
/// cannot account for (subscript forms, ligatures) divide the leftover
/// chars in order, the last one absorbing the tail.
fn claim_codepoints(
    chars: &[char],
    shaped: &[ShapedGlyph],
    outlines: &dyn OutlineSource,
) -> Vec<Claim> {
    let mut starts: Vec<usize> = shaped.iter().map(|g| g.cluster).collect();
    starts.sort_unstable();
    starts.dedup();

    let mut claims: Vec<Claim> = (0..shaped.len()).map(|_| Claim { indices: Vec::new() }).collect();

    for (si, &start) in starts.iter().enumerate() {
        let end = starts
            .get(si + 1)
            .copied()
            .unwrap_or(chars.len())
            .min(chars.len());
        if start >= end {
            // Reference past the end of the text; the glyphs of this
            // segment keep empty claims and resolve via fallback.
            continue;
        }

        let members: Vec<usize> = shaped
            .iter()
            .enumerate()
            .filter(|(_, g)| g.cluster == start)
            .map(|(i, _)| i)
            .collect();

        let mut consumed = vec![false; end - start];

        // Pass 1: cmap-identity matches.
        let mut matched = vec![false; members.len()];
        for (mi, &gi) in members.iter().enumerate() {
            let gid = shaped[gi].glyph_id;
            for local in 0..end - start {
                if consumed[local] {
                    continue;
                }
                if outlines.glyph_for_char(chars[start + local]) == Some(gid) {
                    claims[gi].indices.push(start + local);
                    consumed[local] = true;
                    matched[mi] = true;
                    break;
                }
            }
        }

        // Pass 2: distribute leftovers over unmatched glyphs in order.
        let leftovers: Vec<usize> = (0..end - start)
            .filter(|&local| !consumed[local])
            .map(|local| start + local)
            .collect();
        let unmatched: Vec<usize> = members
            .iter()
            .enumerate()
            .filter(|(mi, _)| !matched[*mi])
            .map(|(_, &gi)| gi)
            .collect();

        if unmatched.is_empty() {
            // Every glyph accounted for; any leftover chars (marks merged
            // into a matched glyph) join the last matched glyph.
            if let (Some(&gi), false) = (members.last(), leftovers.is_empty()) {
                claims[gi].indices.extend(leftovers);
                claims[gi].indices.sort_unstable();
            }
        } else {
            let mut rest = leftovers.into_iter();
            for (k, &gi) in unmatched.iter().enumerate() {
                if k + 1 == unmatched.len() {
                    claims[gi].indices.extend(rest.by_ref());
                } else if let Some(ix) = rest.next() {
                    claims[gi].indices.push(ix);
                }
                claims[gi].indices.sort_unstable();
            }
        }

        // A member left with nothing (more glyphs than chars) shares the
        // segment's first char so it still resolves somewhere sensible.
        for &gi in &members {
            if claims[gi].indices.is_empty() {
                claims[gi].indices.push(start);
            }
        }
    }

    claims
}

fn clusters_of(indices: &[usize], owner: &[usize]) -> Vec<usize> {
    let mut ids = Vec::new();
    for &ix in indices {
        let id = owner[ix];
        if id != usize::MAX && !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Representative over a multi-cluster codepoint set: prefer the first
/// consonant, else the first non-coeng codepoint, else the first.
fn representative_of(text: &str) -> char {
    let mut first = None;
    for c in text.chars() {
        if is_consonant(c) {
            return c;
        }
        if first.is_none() && c != COENG {
            first = Some(c);
        }
    }
    first
        .or_else(|| text.chars().next())
        .unwrap_or('\u{FFFD}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{BBox, GlyphOutline};
    use crate::overrides::OverrideRule;
    use crate::unicode::cluster::tokenize;
    use hashbrown::HashMap;

    /// Deterministic stand-in for a real font: fixed cmap and advances,
    /// rectangular "outlines".
    struct StubFont {
        cmap: HashMap<char, u16>,
        advances: HashMap<u16, f32>,
    }

    impl StubFont {
        fn new(entries: &[(char, u16, f32)]) -> Self {
            let mut cmap = HashMap::new();
            let mut advances = HashMap::new();
            for &(c, gid, adv) in entries {
                cmap.insert(c, gid);
                advances.insert(gid, adv);
            }
            Self { cmap, advances }
        }
    }

    impl OutlineSource for StubFont {
        fn glyph_for_char(&self, c: char) -> Option<u16> {
            self.cmap.get(&c).copied()
        }

        fn advance(&self, glyph_id: u16, _size: f32) -> f32 {
            self.advances.get(&glyph_id).copied().unwrap_or(10.0)
        }

        fn outline_glyph(&self, glyph_id: u16, x: f32, y: f32, _size: f32) -> GlyphOutline {
            if glyph_id == SPACE_GID {
                return GlyphOutline::empty_at(x, y);
            }
            GlyphOutline {
                path_data: format!("M{x} {y}"),
                bbox: BBox {
                    x1: x,
                    y1: y - 10.0,
                    x2: x + 8.0,
                    y2: y,
                },
            }
        }
    }

    const KA_GID: u16 = 1;
    const KHA_GID: u16 = 2;
    const AA_GID: u16 = 3;
    const E_GID: u16 = 4;
    const SUB_KA_GID: u16 = 90; // subscript form, not in cmap
    const FUSED_GID: u16 = 91; // ligature, not in cmap
    const SPACE_GID: u16 = 5;

    fn stub() -> StubFont {
        StubFont::new(&[
            ('ក', KA_GID, 12.0),
            ('ខ', KHA_GID, 13.0),
            ('ា', AA_GID, 7.0),
            ('េ', E_GID, 6.0),
            (' ', SPACE_GID, 5.0),
        ])
    }

    fn shaped(glyph_id: u16, cluster: usize, x_advance: f32) -> ShapedGlyph {
        ShapedGlyph {
            glyph_id,
            cluster,
            x_advance,
            y_advance: 0.0,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }

    fn run(
        text: &str,
        glyphs: &[ShapedGlyph],
        overrides: &OverrideTable,
        font: Option<&str>,
    ) -> Resolution {
        let clusters = tokenize(text);
        resolve(text, &clusters, glyphs, overrides, font, &stub(), 100.0)
    }

    #[test]
    fn simple_consonant() {
        let r = run("ក", &[shaped(KA_GID, 0, 12.0)], &OverrideTable::empty(), None);
        assert_eq!(r.glyphs.len(), 1);
        let g = &r.glyphs[0];
        assert_eq!(g.ch, 'ក');
        assert_eq!(g.role, ClusterKind::Consonant);
        assert!(!g.is_subscript);
        assert_eq!(r.width, 12.0);
    }

    #[test]
    fn subscript_resolves_to_base_consonant_not_coeng() {
        // consonant + coeng + consonant shapes as base glyph + subscript
        // form, both reported at cluster 0.
        let glyphs = [shaped(KA_GID, 0, 12.0), shaped(SUB_KA_GID, 0, 0.0)];
        let r = run("ក្ក", &glyphs, &OverrideTable::empty(), None);
        assert_eq!(r.glyphs.len(), 2);
        assert_eq!(r.glyphs[0].role, ClusterKind::Consonant);
        assert!(!r.glyphs[0].is_subscript);
        let sub = &r.glyphs[1];
        assert!(sub.is_subscript);
        assert_eq!(sub.role, ClusterKind::Subscript);
        assert_eq!(sub.ch, 'ក');
        assert_ne!(sub.ch, COENG);
    }

    #[test]
    fn fused_vowel_is_force_split() {
        // One ligature glyph covering consonant + aa.
        let glyphs = [shaped(FUSED_GID, 0, 20.0)];
        let r = run("កា", &glyphs, &OverrideTable::empty(), None);
        assert_eq!(r.glyphs.len(), 2);
        let base = &r.glyphs[0];
        let vowel = &r.glyphs[1];
        assert_eq!(base.ch, 'ក');
        assert_eq!(base.role, ClusterKind::Consonant);
        assert_eq!(vowel.ch, 'ា');
        assert_eq!(vowel.role, ClusterKind::Vowel);
        // Advance conservation: vowel starts where the base ends, width
        // is the sum of individual advances, not the fused 20.0.
        assert_eq!(base.x, 0.0);
        assert_eq!(vowel.x, base.x_advance);
        assert!((r.width - (base.x_advance + vowel.x_advance)).abs() < 1e-6);
        assert!((r.width - 19.0).abs() < 1e-6);
    }

    #[test]
    fn reordered_prebase_vowel_keeps_roles_straight() {
        // harfbuzz renders the pre-base vowel first; both glyphs carry
        // cluster 0. cmap matching must put the vowel with the vowel
        // cluster and the base with the consonant cluster.
        let glyphs = [shaped(E_GID, 0, 6.0), shaped(KA_GID, 0, 12.0)];
        let r = run("កេ", &glyphs, &OverrideTable::empty(), None);
        assert_eq!(r.glyphs.len(), 2);
        assert_eq!(r.glyphs[0].ch, 'េ');
        assert_eq!(r.glyphs[0].role, ClusterKind::Vowel);
        assert_eq!(r.glyphs[1].ch, 'ក');
        assert_eq!(r.glyphs[1].role, ClusterKind::Consonant);
        // Render order is visual; logical order comes from source_index.
        assert!(r.glyphs[0].source_index > r.glyphs[1].source_index);
    }

    #[test]
    fn merge_override_suppresses_force_split() {
        let table = OverrideTable::new(vec![OverrideRule {
            word: Some("កា".into()),
            pattern: None,
            font: None,
            action: OverrideAction::Merge,
        }]);
        let glyphs = [shaped(FUSED_GID, 0, 20.0)];
        let r = run("កា", &glyphs, &table, None);
        assert_eq!(r.glyphs.len(), 1);
        // Representative of the fused pair prefers the consonant.
        assert_eq!(r.glyphs[0].ch, 'ក');
        assert_eq!(r.width, 20.0);
    }

    #[test]
    fn split_override_forces_split_off_list() {
        // U+17B8 (ii) is not in the force-split set; a Split rule forces
        // the separation anyway.
        let ii = '\u{17B8}';
        let mut font = stub();
        font.cmap.insert(ii, 42);
        font.advances.insert(42, 9.0);
        let text: String = ['ក', ii].iter().collect();
        let clusters = tokenize(&text);
        let glyphs = [shaped(FUSED_GID, 0, 20.0)];

        let no_rule = resolve(
            &text,
            &clusters,
            &glyphs,
            &OverrideTable::empty(),
            None,
            &font,
            100.0,
        );
        assert_eq!(no_rule.glyphs.len(), 1);

        let table = OverrideTable::new(vec![OverrideRule {
            word: Some(text.clone()),
            pattern: None,
            font: None,
            action: OverrideAction::Split,
        }]);
        let with_rule = resolve(&text, &clusters, &glyphs, &table, None, &font, 100.0);
        assert_eq!(with_rule.glyphs.len(), 2);
        assert!((with_rule.width - 21.0).abs() < 1e-6);
    }

    #[test]
    fn set_primary_override_replaces_the_character() {
        let table = OverrideTable::new(vec![OverrideRule {
            word: Some("ក".into()),
            pattern: None,
            font: None,
            action: OverrideAction::SetPrimary('ខ'),
        }]);
        let r = run("ក", &[shaped(KA_GID, 0, 12.0)], &table, None);
        assert_eq!(r.glyphs[0].ch, 'ខ');
    }

    #[test]
    fn hit_zones_attach_to_emitted_glyphs() {
        let table = OverrideTable::new(vec![OverrideRule {
            word: Some("ក".into()),
            pattern: None,
            font: None,
            action: OverrideAction::SetHitZones(vec![ZoneRegion::Top]),
        }]);
        let r = run("ក", &[shaped(KA_GID, 0, 12.0)], &table, None);
        assert_eq!(r.glyphs[0].hit_zones, vec![ZoneRegion::Top]);
    }

    #[test]
    fn whitespace_glyph_is_preserved() {
        let glyphs = [
            shaped(KA_GID, 0, 12.0),
            shaped(SPACE_GID, 1, 5.0),
            shaped(KHA_GID, 2, 13.0),
        ];
        let r = run("ក ខ", &glyphs, &OverrideTable::empty(), None);
        assert_eq!(r.glyphs.len(), 3);
        let space = &r.glyphs[1];
        assert_eq!(space.ch, ' ');
        assert_eq!(space.role, ClusterKind::Other);
        assert!(space.path_data.is_empty());
        assert_eq!(space.x_advance, 5.0);
        assert!((r.width - 30.0).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_reference_degrades_to_other() {
        let glyphs = [shaped(KA_GID, 0, 12.0), shaped(FUSED_GID, 40, 3.0)];
        let r = run("ក", &glyphs, &OverrideTable::empty(), None);
        assert_eq!(r.glyphs.len(), 2, "no glyph is dropped silently");
        assert_eq!(r.glyphs[1].role, ClusterKind::Other);
        assert_eq!(r.glyphs[1].cluster_id, None);
    }

    #[test]
    fn resolution_is_idempotent() {
        let glyphs = [shaped(FUSED_GID, 0, 20.0), shaped(KHA_GID, 2, 13.0)];
        let text = "កាខ";
        let clusters = tokenize(text);
        let table = OverrideTable::empty();
        let a = resolve(text, &clusters, &glyphs, &table, None, &stub(), 100.0);
        let b = resolve(text, &clusters, &glyphs, &table, None, &stub(), 100.0);
        assert_eq!(a, b);
    }

    #[test]
    fn representative_never_coeng() {
        assert_eq!(representative_of("្ក"), 'ក');
        assert_eq!(representative_of("្ា"), 'ា');
        assert_eq!(representative_of("្"), '្');
    }
}
