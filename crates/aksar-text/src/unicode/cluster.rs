//! Logical cluster tokenization.
//!
//! A cluster is one pedagogically meaningful unit of a Khmer word: a base
//! consonant, a coeng + consonant subscript pair, a (possibly multi-part)
//! dependent vowel, a diacritic, and so on. Every codepoint of the input
//! belongs to exactly one cluster; the tokenizer never fails.

use super::classify::{COENG, Category, NIKAHIT, classify, is_consonant, is_dependent_vowel};

/// Kind of a logical cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterKind {
    Consonant,
    Subscript,
    Vowel,
    Diacritic,
    Numeral,
    Punctuation,
    Other,
    /// Caller-authored multi-part unit (manual units only).
    Compound,
}

/// One logical cluster with its char offsets into the source string.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Position in logical (reading) order.
    pub id: usize,
    /// The cluster's codepoints, in source order.
    pub text: String,
    pub kind: ClusterKind,
    /// Ordered char offsets this cluster owns. Contiguous except for
    /// manual units, which may union arbitrary offsets.
    pub indices: Vec<usize>,
}

impl Cluster {
    /// First owned char offset.
    pub fn first_index(&self) -> usize {
        self.indices[0]
    }

    /// The character a learner should see for this cluster.
    ///
    /// Never the coeng mark: a subscript pair resolves to its base
    /// consonant, and any other coeng-containing text prefers the first
    /// consonant, then the first non-coeng codepoint.
    pub fn representative(&self) -> char {
        let mut first = None;
        for c in self.text.chars() {
            if is_consonant(c) {
                return c;
            }
            if first.is_none() && c != COENG {
                first = Some(c);
            }
        }
        first
            .or_else(|| self.text.chars().next())
            .unwrap_or('\u{FFFD}')
    }
}

/// Tokenize a string into logical clusters with a single left-to-right scan.
pub fn tokenize(text: &str) -> Vec<Cluster> {
    let chars: Vec<char> = text.chars().collect();
    let mut clusters = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let start = i;
        let kind = match classify(chars[i]) {
            Category::CoengMark if i + 1 < chars.len() && is_consonant(chars[i + 1]) => {
                i += 2;
                ClusterKind::Subscript
            }
            Category::Consonant => {
                i += 1;
                ClusterKind::Consonant
            }
            Category::DependentVowel => {
                // Greedy: split vowels are stored as sequences of dependent
                // vowel signs, optionally closed by a nikahit (-ាំ).
                i += 1;
                while i < chars.len() && is_dependent_vowel(chars[i]) {
                    i += 1;
                }
                if i < chars.len() && chars[i] == NIKAHIT {
                    i += 1;
                }
                ClusterKind::Vowel
            }
            Category::IndependentVowel => {
                i += 1;
                ClusterKind::Vowel
            }
            Category::Diacritic => {
                i += 1;
                ClusterKind::Diacritic
            }
            Category::Numeral => {
                i += 1;
                ClusterKind::Numeral
            }
            Category::Punctuation => {
                i += 1;
                ClusterKind::Punctuation
            }
            // Isolated coeng with nothing stackable after it: keep it as a
            // one-codepoint sign cluster rather than dropping it.
            Category::CoengMark => {
                i += 1;
                ClusterKind::Diacritic
            }
            Category::Other => {
                i += 1;
                ClusterKind::Other
            }
        };

        clusters.push(Cluster {
            id: clusters.len(),
            text: chars[start..i].iter().collect(),
            kind,
            indices: (start..i).collect(),
        });
    }

    clusters
}

/// A caller-authored unit (lesson data) that claims specific codepoints.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualUnit {
    /// The unit's codepoints, used to locate it when `indices` is absent.
    pub text: String,
    pub kind: ClusterKind,
    /// Explicit char offsets; located by first match in the string if None.
    pub indices: Option<Vec<usize>>,
}

/// Tokenize with manual units taking priority over the automatic scan.
///
/// Manual units claim their char offsets first; automatic clusters fill
/// every offset left unclaimed. An automatic cluster partially covered by a
/// manual unit decomposes into single-codepoint clusters, so the output is
/// always a full partition of the input.
pub fn tokenize_with_units(text: &str, manual: &[ManualUnit]) -> Vec<Cluster> {
    let chars: Vec<char> = text.chars().collect();
    let mut used = vec![false; chars.len()];
    let mut placed: Vec<Cluster> = Vec::new();

    for unit in manual {
        let indices = match &unit.indices {
            Some(idx) => idx.clone(),
            None => match find_char_seq(&chars, &unit.text) {
                Some(range) => range,
                None => {
                    tracing::debug!(unit = %unit.text, "manual unit not present in text");
                    continue;
                }
            },
        };
        if indices.is_empty() || indices.iter().any(|&ix| ix >= chars.len() || used[ix]) {
            tracing::debug!(unit = %unit.text, "manual unit overlaps or is out of range");
            continue;
        }
        for &ix in &indices {
            used[ix] = true;
        }
        placed.push(Cluster {
            id: 0,
            text: indices.iter().map(|&ix| chars[ix]).collect(),
            kind: unit.kind,
            indices,
        });
    }

    for auto in tokenize(text) {
        if auto.indices.iter().all(|&ix| !used[ix]) {
            placed.push(auto);
        } else {
            for &ix in &auto.indices {
                if !used[ix] {
                    placed.push(Cluster {
                        id: 0,
                        text: chars[ix].to_string(),
                        kind: single_kind(chars[ix]),
                        indices: vec![ix],
                    });
                }
            }
        }
    }

    placed.sort_by_key(|c| c.first_index());
    for (id, cluster) in placed.iter_mut().enumerate() {
        cluster.id = id;
    }
    placed
}

fn single_kind(c: char) -> ClusterKind {
    match classify(c) {
        Category::Consonant => ClusterKind::Consonant,
        Category::IndependentVowel | Category::DependentVowel => ClusterKind::Vowel,
        Category::Diacritic | Category::CoengMark => ClusterKind::Diacritic,
        Category::Numeral => ClusterKind::Numeral,
        Category::Punctuation => ClusterKind::Punctuation,
        Category::Other => ClusterKind::Other,
    }
}

fn find_char_seq(haystack: &[char], needle: &str) -> Option<Vec<usize>> {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .find(|&at| haystack[at..at + needle.len()] == needle[..])
        .map(|at| (at..at + needle.len()).collect())
}
