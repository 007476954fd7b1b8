//! Khmer codepoint classification and logical cluster tokenization.

pub mod classify;
pub mod cluster;
pub mod normalize;

pub use classify::{COENG, Category, NIKAHIT, classify, is_khmer};
pub use cluster::{Cluster, ClusterKind, ManualUnit, tokenize, tokenize_with_units};
pub use normalize::{normalize_khmer, split_segments};
