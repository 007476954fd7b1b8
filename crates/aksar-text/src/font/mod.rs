//! Font loading, metrics, and the process-wide font cache.

pub mod face;
pub mod loader;
pub mod metrics;

pub use face::FontFace;
pub use loader::{FontCache, FontKey};
pub use metrics::{FontMetrics, ScaledFontMetrics};

pub use crate::error::FontError;

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;
