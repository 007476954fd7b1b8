use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use hashbrown::HashMap;
use parking_lot::Mutex;

use crate::font::{FontFace, Result};

/// Key identifying a font within the cache.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    /// Path to the font file on disk.
    pub path: PathBuf,
    /// Font index within the file (for collections).
    pub index: u32,
}

impl FontKey {
    pub fn new(path: impl AsRef<Path>, index: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            index: index as u32,
        }
    }

    /// Short identity string used for override-rule font matching.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

type Slot = Arc<OnceLock<Result<Arc<FontFace>>>>;

/// Process-wide font cache with at-most-once initialization per key.
///
/// Concurrent requests for the same uninitialized font block on a single
/// load (the per-slot `OnceLock` de-duplicates in-flight work); distinct
/// fonts load independently because the map lock is only held while
/// fetching a slot. Failed loads are cached too: a request never retries
/// internally.
#[derive(Debug, Default)]
pub struct FontCache {
    fonts: Mutex<HashMap<FontKey, Slot>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self {
            fonts: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, key: &FontKey) -> Slot {
        let mut map = self.fonts.lock();
        map.entry(key.clone())
            .or_insert_with(|| Arc::new(OnceLock::new()))
            .clone()
    }

    /// Get a font face from the cache or load it from disk.
    pub fn get_or_load(&self, key: &FontKey) -> Result<Arc<FontFace>> {
        let slot = self.slot(key);
        slot.get_or_init(|| {
            tracing::debug!(path = %key.path.display(), index = key.index, "loading font");
            FontFace::from_path(&key.path, key.index as usize).map(Arc::new)
        })
        .clone()
    }

    /// Register in-memory font bytes under an explicit key, parsing them
    /// at most once. Pre-registered bytes win over any later disk load.
    pub fn register_bytes(&self, key: &FontKey, bytes: Vec<u8>) -> Result<Arc<FontFace>> {
        let slot = self.slot(key);
        slot.get_or_init(|| FontFace::from_vec(bytes, key.index as usize).map(Arc::new))
            .clone()
    }

    /// Retrieve an already-loaded font by key, if present and valid.
    pub fn get(&self, key: &FontKey) -> Option<Arc<FontFace>> {
        let map = self.fonts.lock();
        map.get(key)
            .and_then(|slot| slot.get())
            .and_then(|loaded| loaded.as_ref().ok().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FontError;

    #[test]
    fn missing_font_error_is_cached() {
        let cache = FontCache::new();
        let key = FontKey::new("/definitely/not/a/font.ttf", 0);
        let first = cache.get_or_load(&key);
        assert!(matches!(first, Err(FontError::Io(_))));
        // Second lookup hits the cached failure, not the filesystem.
        let second = cache.get_or_load(&key);
        assert!(matches!(second, Err(FontError::Io(_))));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn invalid_bytes_are_rejected() {
        let cache = FontCache::new();
        let key = FontKey::new("inline.ttf", 0);
        let res = cache.register_bytes(&key, vec![0u8; 16]);
        assert!(matches!(res, Err(FontError::InvalidFont)));
    }

    #[test]
    fn key_name_is_file_stem() {
        let key = FontKey::new("/fonts/KhmerOSsiemreap.ttf", 0);
        assert_eq!(key.name(), "KhmerOSsiemreap");
    }
}
