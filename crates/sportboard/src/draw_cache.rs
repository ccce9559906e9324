//! Memoized rendered fragments.

use std::collections::HashMap;
use std::sync::Arc;

use matrix_engine::Fragment;
use parking_lot::{Mutex, RwLock};

/// Rendered fragments keyed by visual identity.
#[derive(Debug, Default)]
pub struct DrawCache {
    entries: Mutex<HashMap<String, Fragment>>,
}

impl DrawCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Fragment> {
        self.entries.lock().get(key).cloned()
    }

    pub fn insert(&self, key: impl Into<String>, fragment: Fragment) {
        self.entries.lock().insert(key.into(), fragment);
    }

    /// Return the cached fragment for `key`, rendering it with `render` on
    /// a miss. The lock is not held while rendering.
    pub fn get_or_try_insert_with(
        &self,
        key: &str,
        render: impl FnOnce() -> anyhow::Result<Fragment>,
    ) -> anyhow::Result<Fragment> {
        if let Some(fragment) = self.get(key) {
            return Ok(fragment);
        }
        let fragment = render()?;
        self.insert(key, fragment.clone());
        Ok(fragment)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A draw cache that can be cleared by swapping in an empty one.
///
/// Renders hold the `Arc` they loaded, so a clear never tears a render in
/// progress.
#[derive(Debug, Default)]
pub struct SharedDrawCache {
    current: RwLock<Arc<DrawCache>>,
}

impl SharedDrawCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current cache.
    pub fn load(&self) -> Arc<DrawCache> {
        Arc::clone(&self.current.read())
    }

    /// Replace the current cache with an empty one.
    pub fn clear(&self) {
        *self.current.write() = Arc::new(DrawCache::new());
    }
}
