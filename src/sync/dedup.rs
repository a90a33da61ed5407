use std::collections::HashSet;

/// Order keys already forwarded (or attempted) during one sync run.
/// Grows without bound; a run is expected to be short-lived.
#[derive(Debug, Default)]
pub struct DedupStore {
    seen: HashSet<String>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Returns `false` if the key was already recorded.
    pub fn record(&mut self, key: impl Into<String>) -> bool {
        self.seen.insert(key.into())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
