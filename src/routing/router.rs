//! Live rule set and replacement.
//!
//! # Responsibilities
//! - Hold the active `RuleSet` for request-time lookups
//! - Replace the whole set: sanitize, persist, then swap
//! - Reload the set from storage after an external change
//!
//! # Design Decisions
//! - Readers take a lock-free snapshot (`ArcSwap`), never a partial set
//! - Replacements are serialized by a single writer lock
//! - A failed save leaves the active set untouched

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::observability::metrics;
use crate::routing::RuleSet;
use crate::storage::{RuleStore, StoreError};

#[derive(Debug)]
pub struct Redirector {
    current: ArcSwap<RuleSet>,
    store: Arc<dyn RuleStore>,
    write_lock: Mutex<()>,
}

impl Redirector {
    /// Create a redirector with an empty active set.
    pub fn new(store: Arc<dyn RuleStore>) -> Self {
        Self {
            current: ArcSwap::from_pointee(RuleSet::empty()),
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a redirector whose active set is loaded from `store`.
    pub fn load(store: Arc<dyn RuleStore>) -> Result<Self, StoreError> {
        let rules = RuleSet::sanitize(&store.load()?);
        metrics::set_rules_loaded(rules.len());
        tracing::info!(rules = rules.len(), "Redirect rules loaded");

        Ok(Self {
            current: ArcSwap::from_pointee(rules),
            store,
            write_lock: Mutex::new(()),
        })
    }

    /// The active rule set.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        self.current.load_full()
    }

    /// Destination for a raw request path + query, if any rule matches.
    pub fn resolve(&self, request: &str) -> Option<String> {
        self.current.load().lookup(request).map(str::to_owned)
    }

    /// Replace the active set with the sanitized form of `raw`.
    pub async fn replace(&self, raw: &Value) -> Result<Arc<RuleSet>, StoreError> {
        let rules = RuleSet::sanitize(raw);

        let _guard = self.write_lock.lock().await;
        if let Err(e) = self.store.save(&rules) {
            metrics::record_replacement("error");
            tracing::error!(error = %e, "Failed to persist redirect rules, keeping current set");
            return Err(e);
        }

        metrics::record_replacement("ok");
        Ok(self.swap(rules))
    }

    /// Re-read the store and swap in its contents.
    pub async fn reload(&self) -> Result<Arc<RuleSet>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let rules = RuleSet::sanitize(&self.store.load()?);
        Ok(self.swap(rules))
    }

    fn swap(&self, rules: RuleSet) -> Arc<RuleSet> {
        let rules = Arc::new(rules);
        metrics::set_rules_loaded(rules.len());
        self.current.store(Arc::clone(&rules));
        tracing::info!(rules = rules.len(), "Redirect rules updated");
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::io;

    #[derive(Debug)]
    struct ReadOnlyStore;

    impl RuleStore for ReadOnlyStore {
        fn load(&self) -> Result<Value, StoreError> {
            Ok(json!([{"from": "/kept", "to": "https://ex.com/kept"}]))
        }

        fn save(&self, _rules: &RuleSet) -> Result<(), StoreError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[tokio::test]
    async fn test_replace_persists_and_swaps() {
        let store = Arc::new(MemoryStore::new(json!([])));
        let redirector = Redirector::load(store.clone()).unwrap();
        assert!(redirector.snapshot().is_empty());

        let rules = redirector
            .replace(&json!([
                {"from": "/old", "to": "https://ex.com/new"},
                {"from": "", "to": "https://ex.com/dropped"},
            ]))
            .await
            .unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(redirector.resolve("/old").as_deref(), Some("https://ex.com/new"));
        assert_eq!(
            store.load().unwrap(),
            json!([{"from": "/old", "to": "https://ex.com/new"}])
        );
    }

    #[tokio::test]
    async fn test_failed_save_keeps_current_set() {
        let redirector = Redirector::load(Arc::new(ReadOnlyStore)).unwrap();

        let result = redirector
            .replace(&json!([{"from": "/new", "to": "https://ex.com/new"}]))
            .await;

        assert!(matches!(result, Err(StoreError::Io(_))));
        assert_eq!(redirector.resolve("/kept").as_deref(), Some("https://ex.com/kept"));
        assert_eq!(redirector.resolve("/new"), None);
    }

    #[tokio::test]
    async fn test_reload_picks_up_store_changes() {
        let store = Arc::new(MemoryStore::new(json!([])));
        let redirector = Redirector::new(store.clone());

        store
            .save(&RuleSet::sanitize(&json!([{"from": "/x", "to": "/y"}])))
            .unwrap();
        assert_eq!(redirector.resolve("/x"), None);

        redirector.reload().await.unwrap();
        assert_eq!(redirector.resolve("/x").as_deref(), Some("/y"));
    }

    #[test]
    fn test_snapshot_survives_swap() {
        let store = Arc::new(MemoryStore::new(json!([{"from": "/a", "to": "/b"}])));
        let redirector = Redirector::load(store).unwrap();
        let before = redirector.snapshot();

        redirector.swap(RuleSet::empty());

        assert_eq!(before.lookup("/a"), Some("/b"));
        assert!(redirector.snapshot().is_empty());
    }
}
