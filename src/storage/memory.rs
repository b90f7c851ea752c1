//! In-memory rule store.

use std::sync::Mutex;

use serde_json::Value;

use crate::routing::RuleSet;
use crate::storage::{RuleStore, StoreError};

/// Keeps the raw rule data in memory. Used for inline-configured rules and
/// in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: Mutex<Value>,
}

impl MemoryStore {
    /// Create a store that initially loads `raw`.
    pub fn new(raw: Value) -> Self {
        Self {
            raw: Mutex::new(raw),
        }
    }
}

impl RuleStore for MemoryStore {
    fn load(&self) -> Result<Value, StoreError> {
        let raw = self.raw.lock().unwrap_or_else(|e| e.into_inner());
        Ok(raw.clone())
    }

    fn save(&self, rules: &RuleSet) -> Result<(), StoreError> {
        let value = serde_json::to_value(rules.to_records())?;
        *self.raw.lock().unwrap_or_else(|e| e.into_inner()) = value;
        Ok(())
    }
}
