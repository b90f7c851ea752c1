//! Rule persistence subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     RuleStore::load() → raw JSON → RuleSet::sanitize → Redirector
//!
//! Admin replacement:
//!     raw JSON → RuleSet::sanitize → RuleStore::save → atomic swap
//!
//! External edit of the rules file:
//!     watcher.rs detects change → Redirector::reload → atomic swap
//! ```
//!
//! # Design Decisions
//! - Storage is a port: the core never touches files directly
//! - `load` returns untrusted raw data; validation is always `sanitize`
//! - Rules are saved in their editing form (`[{from, to}]`)

pub mod file;
pub mod memory;
pub mod watcher;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use watcher::RulesWatcher;

use serde_json::Value;

use crate::routing::RuleSet;

/// Error type for rule persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Port for loading and saving the rule set.
pub trait RuleStore: Send + Sync + std::fmt::Debug {
    /// Load the raw, unvalidated rule data.
    fn load(&self) -> Result<Value, StoreError>;

    /// Persist a validated rule set, replacing whatever was stored.
    fn save(&self, rules: &RuleSet) -> Result<(), StoreError>;
}
