//! JSON file rule store.
//!
//! # Design Decisions
//! - A missing file loads the seed rules instead of failing
//! - Writes go to a sibling temp file and are renamed into place, so readers
//!   never see a half-written file

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::routing::{RuleRecord, RuleSet};
use crate::storage::{RuleStore, StoreError};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    seed: Vec<RuleRecord>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seed: Vec::new(),
        }
    }

    /// Rules to load while the file does not exist yet.
    pub fn with_seed(mut self, seed: Vec<RuleRecord>) -> Self {
        self.seed = seed;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RuleStore for JsonFileStore {
    fn load(&self) -> Result<Value, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "Rules file not found, using seed rules");
                Ok(serde_json::to_value(&self.seed)?)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, rules: &RuleSet) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&rules.to_records())?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        fs::write(&temp, content)?;
        fs::rename(&temp, &self.path)?;

        tracing::debug!(path = %self.path.display(), rules = rules.len(), "Rules saved");
        Ok(())
    }
}
