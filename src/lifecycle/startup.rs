//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the rule store and load the initial rule set
//! - Start background tasks (rules watcher, metrics)
//! - Bind listeners and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when rules are loaded)

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use notify::RecommendedWatcher;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::admin::setup_admin_router;
use crate::config::{RedirectConfig, RulesConfig};
use crate::http::{serve, HttpServer};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::routing::Redirector;
use crate::storage::{JsonFileStore, MemoryStore, RuleStore, RulesWatcher, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to load rules: {0}")]
    Rules(#[from] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },

    #[error("failed to watch rules file: {0}")]
    Watch(#[from] notify::Error),
}

/// A started service.
pub struct Running {
    pub front_addr: SocketAddr,
    pub admin_addr: Option<SocketAddr>,
    pub redirector: Arc<Redirector>,
    shutdown: Shutdown,
    tasks: Vec<JoinHandle<io::Result<()>>>,
    _watcher: Option<RecommendedWatcher>,
}

impl Running {
    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// Wait for every server task to finish.
    pub async fn wait(self) -> io::Result<()> {
        for task in self.tasks {
            match task.await {
                Ok(result) => result?,
                Err(e) => tracing::error!(error = %e, "Server task failed"),
            }
        }
        Ok(())
    }

    /// Trigger shutdown and wait for the servers to drain.
    pub async fn stop(self) -> io::Result<()> {
        self.shutdown.trigger();
        self.wait().await
    }
}

/// Rule store selected by the configuration.
pub fn build_store(config: &RulesConfig) -> Arc<dyn RuleStore> {
    match &config.path {
        Some(path) => Arc::new(JsonFileStore::new(path).with_seed(config.entries.clone())),
        None => {
            let seed = config
                .entries
                .iter()
                .map(|r| json!({"from": r.from, "to": r.to}))
                .collect();
            Arc::new(MemoryStore::new(Value::Array(seed)))
        }
    }
}

/// Start the front server, and the admin server when enabled.
pub async fn start(config: RedirectConfig) -> Result<Running, StartupError> {
    let store = build_store(&config.rules);
    let redirector = Arc::new(Redirector::load(store)?);
    let shutdown = Shutdown::new();

    let watcher = match (&config.rules.path, config.rules.watch) {
        (Some(path), true) => Some(
            RulesWatcher::new(Path::new(path), Arc::clone(&redirector)).run(shutdown.subscribe())?,
        ),
        _ => None,
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut tasks = Vec::new();

    let listener = bind(&config.listener.bind_address).await?;
    let front_addr = local_addr(&listener, &config.listener.bind_address)?;
    let server = HttpServer::new(config.clone(), Arc::clone(&redirector));
    let server_shutdown = shutdown.subscribe();
    tasks.push(tokio::spawn(async move {
        server.run(listener, server_shutdown).await
    }));

    let admin_addr = if config.admin.enabled {
        let listener = bind(&config.admin.bind_address).await?;
        let addr = local_addr(&listener, &config.admin.bind_address)?;
        let router = setup_admin_router(&config, Arc::clone(&redirector));
        tasks.push(tokio::spawn(serve(listener, router, shutdown.subscribe())));
        tracing::info!(address = %addr, "Admin API enabled");
        Some(addr)
    } else {
        None
    };

    Ok(Running {
        front_addr,
        admin_addr,
        redirector,
        shutdown,
        tasks,
        _watcher: watcher,
    })
}

async fn bind(address: &str) -> Result<TcpListener, StartupError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.to_string(),
            source,
        })
}

fn local_addr(listener: &TcpListener, address: &str) -> Result<SocketAddr, StartupError> {
    listener.local_addr().map_err(|source| StartupError::Bind {
        address: address.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{RuleRecord, RuleSet};

    #[test]
    fn test_inline_entries_seed_memory_store() {
        let config = RulesConfig {
            path: None,
            watch: false,
            entries: vec![
                RuleRecord::new("old", "https://ex.com/new"),
                RuleRecord::new("", "https://ex.com/dropped"),
            ],
        };

        let rules = RuleSet::sanitize(&build_store(&config).load().unwrap());
        assert_eq!(rules.lookup("/old"), Some("https://ex.com/new"));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_path_selects_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = RulesConfig {
            path: Some(dir.path().join("rules.json").display().to_string()),
            watch: false,
            entries: vec![RuleRecord::new("/seed", "/dest")],
        };

        let store = build_store(&config);
        store.save(&RuleSet::empty()).unwrap();
        assert!(dir.path().join("rules.json").exists());
        assert!(RuleSet::sanitize(&store.load().unwrap()).is_empty());
    }
}
