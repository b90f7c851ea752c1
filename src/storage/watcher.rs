//! Rules file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};

use crate::routing::Redirector;

/// Watches the rules file and reloads the redirector when it changes.
pub struct RulesWatcher {
    path: PathBuf,
    redirector: Arc<Redirector>,
}

impl RulesWatcher {
    pub fn new(path: &Path, redirector: Arc<Redirector>) -> Self {
        Self {
            path: path.to_path_buf(),
            redirector,
        }
    }

    /// Start watching.
    ///
    /// File events are forwarded to a Tokio task that performs the reload.
    /// The returned watcher must be kept alive for as long as watching should
    /// continue.
    pub fn run(
        self,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<RecommendedWatcher, notify::Error> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let file_name = self.path.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let touches_rules = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if touches_rules && (event.kind.is_modify() || event.kind.is_create()) {
                        let _ = tx.send(());
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        // Watch the directory: saves replace the file by rename. It may not
        // exist until the first save, so create it up front.
        let target = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(target).map_err(notify::Error::io)?;
        watcher.watch(target, RecursiveMode::NonRecursive)?;

        let redirector = self.redirector;
        let path = self.path.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = rx.recv() => {
                        if changed.is_none() {
                            break;
                        }
                        // Coalesce bursts of events from a single write.
                        while rx.try_recv().is_ok() {}
                        tracing::info!(path = %path.display(), "Rules file change detected, reloading...");
                        if let Err(e) = redirector.reload().await {
                            tracing::error!(error = %e, "Failed to reload rules, keeping current rules");
                        }
                    }
                    _ = shutdown.recv() => break,
                }
            }
        });

        tracing::info!(path = ?self.path, "Rules watcher started");
        Ok(watcher)
    }
}
