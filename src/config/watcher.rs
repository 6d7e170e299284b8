//! Configuration file watcher for hot reload.
//!
//! Opt-in (`reload.watch_files`); without it the only way to swap the
//! running configuration is `POST /admin/reload`.

use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::ConfigSource;
use crate::config::schema::GatewayConfig;

/// A watcher that monitors the config and `.env` files for changes.
pub struct ConfigWatcher {
    source: ConfigSource,
    update_tx: mpsc::UnboundedSender<GatewayConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(source: ConfigSource) -> (Self, mpsc::UnboundedReceiver<GatewayConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (Self { source, update_tx }, update_rx)
    }

    /// Start watching in a background thread. Dropping the returned
    /// watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let source = self.source.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(paths = ?event.paths, "Config change detected, reloading...");
                        match source.load() {
                            Ok(new_config) => {
                                let _ = tx.send(new_config);
                            }
                            Err(e) => {
                                tracing::error!(
                                    "Failed to reload config: {}. Keeping current configuration.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        for path in self.source.watched_paths() {
            watcher.watch(&path, RecursiveMode::NonRecursive)?;
            tracing::info!(path = ?path, "Config watcher started");
        }
        Ok(watcher)
    }
}
