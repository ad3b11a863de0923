use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    application::services::plugin_dispatcher::PluginDispatcher,
    domain::{
        events::config_changed::{ConfigChange, ConfigChangedEvent},
        services::snapshot_loader::SnapshotLoader,
    },
    error::PluginError,
    model::snapshot::ConfigSnapshot,
};

pub const CHANGED_BY: &str = "file_watcher";

pub fn change_events(current: &ConfigSnapshot, next: &ConfigSnapshot) -> Vec<ConfigChangedEvent> {
    let mut props = ConfigSnapshot::new();
    let mut removed = Vec::new();
    for domain in next.changed_domains(current) {
        match next.get(&domain) {
            Some(document) => {
                props.insert(domain, document);
            }
            None => removed.push(domain),
        }
    }

    let mut events = Vec::new();
    if !props.is_empty() {
        events.push(ConfigChangedEvent::new(ConfigChange::Set { props }, CHANGED_BY));
    }
    if !removed.is_empty() {
        events.push(ConfigChangedEvent::new(
            ConfigChange::Delete { domains: removed },
            CHANGED_BY,
        ));
    }
    events
}

// 每个事件被接受后才推进 current，被拒绝的部分下次重新计算
pub async fn dispatch_changes(
    dispatcher: &PluginDispatcher,
    current: &mut ConfigSnapshot,
    next: &ConfigSnapshot,
) -> Result<usize, PluginError> {
    let mut dispatched = 0;
    for event in change_events(current, next) {
        let report = dispatcher.dispatch(&event, next).await?;
        info!("change dispatched: {:?}", report);
        match event.change {
            ConfigChange::Set { props } => {
                for domain in props.domains() {
                    if let Some(document) = props.get(domain) {
                        current.insert(domain, document);
                    }
                }
            }
            ConfigChange::Delete { domains } => {
                for domain in &domains {
                    current.remove(domain);
                }
            }
            ConfigChange::Full { .. } => {}
        }
        dispatched += 1;
    }
    Ok(dispatched)
}

pub struct SnapshotWatcher {
    path: PathBuf,
    dispatcher: PluginDispatcher,
}

impl SnapshotWatcher {
    pub fn new(path: impl AsRef<Path>, dispatcher: PluginDispatcher) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            dispatcher,
        }
    }

    pub async fn run(self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| {
                let _ = tx.send(result);
            },
            notify::Config::default(),
        )?;
        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        let mut current = SnapshotLoader::load(&self.path)?;
        info!("watching {} ({} domains)", self.path.display(), current.len());

        while let Some(result) = rx.recv().await {
            let event = match result {
                Ok(event) => event,
                Err(e) => {
                    warn!("watch error: {}", e);
                    continue;
                }
            };
            if !(event.kind.is_modify() || event.kind.is_create()) {
                continue;
            }
            debug!("event: {:?}", event);

            let next = match SnapshotLoader::load(&self.path) {
                Ok(next) => next,
                Err(e) => {
                    error!("failed to load {}: {}", self.path.display(), e);
                    continue;
                }
            };

            if let Err(e) = dispatch_changes(&self.dispatcher, &mut current, &next).await {
                error!("change rejected: {}", e);
            }
        }
        Ok(())
    }
}
