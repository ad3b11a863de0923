use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::snapshot::ConfigSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfigChange {
    Set { props: ConfigSnapshot },
    Delete { domains: Vec<String> },
    // 全量激活，可以只针对一台主机
    Full { target: Option<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigChangedEvent {
    pub change: ConfigChange,
    pub changed_by: String, // 变更来源：cli, file_watcher
    pub timestamp: DateTime<Utc>,
}

impl ConfigChangedEvent {
    pub fn new(change: ConfigChange, changed_by: impl Into<String>) -> Self {
        Self {
            change,
            changed_by: changed_by.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn changed_domains(&self) -> Vec<String> {
        match &self.change {
            ConfigChange::Set { props } => props.domains().map(str::to_string).collect(),
            ConfigChange::Delete { domains } => domains.clone(),
            ConfigChange::Full { .. } => Vec::new(),
        }
    }
}
