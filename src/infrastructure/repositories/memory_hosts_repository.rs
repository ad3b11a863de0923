use tracing::debug;

use crate::{
    domain::repositories::hosts_config_repository::{ConfigManager, HostsConfigHandler},
    error::PluginError,
    model::{
        config::{ConfigMap, ConfigValue},
        snapshot::{ConfigSnapshot, HOSTS_DOMAIN},
    },
};

pub const HOSTS_KEY: &str = "hosts";
pub const MIDDLEWARE_RESERVED_MEMORY: &str = "middleware_reserved_memory";

// 兼容 {"hosts": {...}} 和直接的 host 映射两种格式
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryHostsRepository {
    document: ConfigValue,
}

impl MemoryHostsRepository {
    pub fn new(document: ConfigValue) -> Result<Self, PluginError> {
        if document.as_object().is_none() {
            return Err(PluginError::HostsConfig(format!(
                "{} is not a dictionary: {}",
                HOSTS_DOMAIN, document
            )));
        }
        Ok(Self { document })
    }

    pub fn host(&self, name: &str) -> Option<&ConfigValue> {
        self.hosts().and_then(|hosts| hosts.get(name))
    }

    pub fn into_document(self) -> ConfigValue {
        self.document
    }

    fn hosts(&self) -> Option<&ConfigMap> {
        let root = self.document.as_object()?;
        match root.get(HOSTS_KEY).and_then(ConfigValue::as_object) {
            Some(hosts) => Some(hosts),
            None => Some(root),
        }
    }

    fn hosts_mut(&mut self) -> Result<&mut ConfigMap, PluginError> {
        let root = self
            .document
            .as_object_mut()
            .ok_or_else(|| PluginError::HostsConfig(format!("{} is not a dictionary", HOSTS_DOMAIN)))?;
        if root.get(HOSTS_KEY).is_some_and(|hosts| hosts.as_object().is_some()) {
            return root
                .get_mut(HOSTS_KEY)
                .and_then(ConfigValue::as_object_mut)
                .ok_or_else(|| PluginError::HostsConfig(format!("{} has no hosts", HOSTS_DOMAIN)));
        }
        Ok(root)
    }
}

impl HostsConfigHandler for MemoryHostsRepository {
    fn host_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .hosts()
            .map(|hosts| hosts.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    // 已经显式设置的值保持不变
    fn set_default_reserved_memory_to_all_hosts(
        &mut self,
        memory: &str,
    ) -> Result<(), PluginError> {
        for (name, host) in self.hosts_mut()?.iter_mut() {
            let host = host.as_object_mut().ok_or_else(|| {
                PluginError::HostsConfig(format!("host {} is not a dictionary", name))
            })?;
            let current = host.get(MIDDLEWARE_RESERVED_MEMORY);
            if current.is_some_and(ConfigValue::is_truthy) {
                debug!("host {} keeps {} {:?}", name, MIDDLEWARE_RESERVED_MEMORY, current);
                continue;
            }
            host.insert(
                MIDDLEWARE_RESERVED_MEMORY.to_string(),
                ConfigValue::String(memory.to_string()),
            );
        }
        Ok(())
    }
}

// 第一次使用时解码，into_snapshot 时写回
#[derive(Debug, Clone)]
pub struct SnapshotConfigManager {
    snapshot: ConfigSnapshot,
    hosts: Option<MemoryHostsRepository>,
}

impl SnapshotConfigManager {
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        Self {
            snapshot,
            hosts: None,
        }
    }

    pub fn into_snapshot(self) -> ConfigSnapshot {
        let mut snapshot = self.snapshot;
        if let Some(hosts) = self.hosts {
            snapshot.insert(HOSTS_DOMAIN, hosts.into_document().to_json_string());
        }
        snapshot
    }
}

impl ConfigManager for SnapshotConfigManager {
    fn get_hosts_config_handler(&mut self) -> Result<&mut dyn HostsConfigHandler, PluginError> {
        let hosts = match self.hosts.take() {
            Some(hosts) => hosts,
            None => {
                let document = self
                    .snapshot
                    .decode(HOSTS_DOMAIN)
                    .map_err(|e| PluginError::HostsConfig(e.to_string()))?
                    .ok_or_else(|| {
                        PluginError::HostsConfig(format!("{} configuration is missing", HOSTS_DOMAIN))
                    })?;
                MemoryHostsRepository::new(document)?
            }
        };
        let handler: &mut dyn HostsConfigHandler = self.hosts.insert(hosts);
        Ok(handler)
    }
}
