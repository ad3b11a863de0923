use std::fs;
use std::path::Path;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    application::services::{ovs_config_activator::PLAYBOOK, rec_host_handler::DEFAULT_MIDDLEWARE_RESERVED_MEMORY},
    infrastructure::ansible_runner::ANSIBLE_PLAYBOOK,
};

pub const ENV_LOG_LEVEL: &str = "CM_PLUGINS_LOG_LEVEL";
pub const ENV_PLAYBOOK: &str = "CM_PLUGINS_PLAYBOOK";
pub const ENV_ANSIBLE_PLAYBOOK: &str = "CM_PLUGINS_ANSIBLE_PLAYBOOK";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub activator: ActivatorConfig,
    pub hosts: HostsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivatorConfig {
    pub playbook: String,
    pub ansible_playbook: String,
}

impl Default for ActivatorConfig {
    fn default() -> Self {
        Self {
            playbook: PLAYBOOK.to_string(),
            ansible_playbook: ANSIBLE_PLAYBOOK.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostsConfig {
    pub default_middleware_reserved_memory: String,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            default_middleware_reserved_memory: DEFAULT_MIDDLEWARE_RESERVED_MEMORY.to_string(),
        }
    }
}

pub struct SettingsLoader;

impl SettingsLoader {
    // 配置文件可选，环境变量优先级更高
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let mut settings = match path {
            Some(path) => Self::load_from_toml(path)?,
            None => Settings::default(),
        };
        Self::load_from_env(&mut settings);
        Ok(settings)
    }

    pub fn load_from_toml<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(anyhow!("settings file not found: {}", path.display()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read {}: {}", path.display(), e))?;
        let settings: Settings = toml::from_str(&content)
            .map_err(|e| anyhow!("failed to parse {}: {}", path.display(), e))?;

        info!("settings loaded from {}", path.display());
        Ok(settings)
    }

    pub fn load_from_env(settings: &mut Settings) {
        Self::apply_overrides(settings, |key| std::env::var(key).ok());
    }

    pub fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            warn!("{} overrides log level: {} -> {}", ENV_LOG_LEVEL, settings.logging.level, level);
            settings.logging.level = level;
        }
        if let Some(playbook) = lookup(ENV_PLAYBOOK) {
            warn!("{} overrides playbook: {} -> {}", ENV_PLAYBOOK, settings.activator.playbook, playbook);
            settings.activator.playbook = playbook;
        }
        if let Some(program) = lookup(ENV_ANSIBLE_PLAYBOOK) {
            warn!(
                "{} overrides ansible-playbook: {} -> {}",
                ENV_ANSIBLE_PLAYBOOK, settings.activator.ansible_playbook, program
            );
            settings.activator.ansible_playbook = program;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.activator.playbook, PLAYBOOK);
        assert_eq!(settings.activator.ansible_playbook, "ansible-playbook");
        assert_eq!(settings.hosts.default_middleware_reserved_memory, "4Gi");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[activator]\nplaybook = \"/tmp/ovs.yaml\"\n").unwrap();

        let settings = SettingsLoader::load_from_toml(&path).unwrap();
        assert_eq!(settings.activator.playbook, "/tmp/ovs.yaml");
        assert_eq!(settings.activator.ansible_playbook, "ansible-playbook");
        assert_eq!(settings.logging, LoggingConfig::default());
    }

    #[test]
    fn test_missing_file() {
        assert!(SettingsLoader::load_from_toml("/nonexistent/settings.toml").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_LOG_LEVEL, "debug"), (ENV_PLAYBOOK, "/srv/ovs.yaml")]);
        let mut settings = Settings::default();

        SettingsLoader::apply_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.activator.playbook, "/srv/ovs.yaml");
        assert_eq!(settings.activator.ansible_playbook, "ansible-playbook");
    }
}
