use std::path::Path;

use tracing::debug;

use crate::{
    error::ConfigError,
    model::{
        config::{ConfigType, ConfigValue},
        snapshot::ConfigSnapshot,
    },
    read_file,
};

pub struct SnapshotLoader;

impl SnapshotLoader {
    pub fn load(path: impl AsRef<Path>) -> Result<ConfigSnapshot, ConfigError> {
        let path = path.as_ref().to_string_lossy().to_string();
        let content = read_file(&path)?;
        Self::parse(&path, &content)
    }

    // 先按扩展名判断格式，判断不出来再看内容
    pub fn parse(path: &str, content: &str) -> Result<ConfigSnapshot, ConfigError> {
        if path.trim().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if content.trim().is_empty() {
            return Err(ConfigError::EmptyContent);
        }

        let config_type = match ConfigType::from_path(path) {
            ConfigType::Unknown => ConfigType::detect(content)?,
            config_type => config_type,
        };
        debug!("loading snapshot {} as {}", path, config_type);

        let value = ConfigValue::parse(content, config_type)?;
        ConfigSnapshot::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::snapshot::{CAAS_DOMAIN, HOSTS_DOMAIN};

    #[test]
    fn test_parse_json_snapshot() {
        let snapshot = SnapshotLoader::parse(
            "snapshot.json",
            r#"{"cloud.caas": "{\"chart_name\": \"x\"}", "cloud.hosts": {"hosts": {}}}"#,
        )
        .unwrap();
        assert!(snapshot.contains(CAAS_DOMAIN));
        assert!(snapshot.contains(HOSTS_DOMAIN));
    }

    #[test]
    fn test_parse_yaml_snapshot_without_extension() {
        let content = "cloud.caas:\n  chart_name: x\ncloud.hosts:\n  hosts: {}\n";
        let snapshot = SnapshotLoader::parse("snapshot", content).unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(SnapshotLoader::parse("", "{}"), Err(ConfigError::EmptyPath)));
        assert!(matches!(SnapshotLoader::parse("a.json", "  "), Err(ConfigError::EmptyContent)));
        assert!(matches!(
            SnapshotLoader::parse("a.json", "[1, 2]"),
            Err(ConfigError::ParseConfigError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.toml");
        std::fs::write(&path, "\"cloud.caas\" = '{\"chart_name\": \"x\"}'\n").unwrap();

        let snapshot = SnapshotLoader::load(&path).unwrap();
        assert_eq!(snapshot.get(CAAS_DOMAIN), Some("{\"chart_name\": \"x\"}"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SnapshotLoader::load("/nonexistent/snapshot.json"),
            Err(ConfigError::IoError(_))
        ));
    }
}
