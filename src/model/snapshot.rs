use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::config::ConfigValue;

pub const CAAS_DOMAIN: &str = "cloud.caas";
pub const HOSTS_DOMAIN: &str = "cloud.hosts";
pub const NETWORKING_DOMAIN: &str = "cloud.networking";

// 域名 -> 序列化后的 JSON 文档
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    props: BTreeMap<String, String>,
}

impl ConfigSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, domain: impl Into<String>, document: impl Into<String>) -> Self {
        self.insert(domain, document);
        self
    }

    pub fn insert(
        &mut self,
        domain: impl Into<String>,
        document: impl Into<String>,
    ) -> Option<String> {
        self.props.insert(domain.into(), document.into())
    }

    pub fn remove(&mut self, domain: &str) -> Option<String> {
        self.props.remove(domain)
    }

    pub fn get(&self, domain: &str) -> Option<&str> {
        self.props.get(domain).map(String::as_str)
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.props.contains_key(domain)
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    // 域不存在时返回 Ok(None)
    pub fn decode(&self, domain: &str) -> Result<Option<ConfigValue>, ConfigError> {
        self.get(domain)
            .map(ConfigValue::from_json_str)
            .transpose()
    }

    // 顶层必须是对象；值可以是 JSON 字符串，也可以是内联对象（重新序列化为 JSON）
    pub fn from_value(value: ConfigValue) -> Result<Self, ConfigError> {
        let obj = match value {
            ConfigValue::Object(obj) => obj,
            other => {
                return Err(ConfigError::ParseConfigError(format!(
                    "The given input: {} is not a dictionary!",
                    other
                )));
            }
        };

        let props = obj
            .into_iter()
            .map(|(domain, document)| {
                let document = match document {
                    ConfigValue::String(s) => s,
                    other => other.to_json_string(),
                };
                (domain, document)
            })
            .collect();
        Ok(Self { props })
    }

    pub fn changed_domains(&self, previous: &ConfigSnapshot) -> Vec<String> {
        let mut changed: Vec<String> = self
            .props
            .iter()
            .filter(|(domain, document)| previous.props.get(*domain) != Some(*document))
            .map(|(domain, _)| domain.clone())
            .collect();
        changed.extend(
            previous
                .props
                .keys()
                .filter(|domain| !self.props.contains_key(*domain))
                .cloned(),
        );
        changed.sort();
        changed
    }
}
