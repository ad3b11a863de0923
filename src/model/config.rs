use std::{collections::HashMap, fmt::Display};

use serde_json::Number;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConfigType {
    Yaml,
    Json,
    Toml,
    Unknown,
}

impl Display for ConfigType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl ConfigType {
    pub fn from_path(path: &str) -> ConfigType {
        let path = path.trim().to_lowercase();
        if path.ends_with(".toml") {
            ConfigType::Toml
        } else if path.ends_with(".json") {
            ConfigType::Json
        } else if path.ends_with(".yaml") || path.ends_with(".yml") {
            ConfigType::Yaml
        } else {
            ConfigType::Unknown
        }
    }

    // 根据第一行有效内容猜测格式
    pub fn detect(content: &str) -> Result<ConfigType, ConfigError> {
        let line = content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("---"))
            .ok_or(ConfigError::EmptyContent)?;

        if line.starts_with('{') || line == "[" {
            Ok(ConfigType::Json)
        } else if (line.starts_with('[')
            && line.ends_with(']')
            && !line.contains(':')
            && !line.contains(','))
            || (line.contains(" = ") && !line.contains(": "))
        {
            Ok(ConfigType::Toml)
        } else if line.contains(": ") || line.ends_with(':') {
            Ok(ConfigType::Yaml)
        } else {
            Err(ConfigError::UnknownConfigType)
        }
    }
}

pub type ConfigMap = HashMap<String, ConfigValue>;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConfigValue {
    Null,
    String(String),
    Number(Number),
    Boolean(bool),
    Array(Vec<ConfigValue>),
    Object(ConfigMap),
}

// 字符串直接输出，其余按紧凑 JSON 输出
impl Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.to_serde_value()),
        }
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        ConfigValue::from_serde_json(value)
    }
}

impl ConfigValue {
    pub fn from_serde_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Boolean(b),
            serde_json::Value::Number(n) => ConfigValue::Number(n),
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(arr) => {
                ConfigValue::Array(arr.into_iter().map(ConfigValue::from_serde_json).collect())
            }
            serde_json::Value::Object(obj) => ConfigValue::Object(
                obj.into_iter()
                    .map(|(key, value)| (key, ConfigValue::from_serde_json(value)))
                    .collect(),
            ),
        }
    }

    pub fn to_serde_value(&self) -> serde_json::Value {
        match self {
            ConfigValue::Null => serde_json::Value::Null,
            ConfigValue::Boolean(b) => serde_json::Value::Bool(*b),
            ConfigValue::Number(n) => serde_json::Value::Number(n.clone()),
            ConfigValue::String(s) => serde_json::Value::String(s.clone()),
            ConfigValue::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(|v| v.to_serde_value()).collect())
            }
            ConfigValue::Object(obj) => {
                let mut serde_obj = serde_json::Map::new();
                for (key, value) in obj {
                    serde_obj.insert(key.clone(), value.to_serde_value());
                }
                serde_json::Value::Object(serde_obj)
            }
        }
    }

    // 解析 JSON/YAML/TOML 文本，统一转换为 ConfigValue
    pub fn parse(content: &str, config_type: ConfigType) -> Result<Self, ConfigError> {
        let json_value = match config_type {
            ConfigType::Json => serde_json::from_str::<serde_json::Value>(content)
                .map_err(|e| ConfigError::ParseConfigError(e.to_string()))?,
            ConfigType::Yaml => {
                let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)
                    .map_err(|e| ConfigError::ParseConfigError(e.to_string()))?;
                serde_json::to_value(yaml_value)
                    .map_err(|e| ConfigError::ParseConfigError(e.to_string()))?
            }
            ConfigType::Toml => {
                let toml_value: toml::Value = toml::from_str(content)
                    .map_err(|e| ConfigError::ParseConfigError(e.to_string()))?;
                serde_json::to_value(toml_value)
                    .map_err(|e| ConfigError::ParseConfigError(e.to_string()))?
            }
            ConfigType::Unknown => {
                return Err(ConfigError::UnsupportedFormat {
                    format: config_type.to_string(),
                });
            }
        };
        Ok(ConfigValue::from_serde_json(json_value))
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, ConfigType::Json)
    }

    pub fn to_json_string(&self) -> String {
        self.to_serde_value().to_string()
    }

    pub fn as_object(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ConfigMap> {
        match self {
            ConfigValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<ConfigValue>> {
        match self {
            ConfigValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    // 只接受 JSON 整数，字符串、浮点和布尔都不算
    pub fn is_integer(&self) -> bool {
        matches!(self, ConfigValue::Number(n) if n.is_i64() || n.is_u64())
    }

    // null、false、0、空字符串、空数组、空对象都视为"空"
    pub fn is_truthy(&self) -> bool {
        match self {
            ConfigValue::Null => false,
            ConfigValue::Boolean(b) => *b,
            ConfigValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            ConfigValue::String(s) => !s.is_empty(),
            ConfigValue::Array(arr) => !arr.is_empty(),
            ConfigValue::Object(obj) => !obj.is_empty(),
        }
    }
}
