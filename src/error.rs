use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    ParseConfigError(String),
    #[error("io error")]
    IoError(#[from] std::io::Error),
    #[error("empty path")]
    EmptyPath,
    #[error("unknown config type")]
    UnknownConfigType,
    #[error("empty content")]
    EmptyContent,
    #[error("unsupported format: {format}")]
    UnsupportedFormat { format: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// 校验失败：只有一种错误，调用方通过描述文本区分失败原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation error in {validator}: {description}")]
pub struct ValidationError {
    pub validator: &'static str,
    pub description: String,
}

impl ValidationError {
    pub fn caas(description: impl Into<String>) -> Self {
        Self {
            validator: "caas_validation",
            description: description.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("playbook {playbook} failed: {reason}")]
    Playbook { playbook: String, reason: String },
    #[error("hosts config error: {0}")]
    HostsConfig(String),
    #[error("invalid subscription of {plugin}: {reason}")]
    InvalidSubscription { plugin: String, reason: String },
}
