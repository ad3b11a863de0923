pub mod application;
pub mod command;
pub mod domain;
pub mod error;
pub mod handler;
pub mod infrastructure;
pub mod interfaces;
pub mod model;
pub mod settings;

use std::str::FromStr;

use tracing_subscriber::fmt;

use crate::error::ConfigError;

pub fn init_tracing(level: &str) -> anyhow::Result<()> {
    let level = tracing::Level::from_str(level)
        .map_err(|_| anyhow::anyhow!("invalid log level: {}", level))?;
    let subscriber = fmt::Subscriber::builder().with_max_level(level).finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

pub fn read_file(path: &str) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
    Ok(content)
}
