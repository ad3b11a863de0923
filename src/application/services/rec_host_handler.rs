use tracing::info;

use crate::{
    domain::{plugin::UserConfigPlugin, repositories::hosts_config_repository::ConfigManager},
    error::PluginError,
};

pub const DEFAULT_MIDDLEWARE_RESERVED_MEMORY: &str = "4Gi";

#[derive(Debug, Clone)]
pub struct RecHostHandler {
    default_middleware_reserved_memory: String,
}

impl Default for RecHostHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl RecHostHandler {
    pub fn new() -> Self {
        Self::with_default_memory(DEFAULT_MIDDLEWARE_RESERVED_MEMORY)
    }

    pub fn with_default_memory(memory: impl Into<String>) -> Self {
        Self {
            default_middleware_reserved_memory: memory.into(),
        }
    }

    fn set_default_memory(&self, confman: &mut dyn ConfigManager) -> Result<(), PluginError> {
        let hostconf = confman.get_hosts_config_handler()?;
        info!(
            "setting default middleware reserved memory {} on {} hosts",
            self.default_middleware_reserved_memory,
            hostconf.host_names().len()
        );
        hostconf.set_default_reserved_memory_to_all_hosts(&self.default_middleware_reserved_memory)
    }
}

impl UserConfigPlugin for RecHostHandler {
    fn name(&self) -> &str {
        "rechosthandler"
    }

    fn handle(&self, confman: &mut dyn ConfigManager) -> Result<(), PluginError> {
        self.set_default_memory(confman)
    }
}
