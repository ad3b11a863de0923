use crate::error::PluginError;

pub trait HostsConfigHandler {
    fn host_names(&self) -> Vec<String>;
    fn set_default_reserved_memory_to_all_hosts(&mut self, memory: &str)
    -> Result<(), PluginError>;
}

pub trait ConfigManager {
    fn get_hosts_config_handler(&mut self) -> Result<&mut dyn HostsConfigHandler, PluginError>;
}
