pub mod caas_validation;
pub mod ovs_config_activator;
pub mod plugin_dispatcher;
pub mod rec_host_handler;
