pub mod hosts_config_repository;
