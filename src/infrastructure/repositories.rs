pub mod memory_hosts_repository;
