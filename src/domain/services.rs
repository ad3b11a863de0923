pub mod key_search;
pub mod playbook_runner;
pub mod snapshot_loader;
