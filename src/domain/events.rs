pub mod config_changed;
