pub mod ansible_runner;
pub mod repositories;
