use async_trait::async_trait;

use crate::error::PluginError;

#[async_trait]
pub trait PlaybookRunner: Send + Sync {
    async fn run_playbook(&self, playbook: &str, target: Option<&str>) -> Result<(), PluginError>;
}
