use async_trait::async_trait;

use crate::{
    domain::repositories::hosts_config_repository::ConfigManager,
    error::{PluginError, ValidationError},
    model::snapshot::ConfigSnapshot,
};

pub trait ConfigValidator: Send + Sync {
    fn name(&self) -> &str;

    fn subscription_info(&self) -> &str;

    fn validate_set(&self, props: &ConfigSnapshot) -> Result<(), ValidationError>;

    fn validate_delete(&self, _domains: &[String]) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[async_trait]
pub trait ConfigActivator: Send + Sync {
    fn name(&self) -> &str;

    fn subscription_info(&self) -> &str;

    async fn activate_set(&self, props: &ConfigSnapshot) -> Result<(), PluginError>;

    async fn activate_delete(&self, domains: &[String]) -> Result<(), PluginError>;

    async fn activate_full(&self, target: Option<&str>) -> Result<(), PluginError>;
}

pub trait UserConfigPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn handle(&self, confman: &mut dyn ConfigManager) -> Result<(), PluginError>;
}
