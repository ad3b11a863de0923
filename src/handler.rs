use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    application::services::{
        caas_validation::CaasValidation,
        ovs_config_activator::OvsConfigActivator,
        plugin_dispatcher::{DispatchReport, PluginDispatcher},
        rec_host_handler::RecHostHandler,
    },
    command::ActivationMode,
    domain::{
        events::config_changed::{ConfigChange, ConfigChangedEvent},
        plugin::UserConfigPlugin,
        services::snapshot_loader::SnapshotLoader,
    },
    error::{ConfigError, PluginError},
    infrastructure::{
        ansible_runner::AnsiblePlaybookRunner, repositories::memory_hosts_repository::SnapshotConfigManager,
    },
    model::{
        config::ConfigValue,
        snapshot::{ConfigSnapshot, HOSTS_DOMAIN},
    },
    settings::Settings,
};

pub const CHANGED_BY: &str = "cli";

pub fn handle_validate(path: &str) -> Result<ConfigSnapshot, ConfigError> {
    let snapshot = SnapshotLoader::load(path)?;
    debug!("validate: {} ({} domains)", path, snapshot.len());
    CaasValidation::new().validate(&snapshot)?;
    Ok(snapshot)
}

pub fn build_dispatcher(settings: &Settings, dry_run: bool) -> Result<PluginDispatcher, PluginError> {
    let runner = AnsiblePlaybookRunner::new(settings.activator.ansible_playbook.clone()).dry_run(dry_run);
    PluginDispatcher::new()
        .validator(CaasValidation::new())?
        .activator(OvsConfigActivator::with_playbook(
            Arc::new(runner),
            settings.activator.playbook.clone(),
        ))
}

pub fn activation_event(
    snapshot: &ConfigSnapshot,
    mode: ActivationMode,
    target: Option<String>,
) -> ConfigChangedEvent {
    let change = match mode {
        ActivationMode::Set => ConfigChange::Set {
            props: snapshot.clone(),
        },
        ActivationMode::Delete => ConfigChange::Delete {
            domains: snapshot.domains().map(str::to_string).collect(),
        },
        ActivationMode::Full => ConfigChange::Full { target },
    };
    ConfigChangedEvent::new(change, CHANGED_BY)
}

pub async fn handle_activate(
    path: &str,
    mode: ActivationMode,
    target: Option<String>,
    settings: &Settings,
    dry_run: bool,
) -> anyhow::Result<DispatchReport> {
    let snapshot = SnapshotLoader::load(path)?;
    let dispatcher = build_dispatcher(settings, dry_run)?;
    let event = activation_event(&snapshot, mode, target);
    info!("activate: {} {:?}", path, mode);
    Ok(dispatcher.dispatch(&event, &snapshot).await?)
}

pub fn handle_hosts(
    path: &str,
    output: Option<&str>,
    settings: &Settings,
) -> anyhow::Result<ConfigValue> {
    let snapshot = SnapshotLoader::load(path)?;
    let handler =
        RecHostHandler::with_default_memory(settings.hosts.default_middleware_reserved_memory.clone());

    let mut confman = SnapshotConfigManager::new(snapshot);
    handler.handle(&mut confman)?;
    let hosts = confman
        .into_snapshot()
        .decode(HOSTS_DOMAIN)?
        .ok_or_else(|| anyhow::anyhow!("{} configuration is missing", HOSTS_DOMAIN))?;

    if let Some(output) = output {
        let content = serde_json::to_string_pretty(&hosts.to_serde_value())?;
        std::fs::write(output, content).map_err(ConfigError::IoError)?;
        info!("hosts written to {}", output);
    }
    Ok(hosts)
}
