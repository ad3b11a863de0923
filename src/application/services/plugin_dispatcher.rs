use tracing::{debug, info};

use crate::{
    domain::{
        events::config_changed::{ConfigChange, ConfigChangedEvent},
        plugin::{ConfigActivator, ConfigValidator},
        value_objects::subscription::Subscription,
    },
    error::PluginError,
    model::snapshot::ConfigSnapshot,
};

struct Registered<P: ?Sized> {
    subscription: Subscription,
    plugin: Box<P>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub validated: Vec<String>,
    pub activated: Vec<String>,
}

// 先跑校验，全部通过后才激活
#[derive(Default)]
pub struct PluginDispatcher {
    validators: Vec<Registered<dyn ConfigValidator>>,
    activators: Vec<Registered<dyn ConfigActivator>>,
}

impl std::fmt::Debug for PluginDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDispatcher")
            .field(
                "validators",
                &self.validators.iter().map(|v| v.plugin.name()).collect::<Vec<_>>(),
            )
            .field(
                "activators",
                &self.activators.iter().map(|a| a.plugin.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn subscribe(name: &str, pattern: &str) -> Result<Subscription, PluginError> {
    Subscription::new(pattern).map_err(|e| PluginError::InvalidSubscription {
        plugin: name.to_string(),
        reason: e.to_string(),
    })
}

impl PluginDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validator(mut self, validator: impl ConfigValidator + 'static) -> Result<Self, PluginError> {
        let subscription = subscribe(validator.name(), validator.subscription_info())?;
        self.validators.push(Registered {
            subscription,
            plugin: Box::new(validator),
        });
        Ok(self)
    }

    pub fn activator(mut self, activator: impl ConfigActivator + 'static) -> Result<Self, PluginError> {
        let subscription = subscribe(activator.name(), activator.subscription_info())?;
        self.activators.push(Registered {
            subscription,
            plugin: Box::new(activator),
        });
        Ok(self)
    }

    // 校验器看完整快照，激活器只看事件里的内容
    pub async fn dispatch(
        &self,
        event: &ConfigChangedEvent,
        snapshot: &ConfigSnapshot,
    ) -> Result<DispatchReport, PluginError> {
        let domains = event.changed_domains();
        let mut report = DispatchReport::default();
        info!(
            "dispatching {:?} from {} at {}",
            domains, event.changed_by, event.timestamp
        );

        for validator in &self.validators {
            if !validator.subscription.matches_any(&domains) {
                debug!("{} not subscribed to {:?}", validator.plugin.name(), domains);
                continue;
            }
            match &event.change {
                ConfigChange::Set { .. } => validator.plugin.validate_set(snapshot)?,
                ConfigChange::Delete { domains } => validator.plugin.validate_delete(domains)?,
                ConfigChange::Full { .. } => continue,
            }
            report.validated.push(validator.plugin.name().to_string());
        }

        for activator in &self.activators {
            match &event.change {
                ConfigChange::Set { props } if activator.subscription.matches_any(&domains) => {
                    activator.plugin.activate_set(props).await?
                }
                ConfigChange::Delete { domains } if activator.subscription.matches_any(domains) => {
                    activator.plugin.activate_delete(domains).await?
                }
                ConfigChange::Full { target } => activator.plugin.activate_full(target.as_deref()).await?,
                _ => {
                    debug!("{} not subscribed to {:?}", activator.plugin.name(), domains);
                    continue;
                }
            }
            report.activated.push(activator.plugin.name().to_string());
        }

        Ok(report)
    }
}
