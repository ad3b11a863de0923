use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    domain::{plugin::ConfigActivator, services::playbook_runner::PlaybookRunner},
    error::PluginError,
    model::snapshot::{ConfigSnapshot, NETWORKING_DOMAIN},
};

pub const PLAYBOOK: &str = "/opt/openstack-ansible/playbooks/ovs_config.yaml";

pub struct OvsConfigActivator {
    runner: Arc<dyn PlaybookRunner>,
    playbook: String,
}

impl OvsConfigActivator {
    pub fn new(runner: Arc<dyn PlaybookRunner>) -> Self {
        Self::with_playbook(runner, PLAYBOOK)
    }

    pub fn with_playbook(runner: Arc<dyn PlaybookRunner>, playbook: impl Into<String>) -> Self {
        Self {
            runner,
            playbook: playbook.into(),
        }
    }

    pub fn playbook(&self) -> &str {
        &self.playbook
    }

    async fn activate(&self, target: Option<&str>) -> Result<(), PluginError> {
        info!(
            "running {} on {}",
            self.playbook,
            target.unwrap_or("all hosts")
        );
        self.runner.run_playbook(&self.playbook, target).await
    }
}

#[async_trait]
impl ConfigActivator for OvsConfigActivator {
    fn name(&self) -> &str {
        "ovsconfigactivator"
    }

    fn subscription_info(&self) -> &str {
        NETWORKING_DOMAIN
    }

    async fn activate_set(&self, _props: &ConfigSnapshot) -> Result<(), PluginError> {
        self.activate(None).await
    }

    async fn activate_delete(&self, _domains: &[String]) -> Result<(), PluginError> {
        self.activate(None).await
    }

    async fn activate_full(&self, target: Option<&str>) -> Result<(), PluginError> {
        self.activate(target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<(String, Option<String>)>>,
        fail: bool,
    }

    #[async_trait]
    impl PlaybookRunner for RecordingRunner {
        async fn run_playbook(&self, playbook: &str, target: Option<&str>) -> Result<(), PluginError> {
            self.calls
                .lock()
                .unwrap()
                .push((playbook.to_string(), target.map(str::to_string)));
            if self.fail {
                return Err(PluginError::Playbook {
                    playbook: playbook.to_string(),
                    reason: "exit status: 2".to_string(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_set_delete_and_full_run_the_playbook() {
        let runner = Arc::new(RecordingRunner::default());
        let activator = OvsConfigActivator::new(runner.clone());

        activator.activate_set(&ConfigSnapshot::new()).await.unwrap();
        activator.activate_delete(&["cloud.networking".to_string()]).await.unwrap();
        activator.activate_full(Some("controller-1")).await.unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                (PLAYBOOK.to_string(), None),
                (PLAYBOOK.to_string(), None),
                (PLAYBOOK.to_string(), Some("controller-1".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_runner_failure_is_reported() {
        let runner = Arc::new(RecordingRunner {
            fail: true,
            ..Default::default()
        });
        let activator = OvsConfigActivator::with_playbook(runner, "/tmp/ovs.yaml");

        let err = activator.activate_full(None).await.unwrap_err();
        assert!(matches!(err, PluginError::Playbook { ref playbook, .. } if playbook == "/tmp/ovs.yaml"));
    }

    #[test]
    fn test_subscription() {
        let activator = OvsConfigActivator::new(Arc::new(RecordingRunner::default()));
        assert_eq!(activator.subscription_info(), "cloud.networking");
        assert_eq!(activator.playbook(), PLAYBOOK);
    }
}
