use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::{domain::services::playbook_runner::PlaybookRunner, error::PluginError};

pub const ANSIBLE_PLAYBOOK: &str = "ansible-playbook";

#[derive(Debug, Clone)]
pub struct AnsiblePlaybookRunner {
    program: String,
    dry_run: bool,
}

impl Default for AnsiblePlaybookRunner {
    fn default() -> Self {
        Self::new(ANSIBLE_PLAYBOOK)
    }
}

impl AnsiblePlaybookRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            dry_run: false,
        }
    }

    // 只打印命令，不执行
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn args(playbook: &str, target: Option<&str>) -> Vec<String> {
        let mut args = vec![playbook.to_string()];
        if let Some(target) = target {
            args.push("--limit".to_string());
            args.push(target.to_string());
        }
        args
    }
}

#[async_trait]
impl PlaybookRunner for AnsiblePlaybookRunner {
    async fn run_playbook(&self, playbook: &str, target: Option<&str>) -> Result<(), PluginError> {
        let args = Self::args(playbook, target);
        if self.dry_run {
            info!("dry run: {} {}", self.program, args.join(" "));
            return Ok(());
        }

        debug!("spawning {} {:?}", self.program, args);
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| PluginError::Playbook {
                playbook: playbook.to_string(),
                reason: format!("failed to spawn {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("{} exited with {}: {}", self.program, output.status, stderr.trim());
            return Err(PluginError::Playbook {
                playbook: playbook.to_string(),
                reason: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        info!("playbook {} finished", playbook);
        Ok(())
    }
}
