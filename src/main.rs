use std::path::Path;

use anyhow::Result;
use clap::Parser;
use cm_plugins::command::{Command, Subcommand};
use cm_plugins::handler::{build_dispatcher, handle_activate, handle_hosts, handle_validate};
use cm_plugins::init_tracing;
use cm_plugins::interfaces::watcher::SnapshotWatcher;
use cm_plugins::settings::SettingsLoader;
use colored::{Color, Colorize};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let command = Command::parse();

    let mut settings = SettingsLoader::load(command.config.as_deref().map(Path::new))?;
    if let Some(level) = command.log_level {
        settings.logging.level = level;
    }
    init_tracing(&settings.logging.level)?;
    debug!("settings: {:?}", settings);

    match command.subcommand {
        Subcommand::Validate { snapshot } => match handle_validate(&snapshot) {
            Ok(props) => {
                println!(
                    "{} validate success, {} domains checked",
                    snapshot.color(Color::Green),
                    props.len()
                );
            }
            Err(e) => {
                println!("{} validate failed: {}", snapshot.color(Color::Red), e);
                std::process::exit(1);
            }
        },
        Subcommand::Activate {
            snapshot,
            mode,
            target,
            dry_run,
        } => {
            let report = handle_activate(&snapshot, mode, target, &settings, dry_run).await?;
            if report.activated.is_empty() {
                println!("{}", "no activator subscribed to this change".color(Color::Yellow));
            } else {
                println!(
                    "activated: {}",
                    report.activated.join(", ").color(Color::Green)
                );
            }
        }
        Subcommand::Hosts { snapshot, output } => {
            let hosts = handle_hosts(&snapshot, output.as_deref(), &settings)?;
            if output.is_none() {
                println!("{}", serde_json::to_string_pretty(&hosts.to_serde_value())?);
            }
        }
        Subcommand::Watch { snapshot, dry_run } => {
            let dispatcher = build_dispatcher(&settings, dry_run)?;
            SnapshotWatcher::new(&snapshot, dispatcher).run().await?;
        }
    }
    Ok(())
}
