//! volumecontrol CLI Application

mod menu;
mod oneshot;
mod terminal;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use oneshot::OneShot;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use volumecontrol_core::domain::{ConfigManager, Mixer, VolumeControlConfig};
use volumecontrol_infra::PacmdExecutor;

#[derive(Parser)]
#[command(name = "volumecontrol")]
#[command(about = "Control the PulseAudio sound system", long_about = None)]
struct Cli {
    /// What to do
    #[arg(value_enum, value_name = "ACTION")]
    action: Action,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Read configuration from this file instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Control shell binary to run
    #[arg(long)]
    pacmd: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    /// Interactive menu
    Gui,
    /// Raise the default sink one step and print its volume
    VolumeUp,
    /// Lower the default sink one step and print its volume
    VolumeDown,
    /// Print the default sink's volume
    ShowVolume,
    /// Toggle mute on the default sink
    Mute,
}

impl Action {
    fn one_shot(self) -> Option<OneShot> {
        match self {
            Action::Gui => None,
            Action::VolumeUp => Some(OneShot::VolumeUp),
            Action::VolumeDown => Some(OneShot::VolumeDown),
            Action::ShowVolume => Some(OneShot::ShowVolume),
            Action::Mute => Some(OneShot::Mute),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the one-shot output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_config(path: Option<&Path>) -> anyhow::Result<VolumeControlConfig> {
    match path {
        Some(path) => VolumeControlConfig::load_from_file(path)
            .await
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let dir = ConfigManager::default_config_dir()?;
            Ok(ConfigManager::new(dir).load().await)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_deref()).await?;
    if let Some(binary) = cli.pacmd {
        config.executor.binary = binary;
    }
    tracing::debug!(?config, action = ?cli.action, "Starting volumecontrol");

    let mixer = Mixer::new(PacmdExecutor::new(config.executor.binary.clone()))
        .with_volume_steps(config.volume.step_count()?);

    let Some(action) = cli.action.one_shot() else {
        terminal::run(&mixer, &config.menu)?;
        return Ok(ExitCode::SUCCESS);
    };

    let status = oneshot::report(
        &mixer,
        action,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )?;
    Ok(status.into())
}
