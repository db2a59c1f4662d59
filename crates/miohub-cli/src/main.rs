//! Command-line entry point for the miohub fleet daemon.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use miohub_core::config::FleetConfig;
use miohub_devices::{builtin_registry, FleetService};

mod sim;

/// Supervise a fleet of miio appliances: per-device polling,
/// availability tracking and command fan-out.
#[derive(Parser, Debug)]
#[command(name = "miohub")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Fleet configuration file.
    #[arg(short, long, global = true, default_value = "miohub.toml")]
    config: PathBuf,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set up every configured device and poll until interrupted.
    Run {
        /// Drive simulated devices instead of real hardware.
        #[arg(long)]
        simulate: bool,
    },
    /// Validate the configuration and resolve each configured model.
    Check,
    /// List the model ids and family prefixes of the built-in drivers.
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default = if args.verbose {
            "miohub=debug"
        } else {
            "miohub=info"
        };
        tracing_subscriber::EnvFilter::new(default)
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    match args.command {
        Command::Run { simulate } => run(&args.config, simulate).await,
        Command::Check => check(&args.config),
        Command::Models => models(),
    }
}

fn load_config(path: &PathBuf) -> Result<FleetConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading fleet config {}", path.display()))?;
    let fleet: FleetConfig =
        toml::from_str(&text).with_context(|| format!("parsing fleet config {}", path.display()))?;
    fleet.validate().context("invalid fleet config")?;
    Ok(fleet)
}

async fn run(path: &PathBuf, simulate: bool) -> Result<()> {
    let fleet = load_config(path)?;
    if fleet.devices.is_empty() {
        bail!("fleet config {} lists no devices", path.display());
    }

    let registry = Arc::new(builtin_registry().context("building the driver registry")?);
    if !simulate {
        // The wire protocol lives behind the DeviceConnector trait and
        // no hardware transport is linked into this binary.
        bail!("no hardware transport available; rerun with --simulate");
    }
    tracing::warn!("driving simulated devices, no hardware is touched");
    let connector = Arc::new(sim::SimConnector::new(Arc::clone(&registry)));

    let mut service = FleetService::new(registry, connector);
    for device in &fleet.devices {
        // One broken device must not take the rest of the fleet down
        // with it.
        if let Err(err) = service.setup(device).await {
            tracing::error!(device = %device.name, error = %err, "device setup failed, skipping");
        }
    }
    if service.is_empty() {
        bail!("no device could be set up");
    }

    service.start();
    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    tracing::info!("shutting down");
    service.stop();
    Ok(())
}

fn check(path: &PathBuf) -> Result<()> {
    let fleet = load_config(path)?;
    let registry = builtin_registry().context("building the driver registry")?;

    for device in &fleet.devices {
        match &device.model {
            Some(model) => {
                let driver = registry.resolve(model).with_context(|| {
                    format!("device {:?} has an unsupported model", device.name)
                })?;
                println!(
                    "{}: {} -> {} ({:?})",
                    device.name,
                    model,
                    driver.family(),
                    driver.protocol()
                );
            }
            None => println!("{}: model auto-detected at startup", device.name),
        }
    }
    println!("{} device(s) ok", fleet.devices.len());
    Ok(())
}

fn models() -> Result<()> {
    let registry = builtin_registry().context("building the driver registry")?;

    let mut models: Vec<_> = registry.models().collect();
    models.sort_unstable();
    for model in models {
        println!("{model}");
    }
    let mut prefixes: Vec<_> = registry.prefixes().collect();
    prefixes.sort_unstable();
    for prefix in prefixes {
        println!("{prefix}*");
    }
    Ok(())
}
