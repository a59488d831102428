//! Command handlers behind the CLI.

use std::path::PathBuf;

use anyhow::Context;
use cs_core::{preview, AppConfig, ClipboardProviderPort};
use cs_platform::{StatusUpdate, SystemClipboard};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::bootstrap::{
    default_config_path, load_config_or_default, resolve_engine_config, run_until, save_config,
    ConfigOverrides, EngineAdapters,
};
use crate::cli::{Cli, Commands, ConfigArg, ConfigureArgs, RunArgs};

pub async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Autostart { config } => autostart(config).await,
        Commands::Configure(args) => configure(args),
        Commands::Probe => probe(),
        Commands::CopyTest => copy_test(),
    }
}

fn config_path(arg: &ConfigArg) -> anyhow::Result<PathBuf> {
    match &arg.config {
        Some(path) => Ok(path.clone()),
        None => default_config_path(),
    }
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let path = config_path(&args.config)?;
    let config = load_config_or_default(&path)?;
    let overrides = ConfigOverrides {
        server: args.server,
        port: args.port,
        endpoint_tag: args.tag,
    };
    run_with(&config, &overrides).await
}

/// Start syncing only when the saved settings ask for it.
pub async fn autostart(arg: ConfigArg) -> anyhow::Result<()> {
    let path = config_path(&arg)?;
    let config = load_config_or_default(&path)?;

    if !config.auto_start {
        info!("Auto start disabled, nothing to do");
        return Ok(());
    }
    if config.server_address.trim().is_empty() {
        warn!("Auto start enabled but no server configured");
        return Ok(());
    }

    run_with(&config, &ConfigOverrides::default()).await
}

async fn run_with(config: &AppConfig, overrides: &ConfigOverrides) -> anyhow::Result<()> {
    let engine_config = resolve_engine_config(config, overrides)
        .context("Invalid configuration, run `clipsync configure` first")?;
    let (adapters, status_rx) = EngineAdapters::system(&engine_config)?;

    println!(
        "Syncing with {} as \"{}\" (Ctrl-C to stop)",
        engine_config.server, engine_config.endpoint_tag
    );
    let reporter = tokio::spawn(report_status(status_rx));

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Cannot listen for Ctrl-C, stopping");
        }
    };
    run_until(engine_config, adapters, shutdown).await?;

    reporter.abort();
    Ok(())
}

/// Print one line per status transition.
async fn report_status(mut status_rx: watch::Receiver<StatusUpdate>) {
    while status_rx.changed().await.is_ok() {
        let update = status_rx.borrow_and_update().clone();
        println!("[{}] {}", update.status, update.detail);
    }
}

pub fn configure(args: ConfigureArgs) -> anyhow::Result<()> {
    let path = config_path(&args.config)?;
    let mut config = load_config_or_default(&path)?;

    config.server_address = args.server.trim().to_string();
    config.server_port = i64::from(args.port);
    if let Some(auto_start) = args.auto_start {
        config.auto_start = auto_start;
    }
    if let Some(tag) = args.tag {
        config.endpoint_tag = tag.trim().to_string();
    }

    save_config(&path, &config)?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

pub fn probe() -> anyhow::Result<()> {
    let clipboard = SystemClipboard::new().context("Failed to open the system clipboard")?;
    match clipboard.read().context("Failed to read the clipboard")? {
        Some(text) => println!("Clipboard ({} chars): {}", text.chars().count(), preview(&text)),
        None => println!("Clipboard is empty"),
    }
    Ok(())
}

pub fn copy_test() -> anyhow::Result<()> {
    let clipboard = SystemClipboard::new().context("Failed to open the system clipboard")?;
    let text = test_clip_text(chrono::Utc::now());
    clipboard
        .write(&text)
        .context("Failed to write the clipboard")?;
    println!("Copied: {text}");
    Ok(())
}

fn test_clip_text(now: chrono::DateTime<chrono::Utc>) -> String {
    format!("clipsync test - {}", now.timestamp_millis())
}
