use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "clipsync")]
#[command(version, long_about = None)]
#[command(about = "Keep a text clipboard in sync through a websocket relay")]
pub struct Cli {
    /// Also write logs to <DIR>/clipsync.log
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sync the clipboard until interrupted (Ctrl-C)
    Run(RunArgs),
    /// Run only if auto start is enabled in the config file
    Autostart {
        #[command(flatten)]
        config: ConfigArg,
    },
    /// Validate and save connection settings
    Configure(ConfigureArgs),
    /// Print a preview of the current clipboard text
    Probe,
    /// Put a timestamped test string on the clipboard
    CopyTest,
}

#[derive(Debug, Args)]
pub struct ConfigArg {
    /// Config file (default: <config dir>/clipsync/config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Server address: host, host:port or ws://host:port
    #[arg(short, long)]
    pub server: Option<String>,

    /// Server port, used when the address names none
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Tag written into outgoing messages (default: host name)
    #[arg(short, long)]
    pub tag: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigureArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Server address: host, host:port or ws://host:port
    #[arg(short, long)]
    pub server: String,

    #[arg(short, long, default_value_t = cs_core::DEFAULT_PORT)]
    pub port: u16,

    /// Start syncing from `clipsync autostart`
    #[arg(long)]
    pub auto_start: Option<bool>,

    /// Tag written into outgoing messages
    #[arg(short, long)]
    pub tag: Option<String>,
}
