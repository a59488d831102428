//! # Configuration Loader
//!
//! - `load_config` reads the TOML file into the [`AppConfig`] DTO and accepts
//!   whatever is in it.
//! - `resolve_engine_config` is the single place where defaults are applied
//!   and values are validated into an [`EngineConfig`].
//! - `save_config` persists settings chosen on the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use cs_app::{EngineConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_POLL_INTERVAL, DEFAULT_RECONNECT_DELAY};
use cs_core::{AppConfig, ConfigurationError, EndpointTag, ServerAddress, DEFAULT_PORT};

const APP_DIR: &str = "clipsync";
const CONFIG_FILE: &str = "config.toml";
const FALLBACK_TAG: &str = "clipsync";

/// Values given on the command line. They win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub endpoint_tag: Option<String>,
}

/// `<config dir>/clipsync/config.toml`
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let dir = dirs::config_dir().context("Cannot determine the user config directory")?;
    Ok(dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Load configuration from a TOML file
///
/// Pure data loading: empty strings and zero values are accepted as they are.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Like [`load_config`], but a missing file is an empty configuration.
pub fn load_config_or_default(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        return Ok(AppConfig::default());
    }
    load_config(config_path)
}

/// Apply overrides and defaults, then validate.
pub fn resolve_engine_config(
    config: &AppConfig,
    overrides: &ConfigOverrides,
) -> Result<EngineConfig, ConfigurationError> {
    let address = overrides
        .server
        .as_deref()
        .unwrap_or(config.server_address.as_str());
    let port = match overrides.port {
        Some(port) => port,
        None => file_port(config)?.unwrap_or(DEFAULT_PORT),
    };
    let server = ServerAddress::parse(address, port)?;

    let tag = overrides
        .endpoint_tag
        .clone()
        .filter(|tag| !tag.trim().is_empty())
        .or_else(|| Some(config.endpoint_tag.clone()).filter(|tag| !tag.trim().is_empty()))
        .unwrap_or_else(default_endpoint_tag);

    Ok(EngineConfig {
        server,
        endpoint_tag: EndpointTag::new(tag)?,
        poll_interval: millis_or(config.poll_interval_ms, DEFAULT_POLL_INTERVAL),
        reconnect_delay: millis_or(config.reconnect_delay_ms, DEFAULT_RECONNECT_DELAY),
        connect_timeout: millis_or(config.connect_timeout_ms, DEFAULT_CONNECT_TIMEOUT),
    })
}

/// Validate and write `config` to `config_path`, creating parent directories.
pub fn save_config(config_path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    if config.server_address.trim().is_empty() {
        bail!("Server address must not be empty");
    }
    let Some(port) = file_port(config)? else {
        bail!("Server port must not be zero");
    };
    ServerAddress::parse(&config.server_address, port).context("Invalid server address")?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
    }
    let content =
        toml::to_string_pretty(&config.to_toml()).context("Failed to serialize config")?;
    std::fs::write(config_path, content)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    tracing::info!(path = %config_path.display(), "Configuration saved");
    Ok(())
}

/// Host name of this machine, used as the endpoint tag when none is set.
pub fn default_endpoint_tag() -> String {
    gethostname::gethostname()
        .to_str()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_TAG)
        .to_string()
}

/// The port from the file, `None` when unset.
fn file_port(config: &AppConfig) -> Result<Option<u16>, ConfigurationError> {
    match config.server_port {
        0 => Ok(None),
        raw => u16::try_from(raw)
            .map(Some)
            .map_err(|_| ConfigurationError::InvalidPort(raw)),
    }
}

fn millis_or(value: u64, default: Duration) -> Duration {
    if value == 0 {
        default
    } else {
        Duration::from_millis(value)
    }
}
