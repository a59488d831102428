//! # Pure Data Module - Data Transfer Objects Only
//!
//! Maps the TOML configuration file onto [`AppConfig`] and back.
//!
//! No validation and no defaults live here: a missing value becomes an empty
//! string or zero, which is a fact about the file, not an error. Defaults and
//! validation are applied when the engine configuration is resolved.

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    /// Server address as written (`host`, `host:port` or `ws://host:port`)
    pub server_address: String,

    /// Server port used when the address names none, as written (0 = not set)
    pub server_port: i64,

    /// Change detector interval in milliseconds (0 = not set)
    pub poll_interval_ms: u64,

    /// Delay between reconnect attempts in milliseconds (0 = not set)
    pub reconnect_delay_ms: u64,

    /// Connect timeout in milliseconds (0 = not set)
    pub connect_timeout_ms: u64,

    /// Tag written into the `source` field of outbound messages (may be empty)
    pub endpoint_tag: String,

    /// Start syncing from the `autostart` command
    pub auto_start: bool,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// This method must NOT contain any validation or default value logic.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let int_at = |section: &str, key: &str| -> i64 {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
        };

        Ok(Self {
            server_address: str_at("server", "address"),
            server_port: int_at("server", "port"),
            poll_interval_ms: int_at("sync", "poll_interval_ms").max(0) as u64,
            reconnect_delay_ms: int_at("sync", "reconnect_delay_ms").max(0) as u64,
            connect_timeout_ms: int_at("sync", "connect_timeout_ms").max(0) as u64,
            endpoint_tag: str_at("sync", "endpoint_tag"),
            auto_start: toml_value
                .get("general")
                .and_then(|g| g.get("auto_start"))
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
    }

    /// Map back to a TOML document. Zero and empty values are omitted.
    pub fn to_toml(&self) -> toml::Value {
        let mut server = toml::map::Map::new();
        if !self.server_address.is_empty() {
            server.insert(
                "address".to_string(),
                toml::Value::String(self.server_address.clone()),
            );
        }
        if self.server_port != 0 {
            server.insert(
                "port".to_string(),
                toml::Value::Integer(self.server_port),
            );
        }

        let mut sync = toml::map::Map::new();
        for (key, value) in [
            ("poll_interval_ms", self.poll_interval_ms),
            ("reconnect_delay_ms", self.reconnect_delay_ms),
            ("connect_timeout_ms", self.connect_timeout_ms),
        ] {
            if value != 0 {
                sync.insert(key.to_string(), toml::Value::Integer(value as i64));
            }
        }
        if !self.endpoint_tag.is_empty() {
            sync.insert(
                "endpoint_tag".to_string(),
                toml::Value::String(self.endpoint_tag.clone()),
            );
        }

        let mut general = toml::map::Map::new();
        general.insert("auto_start".to_string(), toml::Value::Boolean(self.auto_start));

        let mut root = toml::map::Map::new();
        root.insert("server".to_string(), toml::Value::Table(server));
        root.insert("sync".to_string(), toml::Value::Table(sync));
        root.insert("general".to_string(), toml::Value::Table(general));
        toml::Value::Table(root)
    }
}
