use std::fmt;

use url::Url;

use crate::ports::ConfigurationError;

/// Port used when the configured address does not name one.
pub const DEFAULT_PORT: u16 = 8765;

const SUPPORTED_SCHEMES: [&str; 2] = ["ws", "wss"];

/// Validated connection target (`ws://host:port[/path]`).
///
/// Accepts a full URL, or a bare `host` / `host:port` which is normalized to
/// the `ws` scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    url: Url,
}

impl ServerAddress {
    /// Parse `input`, falling back to `default_port` when it names no port.
    pub fn parse(input: &str, default_port: u16) -> Result<Self, ConfigurationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ConfigurationError::EmptyAddress);
        }

        let candidate = if input.contains("://") {
            input.to_string()
        } else {
            format!("ws://{input}")
        };

        let mut url = Url::parse(&candidate).map_err(|e| ConfigurationError::InvalidAddress {
            address: input.to_string(),
            reason: e.to_string(),
        })?;

        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(ConfigurationError::UnsupportedScheme(url.scheme().to_string()));
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigurationError::InvalidAddress {
                address: input.to_string(),
                reason: "missing host".to_string(),
            });
        }

        // `Url::port` is `None` both when absent and when equal to the scheme
        // default, so look at the raw input for an explicit port.
        let port = match url.port() {
            Some(port) => port,
            None if has_explicit_port(&url, input) => url.port_or_known_default().unwrap_or(0),
            None => default_port,
        };
        if port == 0 {
            return Err(ConfigurationError::InvalidPort(i64::from(port)));
        }

        url.set_port(Some(port))
            .map_err(|_| ConfigurationError::InvalidAddress {
                address: input.to_string(),
                reason: "cannot carry a port".to_string(),
            })?;

        Ok(Self { url })
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or(DEFAULT_PORT)
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

fn has_explicit_port(url: &Url, input: &str) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    input.contains(&format!("{host}:"))
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
