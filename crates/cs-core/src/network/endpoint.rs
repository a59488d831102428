use std::fmt;

use crate::ports::ConfigurationError;

/// Identity tag written into the `source` field of every outbound message.
///
/// Inbound frames carrying our own tag are treated as echoes of our own
/// sends. Any other value is a legitimate remote origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointTag(String);

impl EndpointTag {
    pub fn new(tag: impl Into<String>) -> Result<Self, ConfigurationError> {
        let tag = tag.into();
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::EmptyEndpointTag);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, source: &str) -> bool {
        self.0 == source
    }
}

impl fmt::Display for EndpointTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
