//! Settings for the server-side transport.

use serde::Deserialize;

/// Configuration applied to the `ureq` agent behind `UreqTransport`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Redirects followed before the last response is returned as-is.
    pub max_redirects: u32,
    /// Largest response body read, in bytes. Unbounded by default, as a
    /// native fetch is.
    pub body_limit: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_redirects: 10,
            body_limit: u64::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: TransportConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TransportConfig::default());
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.body_limit, u64::MAX);
    }

    #[test]
    fn max_redirects_can_be_disabled() {
        let config: TransportConfig = serde_json::from_str(r#"{"max_redirects":0}"#).unwrap();
        assert_eq!(config.max_redirects, 0);
        assert_eq!(config.body_limit, u64::MAX);
    }
}
