//! Configuration types.

use crate::error::ConfigError;

/// Portal server configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Port the HTTP surface binds to.
    pub port: u16,
    /// Path to the profile database file.
    pub db_path: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            db_path: "./data/portal.db".to_string(),
        }
    }
}

impl PortalConfig {
    /// Apply environment-sourced overrides on top of the current values.
    /// A malformed port is rejected rather than silently replaced.
    pub fn apply_overrides(
        &mut self,
        port: Option<String>,
        db_path: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(raw) = port {
            self.port = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORTAL_PORT".to_string(),
                message: format!("expected a port number, got {raw:?}"),
            })?;
        }
        if let Some(path) = db_path {
            self.db_path = path;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overrides_keep_defaults() {
        let mut config = PortalConfig::default();
        config.apply_overrides(None, None).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_path, "./data/portal.db");
    }

    #[test]
    fn overrides_replace_both_values() {
        let mut config = PortalConfig::default();
        config
            .apply_overrides(Some("9090".into()), Some("/tmp/portal.db".into()))
            .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.db_path, "/tmp/portal.db");
    }

    #[test]
    fn malformed_port_is_rejected() {
        let mut config = PortalConfig::default();
        let err = config
            .apply_overrides(Some("all-of-them".into()), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORTAL_PORT"));
        assert_eq!(config.port, 8080, "failed override must not clobber the port");
    }
}
