//! Ambient configuration.
//!
//! A [`RippleConfig`] is handed to widgets when they are mounted, in place
//! of a provider tree. It can be built in code or loaded from TOML:
//!
//! ```
//! use ripple_core::RippleConfig;
//!
//! let config = RippleConfig::from_toml_str(r#"
//!     prefix_cls = "my"
//!
//!     [csp]
//!     nonce = "r4nd0m"
//! "#).unwrap();
//!
//! assert_eq!(config.prefix_cls, "my");
//! assert_eq!(config.nonce(), Some("r4nd0m"));
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logging::targets;

/// Content-security-policy settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CspConfig {
    /// Nonce attached to every style element created at runtime.
    pub nonce: Option<String>,
}

/// Configuration shared by every widget of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Prefix of every generated class name (`ant` gives `ant-btn`).
    pub prefix_cls: String,
    /// Content-security-policy settings.
    pub csp: CspConfig,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            prefix_cls: "ant".to_string(),
            csp: CspConfig::default(),
        }
    }
}

impl RippleConfig {
    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        tracing::debug!(target: targets::CONFIG, prefix = %config.prefix_cls, has_nonce = config.csp.nonce.is_some(), "configuration parsed");
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Set the content-security-policy nonce using builder pattern.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.csp.nonce = Some(nonce.into());
        self
    }

    /// Set the class prefix using builder pattern.
    pub fn with_prefix_cls(mut self, prefix: impl Into<String>) -> Self {
        self.prefix_cls = prefix.into();
        self
    }

    /// The nonce, if one is configured and non-empty.
    pub fn nonce(&self) -> Option<&str> {
        self.csp.nonce.as_deref().filter(|nonce| !nonce.is_empty())
    }

    /// Build a component class prefix, honouring a per-component override.
    ///
    /// `prefix_for("btn", None)` is `ant-btn` with the default prefix.
    pub fn prefix_for(&self, suffix: &str, custom: Option<&str>) -> String {
        match custom {
            Some(custom) => custom.to_string(),
            None => format!("{}-{suffix}", self.prefix_cls),
        }
    }
}
