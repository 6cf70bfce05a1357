//! Client configuration.
//!
//! [`Settings`] is the caller-supplied record where every field is optional.
//! [`Config`] is what the client actually holds: defaults merged in, API key
//! validated, never mutated afterwards.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hostname of the public geocod.io API.
pub const DEFAULT_HOST: &str = "api.geocod.io";

/// Versioned path segment used when none is configured.
pub const DEFAULT_API_VERSION: &str = "v1.3";

/// Caller-supplied configuration record.
///
/// Any field left as `None` falls back to its default when turned into a
/// [`Config`]. Because it derives `Deserialize`, it can be read from whatever
/// serde source the caller prefers.
///
/// # Examples
///
/// ```
/// use geocodio::{Config, Settings};
///
/// let settings: Settings = serde_json::from_str(
///     r#"{ "api_key": "abc123", "fields": "cd,timezone" }"#,
/// ).unwrap();
///
/// let config = Config::from_settings(settings).unwrap();
/// assert_eq!(config.host(), "api.geocod.io");
/// assert_eq!(config.fields(), "cd,timezone");
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// API key sent as the `api_key` query parameter. Required.
    pub api_key: Option<String>,
    /// Service hostname, e.g. `api.geocod.io`.
    pub host: Option<String>,
    /// Versioned path segment, e.g. `v1.3`.
    pub api_version: Option<String>,
    /// Comma separated list of extra data fields to append to results.
    pub fields: Option<String>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("api_version", &self.api_version)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Immutable configuration shared by every lookup a [`Client`](crate::Client) makes.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    host: String,
    api_version: String,
    api_key: String,
    fields: String,
}

impl Config {
    /// Creates a configuration with the given API key and every other field
    /// at its default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_settings(Settings {
            api_key: Some(api_key.into()),
            ..Settings::default()
        })
    }

    /// Merges `settings` over the defaults, field by field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if `api_key` is absent or blank,
    /// regardless of the other fields.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let api_key = settings
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::ConfigurationError("API key is required".to_string()))?;

        Ok(Self {
            host: settings.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            api_version: settings
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            api_key,
            fields: settings.fields.unwrap_or_default(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Extra result fields; empty when none were requested.
    pub fn fields(&self) -> &str {
        &self.fields
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("api_version", &self.api_version)
            .field("api_key", &"<redacted>")
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_key(api_key: Option<&str>) -> Settings {
        Settings {
            api_key: api_key.map(str::to_string),
            ..Settings::default()
        }
    }

    #[test]
    fn defaults_applied_when_only_key_given() {
        let config = Config::new("KEY").unwrap();

        assert_eq!(config.host(), DEFAULT_HOST);
        assert_eq!(config.api_version(), DEFAULT_API_VERSION);
        assert_eq!(config.api_key(), "KEY");
        assert_eq!(config.fields(), "");
    }

    #[test]
    fn caller_values_win_over_defaults() {
        let config = Config::from_settings(Settings {
            api_key: Some("KEY".into()),
            host: Some("geocoding.example.com".into()),
            api_version: Some("v1.7".into()),
            fields: None,
        })
        .unwrap();

        assert_eq!(config.host(), "geocoding.example.com");
        assert_eq!(config.api_version(), "v1.7");
        assert_eq!(config.fields(), "");
    }

    #[test]
    fn missing_or_blank_key_is_rejected() {
        for key in [None, Some(""), Some("   ")] {
            let mut settings = settings_with_key(key);
            settings.host = Some("example.com".into());
            settings.fields = Some("timezone".into());

            let err = Config::from_settings(settings).unwrap_err();
            match err {
                Error::ConfigurationError(msg) => assert!(msg.contains("API key is required")),
                other => panic!("Expected ConfigurationError, got {:?}", other),
            }
        }
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = Config::new("super-secret").unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("api.geocod.io"));

        let settings = settings_with_key(Some("super-secret"));
        assert!(!format!("{:?}", settings).contains("super-secret"));
    }

    #[test]
    fn settings_deserialize_with_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{ "api_key": "KEY" }"#).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("KEY"));
        assert!(settings.host.is_none());
        assert!(settings.api_version.is_none());
    }
}
