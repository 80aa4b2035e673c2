//! Process configuration, read once from the environment at startup.

use axum::http::HeaderValue;
use thiserror::Error;

use crate::app::versioning::ApiVersion;

pub const DEFAULT_PORT: u16 = 4000;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = [
    "http://localhost:3000",
    // Placeholder for the production frontend.
    "https://app.quickex.example.com",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CORS_ALLOWED_ORIGINS entry {0:?} is not an http(s) origin")]
    InvalidOrigin(String),

    #[error("CORS_ALLOWED_ORIGINS must list explicit origins; `*` cannot be combined with credentials")]
    WildcardOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// `PORT`; falls back to [`DEFAULT_PORT`] when unset or unparseable.
    pub port: u16,
    /// `CORS_ALLOWED_ORIGINS` (comma-separated); falls back to [`DEFAULT_ALLOWED_ORIGINS`].
    pub allowed_origins: Vec<String>,
    pub default_version: ApiVersion,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            default_version: ApiVersion::V1,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None => defaults.allowed_origins,
        };

        Ok(Self {
            port: parse_port(lookup("PORT").as_deref()),
            allowed_origins,
            default_version: defaults.default_version,
        })
    }
}

pub fn parse_port(raw: Option<&str>) -> u16 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_PORT;
    };

    match raw.parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            tracing::warn!(value = raw, default = DEFAULT_PORT, "PORT is not a valid port number; using default");
            DEFAULT_PORT
        }
    }
}

pub fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            if origin == "*" {
                return Err(ConfigError::WildcardOrigin);
            }
            let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
            if !scheme_ok || HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::InvalidOrigin(origin.to_string()));
            }
            Ok(origin.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.port, 4000);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "https://app.quickex.example.com"]
        );
        assert_eq!(config.default_version, ApiVersion::V1);
    }

    #[test]
    fn port_is_read_from_environment() {
        assert_eq!(config_from(&[("PORT", "5050")]).unwrap().port, 5050);
    }

    #[test]
    fn unparseable_port_falls_back_to_default() {
        for raw in ["abc", "", "  ", "-1", "70000", "40.5"] {
            assert_eq!(config_from(&[("PORT", raw)]).unwrap().port, DEFAULT_PORT, "{raw:?}");
        }
    }

    #[test]
    fn origins_override_is_split_and_trimmed() {
        let config = config_from(&[(
            "CORS_ALLOWED_ORIGINS",
            " https://a.example , http://localhost:5173,,",
        )])
        .unwrap();
        assert_eq!(config.allowed_origins, vec!["https://a.example", "http://localhost:5173"]);
    }

    #[test]
    fn wildcard_origin_is_refused() {
        assert_eq!(
            config_from(&[("CORS_ALLOWED_ORIGINS", "http://a.example,*")]),
            Err(ConfigError::WildcardOrigin)
        );
    }

    #[test]
    fn non_http_origin_is_refused() {
        assert_eq!(
            parse_origins("ftp://files.example"),
            Err(ConfigError::InvalidOrigin("ftp://files.example".to_string()))
        );
    }

    proptest! {
        #[test]
        fn any_valid_port_round_trips(port in any::<u16>()) {
            prop_assert_eq!(parse_port(Some(&port.to_string())), port);
        }
    }
}
