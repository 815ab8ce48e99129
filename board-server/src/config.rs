//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Row counts the board can be asked to show per direction.
pub const DISPLAY_COUNT_OPTIONS: [usize; 8] = [1, 3, 5, 7, 10, 15, 20, 50];

pub const DEFAULT_STATION: &str = "調布";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_ROWS: usize = 7;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Base URL of the arrivals API. `None` leaves the board unconfigured.
    pub api_base_url: Option<String>,
    pub station: String,
    pub bind_addr: SocketAddr,
    /// Serve boards from JSON files in this directory instead of the API.
    pub mock_dir: Option<PathBuf>,
    pub static_dir: String,
    pub default_rows: usize,
    pub request_timeout_secs: u64,
}

impl BoardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = parse_var("BOARD_BIND_ADDR", var("BOARD_BIND_ADDR"), DEFAULT_BIND_ADDR)?;

        let default_rows: usize = match var("BOARD_DEFAULT_ROWS") {
            Some(raw) => {
                let rows = raw.parse().map_err(|e: std::num::ParseIntError| {
                    invalid("BOARD_DEFAULT_ROWS", &raw, e.to_string())
                })?;
                if !DISPLAY_COUNT_OPTIONS.contains(&rows) {
                    return Err(invalid(
                        "BOARD_DEFAULT_ROWS",
                        &raw,
                        format!("must be one of {DISPLAY_COUNT_OPTIONS:?}"),
                    ));
                }
                rows
            }
            None => DEFAULT_ROWS,
        };

        let request_timeout_secs = parse_var(
            "BOARD_REQUEST_TIMEOUT_SECS",
            var("BOARD_REQUEST_TIMEOUT_SECS"),
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )?;

        Ok(Self {
            api_base_url: var("TRAIN_API_URL"),
            station: var("BOARD_STATION").unwrap_or_else(|| DEFAULT_STATION.to_string()),
            bind_addr,
            mock_dir: var("BOARD_MOCK_DIR").map(PathBuf::from),
            static_dir: var("BOARD_STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            default_rows,
            request_timeout_secs,
        })
    }
}

fn parse_var<T>(key: &'static str, raw: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = raw.unwrap_or_else(|| default.to_string());
    raw.parse().map_err(|e: T::Err| invalid(key, &raw, e.to_string()))
}

fn invalid(var: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<BoardConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BoardConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.api_base_url, None);
        assert_eq!(config.station, "調布");
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.mock_dir, None);
        assert_eq!(config.static_dir, "static");
        assert_eq!(config.default_rows, 7);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("TRAIN_API_URL", "https://api.example.com"),
            ("BOARD_STATION", "府中"),
            ("BOARD_BIND_ADDR", "0.0.0.0:8080"),
            ("BOARD_MOCK_DIR", "data/mock_arrivals"),
            ("BOARD_STATIC_DIR", "public"),
            ("BOARD_DEFAULT_ROWS", "15"),
            ("BOARD_REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(config.api_base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.station, "府中");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.mock_dir, Some(PathBuf::from("data/mock_arrivals")));
        assert_eq!(config.static_dir, "public");
        assert_eq!(config.default_rows, 15);
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn empty_api_url_is_unset() {
        let config = config_from(&[("TRAIN_API_URL", "  ")]).unwrap();
        assert_eq!(config.api_base_url, None);
    }

    #[test]
    fn rows_outside_options_rejected() {
        let err = config_from(&[("BOARD_DEFAULT_ROWS", "8")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var: "BOARD_DEFAULT_ROWS", .. }
        ));

        assert!(config_from(&[("BOARD_DEFAULT_ROWS", "many")]).is_err());
    }

    #[test]
    fn bad_bind_addr_rejected() {
        let err = config_from(&[("BOARD_BIND_ADDR", "localhost")]).unwrap_err();
        assert!(err.to_string().starts_with("BOARD_BIND_ADDR has invalid value"));
    }

    #[test]
    fn bad_timeout_rejected() {
        assert!(config_from(&[("BOARD_REQUEST_TIMEOUT_SECS", "-1")]).is_err());
    }
}
