// Runtime configuration, read from the environment (a `.env` file is loaded first by main).

use directories::ProjectDirs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::modules::time_tracking::use_cases::tracker::TrackerOptions;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_LISTEN_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8080);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("no data directory available, set TIME_TRACKING_DATA_DIR")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub probe_interval: Duration,
    pub request_timeout: Duration,
    pub tracker: TrackerOptions,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = TrackerOptions::default();
        let data_dir = match non_empty(&lookup, "TIME_TRACKING_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => ProjectDirs::from("com", "time-tracking", "time-tracking")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or(ConfigError::NoDataDir)?,
        };
        Ok(Self {
            api_url: non_empty(&lookup, "TIME_TRACKING_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            api_token: non_empty(&lookup, "TIME_TRACKING_API_TOKEN"),
            listen_addr: parse_or(
                &lookup,
                "TIME_TRACKING_LISTEN_ADDR",
                SocketAddr::from(DEFAULT_LISTEN_ADDR),
            )?,
            data_dir,
            probe_interval: Duration::from_secs(parse_or(
                &lookup,
                "TIME_TRACKING_PROBE_INTERVAL_SECS",
                15,
            )?),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "TIME_TRACKING_REQUEST_TIMEOUT_SECS",
                10,
            )?),
            tracker: TrackerOptions {
                fetch_retries: parse_or(
                    &lookup,
                    "TIME_TRACKING_FETCH_RETRIES",
                    defaults.fetch_retries,
                )?,
                fetch_backoff: Duration::from_millis(parse_or(
                    &lookup,
                    "TIME_TRACKING_FETCH_BACKOFF_MS",
                    defaults.fetch_backoff.as_millis() as u64,
                )?),
                max_replay_attempts: parse_or(
                    &lookup,
                    "TIME_TRACKING_MAX_REPLAY_ATTEMPTS",
                    defaults.max_replay_attempts,
                )?,
                reconcile_after_timer_change: defaults.reconcile_after_timer_change,
            },
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup, key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[rstest]
    fn it_should_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[("TIME_TRACKING_DATA_DIR", "/tmp/tt")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_token, None);
        assert_eq!(config.listen_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tt"));
        assert_eq!(config.probe_interval, Duration::from_secs(15));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.tracker, TrackerOptions::default());
    }

    #[rstest]
    fn it_should_read_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("TIME_TRACKING_DATA_DIR", "/tmp/tt"),
            ("TIME_TRACKING_API_URL", "https://hours.example.com/api"),
            ("TIME_TRACKING_API_TOKEN", "secret"),
            ("TIME_TRACKING_LISTEN_ADDR", "0.0.0.0:9000"),
            ("TIME_TRACKING_FETCH_RETRIES", "1"),
            ("TIME_TRACKING_FETCH_BACKOFF_MS", "250"),
            ("TIME_TRACKING_MAX_REPLAY_ATTEMPTS", "8"),
            ("TIME_TRACKING_PROBE_INTERVAL_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://hours.example.com/api");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.tracker.fetch_retries, 1);
        assert_eq!(config.tracker.fetch_backoff, Duration::from_millis(250));
        assert_eq!(config.tracker.max_replay_attempts, 8);
        assert_eq!(config.probe_interval, Duration::from_secs(30));
    }

    #[rstest]
    #[case("TIME_TRACKING_FETCH_RETRIES", "many")]
    #[case("TIME_TRACKING_LISTEN_ADDR", "localhost")]
    #[case("TIME_TRACKING_MAX_REPLAY_ATTEMPTS", "-1")]
    fn it_should_reject_invalid_values(#[case] key: &str, #[case] value: &str) {
        let result = Config::from_lookup(lookup(&[("TIME_TRACKING_DATA_DIR", "/tmp/tt"), (key, value)]));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[rstest]
    fn it_should_treat_blank_values_as_unset() {
        let config = Config::from_lookup(lookup(&[
            ("TIME_TRACKING_DATA_DIR", "/tmp/tt"),
            ("TIME_TRACKING_API_TOKEN", "  "),
        ]))
        .unwrap();
        assert_eq!(config.api_token, None);
    }
}
