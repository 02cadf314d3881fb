//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::HouseholdError;

pub const ENV_API_URL: &str = "HOUSEHOLD_API_URL";
pub const ENV_SESSION_FILE: &str = "HOUSEHOLD_SESSION_FILE";
pub const ENV_TIMEOUT_SECS: &str = "HOUSEHOLD_TIMEOUT_SECS";

/// Settings for [`HouseholdClient`](crate::HouseholdClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL; endpoint paths are appended to it.
    pub api_url: String,

    /// Where the session is persisted. `None` keeps it in memory only.
    pub session_file: Option<PathBuf>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Where refused navigations and sign-outs land.
    pub login_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            session_file: None,
            timeout: Duration::from_secs(30),
            login_path: household_router::LOGIN_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads overrides from the environment, after loading a `.env` file
    /// from the current directory if there is one.
    ///
    /// | Variable                 | Field          |
    /// |--------------------------|----------------|
    /// | `HOUSEHOLD_API_URL`      | `api_url`      |
    /// | `HOUSEHOLD_SESSION_FILE` | `session_file` |
    /// | `HOUSEHOLD_TIMEOUT_SECS` | `timeout`      |
    ///
    /// # Errors
    /// [`HouseholdError::Config`] if `HOUSEHOLD_TIMEOUT_SECS` isn't a
    /// positive integer.
    pub fn from_env() -> Result<Self, HouseholdError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HouseholdError> {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v: &String| !v.trim().is_empty());

        if let Some(url) = value(ENV_API_URL) {
            config.api_url = url.trim().to_string();
        }
        if let Some(path) = value(ENV_SESSION_FILE) {
            config.session_file = Some(PathBuf::from(path.trim()));
        }
        if let Some(secs) = value(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    HouseholdError::Config(format!(
                        "{ENV_TIMEOUT_SECS} must be a positive integer, got {secs:?}"
                    ))
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_empty_gives_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://api.example.test/api"),
            (ENV_SESSION_FILE, "/tmp/hs/session.json"),
            (ENV_TIMEOUT_SECS, " 5 "),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.test/api");
        assert_eq!(
            config.session_file,
            Some(PathBuf::from("/tmp/hs/session.json"))
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_blank_values_are_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_SESSION_FILE, "  ")])).unwrap();
        assert_eq!(config.session_file, None);
    }

    #[test]
    fn test_from_lookup_bad_timeout_is_config_error() {
        for bad in ["soon", "0", "-3"] {
            let result = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, bad)]));
            assert!(
                matches!(result, Err(HouseholdError::Config(ref m)) if m.contains(ENV_TIMEOUT_SECS)),
                "{bad:?} should be rejected"
            );
        }
    }
}
