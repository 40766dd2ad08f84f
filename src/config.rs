use std::time::Duration;

use anyhow::{Context, Result};

// ---------------------------------------------------------------------------
// Runtime configuration (environment / .env)
// ---------------------------------------------------------------------------

pub const DEFAULT_ARCHIVE_URL: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP/sync";
pub const DEFAULT_SUMMARY_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_SUMMARY_MODEL: &str = "llama-3.3-70b-versatile";

/// Where and how to query the archive TAP service.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveSettings {
    pub url: String,
    pub timeout: Duration,
    /// Longest GET URL sent before switching to a form-encoded POST.
    pub max_url_len: usize,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_ARCHIVE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_url_len: 2000,
        }
    }
}

/// Completion service used for the narrative summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarySettings {
    pub url: String,
    pub model: String,
    /// `None` disables the summary; the dashboard still works.
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Example records included in the prompt.
    pub sample_records: usize,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SUMMARY_URL.to_string(),
            model: DEFAULT_SUMMARY_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(60),
            sample_records: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub archive: ArchiveSettings,
    pub summary: SummarySettings,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset or blank variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let number = |key: &str| -> Result<Option<u64>> {
            get(key)
                .map(|v| {
                    v.parse::<u64>()
                        .with_context(|| format!("{key} must be a non-negative integer, got '{v}'"))
                })
                .transpose()
        };

        let mut config = Config::default();

        if let Some(url) = get("EXOPLANET_ARCHIVE_URL") {
            config.archive.url = url;
        }
        if let Some(secs) = number("EXOPLANET_ARCHIVE_TIMEOUT_SECS")? {
            config.archive.timeout = Duration::from_secs(secs);
        }
        if let Some(len) = number("EXOPLANET_ARCHIVE_MAX_URL_LEN")? {
            config.archive.max_url_len = len as usize;
        }

        config.summary.api_key = get("GROQ_API_KEY");
        if let Some(url) = get("GROQ_API_URL") {
            config.summary.url = url;
        }
        if let Some(model) = get("GROQ_MODEL") {
            config.summary.model = model;
        }
        if let Some(secs) = number("SUMMARY_TIMEOUT_SECS")? {
            config.summary.timeout = Duration::from_secs(secs);
        }
        if let Some(n) = number("SUMMARY_SAMPLE_RECORDS")? {
            config.summary.sample_records = n as usize;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.archive.timeout, Duration::from_secs(30));
        assert!(config.summary.api_key.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("EXOPLANET_ARCHIVE_URL", "http://localhost:9000/TAP/sync"),
            ("EXOPLANET_ARCHIVE_TIMEOUT_SECS", "12"),
            ("GROQ_API_KEY", " gsk_test "),
            ("SUMMARY_SAMPLE_RECORDS", "3"),
        ])
        .unwrap();

        assert_eq!(config.archive.url, "http://localhost:9000/TAP/sync");
        assert_eq!(config.archive.timeout, Duration::from_secs(12));
        assert_eq!(config.summary.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.summary.sample_records, 3);
        assert_eq!(config.summary.model, DEFAULT_SUMMARY_MODEL);
    }

    #[test]
    fn blank_key_means_no_key() {
        let config = config_from(&[("GROQ_API_KEY", "   ")]).unwrap();
        assert!(config.summary.api_key.is_none());
    }

    #[test]
    fn invalid_number_is_an_error() {
        let err = config_from(&[("EXOPLANET_ARCHIVE_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("EXOPLANET_ARCHIVE_TIMEOUT_SECS"));
    }
}
