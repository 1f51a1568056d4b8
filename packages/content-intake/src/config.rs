use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::fetcher::Fetcher;
use crate::net::ReqwestTransport;
use crate::sources::Dispatcher;
use crate::transcripts::{TimedTextClient, TranscriptService, DEFAULT_CAPACITY, DEFAULT_TIMEDTEXT_URL};

/// Intake configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    pub user_agent: String,
    pub transcript_cache_size: usize,
    pub pin_resolved_addrs: bool,
    pub transcript_base_url: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            user_agent: "ContentIntake/0.1".to_string(),
            transcript_cache_size: DEFAULT_CAPACITY,
            pin_resolved_addrs: true,
            transcript_base_url: DEFAULT_TIMEDTEXT_URL.to_string(),
        }
    }
}

impl IntakeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            user_agent: lookup("INTAKE_USER_AGENT").unwrap_or(defaults.user_agent),
            transcript_cache_size: lookup("INTAKE_TRANSCRIPT_CACHE_SIZE")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("INTAKE_TRANSCRIPT_CACHE_SIZE must be a non-negative number")?
                .unwrap_or(defaults.transcript_cache_size),
            pin_resolved_addrs: lookup("INTAKE_PIN_RESOLVED_ADDRS")
                .map(|v| parse_bool(&v))
                .transpose()
                .context("INTAKE_PIN_RESOLVED_ADDRS must be true or false")?
                .unwrap_or(defaults.pin_resolved_addrs),
            transcript_base_url: lookup("INTAKE_TRANSCRIPT_BASE_URL")
                .unwrap_or(defaults.transcript_base_url),
        })
    }

    /// Wire the production dispatcher: system DNS, reqwest, timed-text captions
    pub fn build_dispatcher(&self) -> Result<Dispatcher<ReqwestTransport, TimedTextClient>> {
        let transport = ReqwestTransport::new(&self.user_agent)
            .context("Failed to create HTTP client")?
            .with_address_pinning(self.pin_resolved_addrs);
        let captions = TimedTextClient::with_base_url(&self.user_agent, &self.transcript_base_url)
            .context("Failed to create transcript client")?;

        Ok(Dispatcher::new(
            Fetcher::new(transport),
            TranscriptService::with_cache_capacity(captions, self.transcript_cache_size),
        ))
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("invalid boolean: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = IntakeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, IntakeConfig::default());
        assert_eq!(config.transcript_cache_size, 32);
        assert!(config.pin_resolved_addrs);
    }

    #[test]
    fn test_overrides() {
        let config = IntakeConfig::from_lookup(lookup(&[
            ("INTAKE_USER_AGENT", "TestAgent/1.0"),
            ("INTAKE_TRANSCRIPT_CACHE_SIZE", "0"),
            ("INTAKE_PIN_RESOLVED_ADDRS", "off"),
        ]))
        .unwrap();

        assert_eq!(config.user_agent, "TestAgent/1.0");
        assert_eq!(config.transcript_cache_size, 0);
        assert!(!config.pin_resolved_addrs);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(IntakeConfig::from_lookup(lookup(&[("INTAKE_TRANSCRIPT_CACHE_SIZE", "-1")])).is_err());
        assert!(IntakeConfig::from_lookup(lookup(&[("INTAKE_PIN_RESOLVED_ADDRS", "maybe")])).is_err());
    }
}
