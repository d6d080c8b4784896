// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

pub mod core;

pub use self::core::{
    EngineConfig, EnrichmentConfig, FetchConfig, ObservabilityConfig, ReputationConfig,
    ScoringConfig, SeverityWeights,
};

use anyhow::{Context, Result};
use validator::Validate;

impl EngineConfig {
    /// Load configuration from environment variables with sensible defaults
    ///
    /// Supports the following environment variables:
    /// - REPUTATION_API_URL: Reputation source base URL
    /// - REPUTATION_API_KEY (or VIRUSTOTAL_API_KEY): Reputation source API key
    /// - REPUTATION_TIMEOUT_SECS: Reputation lookup timeout
    /// - FETCH_TIMEOUT_SECS: Per-script fetch timeout
    /// - FETCH_CONCURRENCY: Concurrent script fetch limit
    /// - CVE_ENRICHMENT_ENABLED: Enable CVE detail enrichment
    /// - LOG_LEVEL: Logging level
    pub fn from_env() -> Result<Self> {
        let mut config = EngineConfig::default();

        if let Ok(api_url) = std::env::var("REPUTATION_API_URL") {
            config.reputation.api_url = api_url;
        }

        if let Ok(api_key) = std::env::var("REPUTATION_API_KEY") {
            config.reputation.api_key = Some(api_key);
        } else if let Ok(api_key) = std::env::var("VIRUSTOTAL_API_KEY") {
            config.reputation.api_key = Some(api_key);
        }

        if let Ok(timeout) = std::env::var("REPUTATION_TIMEOUT_SECS") {
            config.reputation.timeout_secs = timeout
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid REPUTATION_TIMEOUT_SECS value"))?;
        }

        if let Ok(timeout) = std::env::var("FETCH_TIMEOUT_SECS") {
            config.fetch.timeout_secs = timeout
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid FETCH_TIMEOUT_SECS value"))?;
        }

        if let Ok(concurrency) = std::env::var("FETCH_CONCURRENCY") {
            config.fetch.max_concurrency = concurrency
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid FETCH_CONCURRENCY value"))?;
        }

        if let Ok(enabled) = std::env::var("CVE_ENRICHMENT_ENABLED") {
            config.enrichment.enabled = enabled
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid CVE_ENRICHMENT_ENABLED value"))?;
        }

        if let Ok(log_level) = std::env::var("LOG_LEVEL") {
            config.observability.log_level = log_level;
        }

        config.validate_all()?;

        Ok(config)
    }

    /// Validate every configuration section.
    pub fn validate_all(&self) -> Result<()> {
        self.fetch
            .validate()
            .context("Invalid fetch configuration")?;
        self.reputation
            .validate()
            .context("Invalid reputation configuration")?;
        self.scoring
            .weights
            .validate()
            .context("Invalid scoring weights")?;
        self.enrichment
            .validate()
            .context("Invalid enrichment configuration")?;
        Ok(())
    }
}
