// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::Severity;

/// Engine configuration. Built once, passed into the engine at
/// construction time. There is no process-wide mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub reputation: ReputationConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            reputation: ReputationConfig::default(),
            scoring: ScoringConfig::default(),
            enrichment: EnrichmentConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Script fetch settings: bounded timeout, bounded retries, bounded
/// per-scan concurrency.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FetchConfig {
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_fetch_retries")]
    pub max_retries: u32,

    #[validate(range(min = 1, max = 64))]
    #[serde(default = "default_fetch_concurrency")]
    pub max_concurrency: usize,

    #[validate(range(min = 1024))]
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            max_retries: default_fetch_retries(),
            max_concurrency: default_fetch_concurrency(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Domain reputation source settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReputationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[validate(url)]
    #[serde(default = "default_reputation_api_url")]
    pub api_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[validate(range(min = 1, max = 60))]
    #[serde(default = "default_reputation_timeout")]
    pub timeout_secs: u64,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_reputation_api_url(),
            api_key: None,
            timeout_secs: default_reputation_timeout(),
        }
    }
}

/// Severity weighting table. Each finding deducts its severity weight from
/// the base score of 100. The 10/5/2 table is the documented default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct SeverityWeights {
    #[validate(range(max = 100))]
    #[serde(default = "default_weight_high")]
    pub high: u32,

    #[validate(range(max = 100))]
    #[serde(default = "default_weight_medium")]
    pub medium: u32,

    #[validate(range(max = 100))]
    #[serde(default = "default_weight_low")]
    pub low: u32,
}

impl SeverityWeights {
    pub fn weight_for(&self, severity: Severity) -> u32 {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            high: default_weight_high(),
            medium: default_weight_medium(),
            low: default_weight_low(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: SeverityWeights,
}

/// CVE detail enrichment for outdated-library findings. Disabled by
/// default; any lookup failure leaves the finding untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EnrichmentConfig {
    #[serde(default = "default_false")]
    pub enabled: bool,

    #[validate(url)]
    #[serde(default = "default_enrichment_api_url")]
    pub api_url: String,

    #[validate(range(min = 1, max = 60))]
    #[serde(default = "default_enrichment_timeout")]
    pub timeout_secs: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_enrichment_api_url(),
            timeout_secs: default_enrichment_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_fetch_retries() -> u32 {
    1
}

fn default_fetch_concurrency() -> usize {
    8
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

fn default_reputation_api_url() -> String {
    "https://www.virustotal.com/api/v3".to_string()
}

fn default_reputation_timeout() -> u64 {
    5
}

fn default_weight_high() -> u32 {
    10
}

fn default_weight_medium() -> u32 {
    5
}

fn default_weight_low() -> u32 {
    2
}

fn default_enrichment_api_url() -> String {
    "https://services.nvd.nist.gov/rest/json/cve/1.0".to_string()
}

fn default_enrichment_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_documented_table() {
        let weights = SeverityWeights::default();
        assert_eq!(weights.weight_for(Severity::High), 10);
        assert_eq!(weights.weight_for(Severity::Medium), 5);
        assert_eq!(weights.weight_for(Severity::Low), 2);
    }

    #[test]
    fn test_default_config_validates() {
        let config = EngineConfig::default();
        assert!(config.fetch.validate().is_ok());
        assert!(config.reputation.validate().is_ok());
        assert!(config.enrichment.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_fetch_timeout_rejected() {
        let fetch = FetchConfig {
            timeout_secs: 0,
            ..FetchConfig::default()
        };
        assert!(fetch.validate().is_err());
    }
}
