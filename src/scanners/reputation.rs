// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Domain Reputation Checker
 * External reputation lookup with graceful unknown-on-failure degradation
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ReputationConfig;
use crate::http_client::HttpClient;
use crate::types::{Finding, FindingKind, FindingSource, Severity};

/// Verdict from the reputation source. Lookup failure is Unknown, never
/// Unsafe: an unreachable source is not evidence against the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainVerdict {
    Safe,
    Unsafe,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct ReputationReport {
    pub verdict: DomainVerdict,
    pub findings: Vec<Finding>,
}

impl ReputationReport {
    fn unknown() -> Self {
        Self {
            verdict: DomainVerdict::Unknown,
            findings: Vec::new(),
        }
    }
}

/// Queries a VirusTotal-style domain endpoint with a bounded timeout.
/// Every failure mode degrades to an Unknown verdict with an empty finding
/// list; the scan itself never fails on this signal.
pub struct ReputationChecker {
    http_client: Arc<HttpClient>,
    api_url: String,
    api_key: Option<String>,
    timeout: Duration,
    enabled: bool,
}

impl ReputationChecker {
    pub fn new(http_client: Arc<HttpClient>, config: &ReputationConfig) -> Self {
        Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            enabled: config.enabled,
        }
    }

    pub async fn check(&self, page_url: &Url) -> ReputationReport {
        if !self.enabled {
            debug!("[REPUTATION] Lookup disabled, domain verdict unknown");
            return ReputationReport::unknown();
        }

        let Some(host) = page_url.host_str() else {
            warn!("[REPUTATION] Page URL has no host, domain verdict unknown");
            return ReputationReport::unknown();
        };

        let Some(api_key) = self.api_key.as_deref() else {
            warn!("[REPUTATION] No API key configured, domain verdict unknown");
            return ReputationReport::unknown();
        };

        let lookup_url = format!("{}/domains/{}", self.api_url, host);

        let response = match tokio::time::timeout(
            self.timeout,
            self.http_client
                .get_with_headers(&lookup_url, &[("x-apikey", api_key)]),
        )
        .await
        {
            Err(_) => {
                warn!(
                    "[REPUTATION] Lookup for {} timed out after {:?}",
                    host, self.timeout
                );
                return ReputationReport::unknown();
            }
            Ok(Err(e)) => {
                warn!("[REPUTATION] Lookup for {} failed: {}", host, e);
                return ReputationReport::unknown();
            }
            Ok(Ok(response)) => response,
        };

        if !response.is_success() {
            warn!(
                "[REPUTATION] Lookup for {} returned status {}",
                host, response.status_code
            );
            return ReputationReport::unknown();
        }

        match parse_analysis_stats(&response.body) {
            Ok(stats) => {
                let report = classify(host, &stats);
                info!(
                    "[REPUTATION] {} verdict: {:?} (malicious={}, suspicious={})",
                    host, report.verdict, stats.malicious, stats.suspicious
                );
                report
            }
            Err(reason) => {
                warn!("[REPUTATION] Malformed response for {}: {}", host, reason);
                ReputationReport::unknown()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct DomainLookupBody {
    data: DomainData,
}

#[derive(Debug, Deserialize)]
struct DomainData {
    attributes: DomainAttributes,
}

#[derive(Debug, Deserialize)]
struct DomainAttributes {
    last_analysis_stats: AnalysisStats,
}

#[derive(Debug, Deserialize)]
struct AnalysisStats {
    #[serde(default)]
    malicious: u32,
    #[serde(default)]
    suspicious: u32,
}

fn parse_analysis_stats(body: &str) -> Result<AnalysisStats, String> {
    serde_json::from_str::<DomainLookupBody>(body)
        .map(|lookup| lookup.data.attributes.last_analysis_stats)
        .map_err(|e| e.to_string())
}

fn classify(host: &str, stats: &AnalysisStats) -> ReputationReport {
    let flagged = stats.malicious + stats.suspicious;
    if flagged > 0 {
        ReputationReport {
            verdict: DomainVerdict::Unsafe,
            findings: vec![Finding::new(
                FindingKind::DomainReputation,
                Severity::High,
                format!(
                    "Domain {} is flagged by {} reputation engine(s) as malicious or suspicious",
                    host, flagged
                ),
                FindingSource::DomainReputation,
            )],
        }
    } else {
        ReputationReport {
            verdict: DomainVerdict::Safe,
            findings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_stats_classified_safe() {
        let stats = AnalysisStats {
            malicious: 0,
            suspicious: 0,
        };
        let report = classify("example.com", &stats);
        assert_eq!(report.verdict, DomainVerdict::Safe);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_flagged_stats_classified_unsafe() {
        let stats = AnalysisStats {
            malicious: 3,
            suspicious: 1,
        };
        let report = classify("evil.example.net", &stats);
        assert_eq!(report.verdict, DomainVerdict::Unsafe);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, FindingKind::DomainReputation);
        assert_eq!(report.findings[0].severity, Severity::High);
        assert_eq!(report.findings[0].source, FindingSource::DomainReputation);
    }

    #[test]
    fn test_parse_analysis_stats() {
        let body = r#"{
            "data": {
                "attributes": {
                    "last_analysis_stats": {
                        "malicious": 2,
                        "suspicious": 0,
                        "harmless": 70,
                        "undetected": 12
                    }
                }
            }
        }"#;
        let stats = parse_analysis_stats(body).unwrap();
        assert_eq!(stats.malicious, 2);
        assert_eq!(stats.suspicious, 0);
    }

    #[test]
    fn test_parse_malformed_body_errors() {
        assert!(parse_analysis_stats("not json").is_err());
        assert!(parse_analysis_stats(r#"{"data": {}}"#).is_err());
    }

    #[tokio::test]
    async fn test_missing_api_key_degrades_to_unknown() {
        let checker = ReputationChecker::new(
            Arc::new(HttpClient::new(5, 0).unwrap()),
            &ReputationConfig::default(),
        );
        let url = Url::parse("https://example.com/").unwrap();
        let report = checker.check(&url).await;
        assert_eq!(report.verdict, DomainVerdict::Unknown);
        assert!(report.findings.is_empty());
    }
}
