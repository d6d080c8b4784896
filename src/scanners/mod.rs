// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Page Scan Engine
 * Main scan orchestration: fan-out, aggregation, scoring, recommendations
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use url::Url;

pub mod behavior;
pub mod reputation;
pub mod scripts;

pub use behavior::{BehaviorAnalyzer, BehaviorReport};
pub use reputation::{DomainVerdict, ReputationChecker, ReputationReport};
pub use scripts::ScriptScanner;

use crate::config::EngineConfig;
use crate::cve_enrichment::CveEnrichment;
use crate::errors::{EngineError, EngineResult};
use crate::http_client::HttpClient;
use crate::reporting::recommendations;
use crate::scorer::SecurityScorer;
use crate::types::{PageSnapshot, ScanReport};

/// Orchestrates the three analyzers over one page snapshot. Holds no
/// cross-scan state: arbitrarily many scans may run concurrently on one
/// engine instance.
pub struct ScanEngine {
    script_scanner: ScriptScanner,
    behavior_analyzer: BehaviorAnalyzer,
    reputation_checker: ReputationChecker,
    scorer: SecurityScorer,
}

impl ScanEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate_all()?;

        let http_client = Arc::new(
            HttpClient::new(config.fetch.timeout_secs, config.fetch.max_retries)?
                .with_body_limit(config.fetch.max_body_bytes),
        );

        let mut script_scanner =
            ScriptScanner::new(Arc::clone(&http_client), config.fetch.max_concurrency);
        if config.enrichment.enabled {
            script_scanner = script_scanner.with_enrichment(Arc::new(CveEnrichment::new(
                Arc::clone(&http_client),
                &config.enrichment,
            )));
            info!("[ENGINE] CVE enrichment enabled");
        }

        let reputation_checker =
            ReputationChecker::new(Arc::clone(&http_client), &config.reputation);

        Ok(Self {
            script_scanner,
            behavior_analyzer: BehaviorAnalyzer::new(),
            reputation_checker,
            scorer: SecurityScorer::new(config.scoring.weights),
        })
    }

    /// Run one scan. The script and reputation passes perform network I/O
    /// and run concurrently; the behavior pass is pure computation. The
    /// aggregated finding order is a contract: script findings, then
    /// behavior findings, then reputation findings.
    pub async fn execute_scan(&self, snapshot: &PageSnapshot) -> EngineResult<ScanReport> {
        let page_url = Url::parse(&snapshot.url).map_err(|e| {
            EngineError::InputInvalid(format!("page URL '{}' is not absolute: {}", snapshot.url, e))
        })?;
        if page_url.host_str().is_none() {
            return Err(EngineError::InputInvalid(format!(
                "page URL '{}' has no host",
                snapshot.url
            )));
        }

        info!("[ENGINE] Scanning {}", snapshot.url);
        let started = Instant::now();

        let (script_result, reputation_report) = tokio::join!(
            self.script_scanner.scan(&snapshot.scripts),
            self.reputation_checker.check(&page_url),
        );

        let script_findings = script_result.map_err(|e| {
            error!("[ERROR] [ENGINE] Script analysis failed for {}: {}", snapshot.url, e);
            EngineError::ScanFailed(format!("script analysis failed: {}", e))
        })?;

        let behavior_report = self.behavior_analyzer.analyze(&page_url, snapshot);

        let mut findings = Vec::with_capacity(
            script_findings.len()
                + behavior_report.findings.len()
                + reputation_report.findings.len(),
        );
        findings.extend(script_findings);
        findings.extend(behavior_report.findings);
        findings.extend(reputation_report.findings);

        let security_score = self.scorer.score(&findings, behavior_report.penalty);
        let recommendations = recommendations::generate(&findings);

        info!(
            "[SUCCESS] [ENGINE] Scan of {} completed: {} finding(s), score {}",
            snapshot.url,
            findings.len(),
            security_score
        );

        Ok(ScanReport {
            url: snapshot.url.clone(),
            findings,
            security_score,
            recommendations,
            scanned_at: chrono::Utc::now().to_rfc3339(),
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn engine() -> ScanEngine {
        // Reputation stays quiet without an API key; scripts and behavior
        // run against the snapshot alone.
        ScanEngine::new(EngineConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_relative_url_rejected_as_invalid_input() {
        let snapshot = PageSnapshot::new("/not/absolute");
        let err = engine().execute_scan(&snapshot).await.unwrap_err();
        assert!(matches!(err, EngineError::InputInvalid(_)));
    }

    #[tokio::test]
    async fn test_hostless_url_rejected_as_invalid_input() {
        let snapshot = PageSnapshot::new("data:text/plain,hello");
        let err = engine().execute_scan(&snapshot).await.unwrap_err();
        assert!(matches!(err, EngineError::InputInvalid(_)));
    }

    #[tokio::test]
    async fn test_empty_snapshot_scores_100() {
        let snapshot = PageSnapshot::new("https://example.com/");
        let report = engine().execute_scan(&snapshot).await.unwrap();
        assert!(report.findings.is_empty());
        assert_eq!(report.security_score, 100);
        assert_eq!(report.recommendations.len(), 1);
    }
}
