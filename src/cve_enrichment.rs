// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - CVE Detail Enrichment
 * Optional NVD lookup for outdated-library finding descriptions
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::EnrichmentConfig;
use crate::http_client::HttpClient;
use crate::types::{Finding, FindingKind};

/// Appends the official CVE summary to outdated-library findings that
/// carry a CVE identifier. Strictly best-effort: any lookup failure leaves
/// the finding exactly as the signature database produced it.
pub struct CveEnrichment {
    http_client: Arc<HttpClient>,
    api_url: String,
    timeout: Duration,
}

impl CveEnrichment {
    pub fn new(http_client: Arc<HttpClient>, config: &EnrichmentConfig) -> Self {
        Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub async fn enrich(&self, findings: &mut [Finding]) {
        for finding in findings.iter_mut() {
            if finding.kind != FindingKind::OutdatedLibrary {
                continue;
            }
            let Some(cve_id) = finding.identifier.clone() else {
                continue;
            };

            match self.lookup_summary(&cve_id).await {
                Ok(Some(summary)) => {
                    finding.description = format!("{}. {}", finding.description, summary);
                }
                Ok(None) => {
                    debug!("[CVE] No summary available for {}", cve_id);
                }
                Err(reason) => {
                    debug!("[CVE] Lookup for {} failed: {}", cve_id, reason);
                }
            }
        }
    }

    async fn lookup_summary(&self, cve_id: &str) -> Result<Option<String>, String> {
        let lookup_url = format!("{}/{}", self.api_url, cve_id);

        let response = tokio::time::timeout(self.timeout, self.http_client.get(&lookup_url))
            .await
            .map_err(|_| format!("timed out after {:?}", self.timeout))?
            .map_err(|e| e.to_string())?;

        if !response.is_success() {
            return Err(format!("status {}", response.status_code));
        }

        let body: serde_json::Value =
            serde_json::from_str(&response.body).map_err(|e| e.to_string())?;

        Ok(extract_summary(&body))
    }
}

/// NVD 1.0 layout: result.CVE_Items[0].cve.description.description_data[0].value
fn extract_summary(body: &serde_json::Value) -> Option<String> {
    body.pointer("/result/CVE_Items/0/cve/description/description_data/0/value")
        .and_then(|value| value.as_str())
        .map(|value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_summary() {
        let body: serde_json::Value = serde_json::from_str(
            r#"{
                "result": {
                    "CVE_Items": [{
                        "cve": {
                            "description": {
                                "description_data": [
                                    {"lang": "en", "value": "XSS in example library."}
                                ]
                            }
                        }
                    }]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            extract_summary(&body),
            Some("XSS in example library.".to_string())
        );
    }

    #[test]
    fn test_extract_summary_missing_path() {
        let body: serde_json::Value = serde_json::from_str(r#"{"result": {}}"#).unwrap();
        assert_eq!(extract_summary(&body), None);
    }
}
