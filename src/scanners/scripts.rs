// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Script Vulnerability Scanner
 * Outdated-library and dangerous-inline-code detection over page scripts
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cve_enrichment::CveEnrichment;
use crate::http_client::HttpClient;
use crate::signatures::SIGNATURES;
use crate::types::{Finding, FindingKind, FindingSource, ScriptRef, Severity};

/// Dangerous-construct rules applied to inline scripts, in fixed rule
/// order: HTML sink assignments, dynamic document rewrite, dynamic code
/// evaluation.
static DANGEROUS_CONSTRUCTS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"\.innerHTML\s*=").expect("invalid construct pattern"),
            "direct HTML sink assignment (innerHTML)",
        ),
        (
            Regex::new(r"\.outerHTML\s*=").expect("invalid construct pattern"),
            "direct HTML sink assignment (outerHTML)",
        ),
        (
            Regex::new(r"document\.write\s*\(").expect("invalid construct pattern"),
            "dynamic document rewrite (document.write)",
        ),
        (
            Regex::new(r"\beval\s*\(").expect("invalid construct pattern"),
            "dynamic code evaluation (eval)",
        ),
        (
            Regex::new(r"\bnew\s+Function\s*\(").expect("invalid construct pattern"),
            "dynamic code evaluation (new Function)",
        ),
    ]
});

/// Scans a page's script references for known-vulnerable library versions
/// and dangerous inline constructs. External scripts are fetched through
/// the shared HTTP client; a failed fetch skips that script and never
/// aborts the batch.
pub struct ScriptScanner {
    http_client: Arc<HttpClient>,
    max_concurrency: usize,
    enrichment: Option<Arc<CveEnrichment>>,
}

impl ScriptScanner {
    pub fn new(http_client: Arc<HttpClient>, max_concurrency: usize) -> Self {
        Self {
            http_client,
            max_concurrency: max_concurrency.max(1),
            enrichment: None,
        }
    }

    pub fn with_enrichment(mut self, enrichment: Arc<CveEnrichment>) -> Self {
        self.enrichment = Some(enrichment);
        self
    }

    /// Analyze all script references. Fetch-and-analyze runs concurrently
    /// up to the configured limit; the buffered stream keeps output in
    /// input script order, which is part of the engine's ordering contract.
    pub async fn scan(&self, scripts: &[ScriptRef]) -> Result<Vec<Finding>> {
        info!("[SCRIPTS] Analyzing {} script reference(s)", scripts.len());

        let per_script = stream::iter(scripts.iter().enumerate())
            .map(|(index, script)| {
                let client = Arc::clone(&self.http_client);
                async move {
                    match script {
                        ScriptRef::External { src } => match client.get(src).await {
                            Ok(response) if response.is_success() => {
                                analyze_script(Some(src), &response.body)
                            }
                            Ok(response) => {
                                debug!(
                                    "[SCRIPTS] Skipping script #{} ({}): status {}",
                                    index, src, response.status_code
                                );
                                Vec::new()
                            }
                            Err(e) => {
                                debug!("[SCRIPTS] Skipping script #{} ({}): {}", index, src, e);
                                Vec::new()
                            }
                        },
                        ScriptRef::Inline { code } => analyze_script(None, code),
                    }
                }
            })
            .buffered(self.max_concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut findings: Vec<Finding> = per_script.into_iter().flatten().collect();

        if let Some(enrichment) = &self.enrichment {
            enrichment.enrich(&mut findings).await;
        }

        info!("[SCRIPTS] Completed: {} finding(s)", findings.len());
        Ok(findings)
    }
}

/// Analyze one script. `source_url` is present for external scripts; the
/// signature pass covers both the URL and the body, the dangerous-construct
/// pass applies to inline code only. At most one finding per (script, rule)
/// pair, rules in table order.
fn analyze_script(source_url: Option<&str>, body: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    for signature in SIGNATURES.iter() {
        let version = source_url
            .and_then(|url| signature.match_text(url))
            .or_else(|| signature.match_text(body));

        if let Some(version) = version {
            let subject = source_url.unwrap_or("inline script");
            let mut finding = Finding::new(
                FindingKind::OutdatedLibrary,
                signature.severity,
                format!(
                    "Vulnerable {} version {} detected in {}: {}",
                    signature.library, version, subject, signature.summary
                ),
                FindingSource::ScriptAnalysis,
            );
            if let Some(identifier) = signature.identifier {
                finding = finding.with_identifier(identifier);
            }
            findings.push(finding);
        }
    }

    if source_url.is_none() {
        for (pattern, label) in DANGEROUS_CONSTRUCTS.iter() {
            if pattern.is_match(body) {
                findings.push(Finding::new(
                    FindingKind::DangerousInlineCode,
                    Severity::High,
                    format!("Inline script uses {}", label),
                    FindingSource::ScriptAnalysis,
                ));
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_eval_detected() {
        let findings = analyze_script(None, "var x = eval(userInput);");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::DangerousInlineCode);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].source, FindingSource::ScriptAnalysis);
    }

    #[test]
    fn test_one_finding_per_rule() {
        // Two innerHTML assignments trip the rule once; document.write
        // trips its own rule.
        let code = r#"
            el.innerHTML = payload;
            other.innerHTML = payload;
            document.write('<div>' + payload + '</div>');
        "#;
        let findings = analyze_script(None, code);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].description.contains("innerHTML"));
        assert!(findings[1].description.contains("document.write"));
    }

    #[test]
    fn test_benign_inline_script_clean() {
        let findings = analyze_script(None, "console.log('evaluation complete');");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_external_script_skips_inline_rules() {
        // Dangerous constructs inside a fetched external body are not the
        // inline-code signal; only the signature pass applies.
        let findings = analyze_script(
            Some("https://cdn.example.com/app.js"),
            "el.innerHTML = template;",
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_vulnerable_jquery_url() {
        let findings = analyze_script(Some("https://cdn.example.com/jquery-1.4.2.js"), "");
        // 1.4.2 falls below both jQuery bounds in the signature table.
        assert_eq!(findings.len(), 2);
        assert!(findings
            .iter()
            .all(|f| f.kind == FindingKind::OutdatedLibrary));
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].identifier.as_deref(), Some("CVE-2012-6708"));
        assert_eq!(findings[1].severity, Severity::Medium);
    }

    #[test]
    fn test_version_banner_in_body() {
        let findings = analyze_script(
            Some("https://cdn.example.com/vendor.js"),
            "/*! jQuery v3.3.1 | (c) JS Foundation and other contributors */",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].identifier.as_deref(), Some("CVE-2020-11023"));
    }

    #[tokio::test]
    async fn test_inline_scan_requires_no_network() {
        let scanner = ScriptScanner::new(Arc::new(HttpClient::new(5, 0).unwrap()), 4);
        let scripts = vec![
            ScriptRef::Inline {
                code: "document.write(banner);".to_string(),
            },
            ScriptRef::Inline {
                code: "console.log('ok');".to_string(),
            },
        ];
        let findings = scanner.scan(&scripts).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::DangerousInlineCode);
    }
}
