// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Behavior Heuristics Analyzer
 * Structural form/link checks and interaction-counter scoring signals
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;
use url::Url;

use crate::types::{
    Finding, FindingKind, FindingSource, FormDescriptor, InteractionMetrics, LinkDescriptor,
    PageSnapshot, Severity,
};

/// More off-host links than this on a single page reads as link farming.
const EXTERNAL_LINK_THRESHOLD: usize = 5;

const FORM_SUBMISSION_LIMIT: u32 = 3;
const LINK_CLICK_LIMIT: u32 = 10;
const REDIRECT_LIMIT: u32 = 2;

const FORM_SUBMISSION_PENALTY: u32 = 5;
const LINK_CLICK_PENALTY: u32 = 3;
const REDIRECT_PENALTY: u32 = 8;

static URL_LIKE_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(https?://|www\.)\S+").expect("invalid url-like input pattern")
});

/// Output of the behavior pass. The penalty is consumed only by the
/// scorer; it is never folded into the findings a second time.
#[derive(Debug, Clone)]
pub struct BehaviorReport {
    pub findings: Vec<Finding>,
    pub penalty: u32,
}

/// Pure structural and numeric analysis of the captured page. No I/O,
/// never suspends.
pub struct BehaviorAnalyzer;

impl BehaviorAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, page_url: &Url, snapshot: &PageSnapshot) -> BehaviorReport {
        let mut findings = Vec::new();

        self.check_forms(
            page_url,
            &snapshot.forms,
            snapshot.csrf_meta_present,
            &mut findings,
        );
        self.check_links(page_url, &snapshot.links, &mut findings);
        let penalty = self.check_interactions(
            &snapshot.interactions,
            &snapshot.captured_inputs,
            &mut findings,
        );

        info!(
            "[BEHAVIOR] Completed: {} finding(s), penalty {}",
            findings.len(),
            penalty
        );

        BehaviorReport { findings, penalty }
    }

    fn check_forms(
        &self,
        page_url: &Url,
        forms: &[FormDescriptor],
        csrf_meta_present: bool,
        findings: &mut Vec<Finding>,
    ) {
        for form in forms {
            if let Some(action) = resolve_action(page_url, &form.action) {
                if action.scheme() == "http" {
                    findings.push(Finding::new(
                        FindingKind::InsecureForm,
                        Severity::High,
                        format!("Form submits over unencrypted HTTP to {}", action),
                        FindingSource::BehaviorAnalysis,
                    ));
                }
            }

            if !form.has_anti_forgery_token && !csrf_meta_present {
                findings.push(Finding::new(
                    FindingKind::MissingCsrfProtection,
                    Severity::High,
                    "Form lacks an anti-forgery token and the page declares none",
                    FindingSource::BehaviorAnalysis,
                ));
            }

            for field in &form.password_fields {
                let autocomplete = field.autocomplete.as_deref().unwrap_or("");
                if autocomplete.is_empty() || autocomplete.eq_ignore_ascii_case("off") {
                    findings.push(Finding::new(
                        FindingKind::InsecureForm,
                        Severity::Medium,
                        "Password field without autocomplete protection",
                        FindingSource::BehaviorAnalysis,
                    ));
                }
            }
        }
    }

    fn check_links(&self, page_url: &Url, links: &[LinkDescriptor], findings: &mut Vec<Finding>) {
        let page_host = page_url.host_str().unwrap_or_default();

        let external_count = links
            .iter()
            .filter_map(|link| Url::parse(&link.href).or_else(|_| page_url.join(&link.href)).ok())
            .filter(|href| href.host_str().is_some_and(|host| host != page_host))
            .count();

        // One finding regardless of how far over the threshold.
        if external_count > EXTERNAL_LINK_THRESHOLD {
            findings.push(Finding::new(
                FindingKind::ExternalLinkRisk,
                Severity::Medium,
                format!(
                    "High number of external links detected ({} point off-host)",
                    external_count
                ),
                FindingSource::BehaviorAnalysis,
            ));
        }
    }

    fn check_interactions(
        &self,
        metrics: &InteractionMetrics,
        captured_inputs: &[String],
        findings: &mut Vec<Finding>,
    ) -> u32 {
        let mut penalty = 0;

        if metrics.form_submissions > FORM_SUBMISSION_LIMIT {
            penalty += FORM_SUBMISSION_PENALTY;
        }

        if metrics.link_clicks > LINK_CLICK_LIMIT {
            penalty += LINK_CLICK_PENALTY;
        }

        if metrics.redirect_count > REDIRECT_LIMIT {
            penalty += REDIRECT_PENALTY;
            findings.push(Finding::new(
                FindingKind::PhishingBehavior,
                Severity::High,
                format!(
                    "Multiple redirects observed during this visit ({})",
                    metrics.redirect_count
                ),
                FindingSource::BehaviorAnalysis,
            ));
        }

        if captured_inputs.iter().any(|input| URL_LIKE_INPUT.is_match(input)) {
            findings.push(Finding::new(
                FindingKind::PhishingBehavior,
                Severity::Medium,
                "URL-like text was entered into a form field during this visit",
                FindingSource::BehaviorAnalysis,
            ));
        }

        penalty
    }
}

impl Default for BehaviorAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a form action against the page origin. An empty action posts
/// back to the page itself.
fn resolve_action(page_url: &Url, action: &str) -> Option<Url> {
    let action = action.trim();
    if action.is_empty() {
        return Some(page_url.clone());
    }
    Url::parse(action).or_else(|_| page_url.join(action)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PasswordField;

    fn page() -> Url {
        Url::parse("https://shop.example.com/checkout").unwrap()
    }

    fn analyze(snapshot: &PageSnapshot) -> BehaviorReport {
        BehaviorAnalyzer::new().analyze(&page(), snapshot)
    }

    fn token_form(action: &str) -> FormDescriptor {
        FormDescriptor {
            action: action.to_string(),
            has_anti_forgery_token: true,
            password_fields: Vec::new(),
        }
    }

    #[test]
    fn test_http_action_flagged_high() {
        let mut snapshot = PageSnapshot::new("https://shop.example.com/checkout");
        snapshot.forms = vec![token_form("http://collector.example.net/submit")];

        let report = analyze(&snapshot);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, FindingKind::InsecureForm);
        assert_eq!(report.findings[0].severity, Severity::High);
    }

    #[test]
    fn test_relative_action_inherits_page_scheme() {
        let mut snapshot = PageSnapshot::new("https://shop.example.com/checkout");
        snapshot.forms = vec![token_form("/submit")];

        let report = analyze(&snapshot);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_missing_csrf_token_flagged() {
        let mut snapshot = PageSnapshot::new("https://shop.example.com/checkout");
        snapshot.forms = vec![FormDescriptor {
            action: "https://shop.example.com/submit".to_string(),
            has_anti_forgery_token: false,
            password_fields: Vec::new(),
        }];

        let report = analyze(&snapshot);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, FindingKind::MissingCsrfProtection);
    }

    #[test]
    fn test_csrf_meta_suppresses_token_finding() {
        let mut snapshot = PageSnapshot::new("https://shop.example.com/checkout");
        snapshot.csrf_meta_present = true;
        snapshot.forms = vec![FormDescriptor {
            action: "https://shop.example.com/submit".to_string(),
            has_anti_forgery_token: false,
            password_fields: Vec::new(),
        }];

        let report = analyze(&snapshot);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_password_autocomplete_off_flagged_medium() {
        let mut snapshot = PageSnapshot::new("https://shop.example.com/checkout");
        let mut form = token_form("https://shop.example.com/login");
        form.password_fields = vec![
            PasswordField {
                autocomplete: Some("off".to_string()),
            },
            PasswordField {
                autocomplete: Some("current-password".to_string()),
            },
            PasswordField { autocomplete: None },
        ];
        snapshot.forms = vec![form];

        let report = analyze(&snapshot);
        assert_eq!(report.findings.len(), 2);
        assert!(report
            .findings
            .iter()
            .all(|f| f.kind == FindingKind::InsecureForm && f.severity == Severity::Medium));
    }

    #[test]
    fn test_external_links_single_finding_over_threshold() {
        let mut snapshot = PageSnapshot::new("https://shop.example.com/checkout");
        snapshot.links = (0..12)
            .map(|i| LinkDescriptor {
                href: format!("https://other{}.example.net/page", i),
            })
            .collect();

        let report = analyze(&snapshot);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, FindingKind::ExternalLinkRisk);
        assert_eq!(report.findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_external_links_at_threshold_clean() {
        let mut snapshot = PageSnapshot::new("https://shop.example.com/checkout");
        snapshot.links = (0..5)
            .map(|i| LinkDescriptor {
                href: format!("https://other{}.example.net/page", i),
            })
            .collect();

        let report = analyze(&snapshot);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_same_host_links_not_counted() {
        let mut snapshot = PageSnapshot::new("https://shop.example.com/checkout");
        snapshot.links = (0..20)
            .map(|i| LinkDescriptor {
                href: format!("https://shop.example.com/item/{}", i),
            })
            .collect();

        let report = analyze(&snapshot);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_interaction_penalties_accumulate() {
        let mut snapshot = PageSnapshot::new("https://shop.example.com/checkout");
        snapshot.interactions = InteractionMetrics {
            form_submissions: 4,
            link_clicks: 11,
            redirect_count: 3,
        };

        let report = analyze(&snapshot);
        assert_eq!(report.penalty, 5 + 3 + 8);
        // Only the redirect limit surfaces a finding.
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, FindingKind::PhishingBehavior);
        assert_eq!(report.findings[0].severity, Severity::High);
    }

    #[test]
    fn test_counters_at_limits_no_penalty() {
        let mut snapshot = PageSnapshot::new("https://shop.example.com/checkout");
        snapshot.interactions = InteractionMetrics {
            form_submissions: 3,
            link_clicks: 10,
            redirect_count: 2,
        };

        let report = analyze(&snapshot);
        assert_eq!(report.penalty, 0);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_url_like_captured_input_flagged_medium() {
        let mut snapshot = PageSnapshot::new("https://shop.example.com/checkout");
        snapshot.captured_inputs = vec![
            "alice".to_string(),
            "http://evil.example.net/reset".to_string(),
        ];

        let report = analyze(&snapshot);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, FindingKind::PhishingBehavior);
        assert_eq!(report.findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_plain_text_input_clean() {
        let mut snapshot = PageSnapshot::new("https://shop.example.com/checkout");
        snapshot.captured_inputs = vec!["just a normal comment".to_string()];

        let report = analyze(&snapshot);
        assert!(report.findings.is_empty());
        assert_eq!(report.penalty, 0);
    }
}
