// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Security Recommendations
 * Maps the aggregated finding set to a short ordered advisory list
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::collections::HashSet;

use crate::types::{Finding, FindingKind, Severity};

pub const MAX_RECOMMENDATIONS: usize = 3;

/// Finding counts above this get the catch-all multiple-issues advisory.
const MULTIPLE_ISSUES_THRESHOLD: usize = 5;

const MULTIPLE_ISSUES: &str =
    "This site has multiple security issues - consider using enhanced protection";

const NO_ISSUES: &str = "No security issues detected on this page";

/// Specific advisory for a (kind, severity) pair. Pairs not named here
/// fall back to the severity-only generic message.
fn specific_advisory(kind: FindingKind, severity: Severity) -> Option<&'static str> {
    match (kind, severity) {
        (FindingKind::OutdatedLibrary, Severity::High) => {
            Some("Update this library to the latest secure version immediately")
        }
        (FindingKind::OutdatedLibrary, Severity::Medium) => {
            Some("Update this library at your earliest convenience")
        }
        (FindingKind::OutdatedLibrary, Severity::Low) => {
            Some("Consider updating this library during the next maintenance window")
        }
        (FindingKind::DangerousInlineCode, Severity::High) => Some(
            "Remove dynamic code evaluation and HTML sink assignments, and add a Content Security Policy",
        ),
        (FindingKind::InsecureForm, Severity::High) => Some(
            "Do not submit sensitive data - this page sends form data over an unencrypted connection",
        ),
        (FindingKind::InsecureForm, Severity::Medium) => {
            Some("Harden form fields and disable autocomplete exemptions on credential inputs")
        }
        (FindingKind::MissingCsrfProtection, Severity::High) => {
            Some("Implement anti-forgery tokens and SameSite cookies for all state-changing forms")
        }
        (FindingKind::MissingCsrfProtection, Severity::Medium) => {
            Some("Add CSRF protection to sensitive forms")
        }
        (FindingKind::PhishingBehavior, Severity::High) => {
            Some("Avoid entering credentials on this page")
        }
        (FindingKind::PhishingBehavior, Severity::Medium) => {
            Some("Verify the site authenticity before proceeding")
        }
        (FindingKind::ExternalLinkRisk, Severity::Medium) => {
            Some("Be cautious with links on this page - many lead to external domains")
        }
        (FindingKind::DomainReputation, Severity::High) => {
            Some("Leave this site - the domain is flagged as malicious by reputation sources")
        }
        _ => None,
    }
}

fn generic_advisory(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "This poses a significant security risk - proceed with caution",
        Severity::Medium => "This page requires security attention",
        Severity::Low => "Consider security improvements for this page",
    }
}

/// Derive at most three recommendations from the aggregated finding list.
/// One advisory per distinct finding kind, first occurrence wins; later
/// findings of a seen kind are ignored even at higher severity. Never
/// returns an empty list.
pub fn generate(findings: &[Finding]) -> Vec<String> {
    if findings.is_empty() {
        return vec![NO_ISSUES.to_string()];
    }

    let mut seen_kinds = HashSet::new();
    let mut recommendations = Vec::new();

    for finding in findings {
        if seen_kinds.insert(finding.kind) {
            let advisory = specific_advisory(finding.kind, finding.severity)
                .unwrap_or_else(|| generic_advisory(finding.severity));
            recommendations.push(advisory.to_string());
        }
    }

    if findings.len() > MULTIPLE_ISSUES_THRESHOLD {
        recommendations.push(MULTIPLE_ISSUES.to_string());
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}
