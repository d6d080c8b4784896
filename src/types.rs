// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};

/// Ordinal risk level used for display and score weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
        }
    }
}

/// Category of a detected issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingKind {
    OutdatedLibrary,
    DangerousInlineCode,
    InsecureForm,
    MissingCsrfProtection,
    PhishingBehavior,
    ExternalLinkRisk,
    DomainReputation,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FindingKind::OutdatedLibrary => "OutdatedLibrary",
            FindingKind::DangerousInlineCode => "DangerousInlineCode",
            FindingKind::InsecureForm => "InsecureForm",
            FindingKind::MissingCsrfProtection => "MissingCsrfProtection",
            FindingKind::PhishingBehavior => "PhishingBehavior",
            FindingKind::ExternalLinkRisk => "ExternalLinkRisk",
            FindingKind::DomainReputation => "DomainReputation",
        };
        write!(f, "{}", name)
    }
}

/// Analyzer that produced a finding, kept for traceability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FindingSource {
    ScriptAnalysis,
    BehaviorAnalysis,
    DomainReputation,
}

/// One detected issue with a category, severity and optional external reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub kind: FindingKind,
    pub description: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub source: FindingSource,
}

impl Finding {
    pub fn new(
        kind: FindingKind,
        severity: Severity,
        description: impl Into<String>,
        source: FindingSource,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            severity,
            identifier: None,
            source,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

/// Counters observed during a page visit, used as phishing-likelihood signals.
/// Immutable once handed to the engine for a given scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionMetrics {
    #[serde(default)]
    pub form_submissions: u32,
    #[serde(default)]
    pub link_clicks: u32,
    #[serde(default)]
    pub redirect_count: u32,
}

/// A script on the page: either an external source URL or an inline code body,
/// never both. Capture payloads use `{"src": ...}` or `{"code": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptRef {
    External { src: String },
    Inline { code: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordField {
    #[serde(default)]
    pub autocomplete: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDescriptor {
    /// Form action target, absolute or resolvable against the page origin.
    /// Empty means the form posts back to the page itself.
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub has_anti_forgery_token: bool,
    #[serde(default)]
    pub password_fields: Vec<PasswordField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDescriptor {
    pub href: String,
}

/// Snapshot of a page as captured by the content-capture collaborator.
/// Constructed per scan request, consumed once, discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    /// Scanned page URL. Must parse as an absolute URL.
    pub url: String,
    #[serde(default)]
    pub scripts: Vec<ScriptRef>,
    #[serde(default)]
    pub forms: Vec<FormDescriptor>,
    #[serde(default)]
    pub links: Vec<LinkDescriptor>,
    /// Page-level anti-forgery declaration (`<meta name="csrf-token">` or
    /// equivalent) observed by the capture layer.
    #[serde(default)]
    pub csrf_meta_present: bool,
    /// Free-text values typed into form fields during the session.
    #[serde(default)]
    pub captured_inputs: Vec<String>,
    #[serde(default)]
    pub interactions: InteractionMetrics,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            scripts: Vec::new(),
            forms: Vec::new(),
            links: Vec::new(),
            csrf_meta_present: false,
            captured_inputs: Vec::new(),
            interactions: InteractionMetrics::default(),
        }
    }
}

/// Engine output for one snapshot: findings in detection order, a bounded
/// security score and at most three recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub url: String,
    pub findings: Vec<Finding>,
    pub security_score: u8,
    pub recommendations: Vec<String>,
    pub scanned_at: String,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_ref_deserializes_untagged() {
        let external: ScriptRef =
            serde_json::from_str(r#"{"src": "https://cdn.example.com/jquery-1.4.2.js"}"#).unwrap();
        assert!(matches!(external, ScriptRef::External { .. }));

        let inline: ScriptRef = serde_json::from_str(r#"{"code": "console.log('hi')"}"#).unwrap();
        assert!(matches!(inline, ScriptRef::Inline { .. }));
    }

    #[test]
    fn test_snapshot_defaults() {
        let snapshot: PageSnapshot =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert!(snapshot.scripts.is_empty());
        assert!(snapshot.forms.is_empty());
        assert!(snapshot.links.is_empty());
        assert!(!snapshot.csrf_meta_present);
        assert_eq!(snapshot.interactions, InteractionMetrics::default());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_finding_serializes_camel_case() {
        let finding = Finding::new(
            FindingKind::OutdatedLibrary,
            Severity::High,
            "Vulnerable jquery version 1.4.2 detected",
            FindingSource::ScriptAnalysis,
        )
        .with_identifier("CVE-2012-6708");

        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["kind"], "OutdatedLibrary");
        assert_eq!(json["severity"], "HIGH");
        assert_eq!(json["identifier"], "CVE-2012-6708");
        assert_eq!(json["source"], "scriptAnalysis");
    }
}
