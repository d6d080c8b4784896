// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Vulnerable Library Signatures
 * Static signature database for outdated client-side libraries
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Severity;

/// A parsed `major.minor.patch` library version. Missing components
/// default to zero, so "3.5" compares as 3.5.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        let patch = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        Some(Self::new(major, minor, patch))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// One entry of the vulnerable-library signature database: a name plus
/// version-capture pattern, the version the issue was fixed in, and the
/// severity and reference recorded for the match.
pub struct LibrarySignature {
    pub library: &'static str,
    pattern: Regex,
    pub fixed_in: Version,
    pub severity: Severity,
    pub identifier: Option<&'static str>,
    pub summary: &'static str,
}

impl LibrarySignature {
    fn new(
        library: &'static str,
        pattern: &str,
        fixed_in: Version,
        severity: Severity,
        identifier: Option<&'static str>,
        summary: &'static str,
    ) -> Self {
        Self {
            library,
            pattern: Regex::new(pattern).expect("invalid library signature pattern"),
            fixed_in,
            severity,
            identifier,
            summary,
        }
    }

    /// Extract a library version from a script URL or body. Returns the
    /// matched version only when it falls below the fixed-in bound.
    pub fn match_text(&self, text: &str) -> Option<Version> {
        let captures = self.pattern.captures(text)?;
        let version = Version::parse(captures.get(1)?.as_str())?;
        if version < self.fixed_in {
            Some(version)
        } else {
            None
        }
    }
}

/// Signature database. Static from the engine's perspective; refreshed by
/// shipping a new build. Table order is the rule order of the script
/// analyzer's output.
pub static SIGNATURES: Lazy<Vec<LibrarySignature>> = Lazy::new(|| {
    vec![
        LibrarySignature::new(
            "jquery",
            r"(?i)jquery[\s/._-]?v?(\d+\.\d+(?:\.\d+)?)",
            Version::new(1, 9, 0),
            Severity::High,
            Some("CVE-2012-6708"),
            "jQuery before 1.9.0 allows XSS via location.hash selector injection",
        ),
        LibrarySignature::new(
            "jquery",
            r"(?i)jquery[\s/._-]?v?(\d+\.\d+(?:\.\d+)?)",
            Version::new(3, 5, 0),
            Severity::Medium,
            Some("CVE-2020-11023"),
            "jQuery before 3.5.0 allows XSS when appending HTML containing option elements",
        ),
        LibrarySignature::new(
            "angularjs",
            r"(?i)angular(?:js)?[\s/._-]?v?(\d+\.\d+(?:\.\d+)?)",
            Version::new(1, 8, 0),
            Severity::High,
            Some("CVE-2020-7676"),
            "angular.js before 1.8.0 allows XSS via unsanitized option elements",
        ),
        LibrarySignature::new(
            "lodash",
            r"(?i)lodash[\s/._-]?v?(\d+\.\d+(?:\.\d+)?)",
            Version::new(4, 17, 21),
            Severity::High,
            Some("CVE-2021-23337"),
            "lodash before 4.17.21 allows command injection via the template function",
        ),
        LibrarySignature::new(
            "bootstrap",
            r"(?i)bootstrap[\s/._-]?v?(\d+\.\d+(?:\.\d+)?)",
            Version::new(3, 4, 1),
            Severity::Medium,
            Some("CVE-2018-14041"),
            "Bootstrap before 3.4.1 allows XSS via the data-target attribute",
        ),
        LibrarySignature::new(
            "handlebars",
            r"(?i)handlebars[\s/._-]?v?(\d+\.\d+(?:\.\d+)?)",
            Version::new(4, 7, 7),
            Severity::High,
            Some("CVE-2021-23369"),
            "Handlebars before 4.7.7 allows remote code execution when compiling attacker-controlled templates",
        ),
        LibrarySignature::new(
            "moment",
            r"(?i)moment[\s/._-]?v?(\d+\.\d+(?:\.\d+)?)",
            Version::new(2, 29, 2),
            Severity::Low,
            Some("CVE-2022-24785"),
            "Moment.js before 2.29.2 allows path traversal when parsing a user-provided locale",
        ),
    ]
});
