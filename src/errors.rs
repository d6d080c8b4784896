// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Engine Error Types
 * Error taxonomy for the page scanning engine
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::time::Duration;
use thiserror::Error;

/// Terminal errors surfaced to the engine caller.
///
/// Transient per-source failures are never represented here; they are
/// recovered inside the analyzers and only degrade the finding set.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed URL or missing required input field. Fails fast, no
    /// partial result.
    #[error("Invalid scan input: {0}")]
    InputInvalid(String),

    /// Unrecoverable condition in a sub-call. Single terminal error, no
    /// partial score is returned.
    #[error("Scan failed: {0}")]
    ScanFailed(String),
}

/// Classified failure of an external source (script fetch, reputation
/// lookup, CVE enrichment). Recovered locally: the affected sub-signal is
/// omitted and the failure is logged, never surfaced to the caller.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Whether the failure is transient and a retry could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Timeout { .. } => true,
            SourceError::Connection { .. } => true,
            SourceError::Status { status, .. } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            SourceError::MalformedResponse { .. } => false,
            SourceError::Unavailable(_) => false,
        }
    }

    /// Classify a reqwest error against the URL it was issued for.
    pub fn from_reqwest(url: &str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else if err.is_connect() {
            SourceError::Connection {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }
        } else if err.is_body() || err.is_decode() {
            SourceError::MalformedResponse {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            SourceError::Unavailable(err.to_string())
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
