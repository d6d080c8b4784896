// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Security Scorer
 * Severity-weighted page score over the aggregated finding list
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::config::SeverityWeights;
use crate::types::Finding;

pub const BASE_SCORE: u32 = 100;

/// Applies the configured severity weights to an aggregated finding list.
pub struct SecurityScorer {
    weights: SeverityWeights,
}

impl SecurityScorer {
    pub fn new(weights: SeverityWeights) -> Self {
        Self { weights }
    }

    /// Compute the page score: start at 100, deduct the severity weight of
    /// every finding, deduct the behavior penalty exactly once, clamp to
    /// [0, 100]. Deductions are non-negative so only the floor matters.
    pub fn score(&self, findings: &[Finding], behavior_penalty: u32) -> u8 {
        let mut deduction = behavior_penalty;
        for finding in findings {
            deduction = deduction.saturating_add(self.weights.weight_for(finding.severity));
        }
        BASE_SCORE.saturating_sub(deduction) as u8
    }
}
