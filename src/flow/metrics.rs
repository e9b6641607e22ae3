//! Flow Metrics & Progress
//!
//! Running per-session aggregates and the progress snapshot returned after
//! every processed response. All figures are recomputed from session state;
//! nothing here owns history of its own.

use serde::{Deserialize, Serialize};

use crate::constants::engagement::*;
use crate::types::{AdaptationRecord, AdaptationType, ResponseRecord};

/// Running per-session aggregates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Running mean of response quality, 0-100
    pub average_response_quality: f32,
    /// Adaptation decisions that triggered a mutation
    pub adaptation_count: u32,
    /// Percentage of answerable questions answered, 0-100
    pub flow_completion_rate: u8,
    /// Derived engagement score, 0-100
    pub user_engagement_score: f32,
}

impl PerformanceMetrics {
    /// Fold one quality score into the running mean.
    ///
    /// `response_count` is the number of responses recorded so far,
    /// including the one being folded in.
    pub fn record_quality(&mut self, quality: u8, response_count: usize) {
        let n = response_count.max(1) as f32;
        self.average_response_quality =
            (self.average_response_quality * (n - 1.0) + quality as f32) / n;
    }

    /// Count one applied adaptation
    pub fn record_adaptation(&mut self) {
        self.adaptation_count += 1;
    }

    /// Recompute the engagement score from the response history and
    /// adaptation log: base 50, up to 30 for response length, 10 for
    /// length consistency, 5 per advance/confident adaptation, capped at 100.
    pub fn update_engagement(
        &mut self,
        responses: &[ResponseRecord],
        adaptations: &[AdaptationRecord],
    ) {
        let lengths: Vec<f32> = responses
            .iter()
            .map(|r| r.text.chars().count() as f32)
            .collect();
        let mean = if lengths.is_empty() {
            0.0
        } else {
            lengths.iter().sum::<f32>() / lengths.len() as f32
        };
        let variance = if lengths.is_empty() {
            0.0
        } else {
            lengths.iter().map(|l| (l - mean).powi(2)).sum::<f32>() / lengths.len() as f32
        };

        let mut score = BASE_SCORE + (mean / LENGTH_DIVISOR).min(LENGTH_CONTRIBUTION_CAP);
        if variance < CONSISTENCY_VARIANCE_LIMIT {
            score += CONSISTENCY_BONUS;
        }
        let positive = adaptations
            .iter()
            .filter(|a| {
                matches!(
                    a.adaptation,
                    AdaptationType::Advance | AdaptationType::Confident
                )
            })
            .count() as f32;
        score += positive * POSITIVE_ADAPTATION_BONUS;

        self.user_engagement_score = score.min(100.0);
    }

    /// Track the latest progress percentage
    pub fn update_completion(&mut self, percentage: u8) {
        self.flow_completion_rate = percentage;
    }
}

/// Progress snapshot over a session's live question list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowProgress {
    /// `round(answered / (total - skipped) * 100)`, 0 when nothing is answerable
    pub percentage: u8,
    /// Questions in the list with a recorded response
    pub answered: usize,
    /// Questions still to ask
    pub remaining: usize,
    /// Questions marked skipped by adaptations
    pub skipped: usize,
    /// Length of the adaptation log
    pub adaptations: usize,
}

// =============================================================================
// Tests
// =============================================================================
