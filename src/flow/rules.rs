//! Adaptation Rules
//!
//! Static policy applied after every response: quality thresholds,
//! behavioral-pattern detectors over the response history, and the
//! engagement check. Checks run in fixed precedence and later checks
//! overwrite earlier decisions, so exactly one decision survives per call.
//!
//! Also holds the stage-keyed clarification frameworks the uncertain-path
//! mutation suggests.

use serde::{Deserialize, Serialize};

use crate::analyzer::ResponseAnalysis;
use crate::constants::{flow, pattern};
use crate::types::{AdaptationType, CompanyStage, ResponseRecord};

/// The single decision surviving a rule evaluation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptationDecision {
    pub adaptation: AdaptationType,
    pub reason: String,
}

impl AdaptationDecision {
    fn new(adaptation: AdaptationType, reason: impl Into<String>) -> Self {
        Self {
            adaptation,
            reason: reason.into(),
        }
    }
}

/// Quality thresholds and pattern-detection policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Quality below this triggers simplify
    pub low_quality_threshold: u8,
    /// Quality above this triggers advance
    pub high_quality_threshold: u8,
    /// Responses required before pattern detection runs
    pub min_pattern_responses: usize,
    /// Mean response length below this marks struggling
    pub struggling_mean_length: f32,
    /// Fraction of numeric responses above this marks confident
    pub confident_numeric_ratio: f32,
    /// Fraction of hedged responses above this marks uncertain
    pub uncertain_hedge_ratio: f32,
    /// Trailing responses inspected by the engagement check
    pub engagement_window: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            low_quality_threshold: flow::LOW_QUALITY_THRESHOLD,
            high_quality_threshold: flow::HIGH_QUALITY_THRESHOLD,
            min_pattern_responses: pattern::MIN_RESPONSES,
            struggling_mean_length: pattern::STRUGGLING_MEAN_LENGTH,
            confident_numeric_ratio: pattern::CONFIDENT_NUMERIC_RATIO,
            uncertain_hedge_ratio: pattern::UNCERTAIN_HEDGE_RATIO,
            engagement_window: pattern::ENGAGEMENT_WINDOW,
        }
    }
}

impl RuleSet {
    /// Evaluate all checks in precedence order and return the surviving
    /// decision, or `None` when no rule fired.
    ///
    /// Precedence: quality thresholds, then behavioral patterns, then the
    /// engagement check. A later match replaces the earlier decision.
    pub fn decide(
        &self,
        analysis: &ResponseAnalysis,
        responses: &[ResponseRecord],
    ) -> Option<AdaptationDecision> {
        let mut decision = self.quality_decision(analysis);

        if let Some(found) = self.pattern_decision(responses) {
            decision = Some(found);
        }

        if self.engagement_declining(responses) {
            decision = Some(AdaptationDecision::new(
                AdaptationType::Reengage,
                "Declining engagement detected",
            ));
        }

        decision
    }

    /// How many upcoming questions to surface after this response
    pub fn next_batch_size(&self, quality: u8) -> usize {
        if quality < flow::NARROW_BATCH_QUALITY {
            flow::NARROW_BATCH
        } else if quality > flow::WIDE_BATCH_QUALITY {
            flow::WIDE_BATCH
        } else {
            flow::DEFAULT_BATCH
        }
    }

    fn quality_decision(&self, analysis: &ResponseAnalysis) -> Option<AdaptationDecision> {
        if analysis.quality < self.low_quality_threshold {
            Some(AdaptationDecision::new(
                AdaptationType::Simplify,
                "Low response quality detected",
            ))
        } else if analysis.quality > self.high_quality_threshold {
            Some(AdaptationDecision::new(
                AdaptationType::Advance,
                "High response quality - advancing difficulty",
            ))
        } else {
            None
        }
    }

    /// First matching behavioral pattern over the whole response history,
    /// checked in struggling / confident / uncertain order
    fn pattern_decision(&self, responses: &[ResponseRecord]) -> Option<AdaptationDecision> {
        if responses.len() < self.min_pattern_responses {
            return None;
        }
        let total = responses.len() as f32;

        let mean_length = responses
            .iter()
            .map(|r| r.text.chars().count() as f32)
            .sum::<f32>()
            / total;
        if mean_length < self.struggling_mean_length {
            return Some(AdaptationDecision::new(
                AdaptationType::Struggling,
                "struggling pattern detected",
            ));
        }

        let numeric = responses
            .iter()
            .filter(|r| r.text.chars().any(|c| c.is_ascii_digit()))
            .count() as f32;
        if numeric / total > self.confident_numeric_ratio {
            return Some(AdaptationDecision::new(
                AdaptationType::Confident,
                "confident pattern detected",
            ));
        }

        let hedged = responses
            .iter()
            .filter(|r| {
                let lower = r.text.to_lowercase();
                pattern::HEDGE_WORDS.iter().any(|word| lower.contains(word))
            })
            .count() as f32;
        if hedged / total > self.uncertain_hedge_ratio {
            return Some(AdaptationDecision::new(
                AdaptationType::Uncertain,
                "uncertain pattern detected",
            ));
        }

        None
    }

    /// Strictly monotonically decreasing lengths over the trailing window
    fn engagement_declining(&self, responses: &[ResponseRecord]) -> bool {
        if responses.len() < self.engagement_window {
            return false;
        }
        let tail = &responses[responses.len() - self.engagement_window..];
        tail.windows(2)
            .all(|w| w[0].text.chars().count() > w[1].text.chars().count())
    }
}

// =============================================================================
// Clarification Frameworks
// =============================================================================

/// A named multi-step framework suggested when the user's path is unclear
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    pub name: String,
    pub steps: Vec<String>,
}

/// Stage-keyed framework selection: growth stages get a prioritization
/// framework, everything else gets the discovery default
pub fn framework_for_stage(stage: CompanyStage) -> Framework {
    if stage.is_growth() {
        Framework {
            name: "Growth Lever Prioritization".to_string(),
            steps: vec![
                "List the levers currently driving acquisition, retention, and expansion".to_string(),
                "Estimate the impact and confidence of each lever with real numbers".to_string(),
                "Rank levers by impact x confidence over effort".to_string(),
                "Commit the next quarter to the top two levers".to_string(),
            ],
        }
    } else {
        Framework {
            name: "Customer Problem Discovery".to_string(),
            steps: vec![
                "Name who experiences the problem most acutely".to_string(),
                "Interview 5-10 of them about their current workaround".to_string(),
                "Quantify how often the problem occurs and what it costs".to_string(),
                "Rank the problems you heard by severity and frequency".to_string(),
            ],
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
