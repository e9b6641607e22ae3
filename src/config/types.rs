//! Configuration Types
//!
//! All configuration structures with sensible defaults. The defaults mirror
//! `crate::constants`; files and environment variables only need to name
//! what they change.

use serde::{Deserialize, Serialize};

use crate::constants::flow;
use crate::flow::rules::RuleSet;
use crate::types::{FlowError, Result};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Configuration version
    pub version: String,

    /// Initial question selection settings
    pub selection: SelectionConfig,

    /// Adaptation thresholds and pattern-detection policy
    pub rules: RuleSet,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            selection: SelectionConfig::default(),
            rules: RuleSet::default(),
        }
    }
}

impl FlowConfig {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `FlowError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.selection.target_question_count == 0 {
            return Err(FlowError::Config(
                "selection.target_question_count must be greater than 0".to_string(),
            ));
        }
        if self.selection.surfaced_question_count == 0
            || self.selection.surfaced_question_count > self.selection.target_question_count
        {
            return Err(FlowError::Config(format!(
                "selection.surfaced_question_count must be between 1 and {}, got {}",
                self.selection.target_question_count, self.selection.surfaced_question_count
            )));
        }
        if self.rules.low_quality_threshold >= self.rules.high_quality_threshold {
            return Err(FlowError::Config(format!(
                "rules.low_quality_threshold ({}) must be below high_quality_threshold ({})",
                self.rules.low_quality_threshold, self.rules.high_quality_threshold
            )));
        }
        if self.rules.high_quality_threshold > 100 {
            return Err(FlowError::Config(
                "rules.high_quality_threshold must be at most 100".to_string(),
            ));
        }
        for (name, ratio) in [
            ("confident_numeric_ratio", self.rules.confident_numeric_ratio),
            ("uncertain_hedge_ratio", self.rules.uncertain_hedge_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(FlowError::Config(format!(
                    "rules.{name} must be between 0.0 and 1.0, got {ratio}"
                )));
            }
        }
        if self.rules.min_pattern_responses < 2 {
            return Err(FlowError::Config(
                "rules.min_pattern_responses must be at least 2".to_string(),
            ));
        }
        if self.rules.engagement_window < 2 {
            return Err(FlowError::Config(
                "rules.engagement_window must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Selection Configuration
// =============================================================================

/// How many questions a new flow selects and surfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Questions selected into the session at flow start
    pub target_question_count: usize,
    /// Leading slice of the selection returned to the caller
    pub surfaced_question_count: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            target_question_count: flow::TARGET_QUESTION_COUNT,
            surfaced_question_count: flow::SURFACED_QUESTION_COUNT,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
