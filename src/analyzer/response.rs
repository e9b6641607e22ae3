//! Free-Text Response Scoring
//!
//! Converts one answer into a quality/feature profile using additive
//! heuristics:
//! - Length tiers
//! - Quantitative content (digits, percentages)
//! - Evidence keywords
//! - Sentence structure
//!
//! Quality is clamped to 0-100; the per-dimension accumulators are raw sums.

use serde::{Deserialize, Serialize};

use crate::constants::analysis::*;

/// Quality/feature profile of one response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseAnalysis {
    /// Overall quality, 0-100
    pub quality: u8,
    /// Completeness tier (20 / 50 / 80)
    pub completeness: u32,
    /// Quantitative-content accumulator
    pub specificity: u32,
    /// Evidence-keyword accumulator
    pub evidence: u32,
    /// Sentence-structure accumulator
    pub clarity: u32,
    /// Human-readable observations about the response
    pub insights: Vec<String>,
}

/// Stateless heuristic scorer for free-text answers
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseAnalyzer;

impl ResponseAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score one response.
    ///
    /// `question_id` is part of the contract for future per-question scoring
    /// but is not consulted by the current heuristics. Total function: every
    /// input yields a valid analysis, the empty string scores zero quality.
    pub fn analyze(&self, text: &str, _question_id: &str) -> ResponseAnalysis {
        let mut analysis = ResponseAnalysis::default();
        let mut quality: u32 = 0;

        let length = text.chars().count();
        quality += if length > LENGTH_TIER_HIGH {
            LENGTH_BONUS_HIGH
        } else if length > LENGTH_TIER_MID {
            LENGTH_BONUS_MID
        } else if length > LENGTH_TIER_LOW {
            LENGTH_BONUS_LOW
        } else {
            0
        };

        if text.chars().any(|c| c.is_ascii_digit()) {
            quality += NUMERIC_QUALITY_BONUS;
            analysis.specificity += NUMERIC_SPECIFICITY_BONUS;
            analysis.insights.push("Contains quantitative data".to_string());
        }

        if text.contains('%') {
            quality += PERCENT_QUALITY_BONUS;
            analysis.specificity += PERCENT_SPECIFICITY_BONUS;
            analysis.insights.push("Includes percentages".to_string());
        }

        let lower = text.to_lowercase();
        for keyword in EVIDENCE_KEYWORDS {
            if lower.contains(keyword) {
                quality += EVIDENCE_QUALITY_BONUS;
                analysis.evidence += EVIDENCE_SCORE_BONUS;
            }
        }

        let sentences = count_sentences(text);
        if sentences > 1 {
            quality += CLARITY_QUALITY_BONUS;
            analysis.clarity += CLARITY_SCORE_BONUS;
        }

        if length > LENGTH_TIER_MID && sentences > 2 && analysis.specificity > 20 {
            analysis.completeness = COMPLETENESS_HIGH;
            quality += COMPLETENESS_HIGH_QUALITY_BONUS;
        } else if length > LENGTH_TIER_LOW && sentences > 1 {
            analysis.completeness = COMPLETENESS_MID;
            quality += COMPLETENESS_MID_QUALITY_BONUS;
        } else {
            analysis.completeness = COMPLETENESS_LOW;
        }

        analysis.quality = quality.min(100) as u8;
        analysis
    }
}

/// Count non-blank segments after splitting on sentence terminators
fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

// =============================================================================
// Tests
// =============================================================================
