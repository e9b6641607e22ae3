//! Global Constants
//!
//! Centralized constants for scoring and flow tuning.
//! All magic numbers should be defined here with documentation.

/// Response analysis constants
pub mod analysis {
    /// Length tiers for the quality length bonus (characters)
    pub const LENGTH_TIER_LOW: usize = 50;
    pub const LENGTH_TIER_MID: usize = 100;
    pub const LENGTH_TIER_HIGH: usize = 200;

    /// Quality bonus per length tier
    pub const LENGTH_BONUS_LOW: u32 = 5;
    pub const LENGTH_BONUS_MID: u32 = 10;
    pub const LENGTH_BONUS_HIGH: u32 = 20;

    /// Quality / specificity bonus when the response contains a digit
    pub const NUMERIC_QUALITY_BONUS: u32 = 15;
    pub const NUMERIC_SPECIFICITY_BONUS: u32 = 30;

    /// Quality / specificity bonus when the response contains a percentage
    pub const PERCENT_QUALITY_BONUS: u32 = 10;
    pub const PERCENT_SPECIFICITY_BONUS: u32 = 20;

    /// Quality / evidence bonus per matched evidence keyword
    pub const EVIDENCE_QUALITY_BONUS: u32 = 5;
    pub const EVIDENCE_SCORE_BONUS: u32 = 15;

    /// Keywords that signal evidence-backed answers (substring, case-insensitive)
    pub const EVIDENCE_KEYWORDS: [&str; 6] =
        ["customer", "user", "survey", "interview", "data", "research"];

    /// Quality / clarity bonus for multi-sentence responses
    pub const CLARITY_QUALITY_BONUS: u32 = 10;
    pub const CLARITY_SCORE_BONUS: u32 = 30;

    /// Completeness tiers and the quality bonus each contributes
    pub const COMPLETENESS_HIGH: u32 = 80;
    pub const COMPLETENESS_MID: u32 = 50;
    pub const COMPLETENESS_LOW: u32 = 20;
    pub const COMPLETENESS_HIGH_QUALITY_BONUS: u32 = 20;
    pub const COMPLETENESS_MID_QUALITY_BONUS: u32 = 10;
}

/// Question pool constants
pub mod pool {
    /// Base relevance score before context bonuses
    pub const BASE_RELEVANCE: f32 = 50.0;

    /// Relevance bonus for an industry match
    pub const INDUSTRY_BONUS: f32 = 20.0;

    /// Relevance bonus for a company-stage match
    pub const STAGE_BONUS: f32 = 20.0;

    /// Relevance bonus per tag overlapping the user's problem areas
    pub const TAG_OVERLAP_BONUS: f32 = 10.0;

    /// Weight of relevance in the adaptive priority composite
    pub const RELEVANCE_WEIGHT: f32 = 0.4;

    /// Weight of importance in the adaptive priority composite
    pub const IMPORTANCE_WEIGHT: f32 = 0.4;

    /// Flat priority bonus for required questions
    pub const REQUIRED_BONUS: f32 = 20.0;

    /// Importance assumed when the catalog leaves it unset
    pub const DEFAULT_IMPORTANCE: u8 = 50;

    /// Previous-score average above which a flow starts at advanced difficulty
    pub const ADVANCED_START_SCORE: f32 = 70.0;
}

/// Flow engine constants
pub mod flow {
    /// Questions selected into a new session
    pub const TARGET_QUESTION_COUNT: usize = 10;

    /// Questions surfaced to the caller at flow start
    pub const SURFACED_QUESTION_COUNT: usize = 3;

    /// Quality below this triggers the simplify adaptation
    pub const LOW_QUALITY_THRESHOLD: u8 = 40;

    /// Quality above this triggers the advance adaptation
    pub const HIGH_QUALITY_THRESHOLD: u8 = 85;

    /// Next-batch sizing bands: 1 below NARROW, 5 above WIDE, else 3
    pub const NARROW_BATCH_QUALITY: u8 = 50;
    pub const WIDE_BATCH_QUALITY: u8 = 80;
    pub const NARROW_BATCH: usize = 1;
    pub const DEFAULT_BATCH: usize = 3;
    pub const WIDE_BATCH: usize = 5;

    /// Challenge/advanced questions injected per advance adaptation
    pub const ADVANCE_INSERT_COUNT: usize = 2;

    /// Offset past the cursor where advance insertions land
    pub const ADVANCE_INSERT_OFFSET: usize = 2;

    /// Fraction of the question list trimmed from the tail on re-engagement
    pub const FATIGUE_TRIM_RATIO: f32 = 0.2;
}

/// Behavioral pattern detection constants
pub mod pattern {
    /// Responses required before pattern detection runs
    pub const MIN_RESPONSES: usize = 2;

    /// Mean response length below this marks the struggling pattern
    pub const STRUGGLING_MEAN_LENGTH: f32 = 50.0;

    /// Fraction of numeric responses above this marks the confident pattern
    pub const CONFIDENT_NUMERIC_RATIO: f32 = 0.7;

    /// Fraction of hedged responses above this marks the uncertain pattern
    pub const UNCERTAIN_HEDGE_RATIO: f32 = 0.5;

    /// Hedge words scanned for the uncertain pattern (substring, case-insensitive)
    pub const HEDGE_WORDS: [&str; 5] = ["maybe", "possibly", "might", "could", "unsure"];

    /// Responses required before the engagement check runs
    pub const ENGAGEMENT_WINDOW: usize = 3;
}

/// Engagement score constants
pub mod engagement {
    /// Base engagement score before bonuses
    pub const BASE_SCORE: f32 = 50.0;

    /// Cap on the mean-response-length contribution
    pub const LENGTH_CONTRIBUTION_CAP: f32 = 30.0;

    /// Mean length is divided by this before contributing
    pub const LENGTH_DIVISOR: f32 = 10.0;

    /// Bonus when response lengths are consistent (variance below threshold)
    pub const CONSISTENCY_BONUS: f32 = 10.0;
    pub const CONSISTENCY_VARIANCE_LIMIT: f32 = 1000.0;

    /// Bonus per advance or confident adaptation in the log
    pub const POSITIVE_ADAPTATION_BONUS: f32 = 5.0;
}
