//! Flow Events
//!
//! Records of what happened inside a flow session: submitted responses,
//! adaptation decisions, and the structured change records each mutation
//! emits. Everything here is serializable so a session snapshot is a plain
//! data capture.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a flow session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    #[default]
    Active,
    Completed,
    Abandoned,
}

impl FlowStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FlowStatus::Active)
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStatus::Active => write!(f, "active"),
            FlowStatus::Completed => write!(f, "completed"),
            FlowStatus::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// The closed set of adaptation types
///
/// Replaces a string-keyed dispatch table with one enum so dispatch is a
/// `match` with compile-time exhaustiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdaptationType {
    /// Low-quality answer: swap in easier questions, attach hints/examples
    Simplify,
    /// High-quality answer: inject advanced questions, skip beginner ones
    Advance,
    /// Short-answer pattern: insert scaffolding, attach templates
    Struggling,
    /// Numeric-answer pattern: append challenges, require evidence
    Confident,
    /// Hedged-answer pattern: insert clarifications, suggest a framework
    Uncertain,
    /// Declining engagement: swap in interactive questions, trim the tail
    Reengage,
}

impl fmt::Display for AdaptationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdaptationType::Simplify => write!(f, "simplify"),
            AdaptationType::Advance => write!(f, "advance"),
            AdaptationType::Struggling => write!(f, "struggling"),
            AdaptationType::Confident => write!(f, "confident"),
            AdaptationType::Uncertain => write!(f, "uncertain"),
            AdaptationType::Reengage => write!(f, "reengage"),
        }
    }
}

/// One submitted answer
///
/// Stored in a `Vec`, never a hash map: pattern and engagement detection
/// depend on the temporal order of submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Id of the question this answers
    pub question_id: String,
    /// Raw response text
    pub text: String,
    /// Quality score assigned at submission time, 0-100
    pub quality: u8,
    /// When the response was recorded
    pub submitted_at: DateTime<Utc>,
}

/// One structured change emitted by a mutation operation
///
/// Serializes with an `action` tag so the display layer can render each
/// change without string parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FlowChange {
    /// An upcoming question was replaced in place
    Replaced {
        position: usize,
        old_question_id: String,
        new_question_id: String,
        reason: String,
    },
    /// A generated question was inserted at a position
    Inserted {
        position: usize,
        question_id: String,
        reason: String,
    },
    /// A generated question was appended to the end of the list
    Appended {
        question_id: String,
        reason: String,
    },
    /// A question was marked skipped (stays in the list, never surfaced)
    Skipped {
        question_id: String,
        reason: String,
    },
    /// A hint was attached to a question
    HintAttached {
        question_id: String,
        reason: String,
    },
    /// Worked examples were attached to a question
    ExamplesAttached {
        question_id: String,
        count: usize,
        reason: String,
    },
    /// An answer template was attached to a question
    TemplateAttached {
        question_id: String,
        reason: String,
    },
    /// An evidence requirement was set on a validation question
    ValidationRequired {
        question_id: String,
        requirement: String,
        reason: String,
    },
    /// A named multi-step framework was suggested to the user
    FrameworkSuggested {
        name: String,
        steps: Vec<String>,
        reason: String,
    },
    /// A motivational message was emitted
    Motivation {
        message: String,
        reason: String,
    },
    /// Questions were removed from the tail of the list
    TailTrimmed {
        removed: usize,
        reason: String,
    },
}

/// One entry in a session's adaptation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationRecord {
    /// When the adaptation was applied
    pub timestamp: DateTime<Utc>,
    /// The question whose response triggered it
    pub question_id: String,
    /// Which adaptation fired
    pub adaptation: AdaptationType,
    /// Human-readable trigger reason
    pub reason: String,
    /// Structured changes the mutation performed
    pub changes: Vec<FlowChange>,
}

// =============================================================================
// Tests
// =============================================================================
