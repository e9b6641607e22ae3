//! Unified Error Type System
//!
//! Centralized error types for the adaptive flow engine.
//!
//! ## Design Principles
//!
//! - Single unified error type (FlowError) for the entire crate
//! - Structured variants with context for better debugging
//! - Scoring and pool-selection paths are total: they degrade to fewer
//!   results instead of erroring
//! - No panic/unwrap - all errors surface to the caller as typed failures

use thiserror::Error;

use super::events::FlowStatus;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, FlowError>;

/// Unified application error
#[derive(Debug, Error)]
pub enum FlowError {
    // -------------------------------------------------------------------------
    // Flow Lifecycle Errors
    // -------------------------------------------------------------------------
    /// A response was submitted against a flow that is not active
    #[error("no active flow to process: flow {flow_id} is {status}")]
    NoActiveFlow { flow_id: String, status: FlowStatus },

    /// The flow id does not match any known session
    #[error("flow not found: {0}")]
    FlowNotFound(String),

    /// The question id was never part of the session's question list
    #[error("unknown question {question_id} in flow {flow_id}")]
    UnknownQuestion {
        flow_id: String,
        question_id: String,
    },

    // -------------------------------------------------------------------------
    // System Errors
    // -------------------------------------------------------------------------
    /// Configuration loading or validation failed
    #[error("configuration error: {0}")]
    Config(String),

    /// Session snapshot store failure
    #[error("session store error: {0}")]
    Store(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlowError {
    /// Whether the caller can retry the same call after fixing its input.
    ///
    /// Lifecycle errors are not recoverable for the failed call: the caller
    /// must start a new flow (`NoActiveFlow`, `FlowNotFound`) or has sent an
    /// id that will never become valid retroactively (`UnknownQuestion`).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FlowError::Store(_) | FlowError::Json(_))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_active_flow_display() {
        let err = FlowError::NoActiveFlow {
            flow_id: "flow-1".into(),
            status: FlowStatus::Completed,
        };
        assert_eq!(
            err.to_string(),
            "no active flow to process: flow flow-1 is completed"
        );
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_unknown_question_display() {
        let err = FlowError::UnknownQuestion {
            flow_id: "flow-1".into(),
            question_id: "q99".into(),
        };
        assert!(err.to_string().contains("q99"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_store_error_recoverable() {
        assert!(FlowError::Store("write failed".into()).is_recoverable());
    }
}
