//! Session Snapshots
//!
//! A snapshot is a plain serializable capture of one [`FlowSession`],
//! opaque to the store that holds it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flow::FlowSession;
use crate::types::Result;

/// Serializable capture of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// When the capture was taken
    pub captured_at: DateTime<Utc>,
    /// The full session state
    pub session: FlowSession,
}

impl SessionSnapshot {
    /// Capture a session as it is right now
    pub fn capture(session: FlowSession) -> Self {
        Self {
            captured_at: Utc::now(),
            session,
        }
    }

    /// The flow id this snapshot belongs to
    pub fn flow_id(&self) -> &str {
        &self.session.id
    }

    /// Serialize to JSON for stores that persist raw bytes
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON produced by [`Self::to_json`]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::QuestionPool;
    use crate::types::{CompanyStage, Difficulty, Question, QuestionType, UserContext};

    fn session() -> FlowSession {
        let questions = vec![Question::new(
            "q0",
            "What problem do you solve?",
            QuestionType::Diagnostic,
            Difficulty::Beginner,
        )];
        let mut session = FlowSession::new(
            "flow-json",
            "sub-1",
            UserContext::new("b2b-saas", CompanyStage::Seed),
            questions,
            QuestionPool::default(),
        );
        session.record_response("q0", "We fix slow deploy pipelines for small teams.", 45);
        session
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let snapshot = SessionSnapshot::capture(session());
        let json = snapshot.to_json().unwrap();
        let back = SessionSnapshot::from_json(&json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(back.flow_id(), "flow-json");
        assert_eq!(back.session.responses.len(), 1);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(SessionSnapshot::from_json("not json").is_err());
    }
}
