//! Flow Session
//!
//! The mutable aggregate for one user's assessment run: the live question
//! list, the ordered response history, the adaptation log, and the cursor.
//! Sessions are independently owned - no container is shared between
//! sessions, so multiple flows can run side by side in one engine.
//!
//! Invariants:
//! - `current_question_index` is a valid index or equal to the list length
//! - `responses` preserves submission order (pattern detection depends on it)
//! - every response's question id was present in the list at some point

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::metrics::{FlowProgress, PerformanceMetrics};
use super::pool::QuestionPool;
use crate::types::{AdaptationRecord, FlowStatus, Question, ResponseRecord, UserContext};

/// One user's in-flight assessment session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSession {
    /// Unique session id
    pub id: String,
    /// The worksheet subcomponent this flow assesses
    pub subcomponent_id: String,
    /// Caller-supplied context, immutable for the flow's lifetime
    pub user_context: UserContext,
    /// When the flow started
    pub start_time: DateTime<Utc>,
    /// The authoritative, live question sequence
    pub questions: Vec<Question>,
    /// Responses in submission order
    pub responses: Vec<ResponseRecord>,
    /// Ordered adaptation log
    pub adaptations: Vec<AdaptationRecord>,
    /// Index of the question currently being answered
    pub current_question_index: usize,
    /// Lifecycle state
    pub status: FlowStatus,
    /// Candidate-question pool for this flow
    pub pool: QuestionPool,
    /// Running aggregates for this flow
    pub metrics: PerformanceMetrics,
    /// Every question id ever present in `questions`
    known_question_ids: HashSet<String>,
}

impl FlowSession {
    /// Create an active session over an initial question list
    pub fn new(
        id: impl Into<String>,
        subcomponent_id: impl Into<String>,
        user_context: UserContext,
        questions: Vec<Question>,
        pool: QuestionPool,
    ) -> Self {
        let known_question_ids = questions.iter().map(|q| q.id.clone()).collect();
        Self {
            id: id.into(),
            subcomponent_id: subcomponent_id.into(),
            user_context,
            start_time: Utc::now(),
            questions,
            responses: Vec::new(),
            adaptations: Vec::new(),
            current_question_index: 0,
            status: FlowStatus::Active,
            pool,
            metrics: PerformanceMetrics::default(),
            known_question_ids,
        }
    }

    /// Whether an id was ever part of this session's question list
    pub fn knows_question(&self, question_id: &str) -> bool {
        self.known_question_ids.contains(question_id)
    }

    /// Register a question id joining the list via adaptation
    pub fn register_question(&mut self, question_id: impl Into<String>) {
        self.known_question_ids.insert(question_id.into());
    }

    /// Record a response, overwriting in place on resubmission so the
    /// original submission order is preserved. Returns true when the
    /// response is new (not a resubmission).
    pub fn record_response(&mut self, question_id: &str, text: &str, quality: u8) -> bool {
        let record = ResponseRecord {
            question_id: question_id.to_string(),
            text: text.to_string(),
            quality,
            submitted_at: Utc::now(),
        };
        match self
            .responses
            .iter_mut()
            .find(|r| r.question_id == question_id)
        {
            Some(existing) => {
                *existing = record;
                false
            }
            None => {
                self.responses.push(record);
                true
            }
        }
    }

    /// Questions after the cursor, in order
    pub fn upcoming(&self) -> &[Question] {
        let from = (self.current_question_index + 1).min(self.questions.len());
        &self.questions[from..]
    }

    /// The next `batch` unskipped questions from the cursor onward
    pub fn next_questions(&self, batch: usize) -> Vec<Question> {
        let from = self.current_question_index.min(self.questions.len());
        self.questions[from..]
            .iter()
            .filter(|q| !self.pool.is_skipped(&q.id))
            .take(batch)
            .cloned()
            .collect()
    }

    /// True when no unskipped, unanswered question remains at or after the
    /// cursor
    pub fn is_exhausted(&self) -> bool {
        let from = self.current_question_index.min(self.questions.len());
        !self.questions[from..].iter().any(|q| {
            !self.pool.is_skipped(&q.id) && !self.responses.iter().any(|r| r.question_id == q.id)
        })
    }

    /// Move the cursor past the question just answered
    pub fn advance_cursor(&mut self) {
        if self.current_question_index < self.questions.len() {
            self.current_question_index += 1;
        }
    }

    /// Restore the cursor invariant after a tail truncation
    pub fn clamp_cursor(&mut self) {
        self.current_question_index = self.current_question_index.min(self.questions.len());
    }

    /// Recompute the engagement score from the current history
    pub fn refresh_engagement(&mut self) {
        self.metrics
            .update_engagement(&self.responses, &self.adaptations);
    }

    /// Progress snapshot. Answered and skipped are counted against ids
    /// currently in the list, so `answered + remaining + skipped == total`
    /// holds even after a tail truncation removed an answered question.
    pub fn progress(&self) -> FlowProgress {
        let total = self.questions.len();
        let answered = self
            .questions
            .iter()
            .filter(|q| self.responses.iter().any(|r| r.question_id == q.id))
            .count();
        let skipped = self
            .questions
            .iter()
            .filter(|q| {
                self.pool.is_skipped(&q.id)
                    && !self.responses.iter().any(|r| r.question_id == q.id)
            })
            .count();
        let answerable = total - skipped;
        let percentage = if answerable == 0 {
            0
        } else {
            (answered as f32 / answerable as f32 * 100.0).round() as u8
        };
        FlowProgress {
            percentage,
            answered,
            remaining: total - answered - skipped,
            skipped,
            adaptations: self.adaptations.len(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
