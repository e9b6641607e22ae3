//! Adaptive Flow Engine
//!
//! Orchestrator for adaptive assessment sessions. Owns a registry of
//! independent [`FlowSession`]s keyed by flow id, scores responses through
//! the [`ResponseAnalyzer`], applies the [`RuleSet`] to decide adaptations,
//! performs the corresponding mutations, and reports next questions plus
//! progress after every call.
//!
//! All logic is synchronous in-memory computation; persistence lives behind
//! the [`crate::storage::SessionStore`] boundary.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::mutations;
use super::pool::QuestionPool;
use super::rules::RuleSet;
use super::session::FlowSession;
use crate::analyzer::{ResponseAnalysis, ResponseAnalyzer};
use crate::config::FlowConfig;
use crate::flow::metrics::{FlowProgress, PerformanceMetrics};
use crate::storage::SessionSnapshot;
use crate::types::{
    AdaptationRecord, AdaptationType, CompanyStage, FlowChange, FlowError, FlowStatus, Question,
    Result, UserContext,
};

/// Result of starting a flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowStart {
    pub flow_id: String,
    /// The surfaced slice of the selected list (the rest stays internal)
    pub questions: Vec<Question>,
    pub adaptive_mode: bool,
}

/// Result of processing one response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseOutcome {
    pub analysis: ResponseAnalysis,
    /// Whether an adaptation fired on this call
    pub adapted: bool,
    pub adaptation: Option<AdaptationType>,
    /// Structured changes the mutation performed, empty when not adapted
    pub changes: Vec<FlowChange>,
    /// Upcoming unskipped questions, sized by response quality
    pub next_questions: Vec<Question>,
    pub progress: FlowProgress,
    pub metrics: PerformanceMetrics,
    /// Session status after this call (flows auto-complete on exhaustion)
    pub status: FlowStatus,
}

/// Audit-trail record of a started flow; not consulted by flow logic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowHistoryEntry {
    pub flow_id: String,
    pub subcomponent_id: String,
    pub started_at: DateTime<Utc>,
    pub industry: String,
    pub company_stage: CompanyStage,
}

/// Orchestrator owning the session registry
pub struct AdaptiveFlowEngine {
    sessions: DashMap<String, FlowSession>,
    analyzer: ResponseAnalyzer,
    rules: RuleSet,
    target_question_count: usize,
    surfaced_question_count: usize,
    history: RwLock<Vec<FlowHistoryEntry>>,
}

impl Default for AdaptiveFlowEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveFlowEngine {
    /// Engine with default policy
    pub fn new() -> Self {
        Self::with_config(FlowConfig::default())
    }

    /// Engine with caller-supplied policy
    pub fn with_config(config: FlowConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            analyzer: ResponseAnalyzer::new(),
            rules: config.rules,
            target_question_count: config.selection.target_question_count,
            surfaced_question_count: config.selection.surfaced_question_count,
            history: RwLock::new(Vec::new()),
        }
    }

    /// Start a new adaptive flow over a question catalog.
    ///
    /// Builds the pool, selects the initial question list, and returns the
    /// surfaced slice; the full list stays in the session.
    pub fn start_flow(
        &self,
        subcomponent_id: &str,
        user_context: UserContext,
        catalog: Vec<Question>,
    ) -> Result<FlowStart> {
        let flow_id = format!("flow-{}", Uuid::new_v4());
        let mut pool = QuestionPool::build(catalog, &user_context);
        let questions = pool.select_initial(&user_context, self.target_question_count);

        info!(
            flow_id = %flow_id,
            subcomponent = subcomponent_id,
            stage = %user_context.company_stage,
            selected = questions.len(),
            "starting adaptive flow"
        );

        let surfaced: Vec<Question> = questions
            .iter()
            .take(self.surfaced_question_count)
            .cloned()
            .collect();
        let session = FlowSession::new(
            flow_id.clone(),
            subcomponent_id,
            user_context.clone(),
            questions,
            pool,
        );

        self.push_history(FlowHistoryEntry {
            flow_id: flow_id.clone(),
            subcomponent_id: subcomponent_id.to_string(),
            started_at: session.start_time,
            industry: user_context.industry,
            company_stage: user_context.company_stage,
        });
        self.sessions.insert(flow_id.clone(), session);

        Ok(FlowStart {
            flow_id,
            questions: surfaced,
            adaptive_mode: true,
        })
    }

    /// Record a response, score it, adapt the question list if a rule fires,
    /// and return the next batch plus updated progress and metrics.
    pub fn process_response(
        &self,
        flow_id: &str,
        question_id: &str,
        response: &str,
    ) -> Result<ResponseOutcome> {
        let mut session = self
            .sessions
            .get_mut(flow_id)
            .ok_or_else(|| FlowError::FlowNotFound(flow_id.to_string()))?;
        if session.status != FlowStatus::Active {
            return Err(FlowError::NoActiveFlow {
                flow_id: flow_id.to_string(),
                status: session.status,
            });
        }
        if !session.knows_question(question_id) {
            return Err(FlowError::UnknownQuestion {
                flow_id: flow_id.to_string(),
                question_id: question_id.to_string(),
            });
        }

        let analysis = self.analyzer.analyze(response, question_id);
        let newly_answered = session.record_response(question_id, response, analysis.quality);

        let decision = self.rules.decide(&analysis, &session.responses);
        let (adapted, adaptation, changes) = match decision {
            Some(decision) => {
                debug!(
                    flow_id = %flow_id,
                    adaptation = %decision.adaptation,
                    reason = %decision.reason,
                    "adaptation triggered"
                );
                let changes = mutations::apply(&mut session, decision.adaptation);
                session.adaptations.push(AdaptationRecord {
                    timestamp: Utc::now(),
                    question_id: question_id.to_string(),
                    adaptation: decision.adaptation,
                    reason: decision.reason,
                    changes: changes.clone(),
                });
                session.metrics.record_adaptation();
                (true, Some(decision.adaptation), changes)
            }
            None => (false, None, Vec::new()),
        };

        let response_count = session.responses.len();
        session
            .metrics
            .record_quality(analysis.quality, response_count);
        session.refresh_engagement();

        if newly_answered {
            session.advance_cursor();
        }

        let next_questions = session.next_questions(self.rules.next_batch_size(analysis.quality));
        if session.is_exhausted() {
            session.status = FlowStatus::Completed;
            info!(flow_id = %flow_id, "flow completed");
        }

        let progress = session.progress();
        session.metrics.update_completion(progress.percentage);

        Ok(ResponseOutcome {
            analysis,
            adapted,
            adaptation,
            changes,
            next_questions,
            progress,
            metrics: session.metrics.clone(),
            status: session.status,
        })
    }

    /// Progress snapshot for one flow
    pub fn progress(&self, flow_id: &str) -> Result<FlowProgress> {
        let session = self
            .sessions
            .get(flow_id)
            .ok_or_else(|| FlowError::FlowNotFound(flow_id.to_string()))?;
        Ok(session.progress())
    }

    /// Lifecycle state of one flow
    pub fn status(&self, flow_id: &str) -> Result<FlowStatus> {
        let session = self
            .sessions
            .get(flow_id)
            .ok_or_else(|| FlowError::FlowNotFound(flow_id.to_string()))?;
        Ok(session.status)
    }

    /// Mark a flow completed by caller decision
    pub fn complete_flow(&self, flow_id: &str) -> Result<()> {
        self.terminate(flow_id, FlowStatus::Completed)
    }

    /// Mark a flow abandoned
    pub fn abandon_flow(&self, flow_id: &str) -> Result<()> {
        self.terminate(flow_id, FlowStatus::Abandoned)
    }

    /// Serializable capture of one session for the persistence collaborator
    pub fn snapshot(&self, flow_id: &str) -> Result<SessionSnapshot> {
        let session = self
            .sessions
            .get(flow_id)
            .ok_or_else(|| FlowError::FlowNotFound(flow_id.to_string()))?;
        Ok(SessionSnapshot::capture(session.value().clone()))
    }

    /// Re-register a session from a snapshot (e.g. after a process restart)
    pub fn restore(&self, snapshot: SessionSnapshot) {
        self.sessions
            .insert(snapshot.session.id.clone(), snapshot.session);
    }

    /// Audit trail of started flows
    pub fn history(&self) -> Vec<FlowHistoryEntry> {
        self.history
            .read()
            .unwrap_or_else(|poisoned| {
                tracing::error!("flow history RwLock poisoned, recovering");
                poisoned.into_inner()
            })
            .clone()
    }

    fn terminate(&self, flow_id: &str, status: FlowStatus) -> Result<()> {
        let mut session = self
            .sessions
            .get_mut(flow_id)
            .ok_or_else(|| FlowError::FlowNotFound(flow_id.to_string()))?;
        if session.status != FlowStatus::Active {
            return Err(FlowError::NoActiveFlow {
                flow_id: flow_id.to_string(),
                status: session.status,
            });
        }
        session.status = status;
        info!(flow_id = %flow_id, status = %status, "flow terminated");
        Ok(())
    }

    fn push_history(&self, entry: FlowHistoryEntry) {
        self.history
            .write()
            .unwrap_or_else(|poisoned| {
                tracing::error!("flow history RwLock poisoned, recovering");
                poisoned.into_inner()
            })
            .push(entry);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;
    use crate::types::QuestionType;
    use std::sync::Once;

    /// Route engine tracing through the test writer; `RUST_LOG` overrides
    /// the default filter
    fn init_test_logging() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scaleflow=debug")),
                )
                .with_test_writer()
                .try_init();
        });
    }

    /// 20 questions covering all 5 types at beginner/intermediate difficulty
    fn catalog() -> Vec<Question> {
        let mut questions = Vec::new();
        for kind in QuestionType::ALL {
            for i in 0..2 {
                questions.push(Question::new(
                    format!("{kind}-b{i}"),
                    format!("{kind} beginner question {i}"),
                    kind,
                    Difficulty::Beginner,
                ));
                questions.push(Question::new(
                    format!("{kind}-i{i}"),
                    format!("{kind} intermediate question {i}"),
                    kind,
                    Difficulty::Intermediate,
                ));
            }
        }
        questions
    }

    fn pre_seed() -> UserContext {
        UserContext::new("b2b-saas", CompanyStage::PreSeed)
    }

    /// Scores 60: length and evidence bonuses, no digits, no hedge words,
    /// so neither the thresholds nor the patterns fire on it
    const NEUTRAL: &str = "We meet one customer every week and each user interview gets \
                           written up the same afternoon. The notes go into a shared research \
                           doc that the whole team reads. Product changes only happen after \
                           we see the same theme in several conversations.";

    #[test]
    fn test_start_flow_surfaces_three_of_ten() {
        init_test_logging();
        let engine = AdaptiveFlowEngine::new();
        let start = engine.start_flow("sub-1", pre_seed(), catalog()).unwrap();
        assert!(start.adaptive_mode);
        assert_eq!(start.questions.len(), 3);
        let progress = engine.progress(&start.flow_id).unwrap();
        assert_eq!(
            progress.answered + progress.remaining + progress.skipped,
            10
        );
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.history()[0].flow_id, start.flow_id);
    }

    #[test]
    fn test_flow_ids_are_unique() {
        let engine = AdaptiveFlowEngine::new();
        let a = engine.start_flow("sub-1", pre_seed(), catalog()).unwrap();
        let b = engine.start_flow("sub-1", pre_seed(), catalog()).unwrap();
        assert_ne!(a.flow_id, b.flow_id);
        // Sessions are independent aggregates
        engine.process_response(&a.flow_id, &a.questions[0].id, NEUTRAL).unwrap();
        assert_eq!(engine.progress(&a.flow_id).unwrap().answered, 1);
        assert_eq!(engine.progress(&b.flow_id).unwrap().answered, 0);
    }

    #[test]
    fn test_process_response_unknown_flow() {
        let engine = AdaptiveFlowEngine::new();
        let err = engine.process_response("flow-missing", "q1", "answer").unwrap_err();
        assert!(matches!(err, FlowError::FlowNotFound(_)));
    }

    #[test]
    fn test_process_response_unknown_question_is_rejected() {
        let engine = AdaptiveFlowEngine::new();
        let start = engine.start_flow("sub-1", pre_seed(), catalog()).unwrap();
        let err = engine
            .process_response(&start.flow_id, "never-selected", "answer")
            .unwrap_err();
        assert!(matches!(err, FlowError::UnknownQuestion { .. }));
        // No state mutation happened
        assert_eq!(engine.progress(&start.flow_id).unwrap().answered, 0);
    }

    #[test]
    fn test_neutral_first_response_does_not_adapt() {
        let engine = AdaptiveFlowEngine::new();
        let start = engine.start_flow("sub-1", pre_seed(), catalog()).unwrap();
        let outcome = engine
            .process_response(&start.flow_id, &start.questions[0].id, NEUTRAL)
            .unwrap();
        assert!((40..=85).contains(&outcome.analysis.quality));
        assert!(!outcome.adapted);
        assert_eq!(outcome.adaptation, None);
        assert!(outcome.changes.is_empty());
        assert_eq!(outcome.metrics.adaptation_count, 0);
    }

    #[test]
    fn test_low_quality_response_simplifies() {
        init_test_logging();
        let engine = AdaptiveFlowEngine::new();
        let start = engine.start_flow("sub-1", pre_seed(), catalog()).unwrap();
        let outcome = engine
            .process_response(&start.flow_id, &start.questions[0].id, "Yes.")
            .unwrap();
        assert!(outcome.adapted);
        assert_eq!(outcome.adaptation, Some(AdaptationType::Simplify));
        assert_eq!(outcome.metrics.adaptation_count, 1);
        // Quality 0 narrows the next batch to 1
        assert_eq!(outcome.next_questions.len(), 1);
        // Upcoming questions got annotated
        assert!(outcome.next_questions[0].hint.is_some());
    }

    #[test]
    fn test_declining_engagement_reengages_and_trims() {
        let engine = AdaptiveFlowEngine::new();
        let start = engine.start_flow("sub-1", pre_seed(), catalog()).unwrap();
        let total_before = {
            let progress = engine.progress(&start.flow_id).unwrap();
            progress.answered + progress.remaining + progress.skipped
        };
        assert_eq!(total_before, 10);

        // Lengths 200 / 100 / 40, no digits, no evidence keywords
        let long = "so ".repeat(66) + "aa";
        let mid = "so ".repeat(33) + "a";
        let short = "so so so so so so so so so so so so so s";
        assert_eq!(long.chars().count(), 200);
        assert_eq!(mid.chars().count(), 100);
        assert_eq!(short.chars().count(), 40);

        let q1 = &start.questions[0].id;
        let q2 = &start.questions[1].id;
        let q3 = &start.questions[2].id;
        engine.process_response(&start.flow_id, q1, &long).unwrap();
        engine.process_response(&start.flow_id, q2, &mid).unwrap();
        let outcome = engine.process_response(&start.flow_id, q3, &short).unwrap();

        assert_eq!(outcome.adaptation, Some(AdaptationType::Reengage));
        let total_after = outcome.progress.answered
            + outcome.progress.remaining
            + outcome.progress.skipped;
        // floor(0.2 * 10) = 2 questions trimmed from the tail
        assert_eq!(total_after, 8);
        assert!(outcome
            .changes
            .iter()
            .any(|c| matches!(c, FlowChange::TailTrimmed { removed: 2, .. })));
    }

    #[test]
    fn test_flow_completes_when_questions_exhausted() {
        let engine = AdaptiveFlowEngine::new();
        // Tiny catalog: the flow only has a few questions
        let small: Vec<Question> = (0..2)
            .map(|i| {
                Question::new(
                    format!("q{i}"),
                    format!("question {i}"),
                    QuestionType::Diagnostic,
                    Difficulty::Beginner,
                )
            })
            .collect();
        let start = engine.start_flow("sub-1", pre_seed(), small).unwrap();

        let first = engine
            .process_response(&start.flow_id, "q0", NEUTRAL)
            .unwrap();
        assert_eq!(first.status, FlowStatus::Active);
        let next_id = first.next_questions[0].id.clone();
        let second = engine
            .process_response(&start.flow_id, &next_id, NEUTRAL)
            .unwrap();
        assert_eq!(second.status, FlowStatus::Completed);

        // Further processing fails with NoActiveFlow
        let err = engine
            .process_response(&start.flow_id, "q0", NEUTRAL)
            .unwrap_err();
        assert!(matches!(err, FlowError::NoActiveFlow { .. }));
    }

    #[test]
    fn test_abandon_then_process_fails() {
        let engine = AdaptiveFlowEngine::new();
        let start = engine.start_flow("sub-1", pre_seed(), catalog()).unwrap();
        engine.abandon_flow(&start.flow_id).unwrap();
        assert_eq!(engine.status(&start.flow_id).unwrap(), FlowStatus::Abandoned);
        let err = engine
            .process_response(&start.flow_id, &start.questions[0].id, NEUTRAL)
            .unwrap_err();
        assert!(matches!(err, FlowError::NoActiveFlow { .. }));
        // Terminating twice also fails
        assert!(engine.complete_flow(&start.flow_id).is_err());
    }

    #[test]
    fn test_resubmission_does_not_advance_cursor() {
        let engine = AdaptiveFlowEngine::new();
        let start = engine.start_flow("sub-1", pre_seed(), catalog()).unwrap();
        let qid = &start.questions[0].id;
        let first = engine.process_response(&start.flow_id, qid, NEUTRAL).unwrap();
        let resubmit = engine.process_response(&start.flow_id, qid, NEUTRAL).unwrap();
        assert_eq!(first.progress.answered, resubmit.progress.answered);
        assert_eq!(
            first.next_questions.first().map(|q| q.id.clone()),
            resubmit.next_questions.first().map(|q| q.id.clone())
        );
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let engine = AdaptiveFlowEngine::new();
        let start = engine.start_flow("sub-1", pre_seed(), catalog()).unwrap();
        engine
            .process_response(&start.flow_id, &start.questions[0].id, NEUTRAL)
            .unwrap();
        let snapshot = engine.snapshot(&start.flow_id).unwrap();

        let other = AdaptiveFlowEngine::new();
        other.restore(snapshot);
        assert_eq!(other.progress(&start.flow_id).unwrap().answered, 1);
    }
}
