//! ScaleFlow - Adaptive Question Flow Engine
//!
//! The assessment core behind startup self-assessment worksheets: it tracks
//! a user's session, scores free-text response quality with cheap
//! heuristics, and adapts the in-flight question sequence to how the user
//! is actually answering.
//!
//! ## Core Pieces
//!
//! - **ResponseAnalyzer**: stateless scorer turning one answer into a
//!   quality/feature profile
//! - **QuestionPool**: categorized, prioritized candidate repository keyed
//!   by (type, difficulty)
//! - **RuleSet**: quality thresholds, behavioral-pattern detectors, and the
//!   engagement check
//! - **FlowSession**: per-user aggregate with the live question list,
//!   ordered responses, and adaptation log
//! - **AdaptiveFlowEngine**: orchestrator applying rules and mutations per
//!   processed response
//!
//! ## Quick Start
//!
//! ```
//! use scaleflow::{AdaptiveFlowEngine, CompanyStage, Difficulty, Question, QuestionType, UserContext};
//!
//! let engine = AdaptiveFlowEngine::new();
//! let catalog = vec![
//!     Question::new("q1", "What problem do you solve, and for whom?",
//!         QuestionType::Diagnostic, Difficulty::Beginner),
//!     Question::new("q2", "How many users face this problem monthly?",
//!         QuestionType::Quantification, Difficulty::Intermediate),
//! ];
//! let context = UserContext::new("b2b-saas", CompanyStage::PreSeed);
//!
//! let start = engine.start_flow("problem-statement", context, catalog)?;
//! let outcome = engine.process_response(
//!     &start.flow_id,
//!     &start.questions[0].id,
//!     "We interviewed 40 customers; 70% lose a day a week to this.",
//! )?;
//! println!("quality {}, next up: {}", outcome.analysis.quality, outcome.next_questions.len());
//! # Ok::<(), scaleflow::FlowError>(())
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: response-quality heuristics
//! - [`flow`]: pool, rules, mutations, session, and the engine
//! - [`config`]: layered configuration for flow policy
//! - [`storage`]: session snapshot boundary for persistence collaborators

pub mod analyzer;
pub mod config;
pub mod constants;
pub mod flow;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{ConfigLoader, FlowConfig, SelectionConfig};

// Error Types
pub use types::error::{FlowError, Result};

// Domain Types
pub use types::{
    AdaptationRecord, AdaptationType, CompanyStage, Difficulty, FlowChange, FlowStatus,
    InteractionKind, PreviousScores, Question, QuestionOrigin, QuestionType, ResponseRecord,
    UserContext,
};

// =============================================================================
// Flow Re-exports
// =============================================================================

pub use flow::{
    AdaptiveFlowEngine, FlowHistoryEntry, FlowProgress, FlowSession, FlowStart,
    PerformanceMetrics, QuestionPool, ResponseOutcome, RuleSet,
};

// =============================================================================
// Analyzer & Storage Re-exports
// =============================================================================

pub use analyzer::{ResponseAnalysis, ResponseAnalyzer};
pub use storage::{MemorySessionStore, SessionSnapshot, SessionStore};
