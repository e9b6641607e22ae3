//! Adaptive Flow
//!
//! The flow state machine: question pool selection, adaptation rules, the
//! mutation operations, and the engine that orchestrates them per session.

pub mod engine;
pub mod metrics;
pub mod mutations;
pub mod pool;
pub mod rules;
pub mod session;

pub use engine::{AdaptiveFlowEngine, FlowHistoryEntry, FlowStart, ResponseOutcome};
pub use metrics::{FlowProgress, PerformanceMetrics};
pub use pool::QuestionPool;
pub use rules::{AdaptationDecision, Framework, RuleSet, framework_for_stage};
pub use session::FlowSession;
