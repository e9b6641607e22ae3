//! Core Domain Types
//!
//! Shared vocabulary for the adaptive flow engine: questions, user context,
//! adaptation events, and the unified error type.

pub mod context;
pub mod error;
pub mod events;
pub mod question;

pub use context::{CompanyStage, PreviousScores, UserContext};
pub use error::{FlowError, Result};
pub use events::{AdaptationRecord, AdaptationType, FlowChange, FlowStatus, ResponseRecord};
pub use question::{Difficulty, InteractionKind, Question, QuestionOrigin, QuestionType};
