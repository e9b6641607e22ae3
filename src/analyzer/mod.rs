//! Response Analysis
//!
//! Heuristic scoring of free-text answers. Stateless and total: every input,
//! including the empty string, yields a valid [`ResponseAnalysis`].

pub mod response;

pub use response::{ResponseAnalysis, ResponseAnalyzer};
