//! User Context
//!
//! Caller-supplied descriptor of the startup taking the assessment.
//! Immutable for the duration of a flow; read-only input to relevance,
//! priority, and distribution calculations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Company maturity stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanyStage {
    Idea,
    PreSeed,
    Seed,
    SeriesA,
    Growth,
    Scale,
    Enterprise,
}

impl CompanyStage {
    /// Early stages get eased question difficulty and a discovery-heavy mix
    pub fn is_early(&self) -> bool {
        matches!(self, CompanyStage::Idea | CompanyStage::PreSeed)
    }

    /// Growth stages get raised difficulty and a metrics-heavy mix
    pub fn is_growth(&self) -> bool {
        matches!(self, CompanyStage::Growth | CompanyStage::Scale)
    }
}

impl fmt::Display for CompanyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanyStage::Idea => write!(f, "idea"),
            CompanyStage::PreSeed => write!(f, "pre-seed"),
            CompanyStage::Seed => write!(f, "seed"),
            CompanyStage::SeriesA => write!(f, "series-a"),
            CompanyStage::Growth => write!(f, "growth"),
            CompanyStage::Scale => write!(f, "scale"),
            CompanyStage::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// Aggregate of the user's earlier assessment results
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviousScores {
    /// Mean score across completed assessments, 0-100
    pub average: f32,
}

/// Descriptor of the startup taking the assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    /// Industry slug, matched against question `industries` sets
    pub industry: String,
    /// Company maturity stage
    pub company_stage: CompanyStage,
    /// Problem-area tags, matched against question `tags` sets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub problem_areas: Vec<String>,
    /// Earlier results, if any; drives the starting difficulty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_scores: Option<PreviousScores>,
}

impl UserContext {
    /// Create a context with required fields
    pub fn new(industry: impl Into<String>, company_stage: CompanyStage) -> Self {
        Self {
            industry: industry.into(),
            company_stage,
            problem_areas: Vec::new(),
            previous_scores: None,
        }
    }

    /// Set problem-area tags
    pub fn with_problem_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.problem_areas = areas.into_iter().map(Into::into).collect();
        self
    }

    /// Set the previous-score aggregate
    pub fn with_previous_average(mut self, average: f32) -> Self {
        self.previous_scores = Some(PreviousScores { average });
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
