//! Question Types
//!
//! A [`Question`] is an immutable-ish content item: its text, type, and
//! difficulty come from the catalog, while annotations (hint, examples,
//! template, validation requirement) may be attached later by adaptations.
//! Derived scores (`relevance_score`, `adaptive_priority`) are computed once
//! per pool build.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five question types a worksheet draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Identify the current state of a problem area
    Diagnostic,
    /// Open-ended discovery of context and constraints
    Exploratory,
    /// Check claims against evidence
    Validation,
    /// Put numbers on the problem or opportunity
    Quantification,
    /// Long-horizon positioning and planning
    Strategic,
}

impl QuestionType {
    /// All types in selection order (also the distribution order)
    pub const ALL: [QuestionType; 5] = [
        QuestionType::Diagnostic,
        QuestionType::Exploratory,
        QuestionType::Validation,
        QuestionType::Quantification,
        QuestionType::Strategic,
    ];
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Diagnostic => write!(f, "diagnostic"),
            QuestionType::Exploratory => write!(f, "exploratory"),
            QuestionType::Validation => write!(f, "validation"),
            QuestionType::Quantification => write!(f, "quantification"),
            QuestionType::Strategic => write!(f, "strategic"),
        }
    }
}

/// Question difficulty levels, ordered easiest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
            Difficulty::Expert => write!(f, "expert"),
        }
    }
}

/// Input widget hint for generated re-engagement questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionKind {
    /// Answer as a short bullet list
    ListInput,
    /// Answer on a numeric scale
    ScaleInput,
}

/// Where a question came from
///
/// Replaces the ad-hoc `isScaffolding`/`isChallenge` flags of property-bag
/// designs with one closed enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionOrigin {
    /// Supplied in the catalog the flow started from
    #[default]
    Catalog,
    /// Generated to support a struggling user
    Scaffolding,
    /// Generated to stretch a confident user
    Challenge,
    /// Generated to clarify an uncertain user's direction
    Clarification,
    /// Generated to re-engage a fatigued user
    Interactive,
}

/// One assessment question, with optional annotations and derived scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique id within a flow
    pub id: String,
    /// The question text shown to the user
    pub text: String,
    /// Question type
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Difficulty after any stage adjustment at pool-build time
    pub difficulty: Difficulty,
    /// Guidance attached by the simplify adaptation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Worked examples attached by the simplify adaptation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    /// Structured answer template attached for quantification questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Evidence requirement attached to validation questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_requirement: Option<String>,
    /// Industries this question is most relevant to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub industries: Vec<String>,
    /// Company stages this question is most relevant to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<String>,
    /// Free-form tags matched against the user's problem areas
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Author-assigned importance, 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<u8>,
    /// Required questions get a flat priority bonus
    #[serde(default)]
    pub required: bool,
    /// Input widget hint for generated interactive questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<InteractionKind>,
    /// Provenance of this question
    #[serde(default)]
    pub origin: QuestionOrigin,
    /// Contextual relevance, 0-100, derived at pool-build time
    #[serde(default)]
    pub relevance_score: f32,
    /// Composite selection priority, derived at pool-build time
    #[serde(default)]
    pub adaptive_priority: f32,
}

impl Question {
    /// Create a catalog question with required fields
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        kind: QuestionType,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind,
            difficulty,
            hint: None,
            examples: None,
            template: None,
            validation_requirement: None,
            industries: Vec::new(),
            stages: Vec::new(),
            tags: Vec::new(),
            importance: None,
            required: false,
            interaction: None,
            origin: QuestionOrigin::Catalog,
            relevance_score: 0.0,
            adaptive_priority: 0.0,
        }
    }

    /// Set author-assigned importance
    pub fn with_importance(mut self, importance: u8) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Mark the question as required
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set relevant industries
    pub fn with_industries<I, S>(mut self, industries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.industries = industries.into_iter().map(Into::into).collect();
        self
    }

    /// Set relevant company stages
    pub fn with_stages<I, S>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stages = stages.into_iter().map(Into::into).collect();
        self
    }

    /// Set free-form tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_builder() {
        let q = Question::new("q1", "What problem do you solve?", QuestionType::Diagnostic, Difficulty::Beginner)
            .with_importance(80)
            .with_required(true)
            .with_tags(["problem-definition"]);
        assert_eq!(q.id, "q1");
        assert_eq!(q.importance, Some(80));
        assert!(q.required);
        assert_eq!(q.origin, QuestionOrigin::Catalog);
        assert!(q.hint.is_none());
    }

    #[test]
    fn test_question_type_serialization() {
        let json = serde_json::to_string(&QuestionType::Quantification).unwrap();
        assert_eq!(json, "\"quantification\"");
        let back: QuestionType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QuestionType::Quantification);
    }

    #[test]
    fn test_difficulty_ordering() {
        assert!(Difficulty::Beginner < Difficulty::Intermediate);
        assert!(Difficulty::Advanced < Difficulty::Expert);
    }

    #[test]
    fn test_question_serialization_omits_empty_annotations() {
        let q = Question::new("q2", "How many users churn monthly?", QuestionType::Quantification, Difficulty::Intermediate);
        let json = serde_json::to_string(&q).unwrap();
        assert!(!json.contains("hint"));
        assert!(!json.contains("examples"));
        assert!(json.contains("\"type\":\"quantification\""));
    }
}
