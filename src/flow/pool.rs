//! Question Pool
//!
//! Categorized, prioritized repository of candidate questions keyed by
//! (type, difficulty). Built once per flow from the caller's catalog:
//! difficulty is adjusted for the company stage, relevance and adaptive
//! priority are derived from the user context, and every bucket is sorted
//! descending by priority.
//!
//! Selection degrades gracefully: missing buckets and exhausted unused sets
//! yield fewer results, never an error.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::constants::pool::*;
use crate::types::{CompanyStage, Difficulty, Question, QuestionType, UserContext};

/// One (type, difficulty) bucket, sorted descending by adaptive priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Bucket {
    kind: QuestionType,
    difficulty: Difficulty,
    questions: Vec<Question>,
}

/// Categorized candidate-question repository for one flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionPool {
    /// Buckets in (type, difficulty) order for deterministic full scans
    buckets: Vec<Bucket>,
    /// Ids already selected into the session
    used: HashSet<String>,
    /// Ids marked skipped by adaptations
    skipped: HashSet<String>,
}

impl QuestionPool {
    /// Build a pool from a catalog, deriving difficulty, relevance, and
    /// priority from the user context. Replaces any previous pool contents.
    pub fn build(catalog: Vec<Question>, context: &UserContext) -> Self {
        let mut grouped: BTreeMap<(QuestionType, Difficulty), Vec<Question>> = BTreeMap::new();

        for mut question in catalog {
            question.difficulty =
                stage_adjusted_difficulty(question.difficulty, context.company_stage);
            question.relevance_score = relevance_score(&question, context);
            question.adaptive_priority = adaptive_priority(&question);
            grouped
                .entry((question.kind, question.difficulty))
                .or_default()
                .push(question);
        }

        let buckets = grouped
            .into_iter()
            .map(|((kind, difficulty), mut questions)| {
                questions.sort_by(|a, b| b.adaptive_priority.total_cmp(&a.adaptive_priority));
                Bucket {
                    kind,
                    difficulty,
                    questions,
                }
            })
            .collect();

        Self {
            buckets,
            used: HashSet::new(),
            skipped: HashSet::new(),
        }
    }

    /// Select the initial ordered question list for a new flow.
    ///
    /// Takes `floor(target x weight)` questions per type from the
    /// starting-difficulty bucket, then backfills from the whole pool by
    /// priority until `target` questions are selected or the pool is
    /// exhausted.
    pub fn select_initial(&mut self, context: &UserContext, target: usize) -> Vec<Question> {
        let starting = starting_difficulty(context);
        let mut selected = Vec::new();

        for (kind, weight) in type_distribution(context.company_stage) {
            let count = (target as f32 * weight).floor() as usize;
            for _ in 0..count {
                match self.take_unused(kind, starting) {
                    Some(question) => selected.push(question),
                    None => break,
                }
            }
        }

        while selected.len() < target {
            match self.take_best_unused() {
                Some(question) => selected.push(question),
                None => break,
            }
        }

        selected
    }

    /// Take the highest-priority unused question from one bucket, marking it
    /// used. Returns `None` when the bucket is absent or exhausted.
    pub fn take_unused(&mut self, kind: QuestionType, difficulty: Difficulty) -> Option<Question> {
        let question = self
            .buckets
            .iter()
            .find(|b| b.kind == kind && b.difficulty == difficulty)?
            .questions
            .iter()
            .find(|q| !self.used.contains(&q.id))?
            .clone();
        self.used.insert(question.id.clone());
        Some(question)
    }

    /// Take the highest-priority unused question across the whole pool,
    /// scanning buckets in (type, difficulty) order so ties resolve to the
    /// first encountered.
    pub fn take_best_unused(&mut self) -> Option<Question> {
        let mut best: Option<&Question> = None;
        for bucket in &self.buckets {
            for question in &bucket.questions {
                if self.used.contains(&question.id) {
                    continue;
                }
                if best.is_none_or(|b| question.adaptive_priority > b.adaptive_priority) {
                    best = Some(question);
                }
            }
        }
        let question = best.cloned()?;
        self.used.insert(question.id.clone());
        Some(question)
    }

    /// Mark an id as used (e.g. generated questions joining the session)
    pub fn mark_used(&mut self, id: impl Into<String>) {
        self.used.insert(id.into());
    }

    /// Mark an id as skipped: it stays in the session's list but is excluded
    /// from future next-question batches
    pub fn mark_skipped(&mut self, id: impl Into<String>) {
        self.skipped.insert(id.into());
    }

    pub fn is_skipped(&self, id: &str) -> bool {
        self.skipped.contains(id)
    }

    pub fn skipped_ids(&self) -> &HashSet<String> {
        &self.skipped
    }

    /// Questions remaining in one bucket (used or not); for diagnostics
    pub fn bucket_len(&self, kind: QuestionType, difficulty: Difficulty) -> usize {
        self.buckets
            .iter()
            .find(|b| b.kind == kind && b.difficulty == difficulty)
            .map_or(0, |b| b.questions.len())
    }

    #[cfg(test)]
    fn bucket_priorities(&self, kind: QuestionType, difficulty: Difficulty) -> Vec<f32> {
        self.buckets
            .iter()
            .find(|b| b.kind == kind && b.difficulty == difficulty)
            .map_or_else(Vec::new, |b| {
                b.questions.iter().map(|q| q.adaptive_priority).collect()
            })
    }
}

/// Difficulty a flow starts at, given the user's history and stage
pub fn starting_difficulty(context: &UserContext) -> Difficulty {
    if context
        .previous_scores
        .is_some_and(|scores| scores.average > ADVANCED_START_SCORE)
    {
        Difficulty::Advanced
    } else if context.company_stage.is_early() {
        Difficulty::Beginner
    } else if context.company_stage.is_growth() {
        Difficulty::Advanced
    } else {
        Difficulty::Intermediate
    }
}

/// Fractional question-type mix for initial selection, summing to 1
pub fn type_distribution(stage: CompanyStage) -> [(QuestionType, f32); 5] {
    let weights: [f32; 5] = if stage.is_early() {
        [0.4, 0.3, 0.2, 0.1, 0.0]
    } else if stage.is_growth() {
        [0.1, 0.1, 0.2, 0.3, 0.3]
    } else {
        [0.3, 0.2, 0.2, 0.2, 0.1]
    };
    [
        (QuestionType::Diagnostic, weights[0]),
        (QuestionType::Exploratory, weights[1]),
        (QuestionType::Validation, weights[2]),
        (QuestionType::Quantification, weights[3]),
        (QuestionType::Strategic, weights[4]),
    ]
}

/// Cap difficulty down one notch for early stages, raise it one for growth
/// stages, leave it unchanged otherwise
pub fn stage_adjusted_difficulty(base: Difficulty, stage: CompanyStage) -> Difficulty {
    if stage.is_early() {
        match base {
            Difficulty::Expert => Difficulty::Advanced,
            Difficulty::Advanced => Difficulty::Intermediate,
            other => other,
        }
    } else if stage.is_growth() {
        match base {
            Difficulty::Beginner => Difficulty::Intermediate,
            Difficulty::Intermediate => Difficulty::Advanced,
            other => other,
        }
    } else {
        base
    }
}

/// Contextual relevance: base 50, +20 industry match, +20 stage match,
/// +10 per tag overlapping the user's problem areas, clamped to 100
fn relevance_score(question: &Question, context: &UserContext) -> f32 {
    let mut score = BASE_RELEVANCE;
    if question.industries.iter().any(|i| i == &context.industry) {
        score += INDUSTRY_BONUS;
    }
    let stage = context.company_stage.to_string();
    if question.stages.iter().any(|s| s == &stage) {
        score += STAGE_BONUS;
    }
    let overlap = question
        .tags
        .iter()
        .filter(|tag| context.problem_areas.iter().any(|area| area == *tag))
        .count();
    score += TAG_OVERLAP_BONUS * overlap as f32;
    score.min(100.0)
}

/// Composite selection priority: relevance and importance weighted equally,
/// plus a flat bonus for required questions
fn adaptive_priority(question: &Question) -> f32 {
    let importance = question.importance.unwrap_or(DEFAULT_IMPORTANCE) as f32;
    question.relevance_score * RELEVANCE_WEIGHT
        + importance * IMPORTANCE_WEIGHT
        + if question.required { REQUIRED_BONUS } else { 0.0 }
}

// =============================================================================
// Tests
// =============================================================================
