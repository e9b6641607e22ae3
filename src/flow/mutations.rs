//! Mutation Operations
//!
//! One operation per adaptation type, each rewriting the session's live
//! question list and/or skip bookkeeping and returning structured
//! [`FlowChange`] records describing what happened.
//!
//! Positioning is always relative to the cursor at decision time (the
//! question just answered); the cursor itself only moves by explicit
//! advance. The re-engagement tail trim is the one operation that can
//! shorten the list, after which the cursor is re-clamped.

use uuid::Uuid;

use super::rules::framework_for_stage;
use super::session::FlowSession;
use crate::constants::flow::{ADVANCE_INSERT_COUNT, ADVANCE_INSERT_OFFSET, FATIGUE_TRIM_RATIO};
use crate::types::{
    AdaptationType, Difficulty, FlowChange, InteractionKind, Question, QuestionOrigin,
    QuestionType,
};

/// Apply the mutation for one adaptation type
pub fn apply(session: &mut FlowSession, adaptation: AdaptationType) -> Vec<FlowChange> {
    match adaptation {
        AdaptationType::Simplify => simplify(session),
        AdaptationType::Advance => advance(session),
        AdaptationType::Struggling => provide_support(session),
        AdaptationType::Confident => challenge_user(session),
        AdaptationType::Uncertain => clarify_path(session),
        AdaptationType::Reengage => reengage(session),
    }
}

// =============================================================================
// Simplify
// =============================================================================

/// Swap upcoming questions for unused beginner alternatives of the same
/// type, then attach hints and examples to upcoming questions lacking them.
fn simplify(session: &mut FlowSession) -> Vec<FlowChange> {
    let mut changes = Vec::new();
    let start = upcoming_start(session);

    for position in start..session.questions.len() {
        let kind = session.questions[position].kind;
        if let Some(simpler) = session.pool.take_unused(kind, Difficulty::Beginner) {
            changes.push(FlowChange::Replaced {
                position,
                old_question_id: session.questions[position].id.clone(),
                new_question_id: simpler.id.clone(),
                reason: "simpler alternative available".to_string(),
            });
            session.register_question(simpler.id.clone());
            session.questions[position] = simpler;
        }
    }

    for position in start..session.questions.len() {
        let question = &mut session.questions[position];
        if question.hint.is_none() {
            question.hint = Some(hint_for(question.kind).to_string());
            changes.push(FlowChange::HintAttached {
                question_id: question.id.clone(),
                reason: "guidance for low response quality".to_string(),
            });
        }
        if question.examples.is_none() {
            let examples = examples_for(question.kind);
            changes.push(FlowChange::ExamplesAttached {
                question_id: question.id.clone(),
                count: examples.len(),
                reason: "worked examples for low response quality".to_string(),
            });
            question.examples = Some(examples);
        }
    }

    changes
}

/// Per-type hint text attached by the simplify adaptation
fn hint_for(kind: QuestionType) -> &'static str {
    match kind {
        QuestionType::Diagnostic => {
            "Describe what is true today and how you know - symptoms first, causes second."
        }
        QuestionType::Exploratory => {
            "There is no wrong answer here - walk through the context and constraints."
        }
        QuestionType::Validation => {
            "Point to the evidence: who confirmed this, when, and in what words?"
        }
        QuestionType::Quantification => {
            "Use real numbers, even rough ones - a range beats an adjective."
        }
        QuestionType::Strategic => {
            "Think 12-18 months out: where does this need to be, and what gets you there?"
        }
    }
}

/// Per-type worked examples; types without curated examples get an empty
/// list, which is a valid outcome rather than an error
fn examples_for(kind: QuestionType) -> Vec<String> {
    match kind {
        QuestionType::Diagnostic => vec![
            "Our onboarding drop-off sits at step 3; the funnel report shows 40% never finish."
                .to_string(),
            "Sales cycles stretched from 30 to 55 days after we moved upmarket.".to_string(),
        ],
        QuestionType::Quantification => vec![
            "Churn is 4% monthly across 120 paying accounts.".to_string(),
            "Support load runs 180 tickets a week, up 25% quarter over quarter.".to_string(),
        ],
        QuestionType::Validation => vec![
            "8 of the 10 customers we interviewed already pay for a workaround today.".to_string(),
        ],
        QuestionType::Exploratory | QuestionType::Strategic => Vec::new(),
    }
}

// =============================================================================
// Advance
// =============================================================================

/// Inject up to two unused advanced/expert strategic or quantification
/// questions shortly after the cursor, then skip upcoming beginner questions.
///
/// Categories are consulted in a fixed order and each is drained before the
/// next is tried, so both insertions may come from the first category with
/// stock.
fn advance(session: &mut FlowSession) -> Vec<FlowChange> {
    let mut changes = Vec::new();

    let mut harder = Vec::new();
    for (kind, difficulty) in [
        (QuestionType::Strategic, Difficulty::Advanced),
        (QuestionType::Strategic, Difficulty::Expert),
        (QuestionType::Quantification, Difficulty::Advanced),
        (QuestionType::Quantification, Difficulty::Expert),
    ] {
        while harder.len() < ADVANCE_INSERT_COUNT {
            match session.pool.take_unused(kind, difficulty) {
                Some(question) => harder.push(question),
                None => break,
            }
        }
    }

    let mut position =
        (session.current_question_index + ADVANCE_INSERT_OFFSET).min(session.questions.len());
    for question in harder {
        changes.push(FlowChange::Inserted {
            position,
            question_id: question.id.clone(),
            reason: "raising difficulty after a high-quality response".to_string(),
        });
        session.register_question(question.id.clone());
        session.questions.insert(position, question);
        position += 1;
    }

    let start = upcoming_start(session);
    for question in &session.questions[start..] {
        if question.difficulty == Difficulty::Beginner && !session.pool.is_skipped(&question.id) {
            session.pool.mark_skipped(question.id.clone());
            changes.push(FlowChange::Skipped {
                question_id: question.id.clone(),
                reason: "below the user's demonstrated level".to_string(),
            });
        }
    }

    changes
}

// =============================================================================
// Struggling -> provide support
// =============================================================================

/// Insert two scaffolding questions that break the current question down,
/// and attach answer templates to all quantification questions lacking one.
fn provide_support(session: &mut FlowSession) -> Vec<FlowChange> {
    let mut changes = Vec::new();

    if let Some(current) = session.questions.get(session.current_question_index) {
        let current_id = current.id.clone();
        let current_text = current.text.clone();
        let scaffolds = [
            scaffold_question(
                &current_id,
                format!(
                    "Let's break that down. In one sentence, what is the main point you want to make about: \"{current_text}\"?"
                ),
            ),
            scaffold_question(
                &current_id,
                "What is one concrete example or number you could add to that answer?".to_string(),
            ),
        ];
        let mut position = upcoming_start(session).min(session.questions.len());
        for question in scaffolds {
            changes.push(FlowChange::Inserted {
                position,
                question_id: question.id.clone(),
                reason: format!("scaffolding for {current_id}"),
            });
            session.register_question(question.id.clone());
            session.questions.insert(position, question);
            position += 1;
        }
    }

    for question in &mut session.questions {
        if question.kind == QuestionType::Quantification && question.template.is_none() {
            question.template = Some(quantification_template());
            changes.push(FlowChange::TemplateAttached {
                question_id: question.id.clone(),
                reason: "structure to make numbers easier to produce".to_string(),
            });
        }
    }

    changes
}

fn scaffold_question(parent_id: &str, text: String) -> Question {
    let mut question = Question::new(
        format!("scaffold-{}", Uuid::new_v4()),
        text,
        QuestionType::Exploratory,
        Difficulty::Beginner,
    );
    question.origin = QuestionOrigin::Scaffolding;
    question.tags = vec![format!("scaffolds:{parent_id}")];
    question
}

fn quantification_template() -> String {
    "Structure your answer:\n\
     - Metric: what you measure\n\
     - Current value: the number\n\
     - Time period: e.g. monthly\n\
     - Source: where the number comes from\n\
     Example: \"Churn: 4% monthly, from billing data.\""
        .to_string()
}

// =============================================================================
// Confident -> challenge user
// =============================================================================

/// Append two expert strategic challenges to the end of the list and
/// require evidence on every validation question lacking a requirement.
fn challenge_user(session: &mut FlowSession) -> Vec<FlowChange> {
    let mut changes = Vec::new();

    for text in [
        "If you had 10x the resources, what would you do differently - and why aren't you doing a smaller version of that now?",
        "Which of your current numbers would most worry an investor, and what is your plan to move it?",
    ] {
        let mut question = Question::new(
            format!("challenge-{}", Uuid::new_v4()),
            text,
            QuestionType::Strategic,
            Difficulty::Expert,
        );
        question.origin = QuestionOrigin::Challenge;
        changes.push(FlowChange::Appended {
            question_id: question.id.clone(),
            reason: "stretching a confident responder".to_string(),
        });
        session.register_question(question.id.clone());
        session.questions.push(question);
    }

    for question in &mut session.questions {
        if question.kind == QuestionType::Validation && question.validation_requirement.is_none() {
            let requirement = "Provide specific evidence or data".to_string();
            changes.push(FlowChange::ValidationRequired {
                question_id: question.id.clone(),
                requirement: requirement.clone(),
                reason: "confident answers need evidence backing".to_string(),
            });
            question.validation_requirement = Some(requirement);
        }
    }

    changes
}

// =============================================================================
// Uncertain -> clarify path
// =============================================================================

/// Insert clarification questions for whatever the responses so far never
/// mention (who is affected, how much it costs), and suggest a stage-keyed
/// framework.
fn clarify_path(session: &mut FlowSession) -> Vec<FlowChange> {
    let mut changes = Vec::new();
    let combined: String = session
        .responses
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut position = upcoming_start(session).min(session.questions.len());

    if !combined.contains("customer") && !combined.contains("user") {
        let question = clarification_question(
            "Who exactly is affected by this? Describe the specific person or team that feels the problem.",
            QuestionType::Exploratory,
        );
        changes.push(FlowChange::Inserted {
            position,
            question_id: question.id.clone(),
            reason: "responses never name who is affected".to_string(),
        });
        session.register_question(question.id.clone());
        session.questions.insert(position, question);
        position += 1;
    }

    if !combined.chars().any(|c| c.is_ascii_digit()) {
        let question = clarification_question(
            "Can you put a number on this? How many people, how often, or how much does it cost?",
            QuestionType::Quantification,
        );
        changes.push(FlowChange::Inserted {
            position,
            question_id: question.id.clone(),
            reason: "responses contain no quantities".to_string(),
        });
        session.register_question(question.id.clone());
        session.questions.insert(position, question);
    }

    let framework = framework_for_stage(session.user_context.company_stage);
    changes.push(FlowChange::FrameworkSuggested {
        name: framework.name,
        steps: framework.steps,
        reason: "a structured path for an uncertain direction".to_string(),
    });

    changes
}

fn clarification_question(text: &str, kind: QuestionType) -> Question {
    let mut question = Question::new(
        format!("clarify-{}", Uuid::new_v4()),
        text,
        kind,
        Difficulty::Beginner,
    );
    question.origin = QuestionOrigin::Clarification;
    question
}

// =============================================================================
// Reengage
// =============================================================================

/// Replace the next two upcoming questions with interactive ones, emit a
/// motivational message, and trim the tail of the list to reduce fatigue.
fn reengage(session: &mut FlowSession) -> Vec<FlowChange> {
    let mut changes = Vec::new();
    let start = upcoming_start(session);

    let interactive = [
        interactive_question(
            "List your top three priorities right now - short bullets are perfect.",
            InteractionKind::ListInput,
        ),
        interactive_question(
            "On a scale of 1-10, how confident are you in your current direction?",
            InteractionKind::ScaleInput,
        ),
    ];
    for (offset, question) in interactive.into_iter().enumerate() {
        let position = start + offset;
        if position >= session.questions.len() {
            break;
        }
        changes.push(FlowChange::Replaced {
            position,
            old_question_id: session.questions[position].id.clone(),
            new_question_id: question.id.clone(),
            reason: "lighter interactive format to rebuild momentum".to_string(),
        });
        session.register_question(question.id.clone());
        session.questions[position] = question;
    }

    let percentage = session.progress().percentage;
    let message = if percentage < 30 {
        "Great start - the first questions are always the hardest part."
    } else if percentage < 70 {
        "You're past the halfway hump - keep the momentum going."
    } else {
        "Almost there - just a few questions left."
    };
    changes.push(FlowChange::Motivation {
        message: message.to_string(),
        reason: "declining engagement".to_string(),
    });

    let trim = (session.questions.len() as f32 * FATIGUE_TRIM_RATIO).floor() as usize;
    if trim > 0 {
        let keep = session.questions.len() - trim;
        session.questions.truncate(keep);
        session.clamp_cursor();
        changes.push(FlowChange::TailTrimmed {
            removed: trim,
            reason: "shorter flow to reduce fatigue".to_string(),
        });
    }

    changes
}

fn interactive_question(text: &str, interaction: InteractionKind) -> Question {
    let mut question = Question::new(
        format!("interactive-{}", Uuid::new_v4()),
        text,
        QuestionType::Exploratory,
        Difficulty::Beginner,
    );
    question.origin = QuestionOrigin::Interactive;
    question.interaction = Some(interaction);
    question
}

/// First upcoming position: one past the question being answered
fn upcoming_start(session: &FlowSession) -> usize {
    (session.current_question_index + 1).min(session.questions.len())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::pool::QuestionPool;
    use crate::types::{CompanyStage, UserContext};

    fn question(id: &str, kind: QuestionType, difficulty: Difficulty) -> Question {
        Question::new(id, format!("text for {id}"), kind, difficulty)
    }

    fn session(questions: Vec<Question>, pool: QuestionPool) -> FlowSession {
        FlowSession::new(
            "flow-1",
            "sub-1",
            UserContext::new("b2b-saas", CompanyStage::Seed),
            questions,
            pool,
        )
    }

    #[test]
    fn test_simplify_replaces_upcoming_and_annotates() {
        let context = UserContext::new("b2b-saas", CompanyStage::Seed);
        let pool = QuestionPool::build(
            vec![question("easy-d", QuestionType::Diagnostic, Difficulty::Beginner)],
            &context,
        );
        let mut s = session(
            vec![
                question("q0", QuestionType::Diagnostic, Difficulty::Advanced),
                question("q1", QuestionType::Diagnostic, Difficulty::Advanced),
                question("q2", QuestionType::Strategic, Difficulty::Advanced),
            ],
            pool,
        );
        let changes = apply(&mut s, AdaptationType::Simplify);

        // Only q1 found a beginner alternative; q2 has no strategic beginner
        assert_eq!(s.questions[1].id, "easy-d");
        assert_eq!(s.questions[2].id, "q2");
        assert!(s.knows_question("easy-d"));
        assert!(changes.iter().any(|c| matches!(
            c,
            FlowChange::Replaced { position: 1, .. }
        )));

        // Every upcoming question got a hint; examples attach per type
        assert!(s.questions[1].hint.is_some());
        assert!(s.questions[2].hint.is_some());
        assert!(!s.questions[1].examples.as_ref().unwrap().is_empty());
        // Strategic has no curated examples - empty list is valid
        assert!(s.questions[2].examples.as_ref().unwrap().is_empty());
        // Current question untouched
        assert!(s.questions[0].hint.is_none());
    }

    #[test]
    fn test_simplify_annotations_idempotent() {
        let mut s = session(
            vec![
                question("q0", QuestionType::Diagnostic, Difficulty::Beginner),
                question("q1", QuestionType::Diagnostic, Difficulty::Beginner),
            ],
            QuestionPool::default(),
        );
        apply(&mut s, AdaptationType::Simplify);
        let hint = s.questions[1].hint.clone();
        let changes = apply(&mut s, AdaptationType::Simplify);
        assert_eq!(s.questions[1].hint, hint);
        assert!(!changes.iter().any(|c| matches!(c, FlowChange::HintAttached { .. })));
    }

    #[test]
    fn test_advance_inserts_harder_and_skips_beginners() {
        let context = UserContext::new("b2b-saas", CompanyStage::Seed);
        let pool = QuestionPool::build(
            vec![
                question("hard-s1", QuestionType::Strategic, Difficulty::Advanced),
                question("hard-s2", QuestionType::Strategic, Difficulty::Expert),
                question("hard-q1", QuestionType::Quantification, Difficulty::Expert),
            ],
            &context,
        );
        let mut s = session(
            vec![
                question("q0", QuestionType::Diagnostic, Difficulty::Intermediate),
                question("q1", QuestionType::Exploratory, Difficulty::Beginner),
                question("q2", QuestionType::Validation, Difficulty::Intermediate),
                question("q3", QuestionType::Diagnostic, Difficulty::Beginner),
            ],
            pool,
        );
        let changes = apply(&mut s, AdaptationType::Advance);

        // Two insertions at cursor+2, strategic buckets scanned first
        assert_eq!(s.questions.len(), 6);
        assert_eq!(s.questions[2].id, "hard-s1");
        assert_eq!(s.questions[3].id, "hard-s2");
        // Upcoming beginners skipped but still present
        assert!(s.pool.is_skipped("q1"));
        assert!(s.pool.is_skipped("q3"));
        assert!(s.questions.iter().any(|q| q.id == "q1"));
        let skips = changes
            .iter()
            .filter(|c| matches!(c, FlowChange::Skipped { .. }))
            .count();
        assert_eq!(skips, 2);
    }

    #[test]
    fn test_advance_drains_first_stocked_category() {
        let context = UserContext::new("b2b-saas", CompanyStage::Seed);
        let pool = QuestionPool::build(
            vec![
                question("s-adv-1", QuestionType::Strategic, Difficulty::Advanced),
                question("s-adv-2", QuestionType::Strategic, Difficulty::Advanced),
                question("q-exp", QuestionType::Quantification, Difficulty::Expert),
            ],
            &context,
        );
        let mut s = session(
            vec![
                question("q0", QuestionType::Diagnostic, Difficulty::Intermediate),
                question("q1", QuestionType::Validation, Difficulty::Intermediate),
                question("q2", QuestionType::Diagnostic, Difficulty::Intermediate),
            ],
            pool,
        );
        apply(&mut s, AdaptationType::Advance);

        // Strategic/advanced holds two questions, so both insertions come
        // from it and the quantification bucket is never touched
        assert_eq!(s.questions[2].id, "s-adv-1");
        assert_eq!(s.questions[3].id, "s-adv-2");
        assert!(
            s.pool
                .take_unused(QuestionType::Quantification, Difficulty::Expert)
                .is_some()
        );
    }

    #[test]
    fn test_advance_insertion_extends_short_list() {
        let context = UserContext::new("b2b-saas", CompanyStage::Seed);
        let pool = QuestionPool::build(
            vec![question("hard-s1", QuestionType::Strategic, Difficulty::Expert)],
            &context,
        );
        let mut s = session(
            vec![question("q0", QuestionType::Diagnostic, Difficulty::Intermediate)],
            pool,
        );
        apply(&mut s, AdaptationType::Advance);
        assert_eq!(s.questions.len(), 2);
        assert_eq!(s.questions[1].id, "hard-s1");
    }

    #[test]
    fn test_provide_support_scaffolds_current_question() {
        let mut s = session(
            vec![
                question("q0", QuestionType::Quantification, Difficulty::Intermediate),
                question("q1", QuestionType::Quantification, Difficulty::Intermediate),
            ],
            QuestionPool::default(),
        );
        let changes = apply(&mut s, AdaptationType::Struggling);

        assert_eq!(s.questions.len(), 4);
        assert_eq!(s.questions[1].origin, QuestionOrigin::Scaffolding);
        assert_eq!(s.questions[2].origin, QuestionOrigin::Scaffolding);
        assert!(s.questions[1].text.contains("text for q0"));
        // Quantification questions everywhere get templates
        assert!(s.questions[0].template.is_some());
        assert!(s.questions[3].template.is_some());
        // Scaffolds are exploratory, no template
        assert!(s.questions[1].template.is_none());
        assert_eq!(
            changes
                .iter()
                .filter(|c| matches!(c, FlowChange::Inserted { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_challenge_appends_at_end_and_requires_evidence() {
        let mut s = session(
            vec![
                question("q0", QuestionType::Validation, Difficulty::Intermediate),
                question("q1", QuestionType::Validation, Difficulty::Intermediate),
            ],
            QuestionPool::default(),
        );
        let changes = apply(&mut s, AdaptationType::Confident);

        assert_eq!(s.questions.len(), 4);
        assert_eq!(s.questions[2].origin, QuestionOrigin::Challenge);
        assert_eq!(s.questions[3].kind, QuestionType::Strategic);
        assert_eq!(s.questions[3].difficulty, Difficulty::Expert);
        assert_eq!(
            s.questions[0].validation_requirement.as_deref(),
            Some("Provide specific evidence or data")
        );
        assert_eq!(
            s.questions[1].validation_requirement.as_deref(),
            Some("Provide specific evidence or data")
        );
        assert!(changes.iter().any(|c| matches!(c, FlowChange::Appended { .. })));
    }

    #[test]
    fn test_clarify_inserts_for_missing_signals() {
        let mut s = session(
            vec![
                question("q0", QuestionType::Exploratory, Difficulty::Intermediate),
                question("q1", QuestionType::Exploratory, Difficulty::Intermediate),
            ],
            QuestionPool::default(),
        );
        s.record_response("q0", "It might help some teams, hard to say.", 30);
        let changes = apply(&mut s, AdaptationType::Uncertain);

        // No "customer"/"user" mention and no digits: both clarifications
        assert_eq!(s.questions.len(), 4);
        assert_eq!(s.questions[1].origin, QuestionOrigin::Clarification);
        assert_eq!(s.questions[2].origin, QuestionOrigin::Clarification);
        assert_eq!(s.questions[2].kind, QuestionType::Quantification);
        assert!(changes.iter().any(|c| matches!(
            c,
            FlowChange::FrameworkSuggested { name, .. } if name == "Customer Problem Discovery"
        )));
    }

    #[test]
    fn test_clarify_skips_covered_signals() {
        let mut s = session(
            vec![question("q0", QuestionType::Exploratory, Difficulty::Intermediate)],
            QuestionPool::default(),
        );
        s.record_response("q0", "Around 40 customer accounts hit this weekly.", 60);
        let changes = apply(&mut s, AdaptationType::Uncertain);

        // Both signals present: only the framework suggestion remains
        assert_eq!(s.questions.len(), 1);
        assert_eq!(changes.len(), 1);
        assert!(matches!(changes[0], FlowChange::FrameworkSuggested { .. }));
    }

    #[test]
    fn test_reengage_replaces_trims_and_motivates() {
        let questions: Vec<Question> = (0..10)
            .map(|i| question(&format!("q{i}"), QuestionType::Diagnostic, Difficulty::Intermediate))
            .collect();
        let mut s = session(questions, QuestionPool::default());
        s.record_response("q0", "answer", 50);
        let changes = apply(&mut s, AdaptationType::Reengage);

        // floor(0.2 * 10) = 2 trimmed from the tail
        assert_eq!(s.questions.len(), 8);
        assert!(changes.iter().any(|c| matches!(c, FlowChange::TailTrimmed { removed: 2, .. })));
        // Next two upcoming replaced with interactive questions
        assert_eq!(s.questions[1].origin, QuestionOrigin::Interactive);
        assert_eq!(s.questions[1].interaction, Some(InteractionKind::ListInput));
        assert_eq!(s.questions[2].interaction, Some(InteractionKind::ScaleInput));
        assert!(changes.iter().any(|c| matches!(
            c,
            FlowChange::Motivation { message, .. } if message.contains("Great start")
        )));
    }

    #[test]
    fn test_reengage_short_list_replaces_only_existing_positions() {
        let mut s = session(
            vec![
                question("q0", QuestionType::Diagnostic, Difficulty::Intermediate),
                question("q1", QuestionType::Diagnostic, Difficulty::Intermediate),
            ],
            QuestionPool::default(),
        );
        let changes = apply(&mut s, AdaptationType::Reengage);

        // Only position 1 exists to replace; floor(0.2*2)=0 so no trim
        assert_eq!(s.questions.len(), 2);
        assert_eq!(s.questions[1].origin, QuestionOrigin::Interactive);
        assert_eq!(
            changes
                .iter()
                .filter(|c| matches!(c, FlowChange::Replaced { .. }))
                .count(),
            1
        );
        assert!(!changes.iter().any(|c| matches!(c, FlowChange::TailTrimmed { .. })));
    }
}
