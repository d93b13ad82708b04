//! Conversational task agent.
//!
//! Intent classification runs behind a strategy trait with two
//! implementations: the keyword matcher (always available) and the
//! embedding-backed semantic matcher. The semantic backend is selected at
//! startup only when its vocabulary asset initializes; failure is logged
//! and the agent runs on keywords, so classification never degrades into
//! an error.

pub mod keyword;
pub mod semantic;

use std::path::Path;

use crate::types::ChatIntent;

pub use keyword::KeywordClassifier;
pub use semantic::SemanticClassifier;

/// One intent classification strategy. Implementations are pure: no
/// strategy mutates anything, and every input yields a valid intent.
pub trait IntentStrategy {
    fn name(&self) -> &'static str;

    /// Map a user chat message about a task to a reply and suggested action.
    fn classify(&self, task_description: &str, task_owner: &str, user_message: &str)
        -> ChatIntent;
}

/// The agent callers talk to. Wraps whichever strategy initialized.
pub struct TaskAgent {
    strategy: Box<dyn IntentStrategy + Send + Sync>,
}

impl TaskAgent {
    /// Build an agent, preferring the semantic backend when its vocabulary
    /// asset at `vocabulary_path` loads.
    pub fn new(vocabulary_path: &Path) -> Self {
        match SemanticClassifier::initialize(vocabulary_path) {
            Ok(semantic) => {
                log::info!("semantic intent backend ready");
                Self {
                    strategy: Box::new(semantic),
                }
            }
            Err(reason) => {
                log::warn!("semantic intent backend unavailable: {reason}. Using keyword matcher.");
                Self::keyword()
            }
        }
    }

    /// Keyword-only agent (the guaranteed fallback).
    pub fn keyword() -> Self {
        Self {
            strategy: Box::new(KeywordClassifier),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Classify a chat message. No side effects; executing the suggested
    /// action is the executor's explicit, separate step.
    pub fn respond(&self, task_description: &str, task_owner: &str, user_message: &str)
        -> ChatIntent {
        self.strategy
            .classify(task_description, task_owner, user_message)
    }
}

// =============================================================================
// Task categorization
// =============================================================================

/// First-match category table for task descriptions.
static TASK_CATEGORIES: &[(&str, &[&str])] = &[
    ("send", &["send", "email", "submit"]),
    ("review", &["review", "check", "verify"]),
    ("schedule", &["schedule", "book", "meeting", "call"]),
    ("approve", &["approve", "accept", "authorize"]),
    ("process", &["process", "handle", "execute"]),
    ("invoice", &["invoice", "billing", "payment"]),
    ("training", &["training", "learn", "course"]),
    ("feedback", &["feedback", "comment", "opinion"]),
];

/// Coarse category of a task description, "general" when nothing matches.
pub fn categorize_task(task_description: &str) -> &'static str {
    let task_lower = task_description.to_lowercase();
    for (category, keywords) in TASK_CATEGORIES {
        if keywords.iter().any(|k| task_lower.contains(k)) {
            return category;
        }
    }
    "general"
}
