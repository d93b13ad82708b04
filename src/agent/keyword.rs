//! Deterministic keyword intent matcher.
//!
//! Ordered keyword groups over the lowercased message; the first group that
//! matches wins. Always available — this is the fallback every other
//! strategy bottoms out in.

use super::IntentStrategy;
use crate::types::{ActionToken, ChatIntent, Confidence};

static COMPLETE_WORDS: &[&str] = &["done", "completed", "finished", "complete"];
static GUIDE_WORDS: &[&str] = &["help", "how", "guide", "steps", "what"];
static SEND_WORDS: &[&str] = &["send", "email", "submit"];
static SCHEDULE_WORDS: &[&str] = &["schedule", "book", "when", "time", "date"];
static REASSIGN_WORDS: &[&str] = &["reassign", "assign to", "change owner", "assign"];

/// Check if a string contains any of the given substrings.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Build the canonical intent for an action token.
///
/// Shared with the semantic strategy so both produce identical replies and
/// the confidence tier stays fixed per action.
pub(crate) fn intent_for(action: ActionToken, task_description: &str, task_owner: &str)
    -> ChatIntent {
    match action {
        ActionToken::Complete => ChatIntent {
            action,
            confidence: Confidence::High,
            response: format!(
                "✅ Marking '{}' complete for {}.",
                task_description, task_owner
            ),
        },
        ActionToken::Guide => ChatIntent {
            action,
            confidence: Confidence::Medium,
            response: format!(
                "I can guide you through: {}. Tell me which step you need help with.",
                task_description
            ),
        },
        ActionToken::Send => ChatIntent {
            action,
            confidence: Confidence::High,
            response: format!(
                "I can send or prepare this item for you: {}. Confirm recipients or provide message body.",
                task_description
            ),
        },
        ActionToken::Schedule => ChatIntent {
            action,
            confidence: Confidence::Medium,
            response: format!(
                "I can schedule '{}'. Please provide a preferred date/time.",
                task_description
            ),
        },
        ActionToken::Reassign => ChatIntent {
            action,
            confidence: Confidence::Medium,
            response: format!("Who should I assign '{}' to?", task_description),
        },
        ActionToken::Acknowledge => ChatIntent {
            action,
            confidence: Confidence::Low,
            response: format!(
                "Got it. For '{}' I can guide, send, schedule, reassign, or mark complete. What would you like me to do?",
                task_description
            ),
        },
    }
}

/// Map a lowercased message to an action token via the keyword groups.
pub(crate) fn match_keywords(text: &str) -> Option<ActionToken> {
    if contains_any(text, COMPLETE_WORDS) {
        Some(ActionToken::Complete)
    } else if contains_any(text, GUIDE_WORDS) {
        Some(ActionToken::Guide)
    } else if contains_any(text, SEND_WORDS) {
        Some(ActionToken::Send)
    } else if contains_any(text, SCHEDULE_WORDS) {
        Some(ActionToken::Schedule)
    } else if contains_any(text, REASSIGN_WORDS) {
        Some(ActionToken::Reassign)
    } else {
        None
    }
}

pub struct KeywordClassifier;

impl IntentStrategy for KeywordClassifier {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn classify(&self, task_description: &str, task_owner: &str, user_message: &str)
        -> ChatIntent {
        let text = user_message.to_lowercase();
        let action = match_keywords(&text).unwrap_or(ActionToken::Acknowledge);
        intent_for(action, task_description, task_owner)
    }
}
