use chrono::Local;
use serde::{Deserialize, Serialize};

/// Timestamp format used for completion dates and comment/note stamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Owner assigned when no rule names anyone.
pub const DEFAULT_OWNER: &str = "You";

/// Current local time formatted for persisted records.
pub fn now_stamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

// =============================================================================
// Enumerations
// =============================================================================

/// Channel a message arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Email,
    Calendar,
    Slack,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Email => write!(f, "email"),
            Source::Calendar => write!(f, "calendar"),
            Source::Slack => write!(f, "slack"),
        }
    }
}

/// Coarse three-level tier used both for extraction results and chat intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

/// Display priority of a persisted task, derived from extraction confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl From<Confidence> for Priority {
    fn from(confidence: Confidence) -> Self {
        match confidence {
            Confidence::High => Priority::High,
            Confidence::Medium => Priority::Medium,
            Confidence::Low => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

/// Action suggested by the intent classifier. The executor maps each token
/// to exactly one mutation; Guide and Acknowledge are conversational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionToken {
    Complete,
    Guide,
    Send,
    Schedule,
    Reassign,
    Acknowledge,
}

impl std::fmt::Display for ActionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionToken::Complete => write!(f, "complete"),
            ActionToken::Guide => write!(f, "guide"),
            ActionToken::Send => write!(f, "send"),
            ActionToken::Schedule => write!(f, "schedule"),
            ActionToken::Reassign => write!(f, "reassign"),
            ActionToken::Acknowledge => write!(f, "acknowledge"),
        }
    }
}

// =============================================================================
// Extraction output
// =============================================================================

/// Unconfirmed extraction result, created fresh per call and never mutated.
///
/// `task` is present iff a rule matched; `confidence` is always set (Low when
/// no task was found). `deadline` is either a literal label ("Today",
/// "Friday") or a computed YYYY-MM-DD date — consumers rely on that mixed
/// shape, so it stays a plain string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCandidate {
    pub task: Option<String>,
    pub assignee: String,
    pub deadline: Option<String>,
    pub confidence: Confidence,
    pub source: Source,
    pub subject_or_channel: String,
}

// =============================================================================
// Persisted task record
// =============================================================================

/// Snapshot of the message a task was extracted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEmail {
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// A dated comment on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub when: String,
    pub author: String,
    pub comment: String,
}

/// A note the agent left while acting on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentNote {
    pub when: String,
    pub note: String,
}

/// One entry in the persisted task collection.
///
/// Position in the collection is the only stable identifier — callers holding
/// an index across mutations must re-resolve by content match. Tasks are
/// never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task: String,
    pub owner: String,
    pub deadline: Option<String>,
    pub priority: Priority,
    pub suggestion: String,
    pub status: TaskStatus,
    pub source: Source,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_email: Option<SourceEmail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_hours: Option<u32>,
    #[serde(default)]
    pub reminder_triggered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_completion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_notes: Option<Vec<AgentNote>>,
}

impl Task {
    /// Build a persisted record from a confirmed extraction.
    ///
    /// Returns `None` when the candidate carries no task.
    pub fn from_candidate(
        candidate: &TaskCandidate,
        source_email: Option<SourceEmail>,
    ) -> Option<Task> {
        let task = candidate.task.clone()?;
        Some(Task {
            task,
            owner: candidate.assignee.clone(),
            deadline: candidate.deadline.clone(),
            priority: Priority::from(candidate.confidence),
            suggestion: format!(
                "Action item from {}: {}",
                candidate.source, candidate.subject_or_channel
            ),
            status: TaskStatus::Pending,
            source: candidate.source,
            confidence: candidate.confidence,
            source_email,
            reminder: None,
            reminder_hours: None,
            reminder_triggered: false,
            completed_date: None,
            chat_completion: None,
            comments: None,
            agent_notes: None,
        })
    }
}

// =============================================================================
// Chat intent
// =============================================================================

/// Conversational reply plus the action the agent suggests taking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatIntent {
    pub action: ActionToken,
    pub confidence: Confidence,
    pub response: String,
}
