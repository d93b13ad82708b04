//! Action execution against the persisted task collection.
//!
//! The intent classifier only suggests; this module is the explicit step
//! that mutates. Every mutation is one read-modify-write cycle through the
//! store's writer lock, and every failure is a tagged outcome — lookups
//! that resolve to nothing never raise.

use serde::{Deserialize, Serialize};

use crate::agent::TaskAgent;
use crate::store::TaskStore;
use crate::types::{now_stamp, ActionToken, AgentNote, ChatIntent, Comment, Task, TaskStatus};

// =============================================================================
// Reference resolution
// =============================================================================

/// Loose task reference: a collection index or a substring of the task text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskRef {
    Index(usize),
    Query(String),
}

impl From<usize> for TaskRef {
    fn from(idx: usize) -> Self {
        TaskRef::Index(idx)
    }
}

impl From<&str> for TaskRef {
    fn from(query: &str) -> Self {
        TaskRef::Query(query.to_string())
    }
}

/// Resolve a reference to a definite collection position.
///
/// Numeric query strings are tried as indices first; otherwise the first
/// case-insensitive substring match in iteration order wins. Positions are
/// only stable until the next reassignment of the collection, so resolve
/// close to use.
pub fn resolve_task_ref(tasks: &[Task], task_ref: &TaskRef) -> Option<usize> {
    match task_ref {
        TaskRef::Index(idx) => (*idx < tasks.len()).then_some(*idx),
        TaskRef::Query(query) => {
            if let Ok(idx) = query.trim().parse::<usize>() {
                if idx < tasks.len() {
                    return Some(idx);
                }
            }
            let needle = query.to_lowercase();
            tasks
                .iter()
                .position(|t| t.task.to_lowercase().contains(&needle))
        }
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Tagged result of one attempted mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ActionOutcome {
    Success { message: String, index: usize },
    NotFound { message: String },
    Unsupported { message: String },
    Error { message: String },
}

impl ActionOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, ActionOutcome::Success { .. })
    }

    fn not_found() -> Self {
        ActionOutcome::NotFound {
            message: "Task not found".to_string(),
        }
    }
}

/// Resolve, mutate one entry, write back — all under the writer lock.
/// The closure returns the success message for the outcome.
fn apply_mutation(
    store: &TaskStore,
    task_ref: &TaskRef,
    mutate: impl FnOnce(&mut Task) -> String,
) -> ActionOutcome {
    let applied = store.update(|tasks| {
        let idx = resolve_task_ref(tasks, task_ref)?;
        let message = mutate(&mut tasks[idx]);
        Some((idx, message))
    });
    match applied {
        Ok(Some((index, message))) => ActionOutcome::Success { message, index },
        Ok(None) => ActionOutcome::not_found(),
        Err(e) => ActionOutcome::Error {
            message: e.to_string(),
        },
    }
}

// =============================================================================
// Mutations
// =============================================================================

fn complete_fields(task: &mut Task, note: Option<&str>) {
    let stamp = now_stamp();
    task.status = TaskStatus::Completed;
    task.completed_date = Some(stamp.clone());
    if let Some(note) = note {
        task.agent_notes.get_or_insert_with(Vec::new).push(AgentNote {
            when: stamp,
            note: note.to_string(),
        });
    }
}

/// Mark a task completed, optionally leaving an agent note.
pub fn mark_complete(store: &TaskStore, task_ref: &TaskRef, note: Option<&str>) -> ActionOutcome {
    apply_mutation(store, task_ref, |task| {
        complete_fields(task, note);
        "Task marked complete".to_string()
    })
}

/// Set a reminder and re-arm the trigger.
pub fn set_reminder(store: &TaskStore, task_ref: &TaskRef, hours: u32) -> ActionOutcome {
    apply_mutation(store, task_ref, |task| {
        task.reminder_hours = Some(hours);
        task.reminder = Some(format!("{} hour(s) before", hours));
        task.reminder_triggered = false;
        "Reminder set".to_string()
    })
}

/// Overwrite the owner. The previous owner survives only in the message.
pub fn reassign(store: &TaskStore, task_ref: &TaskRef, new_owner: &str) -> ActionOutcome {
    apply_mutation(store, task_ref, |task| {
        let old = std::mem::replace(&mut task.owner, new_owner.to_string());
        format!("Reassigned from {} to {}", old, new_owner)
    })
}

/// Append to the task's comment thread.
pub fn add_comment(
    store: &TaskStore,
    task_ref: &TaskRef,
    comment: &str,
    author: &str,
) -> ActionOutcome {
    apply_mutation(store, task_ref, |task| {
        task.comments.get_or_insert_with(Vec::new).push(Comment {
            when: now_stamp(),
            author: author.to_string(),
            comment: comment.to_string(),
        });
        "Comment added".to_string()
    })
}

// =============================================================================
// Dispatch
// =============================================================================

/// Parameters for the string-typed dispatch boundary.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParams {
    pub note: Option<String>,
    pub hours: Option<u32>,
    pub new_owner: Option<String>,
    pub comment: Option<String>,
    pub author: Option<String>,
}

/// Execute an action by its serialized type name.
///
/// Anything outside the enumerated set yields a tagged Unsupported outcome
/// and mutates nothing.
pub fn process_task_action(
    store: &TaskStore,
    task_ref: &TaskRef,
    action_type: &str,
    params: ActionParams,
) -> ActionOutcome {
    match action_type {
        "complete" => mark_complete(store, task_ref, params.note.as_deref()),
        "set_reminder" => set_reminder(store, task_ref, params.hours.unwrap_or(1)),
        "reassign" => reassign(store, task_ref, params.new_owner.as_deref().unwrap_or("")),
        "comment" => add_comment(
            store,
            task_ref,
            params.comment.as_deref().unwrap_or(""),
            params.author.as_deref().unwrap_or("agent"),
        ),
        _ => ActionOutcome::Unsupported {
            message: "Unknown action".to_string(),
        },
    }
}

/// Classify a chat message and immediately execute the suggested action.
///
/// Completion records the triggering message on the task; Schedule defaults
/// to a one-hour reminder; Send leaves an agent comment; Reassign takes the
/// last whitespace token of the message as the new owner. Conversational
/// actions (guide, acknowledge) execute nothing.
pub fn respond_and_execute(
    agent: &TaskAgent,
    store: &TaskStore,
    task_ref: &TaskRef,
    task_description: &str,
    task_owner: &str,
    user_message: &str,
) -> (ChatIntent, ActionOutcome) {
    let intent = agent.respond(task_description, task_owner, user_message);
    let outcome = match intent.action {
        ActionToken::Complete => apply_mutation(store, task_ref, |task| {
            complete_fields(task, Some(user_message));
            task.chat_completion = Some(user_message.to_string());
            "Task marked complete".to_string()
        }),
        ActionToken::Schedule => set_reminder(store, task_ref, 1),
        ActionToken::Send => add_comment(
            store,
            task_ref,
            &format!("Sent by agent: {}", user_message),
            "agent",
        ),
        ActionToken::Reassign => {
            let new_owner = user_message
                .split_whitespace()
                .last()
                .unwrap_or("")
                .to_string();
            reassign(store, task_ref, &new_owner)
        }
        other => ActionOutcome::Unsupported {
            message: format!("No execution rule for action '{}'", other),
        },
    };
    (intent, outcome)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Confidence, Priority, Source};

    fn sample_task(description: &str, owner: &str) -> Task {
        Task {
            task: description.to_string(),
            owner: owner.to_string(),
            deadline: None,
            priority: Priority::Medium,
            suggestion: String::new(),
            status: TaskStatus::Pending,
            source: Source::Email,
            confidence: Confidence::Medium,
            source_email: None,
            reminder: None,
            reminder_hours: None,
            reminder_triggered: false,
            completed_date: None,
            chat_completion: None,
            comments: None,
            agent_notes: None,
        }
    }

    fn seeded_store() -> (tempfile::TempDir, TaskStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TaskStore::new(dir.path().join("tasks.json"));
        store
            .save(&[
                sample_task("Send the revised document", "Ravindu"),
                sample_task("Check server logs", "You"),
            ])
            .expect("seed");
        (dir, store)
    }

    #[test]
    fn test_resolve_by_index_and_substring() {
        let (_dir, store) = seeded_store();
        let tasks = store.load();
        assert_eq!(resolve_task_ref(&tasks, &TaskRef::Index(1)), Some(1));
        assert_eq!(resolve_task_ref(&tasks, &TaskRef::Index(2)), None);
        assert_eq!(
            resolve_task_ref(&tasks, &"server logs".into()),
            Some(1)
        );
        assert_eq!(resolve_task_ref(&tasks, &"SERVER LOGS".into()), Some(1));
        assert_eq!(resolve_task_ref(&tasks, &"nothing like this".into()), None);
    }

    #[test]
    fn test_numeric_query_resolves_as_index_first() {
        let (_dir, store) = seeded_store();
        let tasks = store.load();
        assert_eq!(resolve_task_ref(&tasks, &"1".into()), Some(1));
    }

    #[test]
    fn test_mark_complete_with_note() {
        let (_dir, store) = seeded_store();
        let outcome = mark_complete(&store, &"revised document".into(), Some("sent it off"));
        assert!(outcome.succeeded());

        let tasks = store.load();
        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert!(tasks[0].completed_date.is_some());
        let notes = tasks[0].agent_notes.as_ref().expect("notes");
        assert_eq!(notes[0].note, "sent it off");
    }

    #[test]
    fn test_reassign_reports_previous_owner() {
        let (_dir, store) = seeded_store();
        let outcome = reassign(&store, &TaskRef::Index(0), "Priya");
        match outcome {
            ActionOutcome::Success { message, index } => {
                assert_eq!(index, 0);
                assert_eq!(message, "Reassigned from Ravindu to Priya");
            }
            other => panic!("expected success, got {:?}", other),
        }
        assert_eq!(store.load()[0].owner, "Priya");
    }

    #[test]
    fn test_reassign_missing_reference_leaves_collection_unchanged() {
        let (_dir, store) = seeded_store();
        let before = store.load();

        let by_index = reassign(&store, &TaskRef::Index(9), "Priya");
        assert_eq!(by_index, ActionOutcome::not_found());
        let by_query = reassign(&store, &"no such task".into(), "Priya");
        assert_eq!(by_query, ActionOutcome::not_found());

        assert_eq!(store.load(), before);
    }

    #[test]
    fn test_set_reminder_rearms_trigger() {
        let (_dir, store) = seeded_store();
        let outcome = set_reminder(&store, &TaskRef::Index(1), 24);
        assert!(outcome.succeeded());

        let task = &store.load()[1];
        assert_eq!(task.reminder_hours, Some(24));
        assert_eq!(task.reminder.as_deref(), Some("24 hour(s) before"));
        assert!(!task.reminder_triggered);
    }

    #[test]
    fn test_add_comment_appends() {
        let (_dir, store) = seeded_store();
        add_comment(&store, &TaskRef::Index(1), "first", "agent");
        add_comment(&store, &TaskRef::Index(1), "second", "reviewer");

        let task = &store.load()[1];
        let comments = task.comments.as_ref().expect("comments");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[1].author, "reviewer");
        assert_eq!(comments[1].comment, "second");
    }

    #[test]
    fn test_unknown_action_is_unsupported_and_mutates_nothing() {
        let (_dir, store) = seeded_store();
        let before = store.load();
        let outcome = process_task_action(
            &store,
            &TaskRef::Index(0),
            "escalate",
            ActionParams::default(),
        );
        assert_eq!(
            outcome,
            ActionOutcome::Unsupported {
                message: "Unknown action".to_string()
            }
        );
        assert_eq!(store.load(), before);
    }

    #[test]
    fn test_respond_and_execute_completion_records_chat_message() {
        let (_dir, store) = seeded_store();
        let agent = TaskAgent::keyword();
        let (intent, outcome) = respond_and_execute(
            &agent,
            &store,
            &TaskRef::Index(1),
            "Check server logs",
            "You",
            "I'm done with this",
        );
        assert_eq!(intent.action, ActionToken::Complete);
        assert!(outcome.succeeded());

        let task = &store.load()[1];
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.chat_completion.as_deref(), Some("I'm done with this"));
    }

    #[test]
    fn test_respond_and_execute_reassign_takes_last_token() {
        let (_dir, store) = seeded_store();
        let agent = TaskAgent::keyword();
        let (intent, outcome) = respond_and_execute(
            &agent,
            &store,
            &TaskRef::Index(0),
            "Send the revised document",
            "Ravindu",
            "assign to Priya",
        );
        assert_eq!(intent.action, ActionToken::Reassign);
        assert!(outcome.succeeded());
        assert_eq!(store.load()[0].owner, "Priya");
    }

    #[test]
    fn test_respond_and_execute_acknowledge_executes_nothing() {
        let (_dir, store) = seeded_store();
        let agent = TaskAgent::keyword();
        let before = store.load();
        let (intent, outcome) = respond_and_execute(
            &agent,
            &store,
            &TaskRef::Index(0),
            "Send the revised document",
            "Ravindu",
            "hmm",
        );
        assert_eq!(intent.action, ActionToken::Acknowledge);
        assert!(matches!(outcome, ActionOutcome::Unsupported { .. }));
        assert_eq!(store.load(), before);
    }
}
