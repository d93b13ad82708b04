//! Render-layer helpers.
//!
//! The dashboard itself is a separate consumer; these functions prepare
//! its views: tasks grouped by status and sorted by priority, the daily
//! summary counters, and the reminder option table.

use serde::Serialize;

use crate::types::{Priority, Task, TaskStatus};

/// Reminder options offered in the UI, label → hours before the deadline.
pub static REMINDER_OPTIONS: &[(&str, u32)] = &[
    ("1 hour before", 1),
    ("1 day before", 24),
    ("2 days before", 48),
    ("1 week before", 168),
    ("On due date", 0),
];

/// Hours for a reminder option label.
pub fn reminder_hours(label: &str) -> Option<u32> {
    REMINDER_OPTIONS
        .iter()
        .find(|(option, _)| *option == label)
        .map(|(_, hours)| *hours)
}

/// Sort rank for display: high first, low last.
fn priority_rank(priority: Priority) -> u8 {
    match priority {
        Priority::High => 0,
        Priority::Medium => 1,
        Priority::Low => 2,
    }
}

/// Pending tasks with their original collection indices, highest priority
/// first. The sort is stable, so same-priority tasks keep collection order.
pub fn pending_tasks(tasks: &[Task]) -> Vec<(usize, &Task)> {
    let mut pending: Vec<(usize, &Task)> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.status == TaskStatus::Pending)
        .collect();
    pending.sort_by_key(|(_, t)| priority_rank(t.priority));
    pending
}

/// Completed tasks with their original collection indices.
pub fn completed_tasks(tasks: &[Task]) -> Vec<(usize, &Task)> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.status == TaskStatus::Completed)
        .collect()
}

/// Counters for the daily summary panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
}

pub fn daily_summary(tasks: &[Task]) -> DailySummary {
    DailySummary {
        total: tasks.len(),
        completed: tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count(),
        pending: tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .count(),
        high_priority: tasks.iter().filter(|t| t.priority == Priority::High).count(),
        medium_priority: tasks
            .iter()
            .filter(|t| t.priority == Priority::Medium)
            .count(),
        low_priority: tasks.iter().filter(|t| t.priority == Priority::Low).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Confidence, Source};

    fn task(description: &str, priority: Priority, status: TaskStatus) -> Task {
        Task {
            task: description.to_string(),
            owner: "You".to_string(),
            deadline: None,
            priority,
            suggestion: String::new(),
            status,
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

    #[test]
    fn test_pending_sorted_by_priority() {
        let tasks = vec![
            task("low", Priority::Low, TaskStatus::Pending),
            task("done", Priority::High, TaskStatus::Completed),
            task("high", Priority::High, TaskStatus::Pending),
            task("medium", Priority::Medium, TaskStatus::Pending),
        ];
        let pending = pending_tasks(&tasks);
        let order: Vec<&str> = pending.iter().map(|(_, t)| t.task.as_str()).collect();
        assert_eq!(order, vec!["high", "medium", "low"]);
        // Original indices survive the sort for later mutations.
        assert_eq!(pending[0].0, 2);
    }

    #[test]
    fn test_stable_sort_keeps_collection_order_within_tier() {
        let tasks = vec![
            task("first high", Priority::High, TaskStatus::Pending),
            task("second high", Priority::High, TaskStatus::Pending),
        ];
        let pending = pending_tasks(&tasks);
        assert_eq!(pending[0].1.task, "first high");
        assert_eq!(pending[1].1.task, "second high");
    }

    #[test]
    fn test_daily_summary_counts() {
        let tasks = vec![
            task("a", Priority::High, TaskStatus::Pending),
            task("b", Priority::Medium, TaskStatus::Completed),
            task("c", Priority::Low, TaskStatus::Pending),
        ];
        let summary = daily_summary(&tasks);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.high_priority, 1);
        assert_eq!(summary.medium_priority, 1);
        assert_eq!(summary.low_priority, 1);
    }

    #[test]
    fn test_reminder_hours_mapping() {
        assert_eq!(reminder_hours("1 hour before"), Some(1));
        assert_eq!(reminder_hours("1 day before"), Some(24));
        assert_eq!(reminder_hours("1 week before"), Some(168));
        assert_eq!(reminder_hours("On due date"), Some(0));
        assert_eq!(reminder_hours("never"), None);
    }
}
