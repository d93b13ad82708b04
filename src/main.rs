//! Demo extraction pipeline.
//!
//! Replays the bundled demo messages through the task extractor and saves
//! every confirmed task to the tasks file the dashboard consumes. Finishes
//! by reporting which intent backend a chat session would get.

use std::process::ExitCode;

use nudge::agent::TaskAgent;
use nudge::config::Config;
use nudge::dashboard;
use nudge::error::NudgeError;
use nudge::extractor::TaskExtractor;
use nudge::mail::{DemoMailbox, MessageFeed};
use nudge::store::TaskStore;
use nudge::types::Task;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), NudgeError> {
    let config = Config::load()?;
    log::warn!("Using demo messages for task extraction");

    let feed = DemoMailbox::new(config.demo_messages_path());
    let messages = feed.fetch()?;

    let extractor = TaskExtractor::new();
    let mut all_tasks: Vec<Task> = Vec::new();
    for message in &messages {
        let candidate =
            extractor.extract(&message.body, message.source, &message.subject_or_channel);
        match Task::from_candidate(&candidate, message.source_email()) {
            Some(task) => {
                log::info!("extracted: {} (confidence: {})", task.task, task.confidence);
                all_tasks.push(task);
            }
            None => log::info!(
                "no actionable task in {} message '{}'",
                message.source,
                message.subject_or_channel
            ),
        }
    }

    let store = TaskStore::new(config.tasks_path());
    store.save(&all_tasks)?;

    let summary = dashboard::daily_summary(&all_tasks);
    log::info!(
        "{} tasks extracted and saved to {} ({} high / {} medium / {} low)",
        summary.total,
        store.path().display(),
        summary.high_priority,
        summary.medium_priority,
        summary.low_priority
    );

    let agent = TaskAgent::new(&config.intent_vocabulary_path());
    if let Some(first) = all_tasks.first() {
        let intent = agent.respond(&first.task, &first.owner, "how do I start?");
        log::info!(
            "agent ({} backend) suggests '{}' for '{}'",
            agent.strategy_name(),
            intent.action,
            first.task
        );
    }

    Ok(())
}
