//! Demo message fixtures.
//!
//! Loads `data/demo_messages.json`: email records carry a subject and
//! sender, calendar and slack records just a body (plus an optional
//! channel name for slack).

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::NudgeError;
use crate::mail::IncomingMessage;
use crate::types::Source;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DemoRecord {
    #[serde(default = "default_source")]
    source: Source,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    body: String,
    #[serde(default)]
    from: Option<String>,
}

fn default_source() -> Source {
    Source::Email
}

/// Load the demo feed from disk.
pub fn load_demo_messages(path: &Path) -> Result<Vec<IncomingMessage>, NudgeError> {
    let content = fs::read_to_string(path)?;
    let records: Vec<DemoRecord> = serde_json::from_str(&content)
        .map_err(|e| NudgeError::parse(&path.display().to_string(), e))?;

    Ok(records
        .into_iter()
        .map(|record| {
            let subject_or_channel = record
                .subject
                .or(record.channel)
                .unwrap_or_default();
            IncomingMessage {
                source: record.source,
                subject_or_channel,
                body: record.body,
                from: record.from,
            }
        })
        .collect())
}
