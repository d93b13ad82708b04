//! Mail collaborator boundary.
//!
//! Live fetching needs `EMAIL_USER` and `EMAIL_PASS`; their absence is an
//! explicit configuration error, never a silent empty feed. The transport
//! itself lives outside this crate — the shipped feed is the demo mailbox,
//! which replays the bundled fixtures through the same interface.

use std::env;
use std::path::PathBuf;

use crate::demo;
use crate::error::NudgeError;
use crate::types::{Source, SourceEmail};

/// Environment variables gating live mail access.
pub const EMAIL_USER_VAR: &str = "EMAIL_USER";
pub const EMAIL_PASS_VAR: &str = "EMAIL_PASS";

#[derive(Debug, Clone)]
pub struct MailCredentials {
    pub user: String,
    pub password: String,
}

impl MailCredentials {
    /// Read credentials from the environment. Both variables must be set
    /// and non-empty.
    pub fn from_env() -> Result<Self, NudgeError> {
        let user = env::var(EMAIL_USER_VAR).unwrap_or_default();
        let password = env::var(EMAIL_PASS_VAR).unwrap_or_default();
        if user.is_empty() || password.is_empty() {
            return Err(NudgeError::Configuration(format!(
                "{} and {} environment variables must be set",
                EMAIL_USER_VAR, EMAIL_PASS_VAR
            )));
        }
        Ok(Self { user, password })
    }
}

/// One message ready for extraction, regardless of channel.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub source: Source,
    pub subject_or_channel: String,
    pub body: String,
    pub from: Option<String>,
}

impl IncomingMessage {
    /// Snapshot for the persisted task record. Email only — calendar and
    /// slack messages carry no sender to preserve.
    pub fn source_email(&self) -> Option<SourceEmail> {
        match self.source {
            Source::Email => Some(SourceEmail {
                from: self
                    .from
                    .clone()
                    .unwrap_or_else(|| "unknown@example.com".to_string()),
                subject: self.subject_or_channel.clone(),
                body: self.body.clone(),
            }),
            _ => None,
        }
    }
}

/// Anything that can produce messages for the extraction pass.
pub trait MessageFeed {
    fn fetch(&self) -> Result<Vec<IncomingMessage>, NudgeError>;
}

/// Replays the bundled demo fixtures.
pub struct DemoMailbox {
    path: PathBuf,
}

impl DemoMailbox {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MessageFeed for DemoMailbox {
    fn fetch(&self) -> Result<Vec<IncomingMessage>, NudgeError> {
        demo::load_demo_messages(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; run with --test-threads=1 if these
    // ever flake alongside other env-dependent tests.
    #[test]
    fn test_missing_credentials_is_configuration_error() {
        env::remove_var(EMAIL_USER_VAR);
        env::remove_var(EMAIL_PASS_VAR);
        match MailCredentials::from_env() {
            Err(NudgeError::Configuration(message)) => {
                assert!(message.contains(EMAIL_USER_VAR));
            }
            other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_source_email_snapshot_for_email_only() {
        let email = IncomingMessage {
            source: Source::Email,
            subject_or_channel: "Document Update".to_string(),
            body: "Please send the revised document by Friday".to_string(),
            from: Some("boss@example.com".to_string()),
        };
        let snapshot = email.source_email().expect("snapshot");
        assert_eq!(snapshot.from, "boss@example.com");
        assert_eq!(snapshot.subject, "Document Update");

        let slack = IncomingMessage {
            source: Source::Slack,
            subject_or_channel: "#ops".to_string(),
            body: "please check the logs".to_string(),
            from: None,
        };
        assert!(slack.source_email().is_none());
    }
}
