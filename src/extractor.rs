//! Keyword-rule task extraction.
//!
//! Maps raw message text to a structured task candidate using ordered,
//! source-specific rule tables. The first matching rule wins and
//! short-circuits everything after it — there is no scoring and no
//! combination of signals, so rule priority is exactly table order.
//! Several predicates deliberately overlap (the broad "data" and "press"
//! rules shadow anything below them); table order is the behavior, so the
//! overlaps stay.

use chrono::{Duration, Local};
use parking_lot::Mutex;
use serde::Serialize;

use crate::types::{now_stamp, Confidence, Source, TaskCandidate, DEFAULT_OWNER};

/// How many characters of the subject/channel are echoed into task text.
const CONTEXT_CHARS: usize = 50;

// =============================================================================
// Rule tables
// =============================================================================

/// Which slice of the message a clause tests.
#[derive(Debug, Clone, Copy)]
enum Scope {
    /// Lowercased body + " " + lowercased subject/channel.
    Combined,
    /// Lowercased subject/channel only.
    Subject,
    /// Lowercased body only (calendar and slack rules).
    Body,
}

/// A conjunction: every `all` substring present, no `none` substring present.
#[derive(Debug)]
struct Clause {
    scope: Scope,
    all: &'static [&'static str],
    none: &'static [&'static str],
}

impl Clause {
    fn matches(&self, combined: &str, subject: &str, body: &str) -> bool {
        let haystack = match self.scope {
            Scope::Combined => combined,
            Scope::Subject => subject,
            Scope::Body => body,
        };
        self.all.iter().all(|needle| haystack.contains(needle))
            && !self.none.iter().any(|needle| haystack.contains(needle))
    }
}

/// Task description template.
#[derive(Debug)]
enum TaskText {
    Literal(&'static str),
    /// Prefix + the first [`CONTEXT_CHARS`] chars of the original
    /// (un-lowercased) subject/channel.
    WithContext(&'static str),
}

#[derive(Debug)]
enum Deadline {
    /// Free-text label echoed as-is ("Today", "Friday").
    Label(&'static str),
    /// Computed at extraction time: local today + N days, YYYY-MM-DD.
    InDays(i64),
}

#[derive(Debug)]
enum Effect {
    Task {
        text: TaskText,
        assignee: &'static str,
        deadline: Deadline,
        confidence: Confidence,
    },
    /// Explicit no-task marker: stop evaluation with no task at all.
    Suppress,
}

/// One ordered rule: fires when any clause matches.
struct Rule {
    name: &'static str,
    clauses: &'static [Clause],
    effect: Effect,
}

impl Rule {
    fn matches(&self, combined: &str, subject: &str, body: &str) -> bool {
        self.clauses
            .iter()
            .any(|clause| clause.matches(combined, subject, body))
    }
}

/// Shorthand for the common combined-scope conjunction.
const fn has(all: &'static [&'static str]) -> Clause {
    Clause {
        scope: Scope::Combined,
        all,
        none: &[],
    }
}

const fn has_not(all: &'static [&'static str], none: &'static [&'static str]) -> Clause {
    Clause {
        scope: Scope::Combined,
        all,
        none,
    }
}

const fn in_subject(all: &'static [&'static str]) -> Clause {
    Clause {
        scope: Scope::Subject,
        all,
        none: &[],
    }
}

const fn in_body(all: &'static [&'static str]) -> Clause {
    Clause {
        scope: Scope::Body,
        all,
        none: &[],
    }
}

/// Email rules, highest confidence first. Order is load-bearing.
static EMAIL_RULES: &[Rule] = &[
    Rule {
        name: "revised_document",
        clauses: &[has(&["revised document"]), has(&["send the revised document"])],
        effect: Effect::Task {
            text: TaskText::Literal("Send the revised document"),
            assignee: "Ravindu",
            deadline: Deadline::Label("Friday"),
            confidence: Confidence::High,
        },
    },
    Rule {
        name: "client_follow_up",
        clauses: &[
            has(&["follow up with the client"]),
            has(&["follow up", "client"]),
        ],
        effect: Effect::Task {
            text: TaskText::Literal("Follow up with the client"),
            assignee: "Ravindu",
            deadline: Deadline::InDays(1),
            confidence: Confidence::High,
        },
    },
    Rule {
        name: "urgency_marker",
        clauses: &[in_subject(&["urgent"]), has(&["asap"]), has(&["immediately"])],
        effect: Effect::Task {
            text: TaskText::WithContext("Complete urgent task: "),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::Label("Today"),
            confidence: Confidence::High,
        },
    },
    Rule {
        name: "password_reset",
        clauses: &[has(&["password reset"]), has(&["password", "reset"])],
        effect: Effect::Task {
            text: TaskText::Literal("Update security credentials"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(2),
            confidence: Confidence::High,
        },
    },
    Rule {
        name: "security_incident",
        clauses: &[has(&["phishing"]), has(&["security"])],
        effect: Effect::Task {
            text: TaskText::Literal("Update security and change credentials"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::Label("Today"),
            confidence: Confidence::High,
        },
    },
    Rule {
        name: "revisions",
        clauses: &[has(&["revisions"]), has(&["update", "version"])],
        effect: Effect::Task {
            text: TaskText::Literal("Revise and update document/proposal"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(3),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "review_request",
        clauses: &[
            has(&["please review"]),
            has_not(&["review"], &["resolved"]),
        ],
        effect: Effect::Task {
            text: TaskText::WithContext("Review: "),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(2),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "check_request",
        clauses: &[
            has(&["please check"]),
            has_not(&["check"], &["deployment"]),
        ],
        effect: Effect::Task {
            text: TaskText::WithContext("Check and verify: "),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(2),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "quote_proposal",
        clauses: &[has(&["quote"]), has(&["proposal"])],
        effect: Effect::Task {
            text: TaskText::Literal("Prepare quote/proposal"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(3),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "confirm_approval",
        clauses: &[has(&["confirm"]), has(&["approval", "go-live"])],
        effect: Effect::Task {
            text: TaskText::Literal("Confirm approval/signature"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(1),
            confidence: Confidence::High,
        },
    },
    Rule {
        name: "schedule_meeting",
        clauses: &[
            has(&["schedule"]),
            has(&["meeting", "schedule"]),
            has(&["meeting", "propose"]),
        ],
        effect: Effect::Task {
            text: TaskText::Literal("Schedule meeting/call"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(1),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "invoice_payment",
        clauses: &[has(&["invoice"]), has(&["payment"]), has(&["billing"])],
        effect: Effect::Task {
            text: TaskText::Literal("Process invoice/payment/billing"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(5),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "feedback_report",
        clauses: &[
            has(&["feedback"]),
            has_not(&["report"], &["outage"]),
            has(&["summary"]),
            has(&["submit"]),
        ],
        effect: Effect::Task {
            text: TaskText::Literal("Submit feedback/report/summary"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(2),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "training_compliance",
        clauses: &[
            has(&["training"]),
            has(&["compliance"]),
            has(&["acknowledge"]),
            has(&["policy", "read"]),
        ],
        effect: Effect::Task {
            text: TaskText::Literal("Complete training/acknowledge policy"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(7),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "contract_review",
        clauses: &[has(&["contract"]), has(&["review", "contract"])],
        effect: Effect::Task {
            text: TaskText::Literal("Review and finalize contract"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(3),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "data_export",
        clauses: &[has(&["data"]), has(&["export", "data"])],
        effect: Effect::Task {
            text: TaskText::Literal("Prepare and send data export"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(1),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "approve_marketing",
        clauses: &[
            has(&["approve", "post"]),
            has(&["approve", "copy"]),
            has(&["approve", "campaign"]),
        ],
        effect: Effect::Task {
            text: TaskText::Literal("Approve marketing content"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(1),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "incident_outage",
        clauses: &[has(&["incident"]), has(&["outage"])],
        effect: Effect::Task {
            text: TaskText::Literal("Create incident/outage report"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(2),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "change_request",
        clauses: &[has(&["change request"]), has(&["scope change"])],
        effect: Effect::Task {
            text: TaskText::Literal("Estimate impact and respond to change request"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(2),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "user_research",
        clauses: &[has(&["recruit"]), has(&["research"]), has(&["study"])],
        effect: Effect::Task {
            text: TaskText::Literal("Recruit users/prepare research"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(4),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "press_release",
        clauses: &[has(&["press"])],
        effect: Effect::Task {
            text: TaskText::Literal("Review and edit press release"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(2),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "statement_of_work",
        clauses: &[has(&["finalize"]), has(&["sow"])],
        effect: Effect::Task {
            text: TaskText::Literal("Finalize statement of work"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(3),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "contract_renewal",
        clauses: &[has(&["renewal"])],
        effect: Effect::Task {
            text: TaskText::Literal("Review and approve contract renewal"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(10),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "no_action_marker",
        clauses: &[
            has(&["no action"]),
            has(&["fyi"]),
            has(&["digest"]),
            has(&["resolved"]),
            has(&["deployment"]),
        ],
        effect: Effect::Suppress,
    },
    Rule {
        name: "politeness_catch_all",
        clauses: &[
            has(&["can you"]),
            has(&["could you"]),
            has(&["please"]),
            has(&["would you"]),
        ],
        effect: Effect::Task {
            text: TaskText::WithContext("Review and respond: "),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(2),
            confidence: Confidence::Low,
        },
    },
];

static CALENDAR_RULES: &[Rule] = &[Rule {
    name: "meeting_prep",
    clauses: &[in_body(&["prepare"])],
    effect: Effect::Task {
        text: TaskText::Literal("Prepare meeting summary"),
        assignee: DEFAULT_OWNER,
        deadline: Deadline::InDays(1),
        confidence: Confidence::High,
    },
}];

static SLACK_RULES: &[Rule] = &[
    Rule {
        name: "server_logs",
        clauses: &[in_body(&["check", "logs"])],
        effect: Effect::Task {
            text: TaskText::Literal("Check server logs"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(1),
            confidence: Confidence::Medium,
        },
    },
    Rule {
        name: "deployment_checklist",
        clauses: &[in_body(&["deployment"])],
        effect: Effect::Task {
            text: TaskText::Literal("Update deployment checklist"),
            assignee: DEFAULT_OWNER,
            deadline: Deadline::InDays(2),
            confidence: Confidence::Medium,
        },
    },
];

fn rules_for(source: Source) -> &'static [Rule] {
    match source {
        Source::Email => EMAIL_RULES,
        Source::Calendar => CALENDAR_RULES,
        Source::Slack => SLACK_RULES,
    }
}

// =============================================================================
// Extractor
// =============================================================================

/// A confirmed extraction kept in the in-process audit log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedExtraction {
    #[serde(flatten)]
    pub candidate: TaskCandidate,
    pub added_on: String,
}

/// Stateless keyword-rule extractor with an append-only audit log.
///
/// The log records every extraction that produced a task; it never feeds
/// back into matching, so `extract` stays pure with respect to its return
/// value.
#[derive(Debug, Default)]
pub struct TaskExtractor {
    confirmed: Mutex<Vec<ConfirmedExtraction>>,
}

impl TaskExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract a task candidate from one message.
    pub fn extract(&self, content: &str, source: Source, subject_or_channel: &str) -> TaskCandidate {
        let body = content.to_lowercase();
        let subject = subject_or_channel.to_lowercase();
        let combined = format!("{} {}", body, subject);

        let mut candidate = TaskCandidate {
            task: None,
            assignee: DEFAULT_OWNER.to_string(),
            deadline: None,
            confidence: Confidence::Low,
            source,
            subject_or_channel: subject_or_channel.to_string(),
        };

        for rule in rules_for(source) {
            if !rule.matches(&combined, &subject, &body) {
                continue;
            }
            log::debug!("extraction rule '{}' matched ({})", rule.name, source);
            match &rule.effect {
                Effect::Suppress => {}
                Effect::Task {
                    text,
                    assignee,
                    deadline,
                    confidence,
                } => {
                    candidate.task = Some(render_task_text(text, subject_or_channel));
                    candidate.assignee = (*assignee).to_string();
                    candidate.deadline = Some(render_deadline(deadline));
                    candidate.confidence = *confidence;
                }
            }
            break;
        }

        if candidate.task.is_some() {
            self.confirmed.lock().push(ConfirmedExtraction {
                candidate: candidate.clone(),
                added_on: now_stamp(),
            });
        }

        candidate
    }

    /// Snapshot of the audit log, oldest first.
    pub fn confirmed_extractions(&self) -> Vec<ConfirmedExtraction> {
        self.confirmed.lock().clone()
    }
}

fn render_task_text(text: &TaskText, subject_or_channel: &str) -> String {
    match text {
        TaskText::Literal(s) => (*s).to_string(),
        TaskText::WithContext(prefix) => {
            let context: String = subject_or_channel.chars().take(CONTEXT_CHARS).collect();
            format!("{}{}", prefix, context)
        }
    }
}

fn render_deadline(deadline: &Deadline) -> String {
    match deadline {
        Deadline::Label(label) => (*label).to_string(),
        Deadline::InDays(days) => (Local::now() + Duration::days(*days))
            .format("%Y-%m-%d")
            .to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
