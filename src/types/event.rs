use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Info => "info",
            Severity::Error => "error",
        }
    }
}

/// One line of progress reported from somewhere inside a run. Append-only:
/// an event is never mutated after emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    pub at: DateTime<Utc>,
    pub agent: String,
    pub severity: Severity,
    pub text: String,
}

impl StatusEvent {
    pub fn new(agent: impl Into<String>, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            agent: agent.into(),
            severity,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] [{}] {}",
            self.severity.as_str(),
            self.agent,
            self.text
        )
    }
}
