pub mod agent;
pub mod event;
pub mod run;

pub use agent::{AgentConfig, AgentRun, Resource};
pub use event::{Severity, StatusEvent};
pub use run::RunSession;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type RunId = Uuid;

/// Phase of a single agent's lifecycle pipeline. Transitions are strictly
/// forward; `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Connecting,   // Establishing the platform session
    Clearing,     // Deleting every resource visible in scope
    Provisioning, // Creating the agent's quota of new resources
    Populating,   // Sending messages into each created resource
    Closing,      // Releasing the session
    Done,         // Terminal
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Connecting => "Connecting",
            Stage::Clearing => "Clearing",
            Stage::Provisioning => "Provisioning",
            Stage::Populating => "Populating",
            Stage::Closing => "Closing",
            Stage::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    Done,
}

/// Control-side state: whether a run is currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlState {
    Idle,
    Running,
}

impl ControlState {
    pub fn as_str(&self) -> &str {
        match self {
            ControlState::Idle => "Idle",
            ControlState::Running => "Running",
        }
    }
}
