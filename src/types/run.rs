use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AgentRun, RunId, RunState};

/// Aggregate record for one invocation of the orchestrator. Discarded once
/// the controller returns to Idle; no state survives across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSession {
    pub id: RunId,
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub agents: Vec<AgentRun>,
}

impl RunSession {
    pub fn new() -> Self {
        Self {
            id: RunId::new_v4(),
            state: RunState::Running,
            started_at: Utc::now(),
            agents: Vec::new(),
        }
    }

    /// Seal the session once every pipeline has reached `Done`. Monotonic:
    /// there is no path back to `Running`.
    pub fn finish(&mut self, agents: Vec<AgentRun>) {
        self.agents = agents;
        self.state = RunState::Done;
    }
}

impl Default for RunSession {
    fn default() -> Self {
        Self::new()
    }
}
