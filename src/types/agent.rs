use serde::{Deserialize, Serialize};

use super::Stage;
use crate::client::ResourceRef;

/// Immutable per-agent configuration, fully constructed before the agent's
/// pipeline is spawned. Nothing here is shared mutably across agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub label: String,
    pub credential: String,
    pub prefix: String,
    pub payload: String,
    pub quota: usize,
}

/// A resource successfully created by one agent during Provisioning.
/// Owned exclusively by that agent's run; never touched by another pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub remote: ResourceRef,
    pub ordinal: usize,
}

/// Runtime record for one agent. Mutated only by its own pipeline and
/// handed back to the orchestrator once the pipeline reaches `Done`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRun {
    pub label: String,
    pub stage: Stage,
    pub resources: Vec<Resource>,
}

impl AgentRun {
    pub fn new(label: String) -> Self {
        Self {
            label,
            stage: Stage::Connecting,
            resources: Vec::new(),
        }
    }

    pub fn record(&mut self, remote: ResourceRef) {
        let ordinal = self.resources.len() + 1;
        self.resources.push(Resource { remote, ordinal });
    }
}
