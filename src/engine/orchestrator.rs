use anyhow::{anyhow, Result};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::bus::StatusBus;
use crate::client::Platform;
use crate::config::RunConfig;
use crate::engine::pipeline::{run_agent, AgentContext};
use crate::error::ConfigError;
use crate::lifecycle::LifecycleController;
use crate::types::{AgentConfig, RunSession};

/// What the caller asks for: how many agents to drive, one credential per
/// agent, and the prefix/payload shared by every agent.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub agents: usize,
    pub credentials: Vec<String>,
    pub prefix: String,
    pub payload: String,
}

/// Completion side of an accepted run. Resolves once every agent has reached
/// `Done` and the controller is back to Idle.
#[derive(Debug)]
pub struct RunHandle {
    done: oneshot::Receiver<RunSession>,
}

impl RunHandle {
    pub async fn finished(self) -> Result<RunSession> {
        self.done
            .await
            .map_err(|_| anyhow!("run ended without completing"))
    }
}

/// Spawns and supervises one pipeline per agent. All pipelines of a run live
/// in a single background task and progress fully concurrently; the
/// orchestrator signals completion exactly once, however many agents failed
/// along the way.
pub struct Orchestrator {
    platform: Arc<dyn Platform>,
    bus: StatusBus,
    controller: Arc<LifecycleController>,
    config: RunConfig,
}

impl Orchestrator {
    pub fn new(
        platform: Arc<dyn Platform>,
        bus: StatusBus,
        controller: Arc<LifecycleController>,
        config: RunConfig,
    ) -> Self {
        Self {
            platform,
            bus,
            controller,
            config,
        }
    }

    /// Validate the request and start the run. Fails synchronously, before
    /// anything spawns, on a configuration problem; every later failure is
    /// reported on the bus instead.
    pub fn run(&self, request: RunRequest) -> Result<RunHandle, ConfigError> {
        Self::validate(&request)?;
        self.controller.begin()?;

        let quota = self.config.quota_per_agent(request.agents);
        let contexts: Vec<AgentContext> = (0..request.agents)
            .map(|i| AgentContext {
                config: AgentConfig {
                    label: format!("agent-{}", i + 1),
                    credential: request.credentials[i].clone(),
                    prefix: request.prefix.clone(),
                    payload: request.payload.clone(),
                    quota,
                },
                platform: Arc::clone(&self.platform),
                bus: self.bus.clone(),
                messages_per_resource: self.config.messages_per_resource,
                suffix_min: self.config.suffix_min,
                suffix_max: self.config.suffix_max,
            })
            .collect();

        self.bus.info(
            "run",
            format!("starting {} agents, {} resources each", request.agents, quota),
        );

        let (tx, rx) = oneshot::channel();
        let controller = Arc::clone(&self.controller);
        let mut session = RunSession::new();
        tokio::spawn(async move {
            let agents = join_all(contexts.into_iter().map(run_agent)).await;
            session.finish(agents);
            controller.finish();
            let _ = tx.send(session);
        });

        Ok(RunHandle { done: rx })
    }

    fn validate(request: &RunRequest) -> Result<(), ConfigError> {
        if request.agents == 0 {
            return Err(ConfigError::NoAgents);
        }
        if request.agents > request.credentials.len() {
            return Err(ConfigError::InsufficientCredentials {
                requested: request.agents,
                supplied: request.credentials.len(),
            });
        }
        for (index, credential) in request.credentials.iter().take(request.agents).enumerate() {
            if credential.trim().is_empty() {
                return Err(ConfigError::BlankCredential { index });
            }
        }
        Ok(())
    }
}
