use thiserror::Error;

/// Pre-run validation failures. The only errors surfaced synchronously by
/// `Orchestrator::run`; nothing has been spawned when one of these returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("requested {requested} agents but only {supplied} credentials were supplied")]
    InsufficientCredentials { requested: usize, supplied: usize },

    #[error("credential {index} is blank")]
    BlankCredential { index: usize },

    #[error("at least one agent is required")]
    NoAgents,

    #[error("a run is already in progress")]
    RunInProgress,
}

/// Failures raised by the injected platform client. Connection failures end
/// one agent's pipeline; operation failures are reported per unit-operation
/// and never abort the batch they belong to.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("{0}")]
    Operation(String),
}
