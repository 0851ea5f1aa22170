use futures::future::join_all;
use std::future::Future;

use crate::bus::StatusBus;
use crate::error::PlatformError;

/// Runs a batch of independent unit-operations concurrently and reports every
/// outcome on the status bus. One executor serves one agent; each operation
/// carries a short label used in the reported lines.
///
/// A batch always settles completely: an individual failure is reported and
/// swallowed, never raised to the caller, and never delays or cancels the
/// rest of the batch.
pub struct FanoutExecutor {
    bus: StatusBus,
    agent: String,
}

impl FanoutExecutor {
    pub fn new(bus: StatusBus, agent: impl Into<String>) -> Self {
        Self {
            bus,
            agent: agent.into(),
        }
    }

    /// Launch all operations at once, wait until every one has settled, and
    /// return the successful values in submission order. An empty batch
    /// completes immediately with no side effects.
    pub async fn settle<T, Fut>(&self, ops: Vec<(String, Fut)>) -> Vec<T>
    where
        Fut: Future<Output = Result<T, PlatformError>>,
    {
        if ops.is_empty() {
            return Vec::new();
        }

        let (labels, futures): (Vec<String>, Vec<Fut>) = ops.into_iter().unzip();
        let outcomes = join_all(futures).await;

        let mut succeeded = Vec::new();
        for (label, outcome) in labels.into_iter().zip(outcomes) {
            match outcome {
                Ok(value) => {
                    self.bus.info(&self.agent, format!("done: {label}"));
                    succeeded.push(value);
                }
                Err(err) => {
                    self.bus.error(&self.agent, format!("failed: {label}: {err}"));
                }
            }
        }
        succeeded
    }
}
