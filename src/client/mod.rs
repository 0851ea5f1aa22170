pub mod memory;

pub use memory::InMemoryPlatform;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::PlatformError;

/// Opaque handle to a resource as the platform knows it. The engine never
/// inspects the id; it only hands refs back to the session that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: Uuid,
    pub name: String,
}

/// Entry point to the external platform. One `connect` per agent, each
/// yielding an independent session scoped to that agent's credential.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn connect(&self, credential: &str) -> Result<Arc<dyn Session>, PlatformError>;
}

/// A live session on the external platform. Every method is a suspension
/// point; none of them is retried by the engine.
#[async_trait]
pub trait Session: Send + Sync {
    /// Enumerate every resource currently visible in this session's scope.
    async fn list_resources(&self) -> Result<Vec<ResourceRef>, PlatformError>;

    async fn delete_resource(&self, resource: &ResourceRef) -> Result<(), PlatformError>;

    async fn create_resource(&self, name: &str) -> Result<ResourceRef, PlatformError>;

    async fn send_message(
        &self,
        resource: &ResourceRef,
        payload: &str,
    ) -> Result<(), PlatformError>;

    /// Release the session. Best effort; the pipeline moves to `Done`
    /// regardless of the outcome.
    async fn close(&self);
}
