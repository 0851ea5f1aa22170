use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use super::{Platform, ResourceRef, Session};
use crate::error::PlatformError;

/// Attempt counts observed by the in-memory platform across all sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub connects: usize,
    pub lists: usize,
    pub deletes: usize,
    pub creates: usize,
    pub sends: usize,
    pub closes: usize,
}

#[derive(Default)]
struct Inner {
    scopes: HashMap<String, Vec<ResourceRef>>,
    denied_credentials: HashSet<String>,
    undeletable: HashSet<String>,
    create_failures: usize,
    send_failures: usize,
    counters: Counters,
}

/// In-memory stand-in for the external platform. Each credential maps to an
/// independent scope of resources; failure knobs let callers script denied
/// connections, undeletable resources, and budgets of create/send failures.
#[derive(Clone, Default)]
pub struct InMemoryPlatform {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a credential's scope with named resources.
    pub fn seed(&self, credential: &str, names: &[&str]) {
        let mut inner = self.inner.write().unwrap();
        let scope = inner.scopes.entry(credential.to_string()).or_default();
        for name in names {
            scope.push(ResourceRef {
                id: Uuid::new_v4(),
                name: (*name).to_string(),
            });
        }
    }

    /// Make `connect` fail for the given credential.
    pub fn deny_credential(&self, credential: &str) {
        let mut inner = self.inner.write().unwrap();
        inner.denied_credentials.insert(credential.to_string());
    }

    /// Make every deletion of the named resource fail.
    pub fn refuse_delete(&self, name: &str) {
        let mut inner = self.inner.write().unwrap();
        inner.undeletable.insert(name.to_string());
    }

    /// Fail the next `n` create attempts, across all sessions.
    pub fn fail_next_creates(&self, n: usize) {
        self.inner.write().unwrap().create_failures = n;
    }

    /// Fail the next `n` send attempts, across all sessions.
    pub fn fail_next_sends(&self, n: usize) {
        self.inner.write().unwrap().send_failures = n;
    }

    pub fn counters(&self) -> Counters {
        self.inner.read().unwrap().counters
    }

    /// Names currently visible in a credential's scope.
    pub fn scope_names(&self, credential: &str) -> Vec<String> {
        let inner = self.inner.read().unwrap();
        inner
            .scopes
            .get(credential)
            .map(|scope| scope.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Platform for InMemoryPlatform {
    async fn connect(&self, credential: &str) -> Result<Arc<dyn Session>, PlatformError> {
        let mut inner = self.inner.write().unwrap();
        inner.counters.connects += 1;
        if inner.denied_credentials.contains(credential) {
            return Err(PlatformError::Connection(format!(
                "credential rejected: {credential}"
            )));
        }
        inner.scopes.entry(credential.to_string()).or_default();
        Ok(Arc::new(MemorySession {
            credential: credential.to_string(),
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct MemorySession {
    credential: String,
    inner: Arc<RwLock<Inner>>,
}

#[async_trait]
impl Session for MemorySession {
    async fn list_resources(&self) -> Result<Vec<ResourceRef>, PlatformError> {
        let mut inner = self.inner.write().unwrap();
        inner.counters.lists += 1;
        Ok(inner
            .scopes
            .get(&self.credential)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_resource(&self, resource: &ResourceRef) -> Result<(), PlatformError> {
        let mut inner = self.inner.write().unwrap();
        inner.counters.deletes += 1;
        if inner.undeletable.contains(&resource.name) {
            return Err(PlatformError::Operation(format!(
                "cannot delete {}",
                resource.name
            )));
        }
        if let Some(scope) = inner.scopes.get_mut(&self.credential) {
            scope.retain(|r| r.id != resource.id);
        }
        Ok(())
    }

    async fn create_resource(&self, name: &str) -> Result<ResourceRef, PlatformError> {
        let mut inner = self.inner.write().unwrap();
        inner.counters.creates += 1;
        if inner.create_failures > 0 {
            inner.create_failures -= 1;
            return Err(PlatformError::Operation(format!("cannot create {name}")));
        }
        let resource = ResourceRef {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        inner
            .scopes
            .entry(self.credential.clone())
            .or_default()
            .push(resource.clone());
        Ok(resource)
    }

    async fn send_message(
        &self,
        resource: &ResourceRef,
        _payload: &str,
    ) -> Result<(), PlatformError> {
        let mut inner = self.inner.write().unwrap();
        inner.counters.sends += 1;
        if inner.send_failures > 0 {
            inner.send_failures -= 1;
            return Err(PlatformError::Operation(format!(
                "cannot send into {}",
                resource.name
            )));
        }
        Ok(())
    }

    async fn close(&self) {
        self.inner.write().unwrap().counters.closes += 1;
    }
}
