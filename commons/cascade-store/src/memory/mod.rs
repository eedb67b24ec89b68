mod gc;

pub use gc::GarbageCollector;

use crate::error::GatewayError;
use crate::traits::*;
use async_trait::async_trait;
use cascade_models::{ObjectKey, PropagationPolicy, ResourceRef};
use gc::Objects;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// In-process store with a simulated garbage collector.
#[derive(Clone)]
pub struct MemoryStore {
    objects: Objects,
    gc: GarbageCollector,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_collector(GarbageCollector::default())
    }

    pub fn with_collector(gc: GarbageCollector) -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            gc,
        }
    }

    pub fn with_gc_delay(delay: Duration) -> Self {
        Self::with_collector(GarbageCollector::new(delay))
    }

    /// Owners still get removed, dependents are never collected.
    pub fn with_gc_disabled() -> Self {
        Self::with_collector(GarbageCollector::disabled())
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(resource: &ResourceRef) -> GatewayResult<()> {
    if resource.name().is_empty() {
        return Err(GatewayError::Rejected("metadata.name is required".into()));
    }
    if resource.owner_refs.iter().filter(|r| r.is_controller).count() > 1 {
        return Err(GatewayError::Rejected(
            "only one owner reference can have controller set to true".into(),
        ));
    }
    Ok(())
}

#[async_trait]
impl ResourceGateway for MemoryStore {
    async fn create(&self, resource: &ResourceRef) -> GatewayResult<ResourceRef> {
        validate(resource)?;
        let mut store = self.objects.write().await;
        if store.contains_key(resource.key()) {
            return Err(GatewayError::AlreadyExists(resource.key().clone()));
        }
        let mut stored = resource.clone();
        stored.instance_id = Some(uuid::Uuid::new_v4().to_string());
        stored.deletion_requested = false;
        store.insert(stored.key().clone(), stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        resource: &ResourceRef,
    ) -> GatewayResult<Option<ResourceRef>> {
        validate(resource)?;
        let mut store = self.objects.write().await;
        let Some(current) = store.get_mut(resource.key()) else {
            return Ok(None);
        };
        if resource.instance_id.is_some()
            && resource.instance_id != current.instance_id
        {
            return Err(GatewayError::Rejected(format!(
                "instance id mismatch for {}",
                resource.key()
            )));
        }
        current.owner_refs = resource.owner_refs.clone();
        current.data = resource.data.clone();
        Ok(Some(current.clone()))
    }

    async fn get(&self, key: &ObjectKey) -> GatewayResult<Option<ResourceRef>> {
        let store = self.objects.read().await;
        Ok(store.get(key).cloned())
    }

    async fn delete(
        &self,
        key: &ObjectKey,
        propagation: PropagationPolicy,
    ) -> GatewayResult<Deletion> {
        let mut store = self.objects.write().await;
        let Some(current) = store.get_mut(key) else {
            return Ok(Deletion::NotFound);
        };
        if current.deletion_requested {
            return Ok(Deletion::Requested);
        }
        let Some(uid) = current.instance_id.clone() else {
            return Err(GatewayError::Backend(format!(
                "stored object {} has no instance id",
                key
            )));
        };
        debug!(key = %key, %propagation, "delete requested");
        match propagation {
            PropagationPolicy::Foreground => {
                current.deletion_requested = true;
                self.gc
                    .spawn_foreground(self.objects.clone(), key.clone(), uid);
            }
            PropagationPolicy::Background => {
                store.remove(key);
                self.gc.spawn_background(self.objects.clone(), uid);
            }
            PropagationPolicy::Orphan => {
                store.remove(key);
                let orphaned = gc::orphan(&mut store, &uid);
                debug!(key = %key, orphaned, "dependents orphaned");
            }
        }
        Ok(Deletion::Requested)
    }
}
