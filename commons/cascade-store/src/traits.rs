use crate::error::GatewayError;
use async_trait::async_trait;
use cascade_models::{ObjectKey, PropagationPolicy, ResourceRef};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Outcome of a delete call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// The store accepted the request. Removal may still be pending.
    Requested,
    NotFound,
}

/// Synchronous-per-call access to an eventually consistent resource store.
///
/// Every call observes the caller's own previous writes on the same key.
/// Background reconciliation (garbage collection in particular) happens
/// asynchronously and is only visible through later `get` calls.
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    /// Persist a new resource. The returned snapshot carries the
    /// store-assigned instance id.
    async fn create(&self, resource: &ResourceRef) -> GatewayResult<ResourceRef>;

    /// Full replace of an existing resource. `None` if it does not exist.
    async fn update(
        &self,
        resource: &ResourceRef,
    ) -> GatewayResult<Option<ResourceRef>>;

    async fn get(&self, key: &ObjectKey) -> GatewayResult<Option<ResourceRef>>;

    async fn delete(
        &self,
        key: &ObjectKey,
        propagation: PropagationPolicy,
    ) -> GatewayResult<Deletion>;
}

#[async_trait]
impl<T> ResourceGateway for std::sync::Arc<T>
where
    T: ResourceGateway + ?Sized,
{
    async fn create(&self, resource: &ResourceRef) -> GatewayResult<ResourceRef> {
        (**self).create(resource).await
    }

    async fn update(
        &self,
        resource: &ResourceRef,
    ) -> GatewayResult<Option<ResourceRef>> {
        (**self).update(resource).await
    }

    async fn get(&self, key: &ObjectKey) -> GatewayResult<Option<ResourceRef>> {
        (**self).get(key).await
    }

    async fn delete(
        &self,
        key: &ObjectKey,
        propagation: PropagationPolicy,
    ) -> GatewayResult<Deletion> {
        (**self).delete(key, propagation).await
    }
}
