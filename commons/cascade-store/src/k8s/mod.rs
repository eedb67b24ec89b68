use crate::error::GatewayError;
use crate::traits::*;
use async_trait::async_trait;
use cascade_models::{
    CONFIG_MAP_KIND, ObjectKey, OwnerReference, PropagationPolicy, ResourceRef,
};
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use kube::{
    Api, Client,
    api::{DeleteParams, PostParams},
};
use tracing::{debug, instrument};

/// Gateway backed by a Kubernetes API server. Resources are ConfigMaps.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn try_default() -> GatewayResult<Self> {
        let client = Client::try_default().await?;
        Ok(Self::new(client))
    }

    fn api(&self, key: &ObjectKey) -> GatewayResult<Api<ConfigMap>> {
        ensure_supported(&key.kind)?;
        Ok(Api::namespaced(self.client.clone(), &key.namespace))
    }
}

fn ensure_supported(kind: &str) -> GatewayResult<()> {
    if kind == CONFIG_MAP_KIND {
        Ok(())
    } else {
        Err(GatewayError::Rejected(format!("unsupported kind {kind}")))
    }
}

fn delete_params(propagation: PropagationPolicy) -> DeleteParams {
    match propagation {
        PropagationPolicy::Foreground => DeleteParams::foreground(),
        PropagationPolicy::Background => DeleteParams::background(),
        PropagationPolicy::Orphan => DeleteParams::orphan(),
    }
}

fn is_not_found(e: &kube::Error) -> bool {
    matches!(e, kube::Error::Api(ae) if ae.code == 404)
}

fn is_conflict(e: &kube::Error) -> bool {
    matches!(e, kube::Error::Api(ae) if ae.code == 409)
}

pub(crate) fn to_owner_reference(
    owner: &OwnerReference,
) -> GatewayResult<metav1::OwnerReference> {
    ensure_supported(&owner.owner_kind)?;
    Ok(metav1::OwnerReference {
        api_version: <ConfigMap as k8s_openapi::Resource>::API_VERSION
            .to_string(),
        kind: owner.owner_kind.clone(),
        name: owner.owner_name.clone(),
        uid: owner.owner_instance_id.clone(),
        controller: Some(owner.is_controller),
        block_owner_deletion: Some(owner.block_owner_deletion),
    })
}

pub(crate) fn to_config_map(resource: &ResourceRef) -> GatewayResult<ConfigMap> {
    let owner_references = resource
        .owner_refs
        .iter()
        .map(to_owner_reference)
        .collect::<GatewayResult<Vec<_>>>()?;
    Ok(ConfigMap {
        metadata: metav1::ObjectMeta {
            name: Some(resource.name().to_string()),
            namespace: Some(resource.namespace().to_string()),
            uid: resource.instance_id.clone(),
            owner_references: if owner_references.is_empty() {
                None
            } else {
                Some(owner_references)
            },
            ..Default::default()
        },
        data: if resource.data.is_empty() {
            None
        } else {
            Some(resource.data.clone())
        },
        ..Default::default()
    })
}

pub(crate) fn from_config_map(key: &ObjectKey, cm: ConfigMap) -> ResourceRef {
    let mut res = ResourceRef::new(key.clone());
    res.instance_id = cm.metadata.uid;
    res.deletion_requested = cm.metadata.deletion_timestamp.is_some();
    res.owner_refs = cm
        .metadata
        .owner_references
        .unwrap_or_default()
        .into_iter()
        .map(|r| OwnerReference {
            owner_instance_id: r.uid,
            owner_kind: r.kind,
            owner_name: r.name,
            is_controller: r.controller.unwrap_or(false),
            block_owner_deletion: r.block_owner_deletion.unwrap_or(false),
        })
        .collect();
    res.data = cm.data.unwrap_or_default();
    res
}

#[async_trait]
impl ResourceGateway for KubeStore {
    #[instrument(skip_all, fields(key = %resource.key()))]
    async fn create(&self, resource: &ResourceRef) -> GatewayResult<ResourceRef> {
        let api = self.api(resource.key())?;
        let mut cm = to_config_map(resource)?;
        cm.metadata.uid = None;
        match api.create(&PostParams::default(), &cm).await {
            Ok(created) => Ok(from_config_map(resource.key(), created)),
            Err(e) if is_conflict(&e) => {
                Err(GatewayError::AlreadyExists(resource.key().clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip_all, fields(key = %resource.key()))]
    async fn update(
        &self,
        resource: &ResourceRef,
    ) -> GatewayResult<Option<ResourceRef>> {
        let api = self.api(resource.key())?;
        let cm = to_config_map(resource)?;
        match api
            .replace(resource.name(), &PostParams::default(), &cm)
            .await
        {
            Ok(updated) => Ok(Some(from_config_map(resource.key(), updated))),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, key: &ObjectKey) -> GatewayResult<Option<ResourceRef>> {
        let api = self.api(key)?;
        let found = api.get_opt(&key.name).await?;
        Ok(found.map(|cm| from_config_map(key, cm)))
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        key: &ObjectKey,
        propagation: PropagationPolicy,
    ) -> GatewayResult<Deletion> {
        let api = self.api(key)?;
        match api.delete(&key.name, &delete_params(propagation)).await {
            Ok(_) => {
                debug!("delete accepted");
                Ok(Deletion::Requested)
            }
            Err(e) if is_not_found(&e) => Ok(Deletion::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
