use crate::owner::OwnerReference;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const CONFIG_MAP_KIND: &str = "ConfigMap";

/// Stable identity of a resource inside the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn config_map(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::new(CONFIG_MAP_KIND, namespace, name)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// Identity plus the last observed state of a resource.
///
/// The key is fixed at construction; everything else is a snapshot that the
/// store overwrites on every create, update and get.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceRef {
    key: ObjectKey,
    pub instance_id: Option<String>,
    #[serde(default)]
    pub owner_refs: Vec<OwnerReference>,
    #[serde(default)]
    pub deletion_requested: bool,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl ResourceRef {
    pub fn new(key: ObjectKey) -> Self {
        Self {
            key,
            instance_id: None,
            owner_refs: Vec::new(),
            deletion_requested: false,
            data: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn namespace(&self) -> &str {
        &self.key.namespace
    }

    pub fn kind(&self) -> &str {
        &self.key.kind
    }

    pub fn with_data(
        mut self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.data.insert(field.into(), value.into());
        self
    }

    /// The owner reference flagged as controller, if any.
    pub fn controller_ref(&self) -> Option<&OwnerReference> {
        self.owner_refs.iter().find(|r| r.is_controller)
    }

    pub fn is_controlled_by(&self, owner_instance_id: &str) -> bool {
        self.controller_ref()
            .map(|r| r.points_at(owner_instance_id))
            .unwrap_or(false)
    }
}
