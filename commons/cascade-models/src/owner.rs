use serde::{Deserialize, Serialize};

/// Link recorded on a dependent naming one of its owners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnerReference {
    pub owner_instance_id: String,
    pub owner_kind: String,
    pub owner_name: String,
    /// At most one reference per dependent may set this.
    pub is_controller: bool,
    pub block_owner_deletion: bool,
}

impl OwnerReference {
    pub fn points_at(&self, instance_id: &str) -> bool {
        self.owner_instance_id == instance_id
    }
}
