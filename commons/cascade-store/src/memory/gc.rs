use cascade_models::{ObjectKey, ResourceRef};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

pub(crate) type Objects = Arc<RwLock<HashMap<ObjectKey, ResourceRef>>>;

/// Simulated garbage collector for [`super::MemoryStore`].
///
/// Contract: once an owner is removed, every dependent whose owners are all
/// gone is removed as well, transitively, after `delay`. Dependents that
/// still have a live owner only lose the reference to the removed one.
#[derive(Debug, Clone)]
pub struct GarbageCollector {
    delay: Duration,
    enabled: bool,
}

impl GarbageCollector {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            enabled: true,
        }
    }

    /// A collector that never touches dependents.
    pub fn disabled() -> Self {
        Self {
            delay: Duration::ZERO,
            enabled: false,
        }
    }

    /// Foreground: dependents first, then the owner itself.
    pub(crate) fn spawn_foreground(
        &self,
        objects: Objects,
        owner: ObjectKey,
        owner_uid: String,
    ) {
        let gc = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(gc.delay).await;
            let mut objects = objects.write().await;
            if gc.enabled {
                let removed = sweep(&mut objects, &owner_uid);
                debug!(owner = %owner, removed = removed.len(), "foreground sweep");
            }
            let same_instance = objects
                .get(&owner)
                .and_then(|o| o.instance_id.as_deref())
                == Some(owner_uid.as_str());
            if same_instance {
                objects.remove(&owner);
                debug!(owner = %owner, "owner removed");
            }
        });
    }

    /// Background: the owner is already gone, collect what it left behind.
    pub(crate) fn spawn_background(&self, objects: Objects, owner_uid: String) {
        if !self.enabled {
            return;
        }
        let gc = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(gc.delay).await;
            let mut objects = objects.write().await;
            let removed = sweep(&mut objects, &owner_uid);
            debug!(owner_uid = %owner_uid, removed = removed.len(), "background sweep");
        });
    }
}

impl Default for GarbageCollector {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

/// Remove everything that depends only on `root_uid` (directly or through
/// other collected objects). Returns the keys that were removed.
pub(crate) fn sweep(
    objects: &mut HashMap<ObjectKey, ResourceRef>,
    root_uid: &str,
) -> Vec<ObjectKey> {
    let mut dying: HashSet<String> = HashSet::from([root_uid.to_string()]);
    let mut queue = vec![root_uid.to_string()];
    let mut removed = Vec::new();

    while let Some(uid) = queue.pop() {
        let dependents: Vec<ObjectKey> = objects
            .iter()
            .filter(|(_, o)| o.owner_refs.iter().any(|r| r.points_at(&uid)))
            .map(|(k, _)| k.clone())
            .collect();

        for key in dependents {
            let has_live_owner = objects[&key].owner_refs.iter().any(|r| {
                !dying.contains(&r.owner_instance_id)
                    && uid_exists(objects, &r.owner_instance_id)
            });
            if has_live_owner {
                if let Some(obj) = objects.get_mut(&key) {
                    obj.owner_refs.retain(|r| !r.points_at(&uid));
                }
                continue;
            }
            if let Some(obj) = objects.remove(&key) {
                if let Some(dep_uid) = obj.instance_id {
                    if dying.insert(dep_uid.clone()) {
                        queue.push(dep_uid);
                    }
                }
                removed.push(key);
            }
        }
    }
    removed
}

/// Drop every reference to `owner_uid` without removing anything.
pub(crate) fn orphan(
    objects: &mut HashMap<ObjectKey, ResourceRef>,
    owner_uid: &str,
) -> usize {
    let mut count = 0;
    for obj in objects.values_mut() {
        let before = obj.owner_refs.len();
        obj.owner_refs.retain(|r| !r.points_at(owner_uid));
        if obj.owner_refs.len() != before {
            count += 1;
        }
    }
    count
}

fn uid_exists(objects: &HashMap<ObjectKey, ResourceRef>, uid: &str) -> bool {
    objects.values().any(|o| o.instance_id.as_deref() == Some(uid))
}
