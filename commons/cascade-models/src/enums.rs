use serde::{Deserialize, Serialize};
use std::fmt;

/// How the store treats dependents when an owner is deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PropagationPolicy {
    /// Owner is marked for deletion and only removed once the dependents
    /// it blocks are gone.
    Foreground,
    /// Owner is removed immediately; dependents are collected afterwards.
    Background,
    /// Owner is removed; dependents lose the reference and survive.
    Orphan,
}

impl Default for PropagationPolicy {
    fn default() -> Self {
        Self::Background
    }
}

impl fmt::Display for PropagationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropagationPolicy::Foreground => "Foreground",
            PropagationPolicy::Background => "Background",
            PropagationPolicy::Orphan => "Orphan",
        };
        f.write_str(s)
    }
}
