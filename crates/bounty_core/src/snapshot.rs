use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Deduplicated identifiers for one program. Ordered so persisted output is stable.
pub type TargetSet = BTreeSet<String>;

/// Program name -> targets, for one platform at one point in time.
pub type PlatformSnapshot = BTreeMap<String, TargetSet>;

/// Platform name -> most recently observed snapshot.
///
/// Serializes as `{platform: {program: [identifier, ...]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedState {
    platforms: BTreeMap<String, PlatformSnapshot>,
}

impl PersistedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platform(&self, platform: &str) -> Option<&PlatformSnapshot> {
        self.platforms.get(platform)
    }

    /// Replace a platform's snapshot wholesale.
    pub fn replace_platform(&mut self, platform: impl Into<String>, snapshot: PlatformSnapshot) {
        self.platforms.insert(platform.into(), snapshot);
    }

    pub fn program_count(&self) -> usize {
        self.platforms.values().map(BTreeMap::len).sum()
    }
}
