//! Provenance and schema descriptors attached to persisted archives.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information attached to every persisted archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Canonical hash of the search plan that produced the records.
    pub plan_hash: String,
    /// Canonical hash of the stored configurations.
    pub configs_hash: String,
    /// RFC 3339 timestamp of the last write.
    pub created_at: String,
    /// Name of the pass that last touched the archive (`search`, `distance`).
    #[serde(default)]
    pub stage: String,
    /// Version map for all tools involved in the run.
    #[serde(default)]
    pub tool_versions: BTreeMap<String, String>,
}
