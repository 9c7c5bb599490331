#![deny(missing_docs)]
#![doc = "Archive envelope, persistence and summaries for accepted configurations."]

/// Versioned archive envelope and its atomic file persistence.
mod archive;
/// Canonical JSON hashing and the encoders behind the archive formats.
pub mod serde;
/// Aggregate statistics over a stored archive.
mod summary;

pub use archive::{
    load_archive, save_archive, ArchiveFormat, ConfigArchive, DISTANCE_ARCHIVE, SEARCH_ARCHIVE,
};
pub use summary::{summarize, ArchiveSummary, ParameterCount};

pub use crate::serde::{stable_hash_string, to_canonical_json_bytes};
