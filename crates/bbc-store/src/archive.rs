use std::fs;
use std::path::{Path, PathBuf};

use bbc_core::{BbcError, CodeConfig, ErrorInfo, RunProvenance, SchemaVersion, ARCHIVE_SCHEMA};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::serde::{from_bincode, from_json_slice, stable_hash_string, to_bincode, to_pretty_json};

/// File written by the search pass.
pub const SEARCH_ARCHIVE: &str = "codes_no_distance.bin";
/// File written by the distance pass; the search archive is left untouched.
pub const DISTANCE_ARCHIVE: &str = "codes_with_distance.bin";

/// Persisted set of accepted configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigArchive {
    /// Schema of this envelope.
    pub schema_version: SchemaVersion,
    /// Where the records came from.
    pub provenance: RunProvenance,
    /// Records ordered by `(l, m, weight, ordinal)`.
    pub configs: Vec<CodeConfig>,
}

impl ConfigArchive {
    /// Wraps `configs` produced by `stage` from the plan hashed as `plan_hash`.
    pub fn new(configs: Vec<CodeConfig>, plan_hash: String, stage: &str) -> Result<Self, BbcError> {
        let mut archive = Self {
            schema_version: ARCHIVE_SCHEMA,
            provenance: RunProvenance {
                plan_hash,
                tool_versions: [(
                    env!("CARGO_PKG_NAME").to_string(),
                    env!("CARGO_PKG_VERSION").to_string(),
                )]
                .into_iter()
                .collect(),
                ..RunProvenance::default()
            },
            configs,
        };
        archive.stamp(stage)?;
        Ok(archive)
    }

    /// Records that `stage` rewrote the configurations.
    pub fn stamp(&mut self, stage: &str) -> Result<(), BbcError> {
        self.provenance.configs_hash = stable_hash_string(&self.configs)?;
        self.provenance.stage = stage.to_string();
        self.provenance.created_at = Utc::now().to_rfc3339();
        Ok(())
    }

    /// Checks the schema major version and the configs hash.
    pub fn verify(&self) -> Result<(), BbcError> {
        if self.schema_version.major != ARCHIVE_SCHEMA.major {
            let info = ErrorInfo::new("schema-mismatch", "archive schema is not supported")
                .with_context("found", format!("{:?}", self.schema_version))
                .with_context("expected_major", ARCHIVE_SCHEMA.major.to_string());
            return Err(BbcError::Serde(info));
        }
        let actual = stable_hash_string(&self.configs)?;
        if actual != self.provenance.configs_hash {
            let info = ErrorInfo::new("hash-mismatch", "stored configs do not match their hash")
                .with_context("expected", self.provenance.configs_hash.clone())
                .with_context("actual", actual)
                .with_hint("the archive was modified outside the search tools");
            return Err(BbcError::Serde(info));
        }
        Ok(())
    }
}

/// Encoding selected from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Pretty printed JSON.
    Json,
    /// `bincode`.
    Bincode,
}

impl ArchiveFormat {
    /// `.json` selects JSON, anything else binary.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ArchiveFormat::Json,
            _ => ArchiveFormat::Bincode,
        }
    }
}

fn io_error(code: &str, path: &Path, err: std::io::Error) -> BbcError {
    BbcError::Io(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `archive` to `path`; the file is replaced atomically.
pub fn save_archive(path: &Path, archive: &ConfigArchive) -> Result<(), BbcError> {
    let bytes = match ArchiveFormat::from_path(path) {
        ArchiveFormat::Json => to_pretty_json(archive)?,
        ArchiveFormat::Bincode => to_bincode(archive)?,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| io_error("archive-dir", parent, err))?;
    }
    let staging = temp_path(path);
    fs::write(&staging, &bytes).map_err(|err| io_error("archive-write", &staging, err))?;
    fs::rename(&staging, path).map_err(|err| io_error("archive-rename", path, err))?;
    info!(
        "wrote {} configurations to {} ({} bytes)",
        archive.configs.len(),
        path.display(),
        bytes.len()
    );
    Ok(())
}

/// Reads and verifies an archive written by [`save_archive`].
pub fn load_archive(path: &Path) -> Result<ConfigArchive, BbcError> {
    let bytes = fs::read(path).map_err(|err| io_error("archive-read", path, err))?;
    let archive: ConfigArchive = match ArchiveFormat::from_path(path) {
        ArchiveFormat::Json => from_json_slice(&bytes)?,
        ArchiveFormat::Bincode => from_bincode(&bytes)?,
    };
    archive.verify()?;
    debug!(
        "loaded {} configurations from {} (stage {})",
        archive.configs.len(),
        path.display(),
        archive.provenance.stage
    );
    Ok(archive)
}
