#![deny(missing_docs)]
#![doc = "Core types shared by the bivariate bicycle code search: structured errors, provenance, GF(2) matrices and the accepted configuration record."]

pub mod errors;
pub mod matrix;
pub mod provenance;
mod types;

pub use errors::{BbcError, ErrorInfo};
pub use matrix::{BitMatrix, EchelonBasis, IntMatrix};
pub use provenance::{RunProvenance, SchemaVersion};
pub use types::{CodeConfig, DistanceOutcome, Family, PolynomialTerm};

/// Schema version written into every persisted archive.
pub const ARCHIVE_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);
