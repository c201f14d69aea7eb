pub mod error;
pub mod node;
pub mod rules;
pub mod types;
pub mod validate;
pub mod well_known;

/// Package that owns the well-known message types.
pub const WELL_KNOWN_PACKAGE: &str = "google.protobuf";

/// Largest magnitude of a `google.protobuf.Duration`, in seconds (10,000 years).
pub const MAX_DURATION_SECONDS: i64 = 315_576_000_000;

/// Earliest valid `google.protobuf.Timestamp` (0001-01-01T00:00:00Z).
pub const MIN_TIMESTAMP_SECONDS: i64 = -62_135_596_800;

/// Latest valid `google.protobuf.Timestamp` (9999-12-31T23:59:59Z).
pub const MAX_TIMESTAMP_SECONDS: i64 = 253_402_300_799;

use crate::error::{CheckError, SchemaError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        error::{CheckError, CheckErrorKind, SchemaError},
        node::*,
        rules::*,
        types::{ProtoType, WellKnownType},
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    CheckError(#[from] CheckError),

    #[error(transparent)]
    SchemaError(#[from] SchemaError),
}
