use protovet_build::GenerateError;
use thiserror::Error as ThisError;

///
/// Error
/// public error type of a generator run
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum Error {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("malformed request: {0}")]
    Request(#[from] serde_json::Error),
}
