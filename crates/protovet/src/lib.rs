//! ## Crate layout
//! - `build`: rule projection, templates, targets and the generator.
//! - `schema`: descriptor and rule models, consistency checks and the
//!   well-known pattern tables.
//!
//! The `prelude` module brings both halves into scope for plugin drivers.

pub use protovet_build as build;
pub use protovet_schema as schema;

mod error;

pub use error::Error;

use protovet_build::request::{Artifact, Request};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::Error;
    pub use protovet_build::prelude::*;
    pub use protovet_schema::prelude::*;
}

/// Decode a JSON request and generate every artifact it asks for.
pub fn run(json: &str) -> Result<Vec<Artifact>, Error> {
    let request = Request::from_json(json)?;
    let artifacts = protovet_build::execute(&request)?;

    tracing::info!(artifacts = artifacts.len(), "generation complete");

    Ok(artifacts)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_requests_are_rejected() {
        assert!(matches!(run("{"), Err(Error::Request(_))));
    }

    #[test]
    fn empty_requests_generate_nothing() {
        let artifacts = run(r#"{ "files": [], "parameter": "lang=java" }"#).unwrap();

        assert!(artifacts.is_empty());
    }

    #[test]
    fn generator_errors_pass_through() {
        assert!(matches!(
            run(r#"{ "files": [], "parameter": "lang=cobol" }"#),
            Err(Error::Generate(_))
        ));
    }
}
