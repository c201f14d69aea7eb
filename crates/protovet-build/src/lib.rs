//! ## Crate layout
//! - `config`: plugin parameter parsing.
//! - `context`: projection of declared rules onto a field, key, element or
//!   unwrapped position.
//! - `render`: typed dispatch from a context to a target's templates.
//! - `target`: the Java and Rust output languages.
//! - `format`: optional post-formatting of rendered artifacts.
//! - `generator`: the check-then-render walk over a request.

pub mod config;
pub mod context;
pub mod format;
pub mod generator;
pub mod render;
pub mod request;
pub mod target;

pub use generator::{GenerateError, execute, generate};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        context::{ContextRules, ProjectionError, RuleContext, Tag},
        format::{FormatError, Formatter, Rustfmt},
        generator::{GenerateError, execute, generate},
        render::{FieldTemplates, RenderError, Renderer},
        request::{Artifact, Request},
        target::{Lang, Target, Unit},
    };
}
