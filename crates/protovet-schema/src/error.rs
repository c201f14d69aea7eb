use crate::rules::TemporalError;
use thiserror::Error as ThisError;

///
/// SchemaError
/// failures reading descriptors or decoding their extension payloads
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum SchemaError {
    #[error("malformed extension `{key}`: {reason}")]
    MalformedExtension { key: String, reason: String },

    #[error("unknown enum `{0}`")]
    UnknownEnum(String),

    #[error("unknown message `{0}`")]
    UnknownMessage(String),

    #[error("unknown rule type ({kind})")]
    UnknownRuleKind { kind: String },
}

impl SchemaError {
    pub(crate) fn malformed(key: &str, reason: impl ToString) -> Self {
        Self::MalformedExtension {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

///
/// CheckErrorKind
/// every way a declared rule set can be rejected
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum CheckErrorKind {
    #[error("{0}")]
    ConstraintConflict(String),

    #[error("unable to parse regex `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid `{rule}` value: {source}")]
    MalformedTemporalValue {
        rule: &'static str,
        source: TemporalError,
    },

    #[error("{0}")]
    MissingErrorSpec(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    ShapeMismatch(String),

    #[error("undefined `in` value ({value}) conflicts with `defined_only` rule")]
    UndefinedEnumValue { value: i32 },

    #[error("{0}")]
    WrongRuleKind(String),
}

///
/// CheckError
/// a rejection together with the route (file, message, field, nested
/// position) it was raised at
///

#[derive(Debug, ThisError)]
#[error("{}: {kind}", .path.join(" > "))]
pub struct CheckError {
    pub path: Vec<String>,
    pub kind: CheckErrorKind,
}

impl CheckError {
    #[must_use]
    pub const fn new(kind: CheckErrorKind) -> Self {
        Self {
            path: Vec::new(),
            kind,
        }
    }

    // within
    // prefixes the route with an enclosing segment as the error bubbles up
    #[must_use]
    pub fn within(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    #[must_use]
    pub fn route(&self) -> String {
        self.path.join(" > ")
    }
}

impl From<CheckErrorKind> for CheckError {
    fn from(kind: CheckErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<SchemaError> for CheckError {
    fn from(err: SchemaError) -> Self {
        Self::new(CheckErrorKind::Schema(err))
    }
}
