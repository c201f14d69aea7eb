//! Typed rule payloads decoded from the `validate.rules` extension.

mod bytes;
mod collection;
mod enumeration;
mod numeric;
mod string;
mod temporal;

pub use bytes::*;
pub use collection::*;
pub use enumeration::*;
pub use numeric::*;
pub use string::*;
pub use temporal::*;

use crate::{node::extension::RULES, prelude::*};
use derive_more::Display;
use serde::{Deserializer, Serializer, de::Error as _, ser::Error as _};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Key of the message-level rules inside a field rule set.
const MESSAGE_KEY: &str = "message";

///
/// Rule
/// behaviour shared by every rule alternative
///

pub trait Rule {
    fn error(&self) -> Option<&ErrorSpec>;

    fn ignore_empty(&self) -> bool {
        false
    }
}

macro_rules! impl_rule {
    (ignore_empty: $($ty:ty),* $(,)?) => {
        $(
            impl Rule for $ty {
                fn error(&self) -> Option<&ErrorSpec> {
                    self.error.as_ref()
                }

                fn ignore_empty(&self) -> bool {
                    self.ignore_empty
                }
            }
        )*
    };
    ($($ty:ty),* $(,)?) => {
        $(
            impl Rule for $ty {
                fn error(&self) -> Option<&ErrorSpec> {
                    self.error.as_ref()
                }
            }
        )*
    };
}

impl_rule!(
    AnyRule,
    BoolRules,
    DurationRule,
    EnumRule,
    MessageRules,
    TimestampRule,
);
impl_rule!(ignore_empty: BytesRule, MapRule, RepeatedRule, StringRule);

impl<T> Rule for NumericRule<T> {
    fn error(&self) -> Option<&ErrorSpec> {
        self.error.as_ref()
    }

    fn ignore_empty(&self) -> bool {
        self.ignore_empty
    }
}

///
/// ErrorSpec
/// reference to the method that builds the error raised when a rule fails
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorSpec {
    pub method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorSpec {
    #[must_use]
    pub fn new(method: &str) -> Self {
        Self {
            method: method.to_string(),
            code: None,
            message: None,
        }
    }
}

///
/// ErrorBase
/// message-level owner of the error-construction methods
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorBase {
    pub class: String,
}

///
/// MessageRules
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessageRules {
    #[serde(default)]
    pub skip: bool,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSpec>,
}

///
/// OneOfRules
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OneOfRules {
    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSpec>,
}

///
/// RuleKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum RuleKind {
    #[display("any")]
    Any,
    #[display("bool")]
    Bool,
    #[display("bytes")]
    Bytes,
    #[display("double")]
    Double,
    #[display("duration")]
    Duration,
    #[display("enum")]
    Enum,
    #[display("fixed32")]
    Fixed32,
    #[display("fixed64")]
    Fixed64,
    #[display("float")]
    Float,
    #[display("int32")]
    Int32,
    #[display("int64")]
    Int64,
    #[display("map")]
    Map,
    #[display("repeated")]
    Repeated,
    #[display("sfixed32")]
    SFixed32,
    #[display("sfixed64")]
    SFixed64,
    #[display("sint32")]
    SInt32,
    #[display("sint64")]
    SInt64,
    #[display("string")]
    String,
    #[display("timestamp")]
    Timestamp,
    #[display("uint32")]
    UInt32,
    #[display("uint64")]
    UInt64,
}

impl RuleKind {
    pub const ALL: [Self; 21] = [
        Self::Any,
        Self::Bool,
        Self::Bytes,
        Self::Double,
        Self::Duration,
        Self::Enum,
        Self::Fixed32,
        Self::Fixed64,
        Self::Float,
        Self::Int32,
        Self::Int64,
        Self::Map,
        Self::Repeated,
        Self::SFixed32,
        Self::SFixed64,
        Self::SInt32,
        Self::SInt64,
        Self::String,
        Self::Timestamp,
        Self::UInt32,
        Self::UInt64,
    ];

    // proto_type
    // the scalar type a rule kind is declared against
    #[must_use]
    pub const fn proto_type(self) -> Option<ProtoType> {
        match self {
            Self::Bool => Some(ProtoType::Bool),
            Self::Bytes => Some(ProtoType::Bytes),
            Self::Double => Some(ProtoType::Double),
            Self::Enum => Some(ProtoType::Enum),
            Self::Fixed32 => Some(ProtoType::Fixed32),
            Self::Fixed64 => Some(ProtoType::Fixed64),
            Self::Float => Some(ProtoType::Float),
            Self::Int32 => Some(ProtoType::Int32),
            Self::Int64 => Some(ProtoType::Int64),
            Self::SFixed32 => Some(ProtoType::SFixed32),
            Self::SFixed64 => Some(ProtoType::SFixed64),
            Self::SInt32 => Some(ProtoType::SInt32),
            Self::SInt64 => Some(ProtoType::SInt64),
            Self::String => Some(ProtoType::String),
            Self::UInt32 => Some(ProtoType::UInt32),
            Self::UInt64 => Some(ProtoType::UInt64),
            Self::Any | Self::Duration | Self::Map | Self::Repeated | Self::Timestamp => None,
        }
    }

    // wrapper
    // the nullable wrapper that may stand in for the scalar
    #[must_use]
    pub const fn wrapper(self) -> Option<WellKnownType> {
        match self {
            Self::Bool => Some(WellKnownType::BoolValue),
            Self::Bytes => Some(WellKnownType::BytesValue),
            Self::Double => Some(WellKnownType::DoubleValue),
            Self::Float => Some(WellKnownType::FloatValue),
            Self::Int32 => Some(WellKnownType::Int32Value),
            Self::Int64 => Some(WellKnownType::Int64Value),
            Self::String => Some(WellKnownType::StringValue),
            Self::UInt32 => Some(WellKnownType::UInt32Value),
            Self::UInt64 => Some(WellKnownType::UInt64Value),
            _ => None,
        }
    }
}

impl FromStr for RuleKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| SchemaError::UnknownRuleKind {
                kind: s.to_string(),
            })
    }
}

///
/// TypeRules
/// the typed payload of a field rule set, one variant per rule kind
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum TypeRules {
    Any(AnyRules),
    Bool(BoolRules),
    Bytes(BytesRules),
    Double(DoubleRules),
    Duration(DurationRules),
    Enum(EnumRules),
    Fixed32(Fixed32Rules),
    Fixed64(Fixed64Rules),
    Float(FloatRules),
    Int32(Int32Rules),
    Int64(Int64Rules),
    Map(MapRules),
    Repeated(RepeatedRules),
    #[serde(rename = "sfixed32")]
    SFixed32(SFixed32Rules),
    #[serde(rename = "sfixed64")]
    SFixed64(SFixed64Rules),
    #[serde(rename = "sint32")]
    SInt32(SInt32Rules),
    #[serde(rename = "sint64")]
    SInt64(SInt64Rules),
    String(StringRules),
    Timestamp(TimestampRules),
    #[serde(rename = "uint32")]
    UInt32(UInt32Rules),
    #[serde(rename = "uint64")]
    UInt64(UInt64Rules),
}

impl TypeRules {
    #[must_use]
    pub const fn kind(&self) -> RuleKind {
        match self {
            Self::Any(_) => RuleKind::Any,
            Self::Bool(_) => RuleKind::Bool,
            Self::Bytes(_) => RuleKind::Bytes,
            Self::Double(_) => RuleKind::Double,
            Self::Duration(_) => RuleKind::Duration,
            Self::Enum(_) => RuleKind::Enum,
            Self::Fixed32(_) => RuleKind::Fixed32,
            Self::Fixed64(_) => RuleKind::Fixed64,
            Self::Float(_) => RuleKind::Float,
            Self::Int32(_) => RuleKind::Int32,
            Self::Int64(_) => RuleKind::Int64,
            Self::Map(_) => RuleKind::Map,
            Self::Repeated(_) => RuleKind::Repeated,
            Self::SFixed32(_) => RuleKind::SFixed32,
            Self::SFixed64(_) => RuleKind::SFixed64,
            Self::SInt32(_) => RuleKind::SInt32,
            Self::SInt64(_) => RuleKind::SInt64,
            Self::String(_) => RuleKind::String,
            Self::Timestamp(_) => RuleKind::Timestamp,
            Self::UInt32(_) => RuleKind::UInt32,
            Self::UInt64(_) => RuleKind::UInt64,
        }
    }

    // decode
    // nested rule sets are decoded first so an unknown kind inside `items`,
    // `keys` or `values` surfaces as itself rather than as a parse failure
    fn decode(kind: RuleKind, payload: &Value) -> Result<Self, SchemaError> {
        let nested: &[&str] = match kind {
            RuleKind::Repeated => &["items"],
            RuleKind::Map => &["keys", "values"],
            _ => &[],
        };
        let alternatives = payload
            .get("rules")
            .and_then(Value::as_array)
            .into_iter()
            .flatten();

        for alternative in alternatives {
            for value in nested.iter().filter_map(|key| alternative.get(*key)) {
                FieldRules::decode(value)?;
            }
        }

        let tagged = Value::Object(Map::from_iter([(kind.to_string(), payload.clone())]));

        Self::deserialize(&tagged).map_err(|e| SchemaError::malformed(RULES, e))
    }
}

///
/// FieldRules
/// everything declared on one field: optional message-level rules plus at
/// most one typed rule kind
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldRules {
    pub message: Option<MessageRules>,
    pub kind: Option<TypeRules>,
}

impl FieldRules {
    #[must_use]
    pub const fn new(kind: TypeRules) -> Self {
        Self {
            message: None,
            kind: Some(kind),
        }
    }

    /// Decode a rule set from its extension payload.
    pub fn decode(value: &Value) -> Result<Self, SchemaError> {
        let Value::Object(object) = value else {
            return Err(SchemaError::malformed(RULES, "expected an object"));
        };
        let mut rules = Self::default();

        for (key, payload) in object {
            if key == MESSAGE_KEY {
                let message =
                    MessageRules::deserialize(payload).map_err(|e| SchemaError::malformed(RULES, e))?;
                rules.message = Some(message);
                continue;
            }

            let kind = key.parse::<RuleKind>()?;
            if let Some(existing) = &rules.kind {
                return Err(SchemaError::malformed(
                    RULES,
                    format!(
                        "rule kinds `{}` and `{kind}` cannot be declared together",
                        existing.kind()
                    ),
                ));
            }
            rules.kind = Some(TypeRules::decode(kind, payload)?);
        }

        Ok(rules)
    }

    #[must_use]
    pub fn rule_kind(&self) -> Option<RuleKind> {
        self.kind.as_ref().map(TypeRules::kind)
    }
}

impl Serialize for FieldRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut object = match &self.kind {
            Some(kind) => match serde_json::to_value(kind).map_err(S::Error::custom)? {
                Value::Object(object) => object,
                _ => Map::new(),
            },
            None => Map::new(),
        };
        if let Some(message) = &self.message {
            let value = serde_json::to_value(message).map_err(S::Error::custom)?;
            object.insert(MESSAGE_KEY.to_string(), value);
        }

        object.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;

        Self::decode(&value).map_err(D::Error::custom)
    }
}

///
/// TESTS
///
