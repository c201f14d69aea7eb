use crate::{WELL_KNOWN_PACKAGE, prelude::*};
use derive_more::Display;

///
/// ProtoType
/// the declared protobuf type of a field, element or map key
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[remain::sorted]
pub enum ProtoType {
    #[display("bool")]
    Bool,
    #[display("bytes")]
    Bytes,
    #[display("double")]
    Double,
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
    #[display("message")]
    Message,
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
    #[display("uint32")]
    UInt32,
    #[display("uint64")]
    UInt64,
}

impl ProtoType {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(
            self,
            Self::Bool | Self::Bytes | Self::Enum | Self::Message | Self::String
        )
    }

    #[must_use]
    pub const fn is_message(self) -> bool {
        matches!(self, Self::Message)
    }
}

///
/// WellKnownType
/// message types from `google.protobuf` that carry dedicated rule kinds
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum WellKnownType {
    Any,
    BoolValue,
    BytesValue,
    DoubleValue,
    Duration,
    FloatValue,
    Int32Value,
    Int64Value,
    StringValue,
    Timestamp,
    UInt32Value,
    UInt64Value,
}

impl WellKnownType {
    pub const ALL: [Self; 12] = [
        Self::Any,
        Self::BoolValue,
        Self::BytesValue,
        Self::DoubleValue,
        Self::Duration,
        Self::FloatValue,
        Self::Int32Value,
        Self::Int64Value,
        Self::StringValue,
        Self::Timestamp,
        Self::UInt32Value,
        Self::UInt64Value,
    ];

    /// Identify a well-known type from a fully-qualified message name.
    #[must_use]
    pub fn from_full_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix('.').unwrap_or(name);
        let short = name
            .strip_prefix(WELL_KNOWN_PACKAGE)?
            .strip_prefix('.')?;

        Self::ALL.into_iter().find(|wkt| wkt.to_string() == short)
    }

    #[must_use]
    pub fn full_name(self) -> String {
        format!("{WELL_KNOWN_PACKAGE}.{self}")
    }

    // wrapped
    // the scalar carried by a nullable wrapper type
    #[must_use]
    pub const fn wrapped(self) -> Option<ProtoType> {
        match self {
            Self::BoolValue => Some(ProtoType::Bool),
            Self::BytesValue => Some(ProtoType::Bytes),
            Self::DoubleValue => Some(ProtoType::Double),
            Self::FloatValue => Some(ProtoType::Float),
            Self::Int32Value => Some(ProtoType::Int32),
            Self::Int64Value => Some(ProtoType::Int64),
            Self::StringValue => Some(ProtoType::String),
            Self::UInt32Value => Some(ProtoType::UInt32),
            Self::UInt64Value => Some(ProtoType::UInt64),
            Self::Any | Self::Duration | Self::Timestamp => None,
        }
    }

    #[must_use]
    pub const fn is_wrapper(self) -> bool {
        self.wrapped().is_some()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_types_resolve_by_full_name() {
        assert_eq!(
            WellKnownType::from_full_name(".google.protobuf.Int32Value"),
            Some(WellKnownType::Int32Value)
        );
        assert_eq!(
            WellKnownType::from_full_name("google.protobuf.Timestamp"),
            Some(WellKnownType::Timestamp)
        );
        assert_eq!(WellKnownType::from_full_name("google.protobuf.Empty"), None);
        assert_eq!(WellKnownType::from_full_name("acme.Int32Value"), None);
    }

    #[test]
    fn wrappers_expose_their_scalar() {
        assert_eq!(
            WellKnownType::UInt64Value.wrapped(),
            Some(ProtoType::UInt64)
        );
        assert!(!WellKnownType::Any.is_wrapper());
        assert_eq!(
            WellKnownType::StringValue.full_name(),
            "google.protobuf.StringValue"
        );
    }

    #[test]
    fn proto_type_serializes_as_protobuf_keyword() {
        let json = serde_json::to_string(&ProtoType::SFixed64).unwrap();

        assert_eq!(json, "\"sfixed64\"");
        assert_eq!(ProtoType::SFixed64.to_string(), "sfixed64");
    }
}
