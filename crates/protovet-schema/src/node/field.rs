use crate::{node::extension, prelude::*};
use serde_json::Value;

///
/// ElementType
/// the type of a single value: a scalar, an enum or an embedded message,
/// the latter two referenced by fully-qualified name
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Enum(String),
    Message(String),
    Scalar(ProtoType),
}

impl ElementType {
    #[must_use]
    pub const fn proto_type(&self) -> ProtoType {
        match self {
            Self::Enum(_) => ProtoType::Enum,
            Self::Message(_) => ProtoType::Message,
            Self::Scalar(ty) => *ty,
        }
    }

    #[must_use]
    pub const fn is_embed(&self) -> bool {
        matches!(self, Self::Message(_))
    }

    #[must_use]
    pub fn embed(&self) -> Option<&str> {
        match self {
            Self::Message(name) => Some(name.strip_prefix('.').unwrap_or(name)),
            _ => None,
        }
    }

    #[must_use]
    pub fn enumeration(&self) -> Option<&str> {
        match self {
            Self::Enum(name) => Some(name.strip_prefix('.').unwrap_or(name)),
            _ => None,
        }
    }

    #[must_use]
    pub fn well_known(&self) -> Option<WellKnownType> {
        self.embed().and_then(WellKnownType::from_full_name)
    }

    // is_message
    // embedded messages that are not one of the well-known types
    #[must_use]
    pub fn is_message(&self) -> bool {
        self.is_embed() && self.well_known().is_none()
    }
}

///
/// FieldType
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Map { key: ElementType, value: ElementType },
    Repeated(ElementType),
    Single(ElementType),
}

impl FieldType {
    #[must_use]
    pub const fn scalar(ty: ProtoType) -> Self {
        Self::Single(ElementType::Scalar(ty))
    }

    #[must_use]
    pub fn message(name: &str) -> Self {
        Self::Single(ElementType::Message(name.to_string()))
    }

    #[must_use]
    pub fn well_known(wkt: WellKnownType) -> Self {
        Self::Single(ElementType::Message(wkt.full_name()))
    }
}

///
/// Shape
/// borrowed view over the type at the position a rule set applies to:
/// a whole field, or a nested element or map key/value
///

#[derive(Clone, Copy, Debug)]
pub enum Shape<'a> {
    Element(&'a ElementType),
    Field(&'a FieldType),
}

impl<'a> Shape<'a> {
    // single
    // the element for non-collection positions
    #[must_use]
    pub const fn single(self) -> Option<&'a ElementType> {
        match self {
            Self::Element(el) | Self::Field(FieldType::Single(el)) => Some(el),
            Self::Field(_) => None,
        }
    }

    #[must_use]
    pub const fn proto_type(self) -> ProtoType {
        match self {
            Self::Element(el) | Self::Field(FieldType::Single(el) | FieldType::Repeated(el)) => {
                el.proto_type()
            }
            Self::Field(FieldType::Map { .. }) => ProtoType::Message,
        }
    }

    #[must_use]
    pub const fn is_repeated(self) -> bool {
        matches!(self, Self::Field(FieldType::Repeated(_)))
    }

    #[must_use]
    pub const fn is_map(self) -> bool {
        matches!(self, Self::Field(FieldType::Map { .. }))
    }

    #[must_use]
    pub fn is_embed(self) -> bool {
        self.single().is_some_and(ElementType::is_embed)
    }

    #[must_use]
    pub fn well_known(self) -> Option<WellKnownType> {
        self.single().and_then(ElementType::well_known)
    }

    // element
    // repeated element or map value
    #[must_use]
    pub const fn element(self) -> Option<&'a ElementType> {
        match self {
            Self::Field(FieldType::Repeated(el) | FieldType::Map { value: el, .. }) => Some(el),
            _ => None,
        }
    }

    #[must_use]
    pub const fn key(self) -> Option<&'a ElementType> {
        match self {
            Self::Field(FieldType::Map { key, .. }) => Some(key),
            _ => None,
        }
    }
}

///
/// Field
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Field {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: FieldType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oneof: Option<String>,

    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl Field {
    #[must_use]
    pub fn new(name: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            oneof: None,
            extensions: Extensions::default(),
        }
    }

    #[must_use]
    pub fn in_oneof(mut self, oneof: &str) -> Self {
        self.oneof = Some(oneof.to_string());
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: Value) -> Self {
        self.extensions.insert(extension::RULES, rules);
        self
    }

    #[must_use]
    pub const fn shape(&self) -> Shape<'_> {
        Shape::Field(&self.ty)
    }

    /// Decode the declared rule set, if the field carries one.
    pub fn rules(&self) -> Result<Option<FieldRules>, SchemaError> {
        self.extensions
            .raw(extension::RULES)
            .map(FieldRules::decode)
            .transpose()
    }
}
