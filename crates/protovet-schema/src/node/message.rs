use crate::{node::extension, prelude::*};
use serde_json::Value;

///
/// Message
/// a message descriptor; nested messages are flattened into their file with
/// dotted names (`Outer.Inner`)
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Message {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<Field>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub oneofs: Vec<OneOf>,

    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl Message {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
            oneofs: Vec::new(),
            extensions: Extensions::default(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_oneof(mut self, oneof: OneOf) -> Self {
        self.oneofs.push(oneof);
        self
    }

    #[must_use]
    pub fn with_extension(mut self, key: &str, value: Value) -> Self {
        self.extensions.insert(key, value);
        self
    }

    // simple_name
    // last segment of a nested name
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    // oneof_fields
    // members of a oneof, in declaration order
    pub fn oneof_fields<'a>(&'a self, oneof: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields
            .iter()
            .filter(move |f| f.oneof.as_deref() == Some(oneof))
    }

    pub fn disabled(&self) -> Result<bool, SchemaError> {
        self.extensions.flag(extension::DISABLED)
    }

    pub fn ignored(&self) -> Result<bool, SchemaError> {
        self.extensions.flag(extension::IGNORED)
    }

    pub fn error_base(&self) -> Result<Option<ErrorBase>, SchemaError> {
        self.extensions.get(extension::ERROR_BASE)
    }
}

///
/// OneOf
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct OneOf {
    pub name: String,

    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl OneOf {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extensions: Extensions::default(),
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: Value) -> Self {
        self.extensions.insert(extension::ONEOF, rules);
        self
    }

    pub fn rules(&self) -> Result<Option<OneOfRules>, SchemaError> {
        self.extensions.get(extension::ONEOF)
    }

    pub fn required(&self) -> Result<bool, SchemaError> {
        Ok(self.rules()?.is_some_and(|r| r.required))
    }
}
