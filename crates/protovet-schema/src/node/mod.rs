pub mod extension;

mod r#enum;
mod field;
mod file;
mod message;

pub use extension::Extensions;
pub use field::*;
pub use file::*;
pub use message::*;
pub use r#enum::*;

use crate::prelude::*;
use std::collections::BTreeMap;

///
/// Schema
/// every file of a request, indexed by fully-qualified type name
///

#[derive(Clone, Debug, Default)]
pub struct Schema {
    files: Vec<File>,
    messages: BTreeMap<String, (usize, usize)>,
    enums: BTreeMap<String, (usize, usize)>,
}

impl Schema {
    #[must_use]
    pub fn new(files: Vec<File>) -> Self {
        let mut messages = BTreeMap::new();
        let mut enums = BTreeMap::new();

        for (fi, file) in files.iter().enumerate() {
            for (mi, message) in file.messages.iter().enumerate() {
                messages.insert(file.full_name(&message.name), (fi, mi));
            }
            for (ei, enumeration) in file.enums.iter().enumerate() {
                enums.insert(file.full_name(&enumeration.name), (fi, ei));
            }
        }

        Self {
            files,
            messages,
            enums,
        }
    }

    #[must_use]
    pub fn files(&self) -> &[File] {
        &self.files
    }

    #[must_use]
    pub fn file(&self, name: &str) -> Option<&File> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn message(&self, full_name: &str) -> Result<&Message, SchemaError> {
        let (fi, mi) = self
            .messages
            .get(normalize(full_name))
            .ok_or_else(|| SchemaError::UnknownMessage(full_name.to_string()))?;

        Ok(&self.files[*fi].messages[*mi])
    }

    pub fn enumeration(&self, full_name: &str) -> Result<&Enum, SchemaError> {
        let (fi, ei) = self
            .enums
            .get(normalize(full_name))
            .ok_or_else(|| SchemaError::UnknownEnum(full_name.to_string()))?;

        Ok(&self.files[*fi].enums[*ei])
    }

    // declaring_file
    // the file a message or enum was declared in
    #[must_use]
    pub fn declaring_file(&self, full_name: &str) -> Option<&File> {
        let name = normalize(full_name);

        self.messages
            .get(name)
            .or_else(|| self.enums.get(name))
            .map(|(fi, _)| &self.files[*fi])
    }
}

fn normalize(name: &str) -> &str {
    name.strip_prefix('.').unwrap_or(name)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(vec![
            File::new("acme/people.proto", "acme.people")
                .with_message(Message::new("Person"))
                .with_message(Message::new("Person.Address"))
                .with_enum(Enum::new("Status", &[("UNKNOWN", 0), ("ACTIVE", 1)])),
        ])
    }

    #[test]
    fn types_resolve_by_full_name() {
        let schema = schema();

        assert_eq!(schema.message("acme.people.Person").unwrap().name, "Person");
        assert_eq!(
            schema
                .message(".acme.people.Person.Address")
                .unwrap()
                .simple_name(),
            "Address"
        );
        assert!(
            schema
                .enumeration("acme.people.Status")
                .unwrap()
                .is_defined(1)
        );
        assert_eq!(
            schema.declaring_file("acme.people.Status").unwrap().stem(),
            "people"
        );
    }

    #[test]
    fn unknown_types_are_reported() {
        let schema = schema();

        assert!(matches!(
            schema.message("acme.people.Ghost"),
            Err(SchemaError::UnknownMessage(_))
        ));
        assert!(matches!(
            schema.enumeration("acme.people.Person"),
            Err(SchemaError::UnknownEnum(_))
        ));
    }
}
