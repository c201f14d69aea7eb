//! Output languages and the registry that selects them.

pub mod java;
pub mod rust;

pub use java::Java;
pub use rust::Rust;

use crate::{config::ConfigError, format::Formatter, render::RenderError};
use derive_more::Display;
use protovet_schema::prelude::*;
use std::str::FromStr;

///
/// Lang
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum Lang {
    #[display("java")]
    Java,
    #[display("rust")]
    Rust,
}

impl Lang {
    pub const ALL: [Self; 2] = [Self::Java, Self::Rust];

    #[must_use]
    pub fn target(self) -> Box<dyn Target> {
        match self {
            Self::Java => Box::new(Java),
            Self::Rust => Box::new(Rust::default()),
        }
    }
}

impl FromStr for Lang {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.to_string() == s)
            .ok_or_else(|| ConfigError::UnknownTargetLanguage(s.to_string()))
    }
}

///
/// Unit
/// one output artifact: the messages of a file it covers and where it goes
///

#[derive(Clone, Debug)]
pub struct Unit<'a> {
    pub file: &'a File,
    pub messages: Vec<&'a Message>,

    /// Principal name of the artifact (outer class, module stem).
    pub name: String,
    pub path: String,
}

///
/// Target
///

pub trait Target {
    fn lang(&self) -> Lang;

    /// Split a file into output units; ignored messages are left out.
    fn units<'a>(&self, file: &'a File) -> Result<Vec<Unit<'a>>, RenderError>;

    fn render(&self, schema: &Schema, unit: &Unit<'_>) -> Result<String, RenderError>;

    fn formatter(&self) -> Option<&dyn Formatter> {
        None
    }
}

// package_dir
// `acme.people` becomes `acme/people/`
pub(crate) fn package_dir(package: &str) -> String {
    package
        .split('.')
        .filter(|segment| !segment.is_empty())
        .fold(String::new(), |mut dir, segment| {
            dir.push_str(segment);
            dir.push('/');
            dir
        })
}

// validated
// the messages a validator is generated for
pub(crate) fn validated<'a>(
    messages: impl IntoIterator<Item = &'a Message>,
) -> Result<Vec<&'a Message>, RenderError> {
    let mut out = Vec::new();
    for message in messages {
        if message.ignored()? {
            tracing::debug!(message = %message.name, "ignored, no validator generated");
            continue;
        }
        out.push(message);
    }

    Ok(out)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use protovet_schema::node::extension;
    use serde_json::json;

    #[test]
    fn languages_are_looked_up_by_name() {
        assert_eq!("java".parse::<Lang>().unwrap(), Lang::Java);
        assert_eq!("rust".parse::<Lang>().unwrap().target().lang(), Lang::Rust);
        assert!(matches!(
            "cobol".parse::<Lang>(),
            Err(ConfigError::UnknownTargetLanguage(lang)) if lang == "cobol"
        ));
    }

    #[test]
    fn packages_map_to_directories() {
        assert_eq!(package_dir("acme.people.v1"), "acme/people/v1/");
        assert_eq!(package_dir(""), "");
    }

    #[test]
    fn ignored_messages_are_not_validated() {
        let file = File::new("a.proto", "a")
            .with_message(Message::new("Kept"))
            .with_message(Message::new("Skipped").with_extension(extension::IGNORED, json!(true)));
        let messages = validated(&file.messages).unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].name, "Kept");
    }
}
