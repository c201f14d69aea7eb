use crate::prelude::*;

///
/// File
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct File {
    pub name: String,

    #[serde(default)]
    pub package: String,

    #[serde(default)]
    pub options: FileOptions,

    #[serde(default)]
    pub messages: Vec<Message>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<Enum>,
}

impl File {
    #[must_use]
    pub fn new(name: &str, package: &str) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
            options: FileOptions::default(),
            messages: Vec::new(),
            enums: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: FileOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    #[must_use]
    pub fn with_enum(mut self, enumeration: Enum) -> Self {
        self.enums.push(enumeration);
        self
    }

    // full_name
    // qualify a file-local type name with the package
    #[must_use]
    pub fn full_name(&self, local: &str) -> String {
        if self.package.is_empty() {
            local.to_string()
        } else {
            format!("{}.{local}", self.package)
        }
    }

    // stem
    // file name without directories or the `.proto` suffix
    #[must_use]
    pub fn stem(&self) -> &str {
        let base = self.name.rsplit('/').next().unwrap_or(&self.name);

        base.strip_suffix(".proto").unwrap_or(base)
    }
}

///
/// FileOptions
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FileOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_package: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_outer_classname: Option<String>,

    #[serde(default)]
    pub java_multiple_files: bool,
}
