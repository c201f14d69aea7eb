use protovet_schema::prelude::*;

///
/// Request
/// every file the schema loader handed over, the subset to generate for,
/// and the raw plugin parameter
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Request {
    pub files: Vec<File>,

    /// Names of the files to generate for; empty means all of them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files_to_generate: Vec<String>,

    #[serde(default)]
    pub parameter: String,
}

impl Request {
    #[must_use]
    pub fn new(files: Vec<File>, parameter: &str) -> Self {
        Self {
            files,
            files_to_generate: Vec::new(),
            parameter: parameter.to_string(),
        }
    }

    #[must_use]
    pub fn generating(mut self, name: &str) -> Self {
        self.files_to_generate.push(name.to_string());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

///
/// Artifact
/// one generated file
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Artifact {
    pub path: String,
    pub content: String,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_decode_from_json() {
        let json = json!({
            "files": [{
                "name": "acme/people.proto",
                "package": "acme.people",
                "messages": [{
                    "name": "Person",
                    "fields": [{
                        "name": "age",
                        "type": { "single": { "scalar": "int32" } },
                        "extensions": {
                            "validate.rules": { "int32": { "rules": [{ "gte": 0 }] } },
                        },
                    }],
                }],
            }],
            "parameter": "lang=java",
        });
        let request = Request::from_json(&json.to_string()).unwrap();

        assert_eq!(request.parameter, "lang=java");
        assert!(request.files_to_generate.is_empty());

        let field = &request.files[0].messages[0].fields[0];
        assert_eq!(field.ty, FieldType::scalar(ProtoType::Int32));
        assert!(field.rules().unwrap().is_some());
    }
}
