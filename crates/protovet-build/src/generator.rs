use crate::{
    config::{Config, ConfigError},
    format,
    render::RenderError,
    request::{Artifact, Request},
    target::Lang,
};
use protovet_schema::{prelude::*, validate::Checker};
use thiserror::Error as ThisError;

///
/// GenerateError
/// everything that aborts a run; formatter failures are recovered from
/// and never surface here
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum GenerateError {
    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("output `{path}` is outside module `{module}`")]
    OutsideModule { path: String, module: String },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("file to generate `{0}` is not part of the request")]
    UnknownFile(String),
}

/// Generate with the options carried by the request's parameter string.
pub fn execute(request: &Request) -> Result<Vec<Artifact>, GenerateError> {
    let config: Config = request.parameter.parse()?;

    generate(request, &config)
}

/// Check every requested file, then render one artifact per output unit.
pub fn generate(request: &Request, config: &Config) -> Result<Vec<Artifact>, GenerateError> {
    let lang: Lang = config.lang.parse()?;
    let target = lang.target();
    let schema = Schema::new(request.files.clone());
    let checker = Checker::new(&schema);
    let mut artifacts = Vec::new();

    for file in selected(&schema, &request.files_to_generate)? {
        tracing::debug!(file = %file.name, %lang, "checking rules");
        checker.check_file(file)?;

        for message in &file.messages {
            if message.disabled()? {
                tracing::debug!(message = %message.name, "validation disabled, rendering an empty validator");
            }
        }

        for unit in target.units(file)? {
            tracing::debug!(file = %file.name, unit = %unit.name, messages = unit.messages.len(), "rendering");

            let rendered = target.render(&schema, &unit)?;
            let content = if config.format {
                format::emit(target.formatter(), &unit.path, rendered)
            } else {
                rendered
            };
            let path = strip_module(&unit.path, config.module.as_deref())?;

            tracing::info!(%path, bytes = content.len(), "generated");
            artifacts.push(Artifact { path, content });
        }
    }

    Ok(artifacts)
}

// selected
// the files named by the request, in request order; all files when none are
fn selected<'a>(schema: &'a Schema, names: &[String]) -> Result<Vec<&'a File>, GenerateError> {
    if names.is_empty() {
        return Ok(schema.files().iter().collect());
    }

    names
        .iter()
        .map(|name| {
            schema
                .file(name)
                .ok_or_else(|| GenerateError::UnknownFile(name.clone()))
        })
        .collect()
}

fn strip_module(path: &str, module: Option<&str>) -> Result<String, GenerateError> {
    let Some(dir) = module.map(|m| m.trim_end_matches('/')).filter(|m| !m.is_empty()) else {
        return Ok(path.to_string());
    };

    path.strip_prefix(dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(str::to_string)
        .ok_or_else(|| GenerateError::OutsideModule {
            path: path.to_string(),
            module: dir.to_string(),
        })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use protovet_schema::{node::extension, well_known::HEADER_STRING};
    use serde_json::{Value, json};

    fn people(rules: Value) -> File {
        File::new("acme/people.proto", "acme.people").with_message(
            Message::new("Person").with_field(
                Field::new("age", FieldType::scalar(ProtoType::Int32)).with_rules(rules),
            ),
        )
    }

    fn bounded() -> File {
        people(json!({
            "int32": { "rules": [{ "gte": 0, "lt": 150, "error": { "method": "badAge" } }] },
        }))
    }

    #[test]
    fn one_artifact_per_java_file() {
        let artifacts = execute(&Request::new(vec![bounded()], "lang=java")).unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].path, "acme/people/PeopleValidator.java");
        assert!(artifacts[0].content.contains("ComparativeValidation.range(age__Error0"));
    }

    #[test]
    fn conflicting_rules_abort_with_their_route() {
        let file = people(json!({
            "int32": { "rules": [{ "const": 5, "gt": 1, "error": { "method": "badAge" } }] },
        }));
        let err = execute(&Request::new(vec![file], "lang=rust")).unwrap_err();

        let GenerateError::Check(err) = err else {
            panic!("expected a check error, got {err:?}");
        };
        assert!(matches!(err.kind, CheckErrorKind::ConstraintConflict(_)));
        assert_eq!(err.route(), "acme/people.proto > acme.people.Person > age");
    }

    #[test]
    fn disabled_messages_are_not_checked() {
        let mut file = people(json!({
            "int32": { "rules": [{ "const": 5, "gt": 1 }] },
        }));
        file.messages[0]
            .extensions
            .insert(extension::DISABLED, json!(true));

        let artifacts = execute(&Request::new(vec![file], "lang=java")).unwrap();
        assert!(artifacts[0].content.contains("// Validate is disabled for Person"));
    }

    #[test]
    fn parameters_are_validated_first() {
        assert!(matches!(
            execute(&Request::new(vec![bounded()], "format=true")),
            Err(GenerateError::Config(ConfigError::MissingLang))
        ));
        assert!(matches!(
            execute(&Request::new(vec![bounded()], "lang=cobol")),
            Err(GenerateError::Config(ConfigError::UnknownTargetLanguage(lang))) if lang == "cobol"
        ));
    }

    #[test]
    fn only_requested_files_are_generated() {
        let request = Request::new(
            vec![bounded(), File::new("acme/shared.proto", "acme.shared")],
            "lang=rust",
        )
        .generating("acme/shared.proto");
        let artifacts = execute(&request).unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].path, "acme/shared/shared.validate.rs");

        let request = Request::new(vec![bounded()], "lang=rust").generating("acme/ghost.proto");
        assert!(matches!(
            execute(&request),
            Err(GenerateError::UnknownFile(name)) if name == "acme/ghost.proto"
        ));
    }

    #[test]
    fn module_prefix_is_stripped() {
        let config = Config::new("java").with_module("acme/");
        let artifacts = generate(&Request::new(vec![bounded()], ""), &config).unwrap();
        assert_eq!(artifacts[0].path, "people/PeopleValidator.java");

        let config = Config::new("java").with_module("other");
        assert!(matches!(
            generate(&Request::new(vec![bounded()], ""), &config),
            Err(GenerateError::OutsideModule { module, .. }) if module == "other"
        ));
    }

    #[test]
    fn relaxed_header_names_use_the_header_string_pattern() {
        let file = File::new("acme/http.proto", "acme.http").with_message(
            Message::new("Header").with_field(
                Field::new("name", FieldType::scalar(ProtoType::String)).with_rules(json!({
                    "string": { "rules": [{
                        "well_known": { "well_known_regex": "HTTP_HEADER_NAME" },
                        "strict": false,
                        "error": { "method": "badHeader" },
                    }] },
                })),
            ),
        );
        let artifacts = execute(&Request::new(vec![file], "lang=rust")).unwrap();

        assert!(artifacts[0].content.contains(&format!("{HEADER_STRING:?}")));
    }

    #[test]
    fn formatting_never_fails_the_run() {
        // with or without rustfmt installed the validator is emitted
        let artifacts = execute(&Request::new(vec![bounded()], "lang=rust,format=true")).unwrap();

        assert!(artifacts[0].content.contains("impl Person"));
        assert!(artifacts[0].content.contains("badAge"));
    }
}
