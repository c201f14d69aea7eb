use super::*;
use crate::node::extension;
use serde_json::{Value, json};

fn error() -> Value {
    json!({ "method": "invalid", "code": 400 })
}

fn schema_with(fields: Vec<Field>) -> Schema {
    let mut person = Message::new("Person");
    person.fields = fields;

    Schema::new(vec![
        File::new("people.proto", "acme")
            .with_message(person)
            .with_message(Message::new("Address"))
            .with_enum(Enum::new("Status", &[("UNKNOWN", 0), ("ACTIVE", 1), ("BANNED", 2)])),
    ])
}

fn check(field: Field) -> Result<(), CheckError> {
    let schema = schema_with(vec![field]);
    let file = &schema.files()[0];

    Checker::new(&schema).check_file(file)
}

fn kind_of(result: Result<(), CheckError>) -> CheckErrorKind {
    result.unwrap_err().kind
}

fn scalar(name: &str, ty: ProtoType) -> Field {
    Field::new(name, FieldType::scalar(ty))
}

#[test]
fn bounded_int32_passes() {
    let age = scalar("age", ProtoType::Int32).with_rules(json!({
        "int32": { "rules": [{ "gte": 0, "lt": 150, "error": error() }] },
    }));

    check(age).unwrap();
}

#[test]
fn const_with_bound_names_both_rules() {
    let age = scalar("age", ProtoType::Int32).with_rules(json!({
        "int32": { "rules": [{ "const": 5, "gt": 1, "error": error() }] },
    }));

    let err = check(age).unwrap_err();
    let CheckErrorKind::ConstraintConflict(message) = &err.kind else {
        panic!("expected a conflict, got {err}");
    };
    assert!(message.contains("`const`") && message.contains("`gt`"), "{message}");
    assert_eq!(err.path, vec!["people.proto", "acme.Person", "age"]);
}

#[test]
fn errors_render_their_route() {
    let age = scalar("age", ProtoType::Int32).with_rules(json!({
        "int32": { "rules": [{ "lt": 1, "gt": 1, "error": error() }] },
    }));

    let rendered = check(age).unwrap_err().to_string();
    assert!(
        rendered.starts_with("people.proto > acme.Person > age: "),
        "{rendered}"
    );
}

#[test]
fn unique_requires_scalar_items() {
    let addresses = Field::new(
        "addresses",
        FieldType::Repeated(ElementType::Message("acme.Address".into())),
    )
    .with_rules(json!({
        "repeated": { "rules": [{ "unique": true, "error": error() }] },
    }));

    assert!(matches!(kind_of(check(addresses)), CheckErrorKind::ShapeMismatch(_)));
}

#[test]
fn no_sparse_requires_message_values() {
    let labels = Field::new(
        "labels",
        FieldType::Map {
            key: ElementType::Scalar(ProtoType::String),
            value: ElementType::Scalar(ProtoType::String),
        },
    )
    .with_rules(json!({
        "map": { "rules": [{ "no_sparse": true, "error": error() }] },
    }));

    assert!(matches!(kind_of(check(labels)), CheckErrorKind::ShapeMismatch(_)));
}

#[test]
fn scalar_rules_on_repeated_field_are_rejected() {
    let tags = Field::new("tags", FieldType::Repeated(ElementType::Scalar(ProtoType::String)))
        .with_rules(json!({ "string": { "rules": [{ "min_len": 1, "error": error() }] } }));

    let kind = kind_of(check(tags));
    assert!(
        matches!(kind, CheckErrorKind::ShapeMismatch(ref m) if m.contains("repeated rule")),
        "{kind}"
    );
}

#[test]
fn rule_kind_must_match_scalar_type() {
    let age = scalar("age", ProtoType::Int64).with_rules(json!({
        "int32": { "rules": [{ "gte": 0, "error": error() }] },
    }));

    let kind = kind_of(check(age));
    assert_eq!(kind.to_string(), "expected rules for int64 but got int32");
}

#[test]
fn wrapper_accepts_its_scalar_rules() {
    let nickname = Field::new("nickname", FieldType::well_known(WellKnownType::StringValue))
        .with_rules(json!({ "string": { "rules": [{ "max_len": 20, "error": error() }] } }));
    let count = Field::new("count", FieldType::well_known(WellKnownType::Int64Value))
        .with_rules(json!({ "int32": { "rules": [{ "gte": 0, "error": error() }] } }));

    check(nickname).unwrap();
    assert!(matches!(kind_of(check(count)), CheckErrorKind::ShapeMismatch(_)));
}

#[test]
fn string_length_bounds() {
    let inverted = scalar("name", ProtoType::String).with_rules(json!({
        "string": { "rules": [{ "min_len": 5, "max_len": 3, "error": error() }] },
    }));
    let ordered = scalar("name", ProtoType::String).with_rules(json!({
        "string": { "rules": [{ "min_len": 3, "max_len": 5, "error": error() }] },
    }));
    let exact = scalar("name", ProtoType::String).with_rules(json!({
        "string": { "rules": [{ "len": 4, "min_len": 1, "error": error() }] },
    }));

    assert!(matches!(kind_of(check(inverted)), CheckErrorKind::ConstraintConflict(_)));
    check(ordered).unwrap();
    assert!(matches!(kind_of(check(exact)), CheckErrorKind::ConstraintConflict(_)));
}

#[test]
fn max_bytes_is_checked_without_max_len() {
    let code = scalar("code", ProtoType::String).with_rules(json!({
        "string": { "rules": [{ "max_bytes": 2, "prefix": "abc", "error": error() }] },
    }));

    let kind = kind_of(check(code));
    assert!(kind.to_string().contains("`max_bytes`"), "{kind}");
}

#[test]
fn affixes_count_characters_against_max_len() {
    let fits = scalar("code", ProtoType::String).with_rules(json!({
        "string": { "rules": [{ "max_len": 2, "max_bytes": 8, "prefix": "éé", "error": error() }] },
    }));
    let long = scalar("code", ProtoType::String).with_rules(json!({
        "string": { "rules": [{ "max_len": 2, "suffix": "abc", "error": error() }] },
    }));

    check(fits).unwrap();
    assert!(matches!(kind_of(check(long)), CheckErrorKind::ConstraintConflict(_)));
}

#[test]
fn string_rules_require_an_error_method() {
    let blank = scalar("name", ProtoType::String).with_rules(json!({
        "string": { "rules": [{ "min_len": 1, "error": { "method": "" } }] },
    }));
    let missing = scalar("name", ProtoType::String).with_rules(json!({
        "string": { "rules": [{ "min_len": 1 }] },
    }));

    assert!(matches!(kind_of(check(blank)), CheckErrorKind::MissingErrorSpec(_)));
    assert!(matches!(kind_of(check(missing)), CheckErrorKind::MissingErrorSpec(_)));
}

#[test]
fn well_known_regex_conflicts_with_pattern() {
    let both = scalar("header", ProtoType::String).with_rules(json!({
        "string": { "rules": [{
            "pattern": "^x-",
            "well_known": { "well_known_regex": "HTTP_HEADER_NAME" },
            "error": error(),
        }] },
    }));
    let alone = scalar("header", ProtoType::String).with_rules(json!({
        "string": { "rules": [{
            "well_known": { "well_known_regex": "HTTP_HEADER_NAME" },
            "error": error(),
        }] },
    }));

    assert!(matches!(kind_of(check(both)), CheckErrorKind::ConstraintConflict(_)));
    check(alone).unwrap();
}

#[test]
fn well_known_regex_counts_as_pattern_for_in() {
    let header = scalar("header", ProtoType::String).with_rules(json!({
        "string": { "rules": [{
            "in": ["a", "b"],
            "well_known": { "well_known_regex": "HTTP_HEADER_VALUE" },
            "error": error(),
        }] },
    }));

    assert!(matches!(kind_of(check(header)), CheckErrorKind::ConstraintConflict(_)));
}

#[test]
fn pattern_conflicts_with_well_known_formats() {
    let both = scalar("email", ProtoType::String).with_rules(json!({
        "string": { "rules": [{ "pattern": "^a", "well_known": "email", "error": error() }] },
    }));
    let split = scalar("email", ProtoType::String).with_rules(json!({
        "string": { "rules": [
            { "pattern": "^a", "error": error() },
            { "well_known": "email", "error": error() },
        ] },
    }));

    let kind = kind_of(check(both));
    assert!(
        matches!(&kind, CheckErrorKind::ConstraintConflict(m) if m.contains("`pattern`") && m.contains("`well_known`")),
        "{kind}"
    );
    assert!(matches!(kind_of(check(split)), CheckErrorKind::ConstraintConflict(_)));
}

#[test]
fn broken_pattern_is_reported() {
    let name = scalar("name", ProtoType::String).with_rules(json!({
        "string": { "rules": [{ "pattern": "[a-", "error": error() }] },
    }));

    assert!(matches!(kind_of(check(name)), CheckErrorKind::InvalidPattern { .. }));
}

#[test]
fn bytes_rules() {
    let conflict = scalar("blob", ProtoType::Bytes).with_rules(json!({
        "bytes": { "rules": [{ "len": 4, "max_len": 8, "error": error() }] },
    }));
    let long_prefix = scalar("blob", ProtoType::Bytes).with_rules(json!({
        "bytes": { "rules": [{ "max_len": 1, "prefix": [1, 2], "error": error() }] },
    }));
    let fine = scalar("blob", ProtoType::Bytes).with_rules(json!({
        "bytes": { "rules": [{ "min_len": 1, "max_len": 8, "prefix": [1], "error": error() }] },
    }));

    assert!(matches!(kind_of(check(conflict)), CheckErrorKind::ConstraintConflict(_)));
    assert!(matches!(kind_of(check(long_prefix)), CheckErrorKind::ConstraintConflict(_)));
    check(fine).unwrap();
}

#[test]
fn defined_only_rejects_undefined_in_values() {
    let status = Field::new("status", FieldType::Single(ElementType::Enum("acme.Status".into())))
        .with_rules(json!({
            "enum": { "rules": [{ "defined_only": true, "in": [1, 7], "error": error() }] },
        }));

    assert!(matches!(
        kind_of(check(status)),
        CheckErrorKind::UndefinedEnumValue { value: 7 }
    ));
}

#[test]
fn defined_only_accepts_declared_in_values() {
    let status = Field::new("status", FieldType::Single(ElementType::Enum("acme.Status".into())))
        .with_rules(json!({
            "enum": { "rules": [{ "defined_only": true, "in": [1, 2], "error": error() }] },
        }));

    check(status).unwrap();
}

#[test]
fn item_rules_recurse_without_errors() {
    let scores = Field::new("scores", FieldType::Repeated(ElementType::Scalar(ProtoType::UInt32)))
        .with_rules(json!({
            "repeated": { "rules": [{
                "min_items": 1,
                "items": { "uint32": { "rules": [{ "lte": 100 }] } },
                "error": error(),
            }] },
        }));

    check(scores).unwrap();
}

#[test]
fn item_rule_conflicts_carry_the_nested_route() {
    let scores = Field::new("scores", FieldType::Repeated(ElementType::Scalar(ProtoType::UInt32)))
        .with_rules(json!({
            "repeated": { "rules": [{
                "items": { "uint32": { "rules": [{ "lt": 3, "gt": 3 }] } },
                "error": error(),
            }] },
        }));

    let err = check(scores).unwrap_err();
    assert_eq!(err.path.last().map(String::as_str), Some("items"));
}

#[test]
fn map_key_and_value_rules_recurse() {
    let ty = FieldType::Map {
        key: ElementType::Scalar(ProtoType::String),
        value: ElementType::Message("acme.Address".into()),
    };
    let ok = Field::new("homes", ty.clone()).with_rules(json!({
        "map": { "rules": [{
            "no_sparse": true,
            "keys": { "string": { "rules": [{ "min_len": 1 }] } },
            "values": { "message": { "required": true } },
            "error": error(),
        }] },
    }));
    let bad_key = Field::new("homes", ty).with_rules(json!({
        "map": { "rules": [{
            "keys": { "int32": { "rules": [{ "gt": 0 }] } },
            "error": error(),
        }] },
    }));

    check(ok).unwrap();
    let err = check(bad_key).unwrap_err();
    assert!(matches!(err.kind, CheckErrorKind::ShapeMismatch(_)));
    assert_eq!(err.path.last().map(String::as_str), Some("keys"));
}

#[test]
fn message_rules() {
    let required = Field::new("home", FieldType::message("acme.Address"))
        .with_rules(json!({ "message": { "required": true } }));
    let on_scalar = scalar("age", ProtoType::Int32)
        .with_rules(json!({ "message": { "required": true, "error": error() } }));
    let on_timestamp = Field::new("born", FieldType::well_known(WellKnownType::Timestamp))
        .with_rules(json!({ "message": { "required": true, "error": error() } }));
    let skip_with_scalar = Field::new("count", FieldType::well_known(WellKnownType::Int32Value))
        .with_rules(json!({
            "message": { "skip": true },
            "int32": { "rules": [{ "gt": 0, "error": error() }] },
        }));

    assert!(matches!(kind_of(check(required)), CheckErrorKind::MissingErrorSpec(_)));
    assert!(matches!(kind_of(check(on_scalar)), CheckErrorKind::ShapeMismatch(_)));
    assert!(matches!(kind_of(check(on_timestamp)), CheckErrorKind::WrongRuleKind(_)));
    assert!(matches!(
        kind_of(check(skip_with_scalar)),
        CheckErrorKind::ConstraintConflict(_)
    ));
}

#[test]
fn any_rules() {
    let payload = Field::new("payload", FieldType::well_known(WellKnownType::Any));
    let both = payload.clone().with_rules(json!({
        "any": { "rules": [{
            "in": ["type.googleapis.com/acme.A"],
            "not_in": ["type.googleapis.com/acme.B"],
            "error": error(),
        }] },
    }));
    let on_message = Field::new("home", FieldType::message("acme.Address"))
        .with_rules(json!({ "any": { "rules": [{ "required": true, "error": error() }] } }));

    assert!(matches!(kind_of(check(both)), CheckErrorKind::ConstraintConflict(_)));
    assert!(matches!(kind_of(check(on_message)), CheckErrorKind::ShapeMismatch(_)));
}

#[test]
fn duration_values_are_validated() {
    let ttl = Field::new("ttl", FieldType::well_known(WellKnownType::Duration));
    let malformed = ttl.clone().with_rules(json!({
        "duration": { "rules": [{ "lt": { "seconds": 1, "nanos": -5 }, "error": error() }] },
    }));
    let bad_in = ttl.clone().with_rules(json!({
        "duration": { "rules": [{ "in": [{ "seconds": 0, "nanos": 2_000_000_000 }], "error": error() }] },
    }));
    let fine = ttl.with_rules(json!({
        "duration": { "rules": [{
            "gt": { "seconds": 0 },
            "lte": { "seconds": 3600 },
            "error": error(),
        }] },
    }));

    assert!(matches!(
        kind_of(check(malformed)),
        CheckErrorKind::MalformedTemporalValue { rule: "lt", .. }
    ));
    assert!(matches!(
        kind_of(check(bad_in)),
        CheckErrorKind::MalformedTemporalValue { rule: "in", .. }
    ));
    check(fine).unwrap();
}

#[test]
fn duration_equal_bounds_are_rejected() {
    let ttl = Field::new("ttl", FieldType::well_known(WellKnownType::Duration)).with_rules(json!({
        "duration": { "rules": [{
            "gte": { "seconds": 5 },
            "lte": { "seconds": 5 },
            "error": error(),
        }] },
    }));

    assert_eq!(
        kind_of(check(ttl)).to_string(),
        "use `const` instead of equal `lte` and `gte` rules"
    );
}

#[test]
fn timestamp_modes_do_not_mix() {
    let born = Field::new("born", FieldType::well_known(WellKnownType::Timestamp));
    let now_and_absolute = born.clone().with_rules(json!({
        "timestamp": { "rules": [{ "lt_now": true, "gt": { "seconds": 0 }, "error": error() }] },
    }));
    let both_now = born.clone().with_rules(json!({
        "timestamp": { "rules": [{ "lt_now": true, "gt_now": true, "error": error() }] },
    }));
    let within_absolute = born.clone().with_rules(json!({
        "timestamp": { "rules": [
            { "within": { "seconds": 60 }, "error": error() },
            { "lt": { "seconds": 100 }, "error": error() },
        ] },
    }));
    let negative_within = born.clone().with_rules(json!({
        "timestamp": { "rules": [{ "within": { "seconds": -60 }, "error": error() }] },
    }));
    let out_of_range = born.clone().with_rules(json!({
        "timestamp": { "rules": [{ "gt": { "seconds": 253_402_300_800_i64 }, "error": error() }] },
    }));
    let fine = born.with_rules(json!({
        "timestamp": { "rules": [{ "lt_now": true, "within": { "seconds": 86_400 }, "error": error() }] },
    }));

    for field in [now_and_absolute, both_now, within_absolute, negative_within] {
        assert!(matches!(kind_of(check(field)), CheckErrorKind::ConstraintConflict(_)));
    }
    assert!(matches!(
        kind_of(check(out_of_range)),
        CheckErrorKind::MalformedTemporalValue { rule: "gt", .. }
    ));
    check(fine).unwrap();
}

#[test]
fn disabled_messages_are_not_checked() {
    let bad = scalar("age", ProtoType::Int32).with_rules(json!({
        "int32": { "rules": [{ "const": 1, "lt": 3 }] },
    }));
    let message = Message::new("Legacy")
        .with_field(bad)
        .with_extension(extension::DISABLED, json!(true));
    let schema = Schema::new(vec![File::new("legacy.proto", "acme").with_message(message)]);

    Checker::new(&schema).check_file(&schema.files()[0]).unwrap();
}

#[test]
fn required_oneof_needs_an_error() {
    let message = Message::new("Contact")
        .with_field(scalar("email", ProtoType::String).in_oneof("channel"))
        .with_oneof(OneOf::new("channel").with_rules(json!({ "required": true })));
    let schema = Schema::new(vec![File::new("contact.proto", "acme").with_message(message)]);

    let err = Checker::new(&schema)
        .check_file(&schema.files()[0])
        .unwrap_err();
    assert!(matches!(err.kind, CheckErrorKind::MissingErrorSpec(_)));
    assert_eq!(err.path.last().map(String::as_str), Some("channel"));
}

#[test]
fn unknown_rule_kind_is_fatal() {
    let age = scalar("age", ProtoType::Int32).with_rules(json!({ "int96": { "rules": [] } }));

    assert!(matches!(
        kind_of(check(age)),
        CheckErrorKind::Schema(SchemaError::UnknownRuleKind { .. })
    ));
}
