use super::*;
use protovet_schema::node::extension;
use serde_json::{Value, json};

fn error(method: &str) -> Value {
    json!({ "method": method })
}

fn age() -> Field {
    Field::new("age", FieldType::scalar(ProtoType::Int32)).with_rules(json!({
        "int32": { "rules": [{
            "gte": 0,
            "lt": 150,
            "error": { "method": "badAge", "code": 400 },
        }] },
    }))
}

fn person() -> Message {
    Message::new("Person")
        .with_extension(extension::ERROR_BASE, json!({ "class": "Errors" }))
        .with_field(age())
}

fn file(message: Message) -> File {
    File::new("acme/people.proto", "acme.people").with_message(message)
}

// render
// every unit of the single file in `schema`
fn render(schema: &Schema) -> Vec<(String, String)> {
    let file = &schema.files()[0];

    Java.units(file)
        .unwrap()
        .iter()
        .map(|unit| (unit.path.clone(), Java.render(schema, unit).unwrap()))
        .collect()
}

fn render_one(message: Message) -> String {
    let schema = Schema::new(vec![file(message)]);
    let mut units = render(&schema);
    assert_eq!(units.len(), 1);

    units.remove(0).1
}

#[test]
fn bounded_field_renders_constants_and_a_range_check() {
    let schema = Schema::new(vec![file(person())]);
    let units = render(&schema);
    let (path, out) = &units[0];

    assert_eq!(path, "acme/people/PeopleValidator.java");
    assert!(out.contains("package acme.people;"));
    assert!(out.contains(
        "public static class PersonValidator implements io.protovet.runtime.ValidatorImpl<acme.people.People.Person> {"
    ));
    assert!(out.contains("if (clazz.equals(acme.people.People.Person.class)) return new PersonValidator();"));
    assert!(out.contains("private final Integer age__Gte = 0;"));
    assert!(out.contains("private final Integer age__Lt = 150;"));
    assert!(out.contains("private final RuntimeException age__Error0 = Errors.badAge(400);"));
    assert!(out.contains(
        "io.protovet.runtime.ComparativeValidation.range(age__Error0, proto.getAge(), age__Lt, null, null, age__Gte, java.util.Comparator.naturalOrder());"
    ));
}

#[test]
fn multiple_files_split_by_top_level_message() {
    let schema = Schema::new(vec![
        file(person())
            .with_message(Message::new("Person.Address"))
            .with_message(Message::new("Pet"))
            .with_options(FileOptions {
                java_package: Some("com.acme".to_string()),
                java_multiple_files: true,
                ..Default::default()
            }),
    ]);
    let units = render(&schema);
    let paths: Vec<_> = units.iter().map(|(path, _)| path.as_str()).collect();

    assert_eq!(paths, ["com/acme/PersonValidator.java", "com/acme/PetValidator.java"]);
    assert!(units[0].1.contains("package com.acme;"));
    assert!(units[0].1.contains("ValidatorImpl<com.acme.Person>"));
    assert!(units[0].1.contains("public static class Person_AddressValidator"));
    assert!(units[0].1.contains("ValidatorImpl<com.acme.Person.Address>"));
}

#[test]
fn outer_class_name_can_be_overridden() {
    let schema = Schema::new(vec![file(person()).with_options(FileOptions {
        java_outer_classname: Some("PeopleProtos".to_string()),
        ..Default::default()
    })]);

    assert_eq!(render(&schema)[0].0, "acme/people/PeopleProtosValidator.java");
}

#[test]
fn disabled_messages_return_immediately() {
    let out = render_one(person().with_extension(extension::DISABLED, json!(true)));

    assert!(out.contains("// Validate is disabled for Person"));
    assert!(out.contains("return;"));
    assert!(!out.contains("age__Gte"));
}

#[test]
fn ignored_messages_get_no_validator() {
    let out = render_one(person().with_extension(extension::IGNORED, json!(true)));

    assert!(!out.contains("PersonValidator"));
    assert!(out.contains("return null;"));
}

#[test]
fn item_rules_reuse_the_declaring_alternative_error() {
    let tags = Field::new(
        "tags",
        FieldType::Repeated(ElementType::Scalar(ProtoType::String)),
    )
    .with_rules(json!({
        "repeated": { "rules": [{
            "min_items": 1,
            "items": { "string": { "rules": [{ "min_len": 1 }] } },
            "error": error("badTags"),
        }] },
    }));
    let out = render_one(Message::new("Post").with_field(tags));

    assert!(out.contains("private final RuntimeException tags__Error0 = badTags();"));
    assert!(out.contains("io.protovet.runtime.RepeatedValidation.minItems(tags__Error0, proto.getTagsList(), 1);"));
    assert!(out.contains("io.protovet.runtime.RepeatedValidation.forEach(proto.getTagsList(), item -> {"));
    assert!(out.contains("io.protovet.runtime.StringValidation.minLength(tags__Error0, item, 1);"));
}

#[test]
fn embedded_elements_are_validated_without_rules() {
    let schema = Schema::new(vec![
        file(Message::new("Person").with_field(Field::new(
            "addresses",
            FieldType::Repeated(ElementType::Message("acme.people.Address".to_string())),
        )))
        .with_message(Message::new("Address")),
    ]);
    let out = &render(&schema)[0].1;

    assert!(out.contains("io.protovet.runtime.RepeatedValidation.forEach(proto.getAddressesList(), item -> {"));
    assert!(out.contains("if (true) index.validatorFor(item).assertValid(item);"));
}

#[test]
fn wrappers_check_presence_around_the_scalar() {
    let count = Field::new("count", FieldType::well_known(WellKnownType::UInt32Value)).with_rules(
        json!({
            "message": { "required": true, "error": error("missing") },
            "uint32": { "rules": [{ "gt": 0, "error": error("zero") }] },
        }),
    );
    let out = render_one(Message::new("Order").with_field(count));

    assert!(out.contains("private final RuntimeException count__RequiredError = missing();"));
    assert!(out.contains("private final Integer count__Gt = 0;"));
    assert!(out.contains("if (proto.hasCount()) {"));
    assert!(out.contains(
        "io.protovet.runtime.ComparativeValidation.greaterThan(count__Error0, proto.getCount().getValue(), count__Gt, java.util.Comparator.naturalOrder());"
    ));
    assert!(out.contains("io.protovet.runtime.RequiredValidation.required(count__RequiredError, null);"));
}

#[test]
fn required_oneof_gets_a_default_arm() {
    let email = Field::new("email", FieldType::scalar(ProtoType::String))
        .in_oneof("contact")
        .with_rules(json!({
            "string": { "rules": [{ "well_known": "email", "error": error("badEmail") }] },
        }));
    let phone = Field::new("phone", FieldType::scalar(ProtoType::String)).in_oneof("contact");
    let message = Message::new("Person")
        .with_field(email)
        .with_field(phone)
        .with_oneof(OneOf::new("contact").with_rules(json!({
            "required": true,
            "error": error("noContact"),
        })));
    let out = render_one(message);

    assert!(out.contains("private final RuntimeException contact__RequiredError = noContact();"));
    assert!(out.contains("switch (proto.getContactCase()) {"));
    assert!(out.contains("case EMAIL:"));
    assert!(out.contains("io.protovet.runtime.StringValidation.email(email__Error0, proto.getEmail());"));
    assert!(out.contains("case PHONE:"));
    assert!(out.contains("io.protovet.runtime.RequiredValidation.required(contact__RequiredError, null);"));
}

#[test]
fn enum_constants_use_the_generated_enum() {
    let status = Field::new("status", FieldType::Single(ElementType::Enum("acme.people.Status".into())))
        .with_rules(json!({
            "enum": { "rules": [{ "defined_only": true, "in": [1, 2], "error": error("badStatus") }] },
        }));
    let schema = Schema::new(vec![
        file(Message::new("Person").with_field(status))
            .with_enum(Enum::new("Status", &[("UNKNOWN", 0), ("ACTIVE", 1), ("BANNED", 2)])),
    ]);
    let out = &render(&schema)[0].1;

    assert!(out.contains(
        "private final acme.people.People.Status[] status__In = new acme.people.People.Status[]{acme.people.People.Status.forNumber(1), acme.people.People.Status.forNumber(2)};"
    ));
    assert!(out.contains("io.protovet.runtime.EnumValidation.definedOnly(status__Error0, proto.getStatus());"));
}

#[test]
fn checks_without_an_error_cannot_render() {
    let field = Field::new("age", FieldType::scalar(ProtoType::Int32))
        .with_rules(json!({ "int32": { "rules": [{ "gt": 0 }] } }));
    let schema = Schema::new(vec![file(Message::new("Person").with_field(field))]);
    let units = Java.units(&schema.files()[0]).unwrap();

    assert!(matches!(
        Java.render(&schema, &units[0]),
        Err(RenderError::MissingError { field }) if field == "age"
    ));
}

#[test]
fn literals_keep_their_width() {
    assert_eq!(number(Number::U32(u32::MAX)), "(int) 4294967295L");
    assert_eq!(number(Number::U64(u64::MAX)), "Long.parseUnsignedLong(\"18446744073709551615\")");
    assert_eq!(number(Number::I64(-3)), "-3L");
    assert_eq!(number(Number::F32(1.5)), "1.5F");
    assert_eq!(number(Number::F64(f64::NEG_INFINITY)), "Double.NEGATIVE_INFINITY");
    assert_eq!(number(Number::F32(f32::NAN)), "Float.NaN");
}

#[test]
fn strings_are_escaped_for_java() {
    assert_eq!(java_string("a\"b\\c\n"), r#""a\"b\\c\n""#);
    assert_eq!(java_string("é"), r#""\u00e9""#);
    assert_eq!(bytes_literal(&[0, 255]), "new byte[]{(byte) 0x00, (byte) 0xff}");
}
