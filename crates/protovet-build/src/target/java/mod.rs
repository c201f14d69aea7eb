//! Java validators over protobuf-java message classes.
//!
//! Every field is rendered twice: once for the constants a validator class
//! holds (bounds, sets, compiled patterns, prebuilt errors) and once for the
//! checks inside `assertValid`.

mod checks;
mod constants;

#[cfg(test)]
mod tests;

use crate::{
    context::RuleContext,
    render::{RenderError, Renderer},
    target::{Lang, Target, Unit, package_dir, validated},
};
use checks::Checks;
use constants::Constants;
use convert_case::{Case, Casing};
use protovet_schema::prelude::*;

/// Package of the runtime helpers generated code calls into.
pub const RUNTIME: &str = "io.protovet.runtime";

const HEADER: &str = "// Code generated by protovet. DO NOT EDIT.";

///
/// Java
///

#[derive(Clone, Copy, Debug, Default)]
pub struct Java;

impl Target for Java {
    fn lang(&self) -> Lang {
        Lang::Java
    }

    fn units<'a>(&self, file: &'a File) -> Result<Vec<Unit<'a>>, RenderError> {
        let dir = package_dir(&java_package(file));

        if !file.options.java_multiple_files {
            let name = format!("{}Validator", outer_class(file));

            return Ok(vec![Unit {
                file,
                messages: validated(&file.messages)?,
                path: format!("{dir}{name}.java"),
                name,
            }]);
        }

        // one artifact per top-level message, carrying its nested messages
        let mut units = Vec::new();
        for top in file.messages.iter().filter(|m| !m.name.contains('.')) {
            let nested = format!("{}.", top.name);
            let messages = validated(
                file.messages
                    .iter()
                    .filter(|m| m.name == top.name || m.name.starts_with(&nested)),
            )?;
            if messages.is_empty() {
                continue;
            }

            let name = format!("{}Validator", top.name);
            units.push(Unit {
                file,
                messages,
                path: format!("{dir}{name}.java"),
                name,
            });
        }

        Ok(units)
    }

    fn render(&self, schema: &Schema, unit: &Unit<'_>) -> Result<String, RenderError> {
        let mut out = String::new();
        line(&mut out, 0, HEADER);
        line(&mut out, 0, format!("// source: {}", unit.file.name));
        out.push('\n');

        let package = java_package(unit.file);
        if !package.is_empty() {
            line(&mut out, 0, format!("package {package};"));
            out.push('\n');
        }

        line(&mut out, 0, "@SuppressWarnings(\"all\")");
        line(&mut out, 0, format!("public class {} {{", unit.name));
        line(
            &mut out,
            1,
            format!("public static {RUNTIME}.ValidatorImpl validatorFor(Class clazz) {{"),
        );
        for message in &unit.messages {
            let qualified = qualified(schema, &unit.file.full_name(&message.name))?;
            line(
                &mut out,
                2,
                format!(
                    "if (clazz.equals({qualified}.class)) return new {}();",
                    validator_class(message)
                ),
            );
        }
        line(&mut out, 2, "return null;");
        line(&mut out, 1, "}");

        for message in &unit.messages {
            out.push('\n');
            out.push_str(&indent(&validator(schema, unit.file, message)?, 1));
        }
        line(&mut out, 0, "}");

        Ok(out)
    }
}

// validator
// the nested validator class of one message
fn validator(schema: &Schema, file: &File, message: &Message) -> Result<String, RenderError> {
    let qualified = qualified(schema, &file.full_name(&message.name))?;
    let class = validator_class(message);
    let mut constants = String::new();
    let mut body = String::new();

    if message.disabled()? {
        line(
            &mut body,
            0,
            format!("// Validate is disabled for {}", message.simple_name()),
        );
        line(&mut body, 0, "return;");
    } else {
        let consts = Renderer::new(schema, &Constants);
        let checks = Renderer::new(schema, &Checks);

        for field in message.fields.iter().filter(|f| f.oneof.is_none()) {
            let ctx = RuleContext::new(message, field)?;
            constants.push_str(&consts.render(&ctx)?);
            body.push_str(&checks.render(&ctx)?);
        }
        for oneof in &message.oneofs {
            oneof_constants(&consts, message, oneof, &mut constants)?;
            body.push_str(&oneof_checks(&checks, message, oneof)?);
        }
    }

    let mut out = String::new();
    line(&mut out, 0, "/**");
    line(
        &mut out,
        0,
        format!(" * Validates {{@code {}}} protobuf objects.", message.simple_name()),
    );
    line(&mut out, 0, " */");
    line(
        &mut out,
        0,
        format!("public static class {class} implements {RUNTIME}.ValidatorImpl<{qualified}> {{"),
    );
    out.push_str(&indent(&constants, 1));
    out.push('\n');
    line(
        &mut out,
        1,
        format!(
            "public void assertValid({qualified} proto, {RUNTIME}.ValidatorIndex index) throws RuntimeException {{"
        ),
    );
    out.push_str(&indent(&body, 2));
    line(&mut out, 1, "}");
    line(&mut out, 0, "}");

    Ok(out)
}

fn oneof_constants(
    r: &Renderer<'_, Constants>,
    message: &Message,
    oneof: &OneOf,
    out: &mut String,
) -> Result<(), RenderError> {
    if let Some(spec) = oneof.rules()?.and_then(|rules| rules.error) {
        let base = message.error_base()?;
        line(
            out,
            0,
            format!(
                "private final RuntimeException {} = {};",
                oneof_error_name(oneof),
                error_call(base.as_ref(), &spec)
            ),
        );
    }
    for field in message.oneof_fields(&oneof.name) {
        out.push_str(&r.render(&RuleContext::new(message, field)?)?);
    }

    Ok(())
}

// oneof_checks
// a switch over the populated case; only the set member is validated
fn oneof_checks(
    r: &Renderer<'_, Checks>,
    message: &Message,
    oneof: &OneOf,
) -> Result<String, RenderError> {
    let mut out = String::new();
    line(
        &mut out,
        0,
        format!("switch (proto.get{}Case()) {{", pascal(&oneof.name)),
    );
    for field in message.oneof_fields(&oneof.name) {
        let ctx = RuleContext::new(message, field)?;
        line(&mut out, 1, format!("case {}:", field.name.to_uppercase()));
        out.push_str(&indent(&r.render(&ctx)?, 2));
        line(&mut out, 2, "break;");
    }
    if oneof.required()? {
        if oneof.rules()?.and_then(|rules| rules.error).is_none() {
            return Err(RenderError::MissingError {
                field: oneof.name.clone(),
            });
        }
        line(&mut out, 1, "default:");
        line(
            &mut out,
            2,
            format!(
                "{RUNTIME}.RequiredValidation.required({}, null);",
                oneof_error_name(oneof)
            ),
        );
    }
    line(&mut out, 0, "}");

    Ok(out)
}

///
/// Naming
///

pub(crate) fn java_package(file: &File) -> String {
    file.options
        .java_package
        .clone()
        .unwrap_or_else(|| file.package.clone())
}

pub(crate) fn outer_class(file: &File) -> String {
    file.options
        .java_outer_classname
        .clone()
        .unwrap_or_else(|| file.stem().to_case(Case::Pascal))
}

// qualified
// the generated Java class of a message or enum
pub(crate) fn qualified(schema: &Schema, full_name: &str) -> Result<String, RenderError> {
    let name = full_name.strip_prefix('.').unwrap_or(full_name);
    let file = schema
        .declaring_file(name)
        .ok_or_else(|| SchemaError::UnknownMessage(name.to_string()))?;
    let local = if file.package.is_empty() {
        name
    } else {
        name.strip_prefix(file.package.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(name)
    };

    let mut segments = Vec::new();
    let package = java_package(file);
    if !package.is_empty() {
        segments.push(package);
    }
    if !file.options.java_multiple_files {
        segments.push(outer_class(file));
    }
    segments.push(local.to_string());

    Ok(segments.join("."))
}

fn validator_class(message: &Message) -> String {
    format!("{}Validator", message.name.replace('.', "_"))
}

fn oneof_error_name(oneof: &OneOf) -> String {
    format!("{}__RequiredError", camel(&oneof.name))
}

pub(crate) fn camel(name: &str) -> String {
    name.to_case(Case::Camel)
}

pub(crate) fn pascal(name: &str) -> String {
    name.to_case(Case::Pascal)
}

// constant_name
// later alternatives get their position appended so names stay unique
pub(crate) fn constant_name(ctx: &RuleContext<'_>, name: &str, alternative: usize) -> String {
    let field = camel(&ctx.field.name);

    if alternative == 0 {
        format!("{field}{}__{name}", ctx.index)
    } else {
        format!("{field}{}__{name}{alternative}", ctx.index)
    }
}

// error_name
// nested contexts point at the error of the enclosing alternative
pub(crate) fn error_name(ctx: &RuleContext<'_>, alternative: usize) -> String {
    let field = camel(&ctx.field.name);

    if ctx.define_err {
        format!("{field}{}__Error{alternative}", ctx.index)
    } else {
        format!("{field}__Error{}", ctx.err_index.unwrap_or(0))
    }
}

pub(crate) fn required_name(ctx: &RuleContext<'_>) -> String {
    format!("{}{}__RequiredError", camel(&ctx.field.name), ctx.index)
}

pub(crate) fn accessor(ctx: &RuleContext<'_>) -> String {
    if let Some(accessor) = &ctx.accessor {
        return accessor.clone();
    }

    let name = pascal(&ctx.field.name);
    if ctx.shape.is_repeated() {
        format!("proto.get{name}List()")
    } else if ctx.shape.is_map() {
        format!("proto.get{name}Map()")
    } else {
        format!("proto.get{name}()")
    }
}

// has
// nested values are always present
pub(crate) fn has(ctx: &RuleContext<'_>) -> String {
    if ctx.is_nested() {
        "true".to_string()
    } else {
        format!("proto.has{}()", pascal(&ctx.field.name))
    }
}

pub(crate) fn error_call(base: Option<&ErrorBase>, spec: &ErrorSpec) -> String {
    let mut args = Vec::new();
    if let Some(code) = spec.code {
        args.push(code.to_string());
    }
    if let Some(message) = &spec.message {
        args.push(java_string(message));
    }

    match base {
        Some(base) => format!("{}.{}({})", base.class, spec.method, args.join(", ")),
        None => format!("{}({})", spec.method, args.join(", ")),
    }
}

///
/// Literals
///

// boxed
// the boxed Java type of a scalar
pub(crate) const fn boxed(ty: ProtoType) -> &'static str {
    match ty {
        ProtoType::Bool => "Boolean",
        ProtoType::Bytes => "com.google.protobuf.ByteString",
        ProtoType::Double => "Double",
        ProtoType::Float => "Float",
        ProtoType::Fixed32
        | ProtoType::Int32
        | ProtoType::SFixed32
        | ProtoType::SInt32
        | ProtoType::UInt32 => "Integer",
        ProtoType::Fixed64
        | ProtoType::Int64
        | ProtoType::SFixed64
        | ProtoType::SInt64
        | ProtoType::UInt64 => "Long",
        ProtoType::String => "String",
        ProtoType::Enum | ProtoType::Message => "Object",
    }
}

// number
// unsigned values beyond the signed range keep their bit pattern
pub(crate) fn number(value: Number) -> String {
    match value {
        Number::F32(v) if v.is_nan() => "Float.NaN".to_string(),
        Number::F32(v) if v.is_infinite() && v > 0.0 => "Float.POSITIVE_INFINITY".to_string(),
        Number::F32(v) if v.is_infinite() => "Float.NEGATIVE_INFINITY".to_string(),
        Number::F64(v) if v.is_nan() => "Double.NaN".to_string(),
        Number::F64(v) if v.is_infinite() && v > 0.0 => "Double.POSITIVE_INFINITY".to_string(),
        Number::F64(v) if v.is_infinite() => "Double.NEGATIVE_INFINITY".to_string(),
        Number::F32(v) => format!("{v}F"),
        Number::F64(v) => format!("{v}D"),
        Number::I32(v) => v.to_string(),
        Number::I64(v) => format!("{v}L"),
        Number::U32(v) if i32::try_from(v).is_ok() => v.to_string(),
        Number::U32(v) => format!("(int) {v}L"),
        Number::U64(v) if i64::try_from(v).is_ok() => format!("{v}L"),
        Number::U64(v) => format!("Long.parseUnsignedLong(\"{v}\")"),
    }
}

pub(crate) fn java_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for unit in s.encode_utf16() {
        match unit {
            0x22 => out.push_str("\\\""),
            0x5c => out.push_str("\\\\"),
            0x0a => out.push_str("\\n"),
            0x0d => out.push_str("\\r"),
            0x09 => out.push_str("\\t"),
            0x20..=0x7e => out.push(u8::try_from(unit).map_or('?', char::from)),
            _ => out.push_str(&format!("\\u{unit:04x}")),
        }
    }
    out.push('"');

    out
}

pub(crate) fn bytes_literal(bytes: &[u8]) -> String {
    let items: Vec<_> = bytes.iter().map(|b| format!("(byte) 0x{b:02x}")).collect();

    format!("new byte[]{{{}}}", items.join(", "))
}

pub(crate) fn duration_literal(value: DurationValue) -> String {
    format!(
        "com.google.protobuf.Duration.newBuilder().setSeconds({}L).setNanos({}).build()",
        value.seconds, value.nanos
    )
}

pub(crate) fn timestamp_literal(value: TimestampValue) -> String {
    format!(
        "com.google.protobuf.Timestamp.newBuilder().setSeconds({}L).setNanos({}).build()",
        value.seconds, value.nanos
    )
}

///
/// Layout
///

pub(crate) fn line(out: &mut String, depth: usize, text: impl AsRef<str>) {
    out.push_str(&"\t".repeat(depth));
    out.push_str(text.as_ref());
    out.push('\n');
}

pub(crate) fn indent(block: &str, depth: usize) -> String {
    let tabs = "\t".repeat(depth);

    block
        .lines()
        .map(|l| {
            if l.is_empty() {
                "\n".to_string()
            } else {
                format!("{tabs}{l}\n")
            }
        })
        .collect()
}
