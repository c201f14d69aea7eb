use super::{
    boxed, bytes_literal, constant_name, duration_literal, error_call, error_name, java_string,
    line, number, qualified, required_name, timestamp_literal,
};
use crate::{
    context::RuleContext,
    render::{FieldTemplates, RenderError, Renderer},
};
use protovet_schema::prelude::*;

const BYTE_STRING: &str = "com.google.protobuf.ByteString";
const DURATION: &str = "com.google.protobuf.Duration";
const PATTERN: &str = "com.google.re2j.Pattern";
const TIMESTAMP: &str = "com.google.protobuf.Timestamp";

///
/// Constants
/// validator-class fields: bounds, sets, compiled patterns and the errors
/// declared by each alternative
///

pub(super) struct Constants;

impl FieldTemplates for Constants {
    type Output = String;

    fn numeric(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        kind: RuleKind,
        rules: &NumericRules<Number>,
    ) -> Result<String, RenderError> {
        let ty = kind.proto_type().map_or("Object", boxed);
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            for (name, value) in [
                ("Const", rule.constant),
                ("Lt", rule.lt),
                ("Lte", rule.lte),
                ("Gt", rule.gt),
                ("Gte", rule.gte),
            ] {
                if let Some(value) = value {
                    decl(&mut out, ty, &constant_name(ctx, name, i), &number(value));
                }
            }
            array(&mut out, ty, &constant_name(ctx, "In", i), rule.in_set.iter().map(|v| number(*v)));
            array(
                &mut out,
                ty,
                &constant_name(ctx, "NotIn", i),
                rule.not_in_set.iter().map(|v| number(*v)),
            );
            error_decl(&mut out, ctx, i, rule.error.as_ref());
        }

        Ok(out)
    }

    fn boolean(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &BoolRules,
    ) -> Result<String, RenderError> {
        let mut out = String::new();
        error_decl(&mut out, ctx, 0, rules.error.as_ref());

        Ok(out)
    }

    fn string(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &StringRules,
    ) -> Result<String, RenderError> {
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            array(
                &mut out,
                "String",
                &constant_name(ctx, "In", i),
                rule.in_set.iter().map(|s| java_string(s)),
            );
            array(
                &mut out,
                "String",
                &constant_name(ctx, "NotIn", i),
                rule.not_in_set.iter().map(|s| java_string(s)),
            );
            if let Some(pattern) = rule.effective_pattern() {
                pattern_decl(&mut out, &constant_name(ctx, "Pattern", i), pattern);
            }
            error_decl(&mut out, ctx, i, rule.error.as_ref());
        }

        Ok(out)
    }

    fn bytes(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &BytesRules,
    ) -> Result<String, RenderError> {
        let byte_string = |b: &Vec<u8>| format!("{BYTE_STRING}.copyFrom({})", bytes_literal(b));
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            if let Some(constant) = &rule.constant {
                decl(&mut out, BYTE_STRING, &constant_name(ctx, "Const", i), &byte_string(constant));
            }
            array(&mut out, BYTE_STRING, &constant_name(ctx, "In", i), rule.in_set.iter().map(byte_string));
            array(
                &mut out,
                BYTE_STRING,
                &constant_name(ctx, "NotIn", i),
                rule.not_in_set.iter().map(byte_string),
            );
            if let Some(pattern) = &rule.pattern {
                pattern_decl(&mut out, &constant_name(ctx, "Pattern", i), pattern);
            }
            for (name, value) in [
                ("Prefix", &rule.prefix),
                ("Contains", &rule.contains),
                ("Suffix", &rule.suffix),
            ] {
                if let Some(value) = value {
                    decl(&mut out, "byte[]", &constant_name(ctx, name, i), &bytes_literal(value));
                }
            }
            error_decl(&mut out, ctx, i, rule.error.as_ref());
        }

        Ok(out)
    }

    fn enumeration(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &EnumRules,
    ) -> Result<String, RenderError> {
        let ty = enum_type(r.schema, ctx)?;
        let member = |n: &i32| format!("{ty}.forNumber({n})");
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            array(&mut out, &ty, &constant_name(ctx, "In", i), rule.in_set.iter().map(member));
            array(&mut out, &ty, &constant_name(ctx, "NotIn", i), rule.not_in_set.iter().map(member));
            error_decl(&mut out, ctx, i, rule.error.as_ref());
        }

        Ok(out)
    }

    fn repeated(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &RepeatedRules,
    ) -> Result<String, RenderError> {
        let mut out = r.render(&ctx.elem("", "", None)?)?;

        for (i, rule) in rules.rules.iter().enumerate() {
            error_decl(&mut out, ctx, i, rule.error.as_ref());
        }

        Ok(out)
    }

    fn map(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &MapRules,
    ) -> Result<String, RenderError> {
        let mut out = r.render(&ctx.key("key", "Key", None)?)?;
        out.push_str(&r.render(&ctx.elem("value", "Value", None)?)?);

        for (i, rule) in rules.rules.iter().enumerate() {
            error_decl(&mut out, ctx, i, rule.error.as_ref());
        }

        Ok(out)
    }

    fn any(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &AnyRules,
    ) -> Result<String, RenderError> {
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            array(&mut out, "String", &constant_name(ctx, "In", i), rule.in_set.iter().map(|s| java_string(s)));
            array(
                &mut out,
                "String",
                &constant_name(ctx, "NotIn", i),
                rule.not_in_set.iter().map(|s| java_string(s)),
            );
            error_decl(&mut out, ctx, i, rule.error.as_ref());
        }

        Ok(out)
    }

    fn duration(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &DurationRules,
    ) -> Result<String, RenderError> {
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            for (name, value) in [
                ("Const", rule.constant),
                ("Lt", rule.lt),
                ("Lte", rule.lte),
                ("Gt", rule.gt),
                ("Gte", rule.gte),
            ] {
                if let Some(value) = value {
                    decl(&mut out, DURATION, &constant_name(ctx, name, i), &duration_literal(value));
                }
            }
            array(&mut out, DURATION, &constant_name(ctx, "In", i), rule.in_set.iter().map(|d| duration_literal(*d)));
            array(
                &mut out,
                DURATION,
                &constant_name(ctx, "NotIn", i),
                rule.not_in_set.iter().map(|d| duration_literal(*d)),
            );
            error_decl(&mut out, ctx, i, rule.error.as_ref());
        }

        Ok(out)
    }

    fn timestamp(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &TimestampRules,
    ) -> Result<String, RenderError> {
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            for (name, value) in [
                ("Const", rule.constant),
                ("Lt", rule.lt),
                ("Lte", rule.lte),
                ("Gt", rule.gt),
                ("Gte", rule.gte),
            ] {
                if let Some(value) = value {
                    decl(&mut out, TIMESTAMP, &constant_name(ctx, name, i), &timestamp_literal(value));
                }
            }
            if let Some(within) = rule.within {
                decl(&mut out, DURATION, &constant_name(ctx, "Within", i), &duration_literal(within));
            }
            error_decl(&mut out, ctx, i, rule.error.as_ref());
        }

        Ok(out)
    }

    fn message(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: Option<&MessageRules>,
    ) -> Result<String, RenderError> {
        let mut out = String::new();
        required_decl(&mut out, ctx, rules.or(ctx.message_rules.as_ref()));

        Ok(out)
    }

    fn wrapper(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        _: RuleKind,
    ) -> Result<String, RenderError> {
        let mut out = String::new();
        required_decl(&mut out, ctx, ctx.message_rules.as_ref());
        out.push_str(&r.render(&ctx.unwrap("")?)?);

        Ok(out)
    }
}

// enum_type
// the generated Java enum behind an enum-typed position
pub(super) fn enum_type(schema: &Schema, ctx: &RuleContext<'_>) -> Result<String, RenderError> {
    let name = ctx
        .shape
        .single()
        .and_then(ElementType::enumeration)
        .ok_or_else(|| SchemaError::UnknownEnum(ctx.field.name.clone()))?;
    schema.enumeration(name)?;

    qualified(schema, name)
}

fn decl(out: &mut String, ty: &str, name: &str, value: &str) {
    line(out, 0, format!("private final {ty} {name} = {value};"));
}

fn array(out: &mut String, ty: &str, name: &str, items: impl IntoIterator<Item = String>) {
    let items: Vec<_> = items.into_iter().collect();
    if items.is_empty() {
        return;
    }

    line(
        out,
        0,
        format!("private final {ty}[] {name} = new {ty}[]{{{}}};", items.join(", ")),
    );
}

fn pattern_decl(out: &mut String, name: &str, pattern: &str) {
    decl(out, PATTERN, name, &format!("{PATTERN}.compile({})", java_string(pattern)));
}

// error_decl
// only contexts that own their errors declare them
fn error_decl(out: &mut String, ctx: &RuleContext<'_>, alternative: usize, own: Option<&ErrorSpec>) {
    if !ctx.define_err {
        return;
    }
    if let Some(spec) = own {
        decl(
            out,
            "RuntimeException",
            &error_name(ctx, alternative),
            &error_call(ctx.error_base.as_ref(), spec),
        );
    }
}

fn required_decl(out: &mut String, ctx: &RuleContext<'_>, rules: Option<&MessageRules>) {
    if !ctx.define_err {
        return;
    }
    if let Some(spec) = rules.filter(|r| r.required).and_then(|r| r.error.as_ref()) {
        decl(
            out,
            "RuntimeException",
            &required_name(ctx),
            &error_call(ctx.error_base.as_ref(), spec),
        );
    }
}
