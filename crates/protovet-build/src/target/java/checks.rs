use super::{
    RUNTIME, accessor, constant_name, constants::enum_type, error_name, has, indent, java_string,
    line, required_name,
};
use crate::{
    context::RuleContext,
    render::{FieldTemplates, RenderError, Renderer},
};
use protovet_schema::prelude::*;

const DURATIONS: &str = "com.google.protobuf.util.Durations.comparator()";
const NATURAL: &str = "java.util.Comparator.naturalOrder()";
const TIMESTAMPS: &str = "com.google.protobuf.util.Timestamps.comparator()";

///
/// Checks
/// statements of `assertValid`, calling into the runtime helpers
///

pub(super) struct Checks;

impl FieldTemplates for Checks {
    type Output = String;

    fn numeric(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        _: RuleKind,
        rules: &NumericRules<Number>,
    ) -> Result<String, RenderError> {
        let acc = accessor(ctx);
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            let err = || error_ref(ctx, i, rule.error.as_ref());
            let name = |n: &str| constant_name(ctx, n, i);
            let mut block = String::new();

            if rule.constant.is_some() {
                call(&mut block, "", "ConstantValidation.constant", &[err()?, acc.clone(), name("Const")]);
            }
            let bounds = [
                rule.lt.map(|_| name("Lt")),
                rule.lte.map(|_| name("Lte")),
                rule.gt.map(|_| name("Gt")),
                rule.gte.map(|_| name("Gte")),
            ];
            if bounds.iter().any(Option::is_some) {
                compare(&mut block, "", &err()?, &acc, bounds, NATURAL);
            }
            collective(&mut block, "", &err, &acc, !rule.in_set.is_empty(), !rule.not_in_set.is_empty(), &name)?;

            guard(&mut out, rule.ignore_empty.then(|| format!("{acc} != 0")), &block);
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
        if let Some(constant) = rules.constant {
            let err = error_ref(ctx, 0, rules.error.as_ref())?;
            call(
                &mut out,
                "",
                "ConstantValidation.constant",
                &[err, accessor(ctx), constant.to_string()],
            );
        }

        Ok(out)
    }

    fn string(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &StringRules,
    ) -> Result<String, RenderError> {
        let acc = accessor(ctx);
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            let err = || error_ref(ctx, i, rule.error.as_ref());
            let name = |n: &str| constant_name(ctx, n, i);
            let mut block = String::new();
            let mut check = |method: &str, arg: Option<String>| -> Result<(), RenderError> {
                let mut args = vec![err()?, acc.clone()];
                args.extend(arg);
                call(&mut block, "", method, &args);
                Ok(())
            };

            if let Some(constant) = &rule.constant {
                check("ConstantValidation.constant", Some(java_string(constant)))?;
            }
            if !rule.in_set.is_empty() {
                check("CollectiveValidation.in", Some(name("In")))?;
            }
            if !rule.not_in_set.is_empty() {
                check("CollectiveValidation.notIn", Some(name("NotIn")))?;
            }
            for (method, value) in [
                ("StringValidation.length", rule.len),
                ("StringValidation.minLength", rule.min_len),
                ("StringValidation.maxLength", rule.max_len),
                ("StringValidation.lenBytes", rule.len_bytes),
                ("StringValidation.minBytes", rule.min_bytes),
                ("StringValidation.maxBytes", rule.max_bytes),
            ] {
                if let Some(value) = value {
                    check(method, Some(value.to_string()))?;
                }
            }
            if rule.effective_pattern().is_some() {
                check("StringValidation.pattern", Some(name("Pattern")))?;
            }
            for (method, value) in [
                ("StringValidation.prefix", &rule.prefix),
                ("StringValidation.contains", &rule.contains),
                ("StringValidation.notContains", &rule.not_contains),
                ("StringValidation.suffix", &rule.suffix),
            ] {
                if let Some(value) = value {
                    check(method, Some(java_string(value)))?;
                }
            }
            let format = match rule.well_known {
                Some(WellKnownString::Address) => Some("address"),
                Some(WellKnownString::Email) => Some("email"),
                Some(WellKnownString::Hostname) => Some("hostName"),
                Some(WellKnownString::Ip) => Some("ip"),
                Some(WellKnownString::Ipv4) => Some("ipv4"),
                Some(WellKnownString::Ipv6) => Some("ipv6"),
                Some(WellKnownString::Uri) => Some("uri"),
                Some(WellKnownString::UriRef) => Some("uriRef"),
                Some(WellKnownString::Uuid) => Some("uuid"),
                Some(WellKnownString::WellKnownRegex(_)) | None => None,
            };
            if let Some(format) = format {
                check(&format!("StringValidation.{format}"), None)?;
            }

            guard(&mut out, rule.ignore_empty.then(|| format!("!{acc}.isEmpty()")), &block);
        }

        Ok(out)
    }

    fn bytes(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &BytesRules,
    ) -> Result<String, RenderError> {
        let acc = accessor(ctx);
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            let err = || error_ref(ctx, i, rule.error.as_ref());
            let name = |n: &str| constant_name(ctx, n, i);
            let mut block = String::new();
            let mut check = |method: &str, arg: Option<String>| -> Result<(), RenderError> {
                let mut args = vec![err()?, acc.clone()];
                args.extend(arg);
                call(&mut block, "", method, &args);
                Ok(())
            };

            if rule.constant.is_some() {
                check("ConstantValidation.constant", Some(name("Const")))?;
            }
            for (method, value) in [
                ("BytesValidation.length", rule.len),
                ("BytesValidation.minLength", rule.min_len),
                ("BytesValidation.maxLength", rule.max_len),
            ] {
                if let Some(value) = value {
                    check(method, Some(value.to_string()))?;
                }
            }
            if rule.pattern.is_some() {
                check("BytesValidation.pattern", Some(name("Pattern")))?;
            }
            for (method, constant, present) in [
                ("BytesValidation.prefix", "Prefix", rule.prefix.is_some()),
                ("BytesValidation.contains", "Contains", rule.contains.is_some()),
                ("BytesValidation.suffix", "Suffix", rule.suffix.is_some()),
            ] {
                if present {
                    check(method, Some(name(constant)))?;
                }
            }
            match rule.well_known {
                Some(WellKnownBytes::Ip) => check("BytesValidation.ip", None)?,
                Some(WellKnownBytes::Ipv4) => check("BytesValidation.ipv4", None)?,
                Some(WellKnownBytes::Ipv6) => check("BytesValidation.ipv6", None)?,
                None => {}
            }
            if !rule.in_set.is_empty() {
                check("CollectiveValidation.in", Some(name("In")))?;
            }
            if !rule.not_in_set.is_empty() {
                check("CollectiveValidation.notIn", Some(name("NotIn")))?;
            }

            guard(&mut out, rule.ignore_empty.then(|| format!("!{acc}.isEmpty()")), &block);
        }

        Ok(out)
    }

    fn enumeration(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &EnumRules,
    ) -> Result<String, RenderError> {
        let acc = accessor(ctx);
        let ty = enum_type(r.schema, ctx)?;
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            let err = || error_ref(ctx, i, rule.error.as_ref());
            let name = |n: &str| constant_name(ctx, n, i);

            if let Some(constant) = rule.constant {
                call(
                    &mut out,
                    "",
                    "ConstantValidation.constant",
                    &[err()?, acc.clone(), format!("{ty}.forNumber({constant})")],
                );
            }
            if rule.defined_only {
                call(&mut out, "", "EnumValidation.definedOnly", &[err()?, acc.clone()]);
            }
            collective(&mut out, "", &err, &acc, !rule.in_set.is_empty(), !rule.not_in_set.is_empty(), &name)?;
        }

        Ok(out)
    }

    fn repeated(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &RepeatedRules,
    ) -> Result<String, RenderError> {
        let acc = accessor(ctx);
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            let err = || error_ref(ctx, i, rule.error.as_ref());
            let mut block = String::new();

            for (method, value) in [
                ("RepeatedValidation.minItems", rule.min_items),
                ("RepeatedValidation.maxItems", rule.max_items),
            ] {
                if let Some(value) = value {
                    call(&mut block, "", method, &[err()?, acc.clone(), value.to_string()]);
                }
            }
            if rule.unique {
                call(&mut block, "", "RepeatedValidation.unique", &[err()?, acc.clone()]);
            }
            if rule.items.is_some() {
                let item = r.render(&ctx.elem("item", "", Some(i))?)?;
                lambda(&mut block, "RepeatedValidation.forEach", &acc, "item", &item);
            }

            guard(&mut out, rule.ignore_empty.then(|| format!("!{acc}.isEmpty()")), &block);
        }

        // embedded elements are validated even without item rules
        if rules.items().is_none() && ctx.shape.element().is_some_and(ElementType::is_message) {
            let item = r.render(&ctx.elem("item", "", None)?)?;
            lambda(&mut out, "RepeatedValidation.forEach", &acc, "item", &item);
        }

        Ok(out)
    }

    fn map(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &MapRules,
    ) -> Result<String, RenderError> {
        let acc = accessor(ctx);
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            let err = || error_ref(ctx, i, rule.error.as_ref());
            let mut block = String::new();

            for (method, value) in [
                ("MapValidation.min", rule.min_pairs),
                ("MapValidation.max", rule.max_pairs),
            ] {
                if let Some(value) = value {
                    call(&mut block, "", method, &[err()?, acc.clone(), value.to_string()]);
                }
            }
            if rule.no_sparse {
                call(&mut block, "", "MapValidation.noSparse", &[err()?, acc.clone()]);
            }
            if rule.keys.is_some() {
                let key = r.render(&ctx.key("key", "Key", Some(i))?)?;
                lambda(&mut block, "MapValidation.validateParts", &format!("{acc}.keySet()"), "key", &key);
            }
            if rule.values.is_some() {
                let value = r.render(&ctx.elem("value", "Value", Some(i))?)?;
                lambda(&mut block, "MapValidation.validateParts", &format!("{acc}.values()"), "value", &value);
            }

            guard(&mut out, rule.ignore_empty.then(|| format!("!{acc}.isEmpty()")), &block);
        }

        if rules.values().is_none() && ctx.shape.element().is_some_and(ElementType::is_message) {
            let value = r.render(&ctx.elem("value", "Value", None)?)?;
            lambda(&mut out, "MapValidation.validateParts", &format!("{acc}.values()"), "value", &value);
        }

        Ok(out)
    }

    fn any(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &AnyRules,
    ) -> Result<String, RenderError> {
        let acc = accessor(ctx);
        let present = format!("if ({}) ", has(ctx));
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            let err = || error_ref(ctx, i, rule.error.as_ref());
            let name = |n: &str| constant_name(ctx, n, i);

            if rule.required {
                required(&mut out, ctx, &err()?);
            }
            collective(
                &mut out,
                &present,
                &err,
                &format!("{acc}.getTypeUrl()"),
                !rule.in_set.is_empty(),
                !rule.not_in_set.is_empty(),
                &name,
            )?;
        }

        Ok(out)
    }

    fn duration(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &DurationRules,
    ) -> Result<String, RenderError> {
        let acc = accessor(ctx);
        let present = format!("if ({}) ", has(ctx));
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            let err = || error_ref(ctx, i, rule.error.as_ref());
            let name = |n: &str| constant_name(ctx, n, i);

            if rule.required {
                required(&mut out, ctx, &err()?);
            }
            if rule.constant.is_some() {
                call(&mut out, &present, "ConstantValidation.constant", &[err()?, acc.clone(), name("Const")]);
            }
            let bounds = [
                rule.lt.map(|_| name("Lt")),
                rule.lte.map(|_| name("Lte")),
                rule.gt.map(|_| name("Gt")),
                rule.gte.map(|_| name("Gte")),
            ];
            if bounds.iter().any(Option::is_some) {
                compare(&mut out, &present, &err()?, &acc, bounds, DURATIONS);
            }
            collective(&mut out, &present, &err, &acc, !rule.in_set.is_empty(), !rule.not_in_set.is_empty(), &name)?;
        }

        Ok(out)
    }

    fn timestamp(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &TimestampRules,
    ) -> Result<String, RenderError> {
        let acc = accessor(ctx);
        let present = format!("if ({}) ", has(ctx));
        let now = format!("{RUNTIME}.TimestampValidation.currentTimestamp()");
        let mut out = String::new();

        for (i, rule) in rules.rules.iter().enumerate() {
            let err = || error_ref(ctx, i, rule.error.as_ref());
            let name = |n: &str| constant_name(ctx, n, i);

            if rule.required {
                required(&mut out, ctx, &err()?);
            }
            if rule.constant.is_some() {
                call(&mut out, &present, "ConstantValidation.constant", &[err()?, acc.clone(), name("Const")]);
            }
            let bounds = [
                rule.lt.map(|_| name("Lt")),
                rule.lte.map(|_| name("Lte")),
                rule.gt.map(|_| name("Gt")),
                rule.gte.map(|_| name("Gte")),
            ];
            if bounds.iter().any(Option::is_some) {
                compare(&mut out, &present, &err()?, &acc, bounds, TIMESTAMPS);
            }
            if rule.lt_now {
                call(
                    &mut out,
                    &present,
                    "ComparativeValidation.lessThan",
                    &[err()?, acc.clone(), now.clone(), TIMESTAMPS.to_string()],
                );
            }
            if rule.gt_now {
                call(
                    &mut out,
                    &present,
                    "ComparativeValidation.greaterThan",
                    &[err()?, acc.clone(), now.clone(), TIMESTAMPS.to_string()],
                );
            }
            if rule.within.is_some() {
                call(
                    &mut out,
                    &present,
                    "TimestampValidation.within",
                    &[err()?, acc.clone(), name("Within"), now.clone()],
                );
            }
        }

        Ok(out)
    }

    fn message(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: Option<&MessageRules>,
    ) -> Result<String, RenderError> {
        let rules = rules.or(ctx.message_rules.as_ref());
        let mut out = String::new();

        if rules.is_some_and(|r| r.skip) {
            line(&mut out, 0, format!("// skipping validation for {}", ctx.field.name));
            return Ok(out);
        }
        if let Some(rules) = rules.filter(|r| r.required) {
            required(&mut out, ctx, &required_ref(ctx, rules)?);
        }
        if ctx.shape.single().is_some_and(ElementType::is_message) {
            let acc = accessor(ctx);
            line(&mut out, 0, format!("// Validate {}", ctx.field.name));
            line(
                &mut out,
                0,
                format!("if ({}) index.validatorFor({acc}).assertValid({acc});", has(ctx)),
            );
        }

        Ok(out)
    }

    fn wrapper(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        _: RuleKind,
    ) -> Result<String, RenderError> {
        let inner = r.render(&ctx.unwrap(&format!("{}.getValue()", accessor(ctx)))?)?;
        let required = ctx.message_rules.as_ref().filter(|m| m.required);
        let mut out = String::new();

        if inner.is_empty() && required.is_none() {
            return Ok(out);
        }

        line(&mut out, 0, format!("if ({}) {{", has(ctx)));
        out.push_str(&indent(&inner, 1));
        if let Some(rules) = required {
            line(&mut out, 0, "} else {");
            call(&mut out, "\t", "RequiredValidation.required", &[required_ref(ctx, rules)?, "null".to_string()]);
        }
        line(&mut out, 0, "}");

        Ok(out)
    }
}

// error_ref
// the error constant a failing check of this alternative raises
fn error_ref(
    ctx: &RuleContext<'_>,
    alternative: usize,
    own: Option<&ErrorSpec>,
) -> Result<String, RenderError> {
    if ctx.error(own).is_none() {
        return Err(RenderError::MissingError {
            field: ctx.field.name.clone(),
        });
    }

    Ok(error_name(ctx, alternative))
}

fn required_ref(ctx: &RuleContext<'_>, rules: &MessageRules) -> Result<String, RenderError> {
    if ctx.define_err && rules.error.is_some() {
        Ok(required_name(ctx))
    } else {
        error_ref(ctx, 0, None)
    }
}

fn call(out: &mut String, prefix: &str, method: &str, args: &[String]) {
    line(out, 0, format!("{prefix}{RUNTIME}.{method}({});", args.join(", ")));
}

// compare
// a single range call when both sides are bounded
fn compare(
    out: &mut String,
    prefix: &str,
    err: &str,
    acc: &str,
    bounds: [Option<String>; 4],
    comparator: &str,
) {
    let [lt, lte, gt, gte] = bounds;

    if (lt.is_some() || lte.is_some()) && (gt.is_some() || gte.is_some()) {
        let or_null = |b: Option<String>| b.unwrap_or_else(|| "null".to_string());
        let args = [
            err.to_string(),
            acc.to_string(),
            or_null(lt),
            or_null(lte),
            or_null(gt),
            or_null(gte),
            comparator.to_string(),
        ];
        call(out, prefix, "ComparativeValidation.range", &args);
        return;
    }

    for (method, bound) in [
        ("ComparativeValidation.lessThan", lt),
        ("ComparativeValidation.lessThanOrEqual", lte),
        ("ComparativeValidation.greaterThan", gt),
        ("ComparativeValidation.greaterThanOrEqual", gte),
    ] {
        if let Some(bound) = bound {
            call(
                out,
                prefix,
                method,
                &[err.to_string(), acc.to_string(), bound, comparator.to_string()],
            );
        }
    }
}

fn collective(
    out: &mut String,
    prefix: &str,
    err: &dyn Fn() -> Result<String, RenderError>,
    acc: &str,
    in_set: bool,
    not_in_set: bool,
    name: &dyn Fn(&str) -> String,
) -> Result<(), RenderError> {
    if in_set {
        call(out, prefix, "CollectiveValidation.in", &[err()?, acc.to_string(), name("In")]);
    }
    if not_in_set {
        call(out, prefix, "CollectiveValidation.notIn", &[err()?, acc.to_string(), name("NotIn")]);
    }

    Ok(())
}

fn required(out: &mut String, ctx: &RuleContext<'_>, err: &str) {
    line(out, 0, format!("if ({}) {{", has(ctx)));
    call(out, "\t", "RequiredValidation.required", &[err.to_string(), accessor(ctx)]);
    line(out, 0, "} else {");
    call(out, "\t", "RequiredValidation.required", &[err.to_string(), "null".to_string()]);
    line(out, 0, "};");
}

fn lambda(out: &mut String, method: &str, target: &str, param: &str, body: &str) {
    if body.is_empty() {
        return;
    }

    line(out, 0, format!("{RUNTIME}.{method}({target}, {param} -> {{"));
    out.push_str(&indent(body, 1));
    line(out, 0, "});");
}

// guard
// `ignore_empty` alternatives only run on non-default values
fn guard(out: &mut String, condition: Option<String>, block: &str) {
    match condition {
        Some(condition) if !block.is_empty() => {
            line(out, 0, format!("if ( {condition} ) {{"));
            out.push_str(&indent(block, 1));
            line(out, 0, "}");
        }
        _ => out.push_str(block),
    }
}
