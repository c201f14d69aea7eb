use super::{field_ident, raise, type_path};
use crate::{
    context::RuleContext,
    render::{FieldTemplates, RenderError, Renderer},
};
use proc_macro2::{Literal, TokenStream};
use protovet_schema::prelude::*;
use quote::{format_ident, quote};

pub(super) const EMAIL: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";
pub(super) const HOSTNAME: &str =
    r"^[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\.?$";
pub(super) const URI: &str = r"^[a-zA-Z][a-zA-Z0-9+.-]*:[^\s]*$";
pub(super) const URI_REF: &str = r"^[^\s]*$";
pub(super) const UUID: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

///
/// Checks
/// statements of a `validate` body, one early return per failing rule
///

pub(super) struct Checks {
    pub(super) package: String,
}

impl FieldTemplates for Checks {
    type Output = TokenStream;

    fn numeric(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        _: RuleKind,
        rules: &NumericRules<Number>,
    ) -> Result<TokenStream, RenderError> {
        let mut out = quote!();

        for rule in &rules.rules {
            let err = || fail(ctx, rule.error.as_ref());
            let mut block = quote!();

            if let Some(constant) = rule.constant {
                let err = err()?;
                block.extend(quote!(if *v != #constant { #err }));
            }
            block.extend(bounds(&quote!(*v), [rule.lt, rule.lte, rule.gt, rule.gte].map(|b| b.map(|b| quote!(#b))), &err)?);

            let (in_set, not_in_set) = (&rule.in_set, &rule.not_in_set);
            if !in_set.is_empty() {
                let err = err()?;
                block.extend(quote!(if ![#(#in_set),*].contains(v) { #err }));
            }
            if !not_in_set.is_empty() {
                let err = err()?;
                block.extend(quote!(if [#(#not_in_set),*].contains(v) { #err }));
            }

            out.extend(guard(
                rule.ignore_empty.then(|| quote!(*v != ::core::default::Default::default())),
                block,
            ));
        }

        Ok(bind(ctx, out))
    }

    fn boolean(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &BoolRules,
    ) -> Result<TokenStream, RenderError> {
        let Some(constant) = rules.constant else {
            return Ok(quote!());
        };
        let err = fail(ctx, rules.error.as_ref())?;

        Ok(bind(ctx, quote!(if *v != #constant { #err })))
    }

    fn string(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &StringRules,
    ) -> Result<TokenStream, RenderError> {
        let mut out = quote!();

        for rule in &rules.rules {
            let err = || fail(ctx, rule.error.as_ref());
            let mut block = quote!();
            let mut check = |violation: TokenStream| -> Result<(), RenderError> {
                let err = err()?;
                block.extend(quote!(if #violation { #err }));
                Ok(())
            };

            if let Some(constant) = &rule.constant {
                check(quote!(v.as_str() != #constant))?;
            }
            let chars = quote!((v.chars().count() as u64));
            let bytes = quote!((v.len() as u64));
            for (len, exact, min, max) in [
                (&chars, rule.len, rule.min_len, rule.max_len),
                (&bytes, rule.len_bytes, rule.min_bytes, rule.max_bytes),
            ] {
                if let Some(n) = exact {
                    check(quote!(#len != #n))?;
                }
                if let Some(n) = min {
                    check(quote!(#len < #n))?;
                }
                if let Some(n) = max {
                    check(quote!(#len > #n))?;
                }
            }
            if let Some(pattern) = rule.effective_pattern() {
                check(mismatch(&quote!(::regex::Regex), pattern, &quote!(v)))?;
            }
            if let Some(prefix) = &rule.prefix {
                check(quote!(!v.starts_with(#prefix)))?;
            }
            if let Some(suffix) = &rule.suffix {
                check(quote!(!v.ends_with(#suffix)))?;
            }
            if let Some(contains) = &rule.contains {
                check(quote!(!v.contains(#contains)))?;
            }
            if let Some(not_contains) = &rule.not_contains {
                check(quote!(v.contains(#not_contains)))?;
            }
            let (in_set, not_in_set) = (&rule.in_set, &rule.not_in_set);
            if !in_set.is_empty() {
                check(quote!(![#(#in_set),*].contains(&v.as_str())))?;
            }
            if !not_in_set.is_empty() {
                check(quote!([#(#not_in_set),*].contains(&v.as_str())))?;
            }
            if let Some(known) = rule.well_known {
                if let Some(violation) = well_known_string(known) {
                    check(violation)?;
                }
            }

            out.extend(guard(rule.ignore_empty.then(|| quote!(!v.is_empty())), block));
        }

        Ok(bind(ctx, out))
    }

    fn bytes(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &BytesRules,
    ) -> Result<TokenStream, RenderError> {
        let mut out = quote!();

        for rule in &rules.rules {
            let err = || fail(ctx, rule.error.as_ref());
            let mut block = quote!();
            let mut check = |violation: TokenStream| -> Result<(), RenderError> {
                let err = err()?;
                block.extend(quote!(if #violation { #err }));
                Ok(())
            };

            if let Some(constant) = &rule.constant {
                let constant = Literal::byte_string(constant);
                check(quote!(v.as_slice() != &#constant[..]))?;
            }
            let len = quote!((v.len() as u64));
            if let Some(n) = rule.len {
                check(quote!(#len != #n))?;
            }
            if let Some(n) = rule.min_len {
                check(quote!(#len < #n))?;
            }
            if let Some(n) = rule.max_len {
                check(quote!(#len > #n))?;
            }
            if let Some(pattern) = &rule.pattern {
                check(mismatch(&quote!(::regex::bytes::Regex), pattern, &quote!(v.as_slice())))?;
            }
            if let Some(prefix) = &rule.prefix {
                let prefix = Literal::byte_string(prefix);
                check(quote!(!v.starts_with(&#prefix[..])))?;
            }
            if let Some(suffix) = &rule.suffix {
                let suffix = Literal::byte_string(suffix);
                check(quote!(!v.ends_with(&#suffix[..])))?;
            }
            // every value contains the empty sequence
            if let Some(contains) = rule.contains.as_ref().filter(|c| !c.is_empty()) {
                let width = contains.len();
                let contains = Literal::byte_string(contains);
                check(quote!(!v.windows(#width).any(|w| w == &#contains[..])))?;
            }
            let in_set: Vec<_> = rule.in_set.iter().map(|b| Literal::byte_string(b)).collect();
            if !in_set.is_empty() {
                check(quote!(![#(&#in_set[..]),*].contains(&v.as_slice())))?;
            }
            let not_in_set: Vec<_> = rule.not_in_set.iter().map(|b| Literal::byte_string(b)).collect();
            if !not_in_set.is_empty() {
                check(quote!([#(&#not_in_set[..]),*].contains(&v.as_slice())))?;
            }
            match rule.well_known {
                Some(WellKnownBytes::Ip) => check(quote!(!::core::matches!(v.len(), 4 | 16)))?,
                Some(WellKnownBytes::Ipv4) => check(quote!(v.len() != 4))?,
                Some(WellKnownBytes::Ipv6) => check(quote!(v.len() != 16))?,
                None => {}
            }

            out.extend(guard(rule.ignore_empty.then(|| quote!(!v.is_empty())), block));
        }

        Ok(bind(ctx, out))
    }

    fn enumeration(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &EnumRules,
    ) -> Result<TokenStream, RenderError> {
        let name = ctx
            .shape
            .single()
            .and_then(ElementType::enumeration)
            .ok_or_else(|| SchemaError::UnknownEnum(ctx.field.name.clone()))?;
        r.schema.enumeration(name)?;
        let ty = type_path(r.schema, &self.package, name)?;
        let mut out = quote!();

        for rule in &rules.rules {
            let err = || fail(ctx, rule.error.as_ref());

            if let Some(constant) = rule.constant {
                let err = err()?;
                out.extend(quote!(if *v != #constant { #err }));
            }
            if rule.defined_only {
                let err = err()?;
                out.extend(quote!(if <#ty as ::core::convert::TryFrom<i32>>::try_from(*v).is_err() { #err }));
            }
            let (in_set, not_in_set) = (&rule.in_set, &rule.not_in_set);
            if !in_set.is_empty() {
                let err = err()?;
                out.extend(quote!(if ![#(#in_set),*].contains(v) { #err }));
            }
            if !not_in_set.is_empty() {
                let err = err()?;
                out.extend(quote!(if [#(#not_in_set),*].contains(v) { #err }));
            }
        }

        Ok(bind(ctx, out))
    }

    fn repeated(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &RepeatedRules,
    ) -> Result<TokenStream, RenderError> {
        let mut out = quote!();

        for (i, rule) in rules.rules.iter().enumerate() {
            let err = || fail(ctx, rule.error.as_ref());
            let mut block = quote!();

            if let Some(n) = rule.min_items {
                let err = err()?;
                block.extend(quote!(if (v.len() as u64) < #n { #err }));
            }
            if let Some(n) = rule.max_items {
                let err = err()?;
                block.extend(quote!(if (v.len() as u64) > #n { #err }));
            }
            if rule.unique {
                let err = err()?;
                block.extend(quote! {
                    if v.iter().enumerate().any(|(i, a)| v[..i].contains(a)) { #err }
                });
            }
            if rule.items.is_some() {
                let item = r.render(&ctx.elem("item", "", Some(i))?)?;
                block.extend(each(quote!(item), quote!(v.iter()), item));
            }

            out.extend(guard(rule.ignore_empty.then(|| quote!(!v.is_empty())), block));
        }

        // embedded elements are validated even without item rules
        if rules.items().is_none() && ctx.shape.element().is_some_and(ElementType::is_message) {
            let item = r.render(&ctx.elem("item", "", None)?)?;
            out.extend(each(quote!(item), quote!(v.iter()), item));
        }

        Ok(bind(ctx, out))
    }

    fn map(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &MapRules,
    ) -> Result<TokenStream, RenderError> {
        let mut out = quote!();

        for (i, rule) in rules.rules.iter().enumerate() {
            let err = || fail(ctx, rule.error.as_ref());
            let mut block = quote!();

            if let Some(n) = rule.min_pairs {
                let err = err()?;
                block.extend(quote!(if (v.len() as u64) < #n { #err }));
            }
            if let Some(n) = rule.max_pairs {
                let err = err()?;
                block.extend(quote!(if (v.len() as u64) > #n { #err }));
            }
            // prost map values are never null, so no_sparse holds trivially
            if rule.keys.is_some() {
                let key = r.render(&ctx.key("key", "Key", Some(i))?)?;
                block.extend(each(quote!(key), quote!(v.keys()), key));
            }
            if rule.values.is_some() {
                let value = r.render(&ctx.elem("value", "Value", Some(i))?)?;
                block.extend(each(quote!(value), quote!(v.values()), value));
            }

            out.extend(guard(rule.ignore_empty.then(|| quote!(!v.is_empty())), block));
        }

        if rules.values().is_none() && ctx.shape.element().is_some_and(ElementType::is_message) {
            let value = r.render(&ctx.elem("value", "Value", None)?)?;
            out.extend(each(quote!(value), quote!(v.values()), value));
        }

        Ok(bind(ctx, out))
    }

    fn any(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &AnyRules,
    ) -> Result<TokenStream, RenderError> {
        let mut missing = quote!();
        let mut present = quote!();

        for rule in &rules.rules {
            let err = || fail(ctx, rule.error.as_ref());

            if rule.required {
                missing.extend(err()?);
            }
            let (in_set, not_in_set) = (&rule.in_set, &rule.not_in_set);
            if !in_set.is_empty() {
                let err = err()?;
                present.extend(quote!(if ![#(#in_set),*].contains(&v.type_url.as_str()) { #err }));
            }
            if !not_in_set.is_empty() {
                let err = err()?;
                present.extend(quote!(if [#(#not_in_set),*].contains(&v.type_url.as_str()) { #err }));
            }
        }

        Ok(optional(ctx, missing, present))
    }

    fn duration(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &DurationRules,
    ) -> Result<TokenStream, RenderError> {
        let mut missing = quote!();
        let mut present = quote!();

        for rule in &rules.rules {
            let err = || fail(ctx, rule.error.as_ref());

            if rule.required {
                missing.extend(err()?);
            }
            if let Some(constant) = rule.constant {
                let constant = nanos(constant.total_nanos()?);
                let err = err()?;
                present.extend(quote!(if nanos != #constant { #err }));
            }
            let mut bound = [None; 4];
            for (slot, value) in bound.iter_mut().zip([rule.lt, rule.lte, rule.gt, rule.gte]) {
                *slot = value.map(DurationValue::total_nanos).transpose()?;
            }
            present.extend(bounds(&quote!(nanos), bound.map(|b| b.map(nanos)), &err)?);

            let in_set = rule.in_set.iter().map(|d| d.total_nanos().map(nanos)).collect::<Result<Vec<_>, _>>()?;
            let not_in_set = rule.not_in_set.iter().map(|d| d.total_nanos().map(nanos)).collect::<Result<Vec<_>, _>>()?;
            if !in_set.is_empty() {
                let err = err()?;
                present.extend(quote!(if ![#(#in_set),*].contains(&nanos) { #err }));
            }
            if !not_in_set.is_empty() {
                let err = err()?;
                present.extend(quote!(if [#(#not_in_set),*].contains(&nanos) { #err }));
            }
        }

        if !present.is_empty() {
            present = quote! {
                let nanos = i128::from(v.seconds) * 1_000_000_000 + i128::from(v.nanos);
                #present
            };
        }

        Ok(optional(ctx, missing, present))
    }

    fn timestamp(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &TimestampRules,
    ) -> Result<TokenStream, RenderError> {
        let mut missing = quote!();
        let mut present = quote!();
        let mut relative = false;

        for rule in &rules.rules {
            let err = || fail(ctx, rule.error.as_ref());

            if rule.required {
                missing.extend(err()?);
            }
            if let Some(constant) = rule.constant {
                let constant = nanos(constant.unix_nanos()?);
                let err = err()?;
                present.extend(quote!(if nanos != #constant { #err }));
            }
            let mut bound = [None; 4];
            for (slot, value) in bound.iter_mut().zip([rule.lt, rule.lte, rule.gt, rule.gte]) {
                *slot = value.map(TimestampValue::unix_nanos).transpose()?;
            }
            present.extend(bounds(&quote!(nanos), bound.map(|b| b.map(nanos)), &err)?);

            if rule.lt_now {
                let err = err()?;
                present.extend(quote!(if !(nanos < now) { #err }));
            }
            if rule.gt_now {
                let err = err()?;
                present.extend(quote!(if !(nanos > now) { #err }));
            }
            if let Some(within) = rule.within {
                let within = nanos(within.total_nanos()?);
                let err = err()?;
                present.extend(quote!(if (nanos - now).abs() > #within { #err }));
            }
            relative |= rule.lt_now || rule.gt_now || rule.within.is_some();
        }

        let now = relative.then(|| {
            quote! {
                let now = ::std::time::SystemTime::now()
                    .duration_since(::std::time::UNIX_EPOCH)
                    .map_or(0, |d| d.as_nanos() as i128);
            }
        });
        if !present.is_empty() {
            present = quote! {
                let nanos = i128::from(v.seconds) * 1_000_000_000 + i128::from(v.nanos);
                #now
                #present
            };
        }

        Ok(optional(ctx, missing, present))
    }

    fn message(
        &self,
        _: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: Option<&MessageRules>,
    ) -> Result<TokenStream, RenderError> {
        let rules = rules.or(ctx.message_rules.as_ref());
        if rules.is_some_and(|r| r.skip) {
            return Ok(quote!());
        }

        // nested positions are always present
        let mut out = quote!();
        if let Some(rules) = rules.filter(|r| r.required && !ctx.is_nested()) {
            let field = field_ident(&ctx.field.name);
            let err = fail(ctx, rules.error.as_ref())?;
            out.extend(quote!(if self.#field.is_none() { #err }));
        }
        if ctx.shape.single().is_some_and(ElementType::is_message) {
            out.extend(match &ctx.accessor {
                Some(name) => {
                    let v = format_ident!("{}", name);
                    quote!(#v.validate()?;)
                }
                None => {
                    let field = field_ident(&ctx.field.name);
                    quote!(if let ::core::option::Option::Some(m) = &self.#field { m.validate()?; })
                }
            });
        }

        Ok(out)
    }

    fn wrapper(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        _: RuleKind,
    ) -> Result<TokenStream, RenderError> {
        // nested wrappers are plain scalars
        if let Some(name) = &ctx.accessor {
            return r.render(&ctx.unwrap(name)?);
        }

        let inner = r.render(&ctx.unwrap("inner")?)?;
        let missing = match ctx.message_rules.as_ref().filter(|m| m.required) {
            Some(rules) => fail(ctx, rules.error.as_ref())?,
            None => quote!(),
        };
        if inner.is_empty() && missing.is_empty() {
            return Ok(quote!());
        }

        let field = field_ident(&ctx.field.name);
        Ok(quote! {
            match &self.#field {
                ::core::option::Option::Some(inner) => { #inner }
                ::core::option::Option::None => { #missing }
            }
        })
    }
}

// fail
// the early return a failing check of this alternative performs
fn fail(ctx: &RuleContext<'_>, own: Option<&ErrorSpec>) -> Result<TokenStream, RenderError> {
    let spec = ctx.error(own).ok_or_else(|| RenderError::MissingError {
        field: ctx.field.name.clone(),
    })?;

    raise(ctx.error_base.as_ref(), spec)
}

// bind
// checks read the position through `v`, a reference to its value
fn bind(ctx: &RuleContext<'_>, checks: TokenStream) -> TokenStream {
    if checks.is_empty() {
        return checks;
    }
    let value = match &ctx.accessor {
        Some(name) => {
            let name = format_ident!("{}", name);
            quote!(#name)
        }
        None => {
            let field = field_ident(&ctx.field.name);
            quote!(&self.#field)
        }
    };

    quote!({
        let v = #value;
        #checks
    })
}

// optional
// message-typed positions: `missing` runs when unset, `present` sees `v`
fn optional(ctx: &RuleContext<'_>, missing: TokenStream, present: TokenStream) -> TokenStream {
    if missing.is_empty() && present.is_empty() {
        return quote!();
    }
    let value = match &ctx.accessor {
        Some(name) => {
            let name = format_ident!("{}", name);
            quote!(::core::option::Option::Some(#name))
        }
        None => {
            let field = field_ident(&ctx.field.name);
            quote!(self.#field.as_ref())
        }
    };

    quote! {
        match #value {
            ::core::option::Option::Some(v) => { #present }
            ::core::option::Option::None => { #missing }
        }
    }
}

// bounds
// one negated comparison per declared bound, so NaN always fails
fn bounds(
    value: &TokenStream,
    [lt, lte, gt, gte]: [Option<TokenStream>; 4],
    err: &dyn Fn() -> Result<TokenStream, RenderError>,
) -> Result<TokenStream, RenderError> {
    let mut out = quote!();

    for (bound, op) in [(lt, quote!(<)), (lte, quote!(<=)), (gt, quote!(>)), (gte, quote!(>=))] {
        if let Some(bound) = bound {
            let err = err()?;
            out.extend(quote!(if !(#value #op #bound) { #err }));
        }
    }

    Ok(out)
}

fn guard(condition: Option<TokenStream>, block: TokenStream) -> TokenStream {
    match condition {
        Some(condition) if !block.is_empty() => quote!(if #condition { #block }),
        _ => block,
    }
}

fn each(binding: TokenStream, iter: TokenStream, body: TokenStream) -> TokenStream {
    if body.is_empty() {
        return body;
    }

    quote!(for #binding in #iter { #body })
}

// mismatch
// patterns compile once per process; they were checked at generation time
fn mismatch(regex: &TokenStream, pattern: &str, subject: &TokenStream) -> TokenStream {
    quote! {{
        static PATTERN: ::std::sync::LazyLock<#regex> =
            ::std::sync::LazyLock::new(|| #regex::new(#pattern).expect("valid pattern"));
        !PATTERN.is_match(#subject)
    }}
}

fn well_known_string(known: WellKnownString) -> Option<TokenStream> {
    let regex = quote!(::regex::Regex);
    let parses = |ty: TokenStream| quote!(v.parse::<#ty>().is_err());

    Some(match known {
        WellKnownString::Address => {
            let ip = parses(quote!(::std::net::IpAddr));
            let host = mismatch(&regex, HOSTNAME, &quote!(v));
            quote!(#ip && (v.len() > 253 || #host))
        }
        WellKnownString::Email => mismatch(&regex, EMAIL, &quote!(v)),
        WellKnownString::Hostname => {
            let host = mismatch(&regex, HOSTNAME, &quote!(v));
            quote!(v.len() > 253 || #host)
        }
        WellKnownString::Ip => parses(quote!(::std::net::IpAddr)),
        WellKnownString::Ipv4 => parses(quote!(::std::net::Ipv4Addr)),
        WellKnownString::Ipv6 => parses(quote!(::std::net::Ipv6Addr)),
        WellKnownString::Uri => mismatch(&regex, URI, &quote!(v)),
        WellKnownString::UriRef => mismatch(&regex, URI_REF, &quote!(v)),
        WellKnownString::Uuid => mismatch(&regex, UUID, &quote!(v)),
        WellKnownString::WellKnownRegex(_) => return None,
    })
}

fn nanos(value: i128) -> TokenStream {
    let value = Literal::i128_suffixed(value);

    quote!(#value)
}
