//! Rust validators over prost-generated message structs.
//!
//! Each message gets an inherent `validate` method that returns the first
//! violation as a boxed error built by the configured error constructors.

mod checks;


use crate::{
    context::RuleContext,
    format::{Formatter, Rustfmt},
    render::{RenderError, Renderer},
    target::{Lang, Target, Unit, package_dir, validated},
};
use checks::Checks;
use convert_case::{Case, Casing};
use proc_macro2::{Ident, Span, TokenStream};
use protovet_schema::prelude::*;
use quote::{format_ident, quote};

const HEADER: &str = "// Code generated by protovet. DO NOT EDIT.";

///
/// Rust
///

#[derive(Clone, Debug, Default)]
pub struct Rust {
    rustfmt: Rustfmt,
}

impl Rust {
    #[must_use]
    pub const fn new(rustfmt: Rustfmt) -> Self {
        Self { rustfmt }
    }
}

impl Target for Rust {
    fn lang(&self) -> Lang {
        Lang::Rust
    }

    fn units<'a>(&self, file: &'a File) -> Result<Vec<Unit<'a>>, RenderError> {
        let name = file.stem().to_string();

        Ok(vec![Unit {
            file,
            messages: validated(&file.messages)?,
            path: format!("{}{name}.validate.rs", package_dir(&file.package)),
            name,
        }])
    }

    fn render(&self, schema: &Schema, unit: &Unit<'_>) -> Result<String, RenderError> {
        let checks = Checks {
            package: unit.file.package.clone(),
        };
        let r = Renderer::new(schema, &checks);

        let mut tokens = quote!();
        for message in &unit.messages {
            tokens.extend(validate_impl(&r, message)?);
        }

        Ok(format!(
            "{HEADER}\n// source: {}\n\n{tokens}\n",
            unit.file.name
        ))
    }

    fn formatter(&self) -> Option<&dyn Formatter> {
        Some(&self.rustfmt)
    }
}

fn validate_impl(r: &Renderer<'_, Checks>, message: &Message) -> Result<TokenStream, RenderError> {
    let package = &r.templates.package;
    let ty = type_path(r.schema, package, &full_name(package, &message.name))?;

    let mut body = quote!();
    if !message.disabled()? {
        for field in message.fields.iter().filter(|f| f.oneof.is_none()) {
            body.extend(r.render(&RuleContext::new(message, field)?)?);
        }
        for oneof in &message.oneofs {
            body.extend(oneof_match(r, message, oneof)?);
        }
    }

    Ok(quote! {
        impl #ty {
            /// Checks every declared rule, returning the first violation.
            #[allow(unused_variables, clippy::all)]
            pub fn validate(
                &self,
            ) -> ::core::result::Result<(), ::std::boxed::Box<dyn ::std::error::Error + Send + Sync>> {
                #body
                ::core::result::Result::Ok(())
            }
        }
    })
}

// oneof_match
// prost models a oneof as an optional enum with one variant per member
fn oneof_match(
    r: &Renderer<'_, Checks>,
    message: &Message,
    oneof: &OneOf,
) -> Result<TokenStream, RenderError> {
    let field = field_ident(&oneof.name);
    let enum_path = {
        let mut segments: Vec<String> = message.name.split('.').map(module_name).collect();
        segments.push(oneof.name.to_case(Case::Pascal));
        parse_path(&segments.join("::"))?
    };

    let mut arms = quote!();
    for member in message.oneof_fields(&oneof.name) {
        let ctx = RuleContext {
            accessor: Some("v".to_string()),
            ..RuleContext::new(message, member)?
        };
        let body = r.render(&ctx)?;
        let variant = format_ident!("{}", member.name.to_case(Case::Pascal));

        arms.extend(quote! {
            ::core::option::Option::Some(#enum_path::#variant(v)) => { #body }
        });
    }

    let missing = match oneof.rules()? {
        Some(rules) if rules.required => {
            let spec = rules.error.ok_or_else(|| RenderError::MissingError {
                field: oneof.name.clone(),
            })?;
            raise(message.error_base()?.as_ref(), &spec)?
        }
        _ => quote!(),
    };

    Ok(quote! {
        match &self.#field {
            #arms
            ::core::option::Option::None => { #missing }
        }
    })
}

///
/// Naming
///

fn full_name(package: &str, local: &str) -> String {
    if package.is_empty() {
        local.to_string()
    } else {
        format!("{package}.{local}")
    }
}

// type_path
// relative inside the current package, crate-rooted elsewhere; enclosing
// messages become snake_case modules
pub(crate) fn type_path(
    schema: &Schema,
    package: &str,
    full_name: &str,
) -> Result<syn::Path, RenderError> {
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
    if file.package != package {
        segments.push("crate".to_string());
        segments.extend(
            file.package
                .split('.')
                .filter(|s| !s.is_empty())
                .map(module_name),
        );
    }
    let mut parts: Vec<&str> = local.split('.').collect();
    let last = parts.pop().unwrap_or(local);
    segments.extend(parts.into_iter().map(module_name));
    segments.push(last.to_case(Case::Pascal));

    parse_path(&segments.join("::"))
}

pub(crate) fn parse_path(path: &str) -> Result<syn::Path, RenderError> {
    syn::parse_str(path).map_err(|_| RenderError::InvalidPath(path.to_string()))
}

fn module_name(segment: &str) -> String {
    escape(segment.to_case(Case::Snake))
}

// field_ident
// prost field names are snake_case, with raw identifiers for keywords
pub(crate) fn field_ident(name: &str) -> Ident {
    let name = name.to_case(Case::Snake);

    match name.as_str() {
        "crate" | "self" | "super" | "Self" => format_ident!("{}_", name),
        _ if is_keyword(&name) => Ident::new_raw(&name, Span::call_site()),
        _ => format_ident!("{}", name),
    }
}

fn escape(name: String) -> String {
    match name.as_str() {
        "crate" | "self" | "super" | "Self" => format!("{name}_"),
        _ if is_keyword(&name) => format!("r#{name}"),
        _ => name,
    }
}

fn is_keyword(name: &str) -> bool {
    const KEYWORDS: &[&str] = &[
        "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
        "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen",
        "if", "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override",
        "priv", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
        "true", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual", "where",
        "while", "yield",
    ];

    KEYWORDS.contains(&name)
}

// raise
// early return with the error built by the configured constructor
pub(crate) fn raise(base: Option<&ErrorBase>, spec: &ErrorSpec) -> Result<TokenStream, RenderError> {
    let path = match base {
        Some(base) => format!("{}::{}", base.class.replace('.', "::"), spec.method),
        None => spec.method.clone(),
    };
    let path = parse_path(&path)?;
    let code = spec.code.map(|code| quote!(#code));
    let message = spec.message.as_deref().map(|message| quote!(#message));
    let args = code.into_iter().chain(message);

    Ok(quote! {
        return ::core::result::Result::Err(::core::convert::Into::into(#path(#(#args),*)));
    })
}
