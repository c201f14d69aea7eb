//! Consistency checks over declared rule sets.
//!
//! Every check is fail-fast: the first violation is returned with the route
//! of the message, field and nested position it was found at.

// ensure
// bail out with the given error kind unless the condition holds
macro_rules! ensure {
    ($cond:expr, $kind:ident, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::CheckErrorKind::$kind(format!($($arg)+)).into());
        }
    };
}

mod bytes;
mod collection;
mod enumeration;
mod helper;
mod message;
mod numeric;
mod string;
mod temporal;

#[cfg(test)]
mod tests;

pub use numeric::{Comparison, check_nums};

use crate::prelude::*;
use helper::check_error;

///
/// Checker
/// walks messages and asserts that every declared rule set is well-formed
/// and consistent with the shape of the field it is attached to
///

#[derive(Clone, Copy, Debug)]
pub struct Checker<'a> {
    schema: &'a Schema,
}

impl<'a> Checker<'a> {
    #[must_use]
    pub const fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Check every message declared in `file`.
    pub fn check_file(&self, file: &File) -> Result<(), CheckError> {
        for message in &file.messages {
            self.check_message(file, message)
                .map_err(|e| e.within(file.name.as_str()))?;
        }

        Ok(())
    }

    /// Check every field and oneof of a message, unless validation is
    /// disabled for it.
    pub fn check_message(&self, file: &File, message: &Message) -> Result<(), CheckError> {
        let route = file.full_name(&message.name);
        let wrap = |e: CheckError| e.within(route.as_str());

        if message.disabled().map_err(CheckError::from).map_err(wrap)? {
            return Ok(());
        }
        message.error_base().map_err(CheckError::from).map_err(wrap)?;

        for field in &message.fields {
            self.check_field(field)
                .map_err(|e| e.within(field.name.as_str()))
                .map_err(wrap)?;
        }
        for oneof in &message.oneofs {
            check_oneof(oneof)
                .map_err(|e| e.within(oneof.name.as_str()))
                .map_err(wrap)?;
        }

        Ok(())
    }

    pub fn check_field(&self, field: &Field) -> Result<(), CheckError> {
        match field.rules()? {
            Some(rules) => self.check_rules(field.shape(), &rules, false),
            None => Ok(()),
        }
    }

    // check_rules
    // `inject` marks rule sets synthesized for a nested position, which may
    // defer their error to the enclosing rule
    pub fn check_rules(
        &self,
        shape: Shape<'_>,
        rules: &FieldRules,
        inject: bool,
    ) -> Result<(), CheckError> {
        if let Some(message) = &rules.message {
            must_type(shape, ProtoType::Message, None)?;
            message::check_message_rules(shape, rules, message, inject)?;
        }

        let Some(kind) = &rules.kind else {
            return Ok(());
        };
        let expected = kind.kind();
        if let Some(ty) = expected.proto_type() {
            must_type(shape, ty, expected.wrapper())?;
        }

        match kind {
            TypeRules::Any(r) => temporal::check_any(shape, r, inject),
            TypeRules::Bool(r) => check_error(r.error.as_ref(), inject, expected),
            TypeRules::Bytes(r) => bytes::check_bytes(r, inject),
            TypeRules::Double(r) => numeric::check_numeric(r, inject, expected),
            TypeRules::Duration(r) => temporal::check_duration(shape, r, inject),
            TypeRules::Enum(r) => self.check_enum(shape, r, inject),
            TypeRules::Fixed32(r) => numeric::check_numeric(r, inject, expected),
            TypeRules::Fixed64(r) => numeric::check_numeric(r, inject, expected),
            TypeRules::Float(r) => numeric::check_numeric(r, inject, expected),
            TypeRules::Int32(r) => numeric::check_numeric(r, inject, expected),
            TypeRules::Int64(r) => numeric::check_numeric(r, inject, expected),
            TypeRules::Map(r) => self.check_map(shape, r, inject),
            TypeRules::Repeated(r) => self.check_repeated(shape, r, inject),
            TypeRules::SFixed32(r) => numeric::check_numeric(r, inject, expected),
            TypeRules::SFixed64(r) => numeric::check_numeric(r, inject, expected),
            TypeRules::SInt32(r) => numeric::check_numeric(r, inject, expected),
            TypeRules::SInt64(r) => numeric::check_numeric(r, inject, expected),
            TypeRules::String(r) => string::check_string(r, inject),
            TypeRules::Timestamp(r) => temporal::check_timestamp(shape, r, inject),
            TypeRules::UInt32(r) => numeric::check_numeric(r, inject, expected),
            TypeRules::UInt64(r) => numeric::check_numeric(r, inject, expected),
        }
    }
}

// must_type
// a scalar rule kind applies to a single value of that scalar type, or to
// the nullable wrapper carrying it
pub(crate) fn must_type(
    shape: Shape<'_>,
    expected: ProtoType,
    wrapper: Option<WellKnownType>,
) -> Result<(), CheckError> {
    if let (Some(wkt), Some(wrapper)) = (shape.well_known(), wrapper)
        && wkt == wrapper
    {
        return Ok(());
    }

    ensure!(
        !shape.is_repeated(),
        ShapeMismatch,
        "repeated rule should be used for repeated fields"
    );
    ensure!(
        !shape.is_map(),
        ShapeMismatch,
        "map rule should be used for map fields"
    );

    let actual = shape.proto_type();
    ensure!(
        actual == expected,
        ShapeMismatch,
        "expected rules for {actual} but got {expected}"
    );

    Ok(())
}

fn check_oneof(oneof: &OneOf) -> Result<(), CheckError> {
    let Some(rules) = oneof.rules()? else {
        return Ok(());
    };

    if let Some(error) = &rules.error {
        ensure!(
            !error.method.trim().is_empty(),
            MissingErrorSpec,
            "method to create error instance can not be empty"
        );
    }
    ensure!(
        !rules.required || rules.error.is_some(),
        MissingErrorSpec,
        "required oneof must declare an error"
    );

    Ok(())
}
