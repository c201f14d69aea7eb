use super::{
    helper::{Declared, check_error, check_ins},
    numeric::{self, Comparison, check_nums, declare_comparison},
};
use crate::prelude::*;

const TIMESTAMP_CONFLICTS: &[(&str, &str)] = &[
    ("lt", "lte"),
    ("gt", "gte"),
    ("lt_now", "gt_now"),
    ("lt_now", "lt"),
    ("lt_now", "lte"),
    ("lt_now", "gt"),
    ("lt_now", "gte"),
    ("gt_now", "lt"),
    ("gt_now", "lte"),
    ("gt_now", "gt"),
    ("gt_now", "gte"),
    ("within", "lt"),
    ("within", "lte"),
    ("within", "gt"),
    ("within", "gte"),
];

// must_be
// the well-known rule kinds apply to exactly one message type each
fn must_be(shape: Shape<'_>, wkt: WellKnownType) -> Result<(), CheckError> {
    ensure!(
        shape.well_known() == Some(wkt),
        ShapeMismatch,
        "{wkt} rules should be used for {} fields",
        wkt.full_name()
    );

    Ok(())
}

fn duration(rule: &'static str, value: DurationValue) -> Result<i128, CheckError> {
    value
        .total_nanos()
        .map_err(|source| CheckErrorKind::MalformedTemporalValue { rule, source }.into())
}

fn timestamp(rule: &'static str, value: TimestampValue) -> Result<i128, CheckError> {
    value
        .unix_nanos()
        .map_err(|source| CheckErrorKind::MalformedTemporalValue { rule, source }.into())
}

fn decode<V: Copy>(
    rule: &'static str,
    value: Option<V>,
    parse: fn(&'static str, V) -> Result<i128, CheckError>,
) -> Result<Option<i128>, CheckError> {
    value.map(|v| parse(rule, v)).transpose()
}

pub(crate) fn check_any(
    shape: Shape<'_>,
    rules: &AnyRules,
    inject: bool,
) -> Result<(), CheckError> {
    must_be(shape, WellKnownType::Any)?;
    let mut declared = Declared::new(&[], &[("in", "not_in")]);

    for rule in &rules.rules {
        check_error(rule.error.as_ref(), inject, RuleKind::Any)?;

        declared.declare_if(rule.required, "required")?;
        declared.declare_if(!rule.in_set.is_empty(), "in")?;
        declared.declare_if(!rule.not_in_set.is_empty(), "not_in")?;
        check_ins(rule.in_set.len(), rule.not_in_set.len())?;
    }

    Ok(())
}

pub(crate) fn check_duration(
    shape: Shape<'_>,
    rules: &DurationRules,
    inject: bool,
) -> Result<(), CheckError> {
    must_be(shape, WellKnownType::Duration)?;
    let mut declared = Declared::new(numeric::EXCLUSIVE, numeric::CONFLICTS);
    let mut combined = Comparison::default();

    for rule in &rules.rules {
        check_error(rule.error.as_ref(), inject, RuleKind::Duration)?;

        let cmp = Comparison {
            constant: decode("const", rule.constant, duration)?,
            lt: decode("lt", rule.lt, duration)?,
            lte: decode("lte", rule.lte, duration)?,
            gt: decode("gt", rule.gt, duration)?,
            gte: decode("gte", rule.gte, duration)?,
        };
        for value in &rule.in_set {
            duration("in", *value)?;
        }
        for value in &rule.not_in_set {
            duration("not_in", *value)?;
        }
        check_nums(rule.in_set.len(), rule.not_in_set.len(), &cmp)?;

        declared.declare_if(rule.required, "required")?;
        declare_comparison(&mut declared, &cmp)?;
        declared.declare_if(!rule.in_set.is_empty(), "in")?;
        declared.declare_if(!rule.not_in_set.is_empty(), "not_in")?;
        combined = combined.merge(cmp);
    }

    check_nums(0, 0, &combined)
}

// check_timestamp
// bounds are either absolute or relative to the time of validation, never
// both; `within` is a window around now and must be positive
pub(crate) fn check_timestamp(
    shape: Shape<'_>,
    rules: &TimestampRules,
    inject: bool,
) -> Result<(), CheckError> {
    must_be(shape, WellKnownType::Timestamp)?;
    let mut declared = Declared::new(numeric::EXCLUSIVE, TIMESTAMP_CONFLICTS);
    let mut combined = Comparison::default();

    for rule in &rules.rules {
        check_error(rule.error.as_ref(), inject, RuleKind::Timestamp)?;

        let cmp = Comparison {
            constant: decode("const", rule.constant, timestamp)?,
            lt: decode("lt", rule.lt, timestamp)?,
            lte: decode("lte", rule.lte, timestamp)?,
            gt: decode("gt", rule.gt, timestamp)?,
            gte: decode("gte", rule.gte, timestamp)?,
        };
        if let Some(within) = decode("within", rule.within, duration)? {
            ensure!(
                within > 0,
                ConstraintConflict,
                "`within` rule must be positive"
            );
        }
        check_nums(0, 0, &cmp)?;

        declared.declare_if(rule.required, "required")?;
        declare_comparison(&mut declared, &cmp)?;
        declared.declare_if(rule.lt_now, "lt_now")?;
        declared.declare_if(rule.gt_now, "gt_now")?;
        declared.declare_if(rule.within.is_some(), "within")?;
        combined = combined.merge(cmp);
    }

    check_nums(0, 0, &combined)
}
