use super::helper::{Declared, check_error, check_ins, check_len, check_min_max, check_pattern};
use crate::{prelude::*, well_known};

const CONFLICTS: &[(&str, &str)] = &[
    ("len", "min_len"),
    ("len", "max_len"),
    ("len_bytes", "min_bytes"),
    ("len_bytes", "max_bytes"),
    ("in", "not_in"),
    ("in", "pattern"),
    ("pattern", "well_known"),
];

pub(crate) fn check_string(rules: &StringRules, inject: bool) -> Result<(), CheckError> {
    let mut declared = Declared::new(&["const"], CONFLICTS);

    for rule in &rules.rules {
        check_error(rule.error.as_ref(), inject, RuleKind::String)?;
        check_well_known_regex(rule)?;
        declare(&mut declared, rule)?;

        check_len(rule.len, rule.min_len, rule.max_len, ["len", "min_len", "max_len"])?;
        check_len(
            rule.len_bytes,
            rule.min_bytes,
            rule.max_bytes,
            ["len_bytes", "min_bytes", "max_bytes"],
        )?;
        check_min_max(rule.min_len, rule.max_len, "min_len", "max_len")?;
        check_min_max(rule.min_bytes, rule.max_bytes, "min_bytes", "max_bytes")?;
        if let (Some(max_len), Some(max_bytes)) = (rule.max_len, rule.max_bytes) {
            ensure!(
                max_len <= max_bytes,
                ConstraintConflict,
                "`max_len` ({max_len}) cannot exceed `max_bytes` ({max_bytes})"
            );
        }

        check_ins(rule.in_set.len(), rule.not_in_set.len())?;
        check_pattern(rule.effective_pattern(), rule.in_set.len())?;

        for (name, value) in [
            ("prefix", &rule.prefix),
            ("suffix", &rule.suffix),
            ("contains", &rule.contains),
        ] {
            if let Some(value) = value {
                check_affix(name, value, rule.max_len, rule.max_bytes)?;
            }
        }
    }

    Ok(())
}

// check_well_known_regex
// a symbolic regex stands in for `pattern`, so the two cannot both be set
pub(crate) fn check_well_known_regex(rule: &StringRule) -> Result<(), CheckError> {
    let Some(known) = rule.known_regex() else {
        return Ok(());
    };

    if well_known::resolve(known, rule.strict).is_some() {
        ensure!(
            rule.pattern.is_none(),
            ConstraintConflict,
            "regex `well_known_regex` and regex `pattern` are incompatible"
        );
    }

    Ok(())
}

fn check_affix(
    name: &str,
    value: &str,
    max_len: Option<u64>,
    max_bytes: Option<u64>,
) -> Result<(), CheckError> {
    let chars = value.chars().count() as u64;
    let bytes = value.len() as u64;

    if let Some(max_len) = max_len {
        ensure!(
            chars <= max_len,
            ConstraintConflict,
            "`{name}` length ({chars}) exceeds the `max_len` ({max_len})"
        );
    }
    if let Some(max_bytes) = max_bytes {
        ensure!(
            bytes <= max_bytes,
            ConstraintConflict,
            "`{name}` length ({bytes}) exceeds the `max_bytes` ({max_bytes})"
        );
    }

    Ok(())
}

fn declare(declared: &mut Declared, rule: &StringRule) -> Result<(), CheckError> {
    declared.declare_if(rule.constant.is_some(), "const")?;
    declared.declare_if(rule.len.is_some(), "len")?;
    declared.declare_if(rule.min_len.is_some(), "min_len")?;
    declared.declare_if(rule.max_len.is_some(), "max_len")?;
    declared.declare_if(rule.len_bytes.is_some(), "len_bytes")?;
    declared.declare_if(rule.min_bytes.is_some(), "min_bytes")?;
    declared.declare_if(rule.max_bytes.is_some(), "max_bytes")?;
    declared.declare_if(rule.pattern.is_some(), "pattern")?;
    declared.declare_if(rule.prefix.is_some(), "prefix")?;
    declared.declare_if(rule.suffix.is_some(), "suffix")?;
    declared.declare_if(rule.contains.is_some(), "contains")?;
    declared.declare_if(rule.not_contains.is_some(), "not_contains")?;
    declared.declare_if(!rule.in_set.is_empty(), "in")?;
    declared.declare_if(!rule.not_in_set.is_empty(), "not_in")?;
    declared.declare_if(rule.well_known.is_some(), "well_known")?;

    Ok(())
}
