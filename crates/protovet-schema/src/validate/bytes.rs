use super::helper::{Declared, check_error, check_ins, check_len, check_min_max, check_pattern};
use crate::prelude::*;

const CONFLICTS: &[(&str, &str)] = &[
    ("len", "min_len"),
    ("len", "max_len"),
    ("in", "not_in"),
    ("in", "pattern"),
    ("pattern", "well_known"),
];

pub(crate) fn check_bytes(rules: &BytesRules, inject: bool) -> Result<(), CheckError> {
    let mut declared = Declared::new(&["const"], CONFLICTS);

    for rule in &rules.rules {
        check_error(rule.error.as_ref(), inject, RuleKind::Bytes)?;
        declare(&mut declared, rule)?;

        check_len(rule.len, rule.min_len, rule.max_len, ["len", "min_len", "max_len"])?;
        check_min_max(rule.min_len, rule.max_len, "min_len", "max_len")?;
        check_ins(rule.in_set.len(), rule.not_in_set.len())?;
        check_pattern(rule.pattern.as_deref(), rule.in_set.len())?;

        if let Some(max_len) = rule.max_len {
            for (name, value) in [
                ("prefix", &rule.prefix),
                ("suffix", &rule.suffix),
                ("contains", &rule.contains),
            ] {
                let len = value.as_ref().map_or(0, |v| v.len() as u64);
                ensure!(
                    len <= max_len,
                    ConstraintConflict,
                    "`{name}` length ({len}) exceeds the `max_len` ({max_len})"
                );
            }
        }
    }

    Ok(())
}

fn declare(declared: &mut Declared, rule: &BytesRule) -> Result<(), CheckError> {
    declared.declare_if(rule.constant.is_some(), "const")?;
    declared.declare_if(rule.len.is_some(), "len")?;
    declared.declare_if(rule.min_len.is_some(), "min_len")?;
    declared.declare_if(rule.max_len.is_some(), "max_len")?;
    declared.declare_if(rule.pattern.is_some(), "pattern")?;
    declared.declare_if(rule.prefix.is_some(), "prefix")?;
    declared.declare_if(rule.suffix.is_some(), "suffix")?;
    declared.declare_if(rule.contains.is_some(), "contains")?;
    declared.declare_if(!rule.in_set.is_empty(), "in")?;
    declared.declare_if(!rule.not_in_set.is_empty(), "not_in")?;
    declared.declare_if(rule.well_known.is_some(), "well_known")?;

    Ok(())
}
