use crate::prelude::*;
use regex::Regex;
use std::fmt::Display;

// check_error
// author rules must say how to build their error; injected rules may defer
// to the rule that encloses them
pub(crate) fn check_error(
    error: Option<&ErrorSpec>,
    inject: bool,
    kind: impl Display,
) -> Result<(), CheckError> {
    match error {
        Some(error) => ensure!(
            !error.method.trim().is_empty(),
            MissingErrorSpec,
            "method to create error instance can not be empty"
        ),
        None => ensure!(
            inject,
            MissingErrorSpec,
            "`{kind}` rules must declare an error"
        ),
    }

    Ok(())
}

pub(crate) fn check_min_max(
    min: Option<u64>,
    max: Option<u64>,
    min_name: &str,
    max_name: &str,
) -> Result<(), CheckError> {
    if let (Some(min), Some(max)) = (min, max) {
        ensure!(
            min <= max,
            ConstraintConflict,
            "`{min_name}` ({min}) value is greater than `{max_name}` ({max}) value"
        );
    }

    Ok(())
}

pub(crate) fn check_len(
    len: Option<u64>,
    min: Option<u64>,
    max: Option<u64>,
    names: [&str; 3],
) -> Result<(), CheckError> {
    let [len_name, min_name, max_name] = names;

    if len.is_some() {
        ensure!(
            min.is_none(),
            ConstraintConflict,
            "cannot have both `{len_name}` and `{min_name}` rules on the same field"
        );
        ensure!(
            max.is_none(),
            ConstraintConflict,
            "cannot have both `{len_name}` and `{max_name}` rules on the same field"
        );
    }

    Ok(())
}

pub(crate) fn check_ins(in_count: usize, not_in_count: usize) -> Result<(), CheckError> {
    ensure!(
        in_count == 0 || not_in_count == 0,
        ConstraintConflict,
        "cannot have both `in` and `not_in` rules on the same field"
    );

    Ok(())
}

pub(crate) fn check_pattern(pattern: Option<&str>, in_count: usize) -> Result<(), CheckError> {
    let Some(pattern) = pattern else {
        return Ok(());
    };

    ensure!(
        in_count == 0,
        ConstraintConflict,
        "regex `pattern` and `in` rules are incompatible"
    );
    Regex::new(pattern).map_err(|e| CheckErrorKind::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    Ok(())
}

///
/// Declared
/// rules seen so far on one field, across all of its alternatives
///

pub(crate) struct Declared {
    exclusive: &'static [&'static str],
    conflicts: &'static [(&'static str, &'static str)],
    seen: Vec<&'static str>,
}

impl Declared {
    pub(crate) const fn new(
        exclusive: &'static [&'static str],
        conflicts: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            exclusive,
            conflicts,
            seen: Vec::new(),
        }
    }

    // declare
    // a rule may appear once per field and never next to a rule it conflicts
    // with, whichever alternative declared either of them
    pub(crate) fn declare(&mut self, rule: &'static str) -> Result<(), CheckError> {
        ensure!(
            !self.seen.contains(&rule),
            ConstraintConflict,
            "cannot have multi `{rule}` rules on the same field"
        );

        if let Some(other) = self.seen.iter().find(|other| self.conflicts_with(rule, other)) {
            return Err(CheckErrorKind::ConstraintConflict(format!(
                "cannot have both `{rule}` and `{other}` rules on the same field"
            ))
            .into());
        }

        self.seen.push(rule);

        Ok(())
    }

    pub(crate) fn declare_if(&mut self, present: bool, rule: &'static str) -> Result<(), CheckError> {
        if present {
            self.declare(rule)?;
        }

        Ok(())
    }

    fn conflicts_with(&self, rule: &str, other: &str) -> bool {
        self.exclusive.iter().any(|&e| e == rule || e == other)
            || self
                .conflicts
                .iter()
                .any(|&(a, b)| (a == rule && b == other) || (a == other && b == rule))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: &[(&str, &str)] = &[("lt", "lte"), ("in", "not_in")];

    #[test]
    fn exclusive_rules_conflict_with_everything() {
        let mut declared = Declared::new(&["const"], PAIRS);
        declared.declare("gt").unwrap();

        let err = declared.declare("const").unwrap_err();
        assert_eq!(
            err.kind.to_string(),
            "cannot have both `const` and `gt` rules on the same field"
        );
    }

    #[test]
    fn pairs_conflict_in_either_order() {
        let mut declared = Declared::new(&[], PAIRS);
        declared.declare("lte").unwrap();
        declared.declare("in").unwrap();

        assert!(declared.declare("lt").is_err());
        assert!(declared.declare("not_in").is_err());
        assert!(declared.declare("gt").is_ok());
    }

    #[test]
    fn repeated_rules_are_rejected() {
        let mut declared = Declared::new(&[], PAIRS);
        declared.declare("min_len").unwrap();

        let err = declared.declare("min_len").unwrap_err();
        assert!(matches!(err.kind, CheckErrorKind::ConstraintConflict(ref m) if m.contains("multi `min_len`")));
    }

    #[test]
    fn min_max_and_len_helpers() {
        assert!(check_min_max(Some(5), Some(3), "min_len", "max_len").is_err());
        assert!(check_min_max(Some(3), Some(5), "min_len", "max_len").is_ok());
        assert!(check_min_max(Some(3), Some(3), "min_len", "max_len").is_ok());
        assert!(check_len(Some(4), Some(1), None, ["len", "min_len", "max_len"]).is_err());
        assert!(check_len(Some(4), None, None, ["len", "min_len", "max_len"]).is_ok());
    }

    #[test]
    fn pattern_must_compile_and_exclude_in() {
        assert!(check_pattern(Some("^[a-z]+$"), 0).is_ok());
        assert!(matches!(
            check_pattern(Some("(unclosed"), 0).unwrap_err().kind,
            CheckErrorKind::InvalidPattern { .. }
        ));
        assert!(matches!(
            check_pattern(Some("^a$"), 2).unwrap_err().kind,
            CheckErrorKind::ConstraintConflict(_)
        ));
    }
}
