use super::helper::{Declared, check_error, check_ins};
use crate::prelude::*;
use std::fmt::Display;

/// Rules that cannot share a field with any other rule.
pub(crate) const EXCLUSIVE: &[&str] = &["const"];

/// Comparison rules that cannot be combined on one field.
pub(crate) const CONFLICTS: &[(&str, &str)] = &[
    ("lt", "lte"),
    ("gt", "gte"),
    ("in", "not_in"),
    ("in", "lt"),
    ("in", "lte"),
    ("in", "gt"),
    ("in", "gte"),
];

///
/// Comparison
/// the constant and bounds declared over one ordered value kind
///

#[derive(Clone, Copy, Debug)]
pub struct Comparison<T> {
    pub constant: Option<T>,
    pub lt: Option<T>,
    pub lte: Option<T>,
    pub gt: Option<T>,
    pub gte: Option<T>,
}

impl<T> Default for Comparison<T> {
    fn default() -> Self {
        Self {
            constant: None,
            lt: None,
            lte: None,
            gt: None,
            gte: None,
        }
    }
}

impl<T: Copy> Comparison<T> {
    // merge
    // fill unset bounds from a later alternative
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            constant: self.constant.or(other.constant),
            lt: self.lt.or(other.lt),
            lte: self.lte.or(other.lte),
            gt: self.gt.or(other.gt),
            gte: self.gte.or(other.gte),
        }
    }

    fn upper(&self) -> Option<(T, &'static str)> {
        self.lt.map(|v| (v, "lt")).or(self.lte.map(|v| (v, "lte")))
    }

    fn lower(&self) -> Option<(T, &'static str)> {
        self.gt.map(|v| (v, "gt")).or(self.gte.map(|v| (v, "gte")))
    }

    const fn has_range(&self) -> bool {
        self.lt.is_some() || self.lte.is_some() || self.gt.is_some() || self.gte.is_some()
    }
}

/// Assert that a constant, membership sets and bounds over one value kind
/// describe a satisfiable, non-degenerate check.
pub fn check_nums<T: Step + PartialOrd + Display>(
    in_count: usize,
    not_in_count: usize,
    cmp: &Comparison<T>,
) -> Result<(), CheckError> {
    if cmp.constant.is_some() {
        let others = [
            ("in", in_count > 0),
            ("not_in", not_in_count > 0),
            ("lt", cmp.lt.is_some()),
            ("lte", cmp.lte.is_some()),
            ("gt", cmp.gt.is_some()),
            ("gte", cmp.gte.is_some()),
        ];
        for (name, present) in others {
            ensure!(
                !present,
                ConstraintConflict,
                "cannot have both `const` and `{name}` rules on the same field"
            );
        }
    }

    check_ins(in_count, not_in_count)?;
    ensure!(
        in_count == 0 || !cmp.has_range(),
        ConstraintConflict,
        "cannot have both `in` and range constraint rules on the same field"
    );
    ensure!(
        cmp.lt.is_none() || cmp.lte.is_none(),
        ConstraintConflict,
        "cannot have both `lt` and `lte` rules on the same field"
    );
    ensure!(
        cmp.gt.is_none() || cmp.gte.is_none(),
        ConstraintConflict,
        "cannot have both `gt` and `gte` rules on the same field"
    );

    if let (Some((upper, up)), Some((lower, low))) = (cmp.upper(), cmp.lower()) {
        if upper == lower {
            let message = if up == "lte" && low == "gte" {
                "use `const` instead of equal `lte` and `gte` rules".to_string()
            } else {
                format!("cannot have equal `{low}` and `{up}` rules on the same field")
            };

            return Err(CheckErrorKind::ConstraintConflict(message).into());
        }
        ensure!(
            upper > lower,
            ConstraintConflict,
            "`{up}` ({upper}) must be greater than `{low}` ({lower}), the range is empty"
        );

        // discrete kinds compare their closed range
        let first = if low == "gt" { lower.successor() } else { Some(lower) };
        let last = if up == "lt" { upper.predecessor() } else { Some(upper) };
        if let (Some(first), Some(last)) = (first, last) {
            ensure!(
                first <= last,
                ConstraintConflict,
                "`{low}` ({lower}) and `{up}` ({upper}) leave no value in between, the range is empty"
            );
            ensure!(
                first != last,
                ConstraintConflict,
                "`{low}` ({lower}) and `{up}` ({upper}) only allow {first}, use `const` instead"
            );
        }
    }

    Ok(())
}

// check_numeric
// every alternative is checked on its own, then the bounds declared across
// all of them are checked together
pub(crate) fn check_numeric<T: NumericValue>(
    rules: &NumericRules<T>,
    inject: bool,
    kind: RuleKind,
) -> Result<(), CheckError> {
    let mut declared = Declared::new(EXCLUSIVE, CONFLICTS);
    let mut combined = Comparison::default();

    for rule in &rules.rules {
        check_error(rule.error.as_ref(), inject, kind)?;

        let cmp = Comparison {
            constant: rule.constant,
            lt: rule.lt,
            lte: rule.lte,
            gt: rule.gt,
            gte: rule.gte,
        };
        check_nums(rule.in_set.len(), rule.not_in_set.len(), &cmp)?;

        declare_comparison(&mut declared, &cmp)?;
        declared.declare_if(!rule.in_set.is_empty(), "in")?;
        declared.declare_if(!rule.not_in_set.is_empty(), "not_in")?;
        combined = combined.merge(cmp);
    }

    check_nums(0, 0, &combined)
}

pub(crate) fn declare_comparison<T>(
    declared: &mut Declared,
    cmp: &Comparison<T>,
) -> Result<(), CheckError> {
    declared.declare_if(cmp.constant.is_some(), "const")?;
    declared.declare_if(cmp.lt.is_some(), "lt")?;
    declared.declare_if(cmp.lte.is_some(), "lte")?;
    declared.declare_if(cmp.gt.is_some(), "gt")?;
    declared.declare_if(cmp.gte.is_some(), "gte")?;

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn message(result: Result<(), CheckError>) -> String {
        result.unwrap_err().kind.to_string()
    }

    fn range(lt: Option<i32>, lte: Option<i32>, gt: Option<i32>, gte: Option<i32>) -> Comparison<i32> {
        Comparison {
            constant: None,
            lt,
            lte,
            gt,
            gte,
        }
    }

    #[test]
    fn equal_exclusive_bounds_are_rejected() {
        let err = message(check_nums(0, 0, &range(Some(5), None, Some(5), None)));

        assert_eq!(err, "cannot have equal `gt` and `lt` rules on the same field");
    }

    #[test]
    fn equal_inclusive_bounds_suggest_const() {
        let err = message(check_nums(0, 0, &range(None, Some(5), None, Some(5))));

        assert_eq!(err, "use `const` instead of equal `lte` and `gte` rules");
    }

    #[test]
    fn mixed_equal_bounds_are_rejected() {
        let gte_lt = message(check_nums(0, 0, &range(Some(1), None, None, Some(1))));
        let gt_lte = message(check_nums(0, 0, &range(None, Some(1), Some(1), None)));

        assert_eq!(gte_lt, "cannot have equal `gte` and `lt` rules on the same field");
        assert_eq!(gt_lte, "cannot have equal `gt` and `lte` rules on the same field");
    }

    #[test]
    fn inverted_bounds_are_an_empty_range() {
        let err = check_nums(0, 0, &range(Some(1), None, Some(10), None)).unwrap_err();

        assert!(matches!(err.kind, CheckErrorKind::ConstraintConflict(_)));
        assert!(err.kind.to_string().contains("range is empty"));
    }

    #[test]
    fn ordered_bounds_pass() {
        assert!(check_nums(0, 0, &range(Some(10), None, Some(1), None)).is_ok());
        assert!(check_nums(0, 0, &range(None, Some(150), None, Some(0))).is_ok());
        assert!(check_nums(0, 0, &range(Some(0), None, None, None)).is_ok());
    }

    #[test]
    fn integer_bounds_without_room_are_empty() {
        let err = message(check_nums(0, 0, &range(Some(5), None, Some(4), None)));
        assert!(err.contains("leave no value"), "{err}");

        let wide = Comparison {
            constant: None,
            lt: Some(u64::MAX),
            lte: None,
            gt: Some(u64::MAX - 1),
            gte: None,
        };
        let err = message(check_nums(0, 0, &wide));
        assert!(err.contains("range is empty"), "{err}");
    }

    #[test]
    fn integer_bounds_around_one_value_suggest_const() {
        let err = message(check_nums(0, 0, &range(None, Some(5), Some(4), None)));
        assert_eq!(err, "`gt` (4) and `lte` (5) only allow 5, use `const` instead");

        let cmp = Comparison {
            constant: None,
            lt: Some(7_u64),
            lte: None,
            gt: None,
            gte: Some(6),
        };
        assert!(message(check_nums(0, 0, &cmp)).contains("use `const`"));
        assert!(check_nums(0, 0, &range(Some(7), None, Some(4), None)).is_ok());
    }

    #[test]
    fn float_bounds_have_no_neighbours() {
        let cmp = Comparison {
            constant: None,
            lt: Some(5.0_f32),
            lte: None,
            gt: Some(4.0),
            gte: None,
        };

        assert!(check_nums(0, 0, &cmp).is_ok());
    }

    #[test]
    fn float_bounds_compare_by_value() {
        let cmp = Comparison {
            constant: None,
            lt: Some(1.5_f64),
            lte: None,
            gt: Some(0.5),
            gte: None,
        };

        assert!(check_nums(0, 0, &cmp).is_ok());
    }

    #[test]
    fn in_excludes_ranges_and_not_in() {
        assert!(check_nums(2, 1, &Comparison::<u32>::default()).is_err());
        assert!(check_nums(2, 0, &range(Some(3), None, None, None)).is_err());
        assert!(check_nums(0, 2, &range(Some(3), None, None, None)).is_ok());
    }

    #[test]
    fn duplicate_bounds_across_alternatives_are_rejected() {
        let rules = Int64Rules {
            rules: vec![
                NumericRule {
                    lt: Some(10),
                    error: Some(ErrorSpec::new("tooBig")),
                    ..Default::default()
                },
                NumericRule {
                    lt: Some(20),
                    error: Some(ErrorSpec::new("wayTooBig")),
                    ..Default::default()
                },
            ],
        };

        let err = message(check_numeric(&rules, false, RuleKind::Int64));
        assert_eq!(err, "cannot have multi `lt` rules on the same field");
    }

    #[test]
    fn bounds_are_checked_across_alternatives() {
        let rules = UInt32Rules {
            rules: vec![
                NumericRule {
                    gt: Some(10),
                    error: Some(ErrorSpec::new("tooSmall")),
                    ..Default::default()
                },
                NumericRule {
                    lt: Some(5),
                    error: Some(ErrorSpec::new("tooBig")),
                    ..Default::default()
                },
            ],
        };

        let err = message(check_numeric(&rules, false, RuleKind::UInt32));
        assert!(err.contains("range is empty"), "{err}");
    }

    #[test]
    fn alternatives_need_errors_unless_injected() {
        let rules = Int32Rules {
            rules: vec![NumericRule {
                gte: Some(0),
                ..Default::default()
            }],
        };

        assert!(matches!(
            check_numeric(&rules, false, RuleKind::Int32).unwrap_err().kind,
            CheckErrorKind::MissingErrorSpec(_)
        ));
        assert!(check_numeric(&rules, true, RuleKind::Int32).is_ok());
    }

    fn arb_bound() -> impl Strategy<Value = Option<i64>> {
        prop_oneof![Just(None), any::<i64>().prop_map(Some)]
    }

    proptest! {
        #[test]
        fn const_excludes_every_other_rule(
            constant in any::<i64>(),
            lt in arb_bound(),
            lte in arb_bound(),
            gt in arb_bound(),
            gte in arb_bound(),
            in_count in 0usize..3,
            not_in_count in 0usize..3,
        ) {
            let cmp = Comparison { constant: Some(constant), lt, lte, gt, gte };
            let others = in_count > 0
                || not_in_count > 0
                || lt.is_some()
                || lte.is_some()
                || gt.is_some()
                || gte.is_some();

            let result = check_nums(in_count, not_in_count, &cmp);
            prop_assert_eq!(result.is_ok(), !others);
        }

        #[test]
        fn ordered_exclusive_bounds_always_pass(a in any::<i32>(), b in any::<i32>()) {
            let (lower, upper) = if a < b { (a, b) } else { (b, a) };
            prop_assume!(i64::from(upper) - i64::from(lower) > 2);

            prop_assert!(check_nums(0, 0, &range(Some(upper), None, Some(lower), None)).is_ok());
            prop_assert!(check_nums(0, 0, &range(Some(lower), None, Some(upper), None)).is_err());
        }
    }
}
