use super::{
    Checker,
    helper::{Declared, check_error, check_min_max},
};
use crate::prelude::*;

impl Checker<'_> {
    // check_repeated
    // item rules describe each element and are checked against the element
    // type with errors deferred to this rule
    pub(crate) fn check_repeated(
        &self,
        shape: Shape<'_>,
        rules: &RepeatedRules,
        inject: bool,
    ) -> Result<(), CheckError> {
        let Shape::Field(FieldType::Repeated(element)) = shape else {
            return Err(CheckErrorKind::ShapeMismatch(
                "repeated rules should be used for repeated fields".to_string(),
            )
            .into());
        };
        let mut declared = Declared::new(&[], &[]);

        for rule in &rules.rules {
            check_error(rule.error.as_ref(), inject, RuleKind::Repeated)?;

            declared.declare_if(rule.min_items.is_some(), "min_items")?;
            declared.declare_if(rule.max_items.is_some(), "max_items")?;
            declared.declare_if(rule.unique, "unique")?;
            declared.declare_if(rule.items.is_some(), "items")?;
            check_min_max(rule.min_items, rule.max_items, "min_items", "max_items")?;

            if rule.unique {
                ensure!(
                    !element.is_embed(),
                    ShapeMismatch,
                    "unique rule is only applicable for scalar types"
                );
            }
            if let Some(items) = &rule.items {
                self.check_rules(Shape::Element(element), items, true)
                    .map_err(|e| e.within("items"))?;
            }
        }

        Ok(())
    }

    pub(crate) fn check_map(
        &self,
        shape: Shape<'_>,
        rules: &MapRules,
        inject: bool,
    ) -> Result<(), CheckError> {
        let Shape::Field(FieldType::Map { key, value }) = shape else {
            return Err(CheckErrorKind::ShapeMismatch(
                "map rules should be used for map fields".to_string(),
            )
            .into());
        };
        let mut declared = Declared::new(&[], &[]);

        for rule in &rules.rules {
            check_error(rule.error.as_ref(), inject, RuleKind::Map)?;

            declared.declare_if(rule.min_pairs.is_some(), "min_pairs")?;
            declared.declare_if(rule.max_pairs.is_some(), "max_pairs")?;
            declared.declare_if(rule.no_sparse, "no_sparse")?;
            declared.declare_if(rule.keys.is_some(), "keys")?;
            declared.declare_if(rule.values.is_some(), "values")?;
            check_min_max(rule.min_pairs, rule.max_pairs, "min_pairs", "max_pairs")?;

            if rule.no_sparse {
                ensure!(
                    value.is_embed(),
                    ShapeMismatch,
                    "no_sparse rule is only applicable for embedded message types"
                );
            }
            if let Some(keys) = &rule.keys {
                self.check_rules(Shape::Element(key), keys, true)
                    .map_err(|e| e.within("keys"))?;
            }
            if let Some(values) = &rule.values {
                self.check_rules(Shape::Element(value), values, true)
                    .map_err(|e| e.within("values"))?;
            }
        }

        Ok(())
    }
}
