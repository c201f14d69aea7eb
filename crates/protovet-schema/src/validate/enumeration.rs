use super::{
    Checker,
    helper::{Declared, check_error, check_ins},
};
use crate::prelude::*;

const CONFLICTS: &[(&str, &str)] = &[("in", "not_in")];

impl Checker<'_> {
    // check_enum
    // `defined_only` next to `in` means every listed value must be declared
    // by the enum itself
    pub(crate) fn check_enum(
        &self,
        shape: Shape<'_>,
        rules: &EnumRules,
        inject: bool,
    ) -> Result<(), CheckError> {
        let mut declared = Declared::new(&["const"], CONFLICTS);

        for rule in &rules.rules {
            check_error(rule.error.as_ref(), inject, RuleKind::Enum)?;

            declared.declare_if(rule.constant.is_some(), "const")?;
            declared.declare_if(rule.defined_only, "defined_only")?;
            declared.declare_if(!rule.in_set.is_empty(), "in")?;
            declared.declare_if(!rule.not_in_set.is_empty(), "not_in")?;
            check_ins(rule.in_set.len(), rule.not_in_set.len())?;

            if rule.defined_only && !rule.in_set.is_empty() {
                let name = shape
                    .single()
                    .and_then(ElementType::enumeration)
                    .unwrap_or_default();
                let definition = self.schema.enumeration(name)?;

                if let Some(value) = rule.in_set.iter().find(|v| !definition.is_defined(**v)) {
                    return Err(CheckErrorKind::UndefinedEnumValue { value: *value }.into());
                }
            }
        }

        Ok(())
    }
}
