use super::helper::check_error;
use crate::prelude::*;

// check_message_rules
// generic message rules only make sense on plain embedded messages
pub(crate) fn check_message_rules(
    shape: Shape<'_>,
    rules: &FieldRules,
    message: &MessageRules,
    inject: bool,
) -> Result<(), CheckError> {
    ensure!(
        shape.is_embed(),
        ShapeMismatch,
        "message rules should only be used for embedded message fields"
    );

    if let Some(wkt) = shape.well_known()
        && matches!(
            wkt,
            WellKnownType::Any | WellKnownType::Duration | WellKnownType::Timestamp
        )
    {
        return Err(CheckErrorKind::WrongRuleKind(format!(
            "{wkt} rules should be used for {wkt} fields"
        ))
        .into());
    }

    if message.skip {
        ensure!(
            rules.kind.is_none(),
            ConstraintConflict,
            "skip should not be used with WKT scalar rules"
        );
    }
    if message.required {
        check_error(message.error.as_ref(), inject, "message")?;
    } else if let Some(error) = &message.error {
        ensure!(
            !error.method.trim().is_empty(),
            MissingErrorSpec,
            "method to create error instance can not be empty"
        );
    }

    Ok(())
}
