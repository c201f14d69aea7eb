use crate::prelude::*;

///
/// EnumRules
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnumRules {
    #[serde(default)]
    pub rules: Vec<EnumRule>,
}

///
/// EnumRule
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnumRule {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<i32>,

    pub defined_only: bool,

    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_set: Vec<i32>,

    #[serde(rename = "not_in", skip_serializing_if = "Vec::is_empty")]
    pub not_in_set: Vec<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSpec>,
}
