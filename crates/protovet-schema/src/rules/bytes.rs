use crate::prelude::*;

///
/// BytesRules
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BytesRules {
    #[serde(default)]
    pub rules: Vec<BytesRule>,
}

///
/// BytesRule
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BytesRule {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<Vec<u8>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_len: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_len: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Vec<u8>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<Vec<u8>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<Vec<u8>>,

    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_set: Vec<Vec<u8>>,

    #[serde(rename = "not_in", skip_serializing_if = "Vec::is_empty")]
    pub not_in_set: Vec<Vec<u8>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub well_known: Option<WellKnownBytes>,

    pub ignore_empty: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSpec>,
}

///
/// WellKnownBytes
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WellKnownBytes {
    Ip,
    Ipv4,
    Ipv6,
}
