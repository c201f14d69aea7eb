use crate::{prelude::*, well_known};

///
/// StringRules
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StringRules {
    #[serde(default)]
    pub rules: Vec<StringRule>,
}

///
/// StringRule
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StringRule {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_len: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_len: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub len_bytes: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bytes: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_contains: Option<String>,

    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_set: Vec<String>,

    #[serde(rename = "not_in", skip_serializing_if = "Vec::is_empty")]
    pub not_in_set: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub well_known: Option<WellKnownString>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    pub ignore_empty: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSpec>,
}

impl StringRule {
    #[must_use]
    pub const fn known_regex(&self) -> Option<KnownRegex> {
        match self.well_known {
            Some(WellKnownString::WellKnownRegex(known)) => Some(known),
            _ => None,
        }
    }

    // effective_pattern
    // the explicit pattern, else whatever a well-known regex resolves to
    #[must_use]
    pub fn effective_pattern(&self) -> Option<&str> {
        self.pattern.as_deref().or_else(|| {
            self.known_regex()
                .and_then(|known| well_known::resolve(known, self.strict))
        })
    }
}

///
/// WellKnownString
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum WellKnownString {
    Address,
    Email,
    Hostname,
    Ip,
    Ipv4,
    Ipv6,
    Uri,
    UriRef,
    Uuid,
    WellKnownRegex(KnownRegex),
}

///
/// KnownRegex
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KnownRegex {
    Unknown,
    HttpHeaderName,
    HttpHeaderValue,
}
