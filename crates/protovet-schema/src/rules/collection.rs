use crate::prelude::*;

///
/// RepeatedRules
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RepeatedRules {
    #[serde(default)]
    pub rules: Vec<RepeatedRule>,
}

impl RepeatedRules {
    // items
    // the alternative declaring element rules, with its position
    #[must_use]
    pub fn items(&self) -> Option<(usize, &FieldRules)> {
        self.rules
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, r)| r.items.as_deref().map(|items| (i, items)))
    }
}

///
/// RepeatedRule
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepeatedRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    pub unique: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldRules>>,

    pub ignore_empty: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSpec>,
}

///
/// MapRules
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MapRules {
    #[serde(default)]
    pub rules: Vec<MapRule>,
}

impl MapRules {
    #[must_use]
    pub fn keys(&self) -> Option<(usize, &FieldRules)> {
        self.rules
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, r)| r.keys.as_deref().map(|keys| (i, keys)))
    }

    #[must_use]
    pub fn values(&self) -> Option<(usize, &FieldRules)> {
        self.rules
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, r)| r.values.as_deref().map(|values| (i, values)))
    }
}

///
/// MapRule
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_pairs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pairs: Option<u64>,

    pub no_sparse: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Box<FieldRules>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Box<FieldRules>>,

    pub ignore_empty: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSpec>,
}
