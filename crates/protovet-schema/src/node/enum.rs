use crate::prelude::*;

///
/// Enum
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
}

impl Enum {
    #[must_use]
    pub fn new(name: &str, values: &[(&str, i32)]) -> Self {
        Self {
            name: name.to_string(),
            values: values
                .iter()
                .map(|(name, number)| EnumValue {
                    name: (*name).to_string(),
                    number: *number,
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn is_defined(&self, number: i32) -> bool {
        self.values.iter().any(|v| v.number == number)
    }
}

///
/// EnumValue
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}
