use crate::prelude::*;
use derive_more::{Display, From};
use proc_macro2::{Literal, TokenStream};
use quote::{ToTokens, quote};
use serde::de::DeserializeOwned;

///
/// NumericValue
/// scalar types the generic comparison rules are declared over
///

pub trait NumericValue:
    Step + PartialOrd + std::fmt::Display + Into<Number> + DeserializeOwned + Serialize + 'static
{
}

impl<T> NumericValue for T where
    T: Step + PartialOrd + std::fmt::Display + Into<Number> + DeserializeOwned + Serialize + 'static
{
}

///
/// Step
/// neighbouring values of a discrete kind; continuous kinds have none
///

pub trait Step: Copy {
    fn successor(self) -> Option<Self>;

    fn predecessor(self) -> Option<Self>;
}

macro_rules! impl_step_discrete {
    ($($ty:ty),*) => {
        $(
            impl Step for $ty {
                fn successor(self) -> Option<Self> {
                    self.checked_add(1)
                }

                fn predecessor(self) -> Option<Self> {
                    self.checked_sub(1)
                }
            }
        )*
    };
}

macro_rules! impl_step_continuous {
    ($($ty:ty),*) => {
        $(
            impl Step for $ty {
                fn successor(self) -> Option<Self> {
                    None
                }

                fn predecessor(self) -> Option<Self> {
                    None
                }
            }
        )*
    };
}

impl_step_discrete!(i32, i64, i128, u32, u64);
impl_step_continuous!(f32, f64);

///
/// Number
/// a numeric rule value with its concrete width erased, for rendering
///

#[derive(Clone, Copy, Debug, Display, From, PartialEq, PartialOrd)]
pub enum Number {
    #[display("{_0}")]
    F32(f32),
    #[display("{_0}")]
    F64(f64),
    #[display("{_0}")]
    I32(i32),
    #[display("{_0}")]
    I64(i64),
    #[display("{_0}")]
    U32(u32),
    #[display("{_0}")]
    U64(u64),
}

impl ToTokens for Number {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let value = match *self {
            Self::F32(v) if v.is_nan() => quote!(::core::f32::NAN),
            Self::F32(v) if v.is_infinite() && v > 0.0 => quote!(::core::f32::INFINITY),
            Self::F32(v) if v.is_infinite() => quote!(::core::f32::NEG_INFINITY),
            Self::F64(v) if v.is_nan() => quote!(::core::f64::NAN),
            Self::F64(v) if v.is_infinite() && v > 0.0 => quote!(::core::f64::INFINITY),
            Self::F64(v) if v.is_infinite() => quote!(::core::f64::NEG_INFINITY),
            Self::F32(v) => Literal::f32_suffixed(v).into_token_stream(),
            Self::F64(v) => Literal::f64_suffixed(v).into_token_stream(),
            Self::I32(v) => Literal::i32_suffixed(v).into_token_stream(),
            Self::I64(v) => Literal::i64_suffixed(v).into_token_stream(),
            Self::U32(v) => Literal::u32_suffixed(v).into_token_stream(),
            Self::U64(v) => Literal::u64_suffixed(v).into_token_stream(),
        };

        tokens.extend(value);
    }
}

///
/// NumericRules
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NumericRules<T> {
    #[serde(default = "Vec::new")]
    pub rules: Vec<NumericRule<T>>,
}

impl<T: NumericValue> NumericRules<T> {
    // erase
    // rendering only needs values, not their static width
    #[must_use]
    pub fn erase(&self) -> NumericRules<Number> {
        NumericRules {
            rules: self.rules.iter().map(NumericRule::erase).collect(),
        }
    }
}

pub type DoubleRules = NumericRules<f64>;
pub type Fixed32Rules = NumericRules<u32>;
pub type Fixed64Rules = NumericRules<u64>;
pub type FloatRules = NumericRules<f32>;
pub type Int32Rules = NumericRules<i32>;
pub type Int64Rules = NumericRules<i64>;
pub type SFixed32Rules = NumericRules<i32>;
pub type SFixed64Rules = NumericRules<i64>;
pub type SInt32Rules = NumericRules<i32>;
pub type SInt64Rules = NumericRules<i64>;
pub type UInt32Rules = NumericRules<u32>;
pub type UInt64Rules = NumericRules<u64>;

///
/// NumericRule
/// one alternative of comparison rules over a numeric scalar
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NumericRule<T> {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<T>,

    #[serde(rename = "in", default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub in_set: Vec<T>,

    #[serde(rename = "not_in", default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub not_in_set: Vec<T>,

    #[serde(default)]
    pub ignore_empty: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSpec>,
}

impl<T: NumericValue> NumericRule<T> {
    #[must_use]
    pub fn erase(&self) -> NumericRule<Number> {
        NumericRule {
            constant: self.constant.map(Into::into),
            lt: self.lt.map(Into::into),
            lte: self.lte.map(Into::into),
            gt: self.gt.map(Into::into),
            gte: self.gte.map(Into::into),
            in_set: self.in_set.iter().map(|v| (*v).into()).collect(),
            not_in_set: self.not_in_set.iter().map(|v| (*v).into()).collect(),
            ignore_empty: self.ignore_empty,
            error: self.error.clone(),
        }
    }
}

///
/// BoolRules
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BoolRules {
    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSpec>,
}

///
/// TESTS
///
