use crate::consistency::Consistency;
use crate::schema::{Describe, Schema};
use rust_decimal::Decimal;
use schemars::gen::SchemaGenerator;
use schemars::schema::{InstanceType, SchemaObject, StringValidation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pattern equivalent of [`is_numeric`], published in the JSON Schema
pub const NUMERIC_PATTERN: &str = r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumericStringError {
    #[error("not a numeric string: {0:?}")]
    Invalid(String),
    #[error("{0} cannot be represented as a decimal: {1}")]
    OutOfRange(String, String),
}

/// A decimal amount carried as its exact wire text.
///
/// Keeping the string avoids the precision loss of native numeric types; convert with
/// [`NumericString::to_decimal`] when arithmetic is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NumericString(String);

impl NumericString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact conversion; fails rather than rounding when the value exceeds `Decimal` precision
    pub fn to_decimal(&self) -> Result<Decimal, NumericStringError> {
        let out_of_range = |err: rust_decimal::Error| {
            NumericStringError::OutOfRange(self.0.clone(), err.to_string())
        };
        let text = self.0.strip_prefix('+').unwrap_or(&self.0);
        if text.contains(['e', 'E']) {
            Decimal::from_scientific(text).map_err(out_of_range)
        } else {
            Decimal::from_str_exact(text).map_err(out_of_range)
        }
    }

    pub fn is_negative(&self) -> bool {
        self.0.starts_with('-')
    }
}

impl FromStr for NumericString {
    type Err = NumericStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_numeric(s) {
            Ok(NumericString(s.to_string()))
        } else {
            Err(NumericStringError::Invalid(s.to_string()))
        }
    }
}

impl TryFrom<String> for NumericString {
    type Error = NumericStringError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if is_numeric(&s) {
            Ok(NumericString(s))
        } else {
            Err(NumericStringError::Invalid(s))
        }
    }
}

impl From<NumericString> for String {
    fn from(n: NumericString) -> Self {
        n.0
    }
}

impl From<Decimal> for NumericString {
    fn from(d: Decimal) -> Self {
        NumericString(d.to_string())
    }
}

impl fmt::Display for NumericString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Describe for NumericString {
    fn describe() -> Schema {
        Schema::NumericString
    }
}

impl Consistency for NumericString {}

impl JsonSchema for NumericString {
    fn schema_name() -> String {
        "NumericString".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> schemars::schema::Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            string: Some(Box::new(StringValidation {
                pattern: Some(NUMERIC_PATTERN.to_string()),
                ..Default::default()
            })),
            ..Default::default()
        }
        .into()
    }
}

/// Whether `s` is a finite decimal number: optional sign, digits with an optional fractional
/// part, and an optional exponent. No surrounding whitespace, no `NaN`/`Infinity`.
pub fn is_numeric(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_digits = count_digits(&bytes[i..]);
    i += int_digits;

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        frac_digits = count_digits(&bytes[i..]);
        i += frac_digits;
    }

    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_digits = count_digits(&bytes[i..]);
        if exp_digits == 0 {
            return false;
        }
        i += exp_digits;
    }

    i == bytes.len()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
