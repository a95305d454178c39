//! Margin/padding shorthand parsing.
//!
//! Accepts either a single number or a string of up to four whitespace
//! separated numbers and expands it with box-model shorthand rules:
//!
//! | tokens | top | right | bottom | left |
//! |--------|-----|-------|--------|------|
//! | `a`       | a | a | a | a |
//! | `a b`     | a | b | a | b |
//! | `a b c`   | a | b | c | b |
//! | `a b c d` | a | b | c | d |

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::{LayoutError, Result};
use crate::geometry::Edges;

/// Raw edge specification as supplied by callers or config files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EdgeSpec {
    Uniform(i32),
    Shorthand(String),
    Explicit(Edges),
}

impl From<i32> for EdgeSpec {
    fn from(value: i32) -> Self {
        Self::Uniform(value)
    }
}

impl From<&str> for EdgeSpec {
    fn from(value: &str) -> Self {
        Self::Shorthand(value.to_string())
    }
}

impl From<String> for EdgeSpec {
    fn from(value: String) -> Self {
        Self::Shorthand(value)
    }
}

impl From<Edges> for EdgeSpec {
    fn from(value: Edges) -> Self {
        Self::Explicit(value)
    }
}

impl TryFrom<EdgeSpec> for Edges {
    type Error = LayoutError;

    fn try_from(spec: EdgeSpec) -> Result<Self> {
        match spec {
            EdgeSpec::Uniform(value) => Ok(Edges::uniform(value)),
            EdgeSpec::Shorthand(text) => text.parse(),
            EdgeSpec::Explicit(edges) => Ok(edges),
        }
    }
}

impl FromStr for Edges {
    type Err = LayoutError;

    fn from_str(text: &str) -> Result<Self> {
        let mut values = [0i32; 4];
        let mut count = 0usize;

        for token in text.split_whitespace() {
            if count == values.len() {
                let total = text.split_whitespace().count();
                return Err(LayoutError::invalid_spec(
                    text,
                    format!("expected at most 4 values, got {total}"),
                ));
            }
            values[count] = parse_token(text, token)?;
            count += 1;
        }

        match count {
            0 => Err(LayoutError::invalid_spec(text, "no values supplied")),
            1 => Ok(Edges::uniform(values[0])),
            2 => Ok(Edges::symmetric(values[0], values[1])),
            3 => Ok(Edges::new(values[0], values[1], values[2], values[1])),
            _ => Ok(Edges::new(values[0], values[1], values[2], values[3])),
        }
    }
}

fn parse_token(spec: &str, token: &str) -> Result<i32> {
    if let Ok(value) = token.parse::<i32>() {
        return Ok(value);
    }

    // Fractional values truncate toward zero.
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() <= i32::MAX as f64 => {
            Ok(value.trunc() as i32)
        }
        _ => Err(LayoutError::invalid_spec(spec, format!("`{token}` is not a number"))),
    }
}

/// Normalize a numeric or shorthand spec into four explicit edges.
pub fn parse_edges(spec: impl Into<EdgeSpec>) -> Result<Edges> {
    Edges::try_from(spec.into())
}

/// Serde adapter for `Edges` fields that accept any [`EdgeSpec`] form.
pub(crate) fn deserialize_edges<'de, D>(deserializer: D) -> std::result::Result<Edges, D::Error>
where
    D: Deserializer<'de>,
{
    let spec = EdgeSpec::deserialize(deserializer)?;
    Edges::try_from(spec).map_err(serde::de::Error::custom)
}
