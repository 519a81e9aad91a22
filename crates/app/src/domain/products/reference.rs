//! Product references as supplied by clients.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::products::records::ProductId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("product reference must contain a positive numeric id")]
pub struct InvalidProductRef;

/// A product identifier before normalization.
///
/// Clients send either a bare number or a string such as `"producto-5"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Number(i64),
    Text(String),
}

impl ProductRef {
    /// Resolve to a typed id. Strings use their first run of ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidProductRef`] when no positive id can be extracted.
    pub fn normalize(&self) -> Result<ProductId, InvalidProductRef> {
        let id = match self {
            Self::Number(id) => *id,
            Self::Text(text) => first_digit_run(text)
                .and_then(|digits| digits.parse::<i64>().ok())
                .ok_or(InvalidProductRef)?,
        };

        if id < 1 {
            return Err(InvalidProductRef);
        }

        Ok(ProductId::from_i64(id))
    }
}

impl From<i64> for ProductRef {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ProductRef {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ProductRef {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<ProductId> for ProductRef {
    fn from(value: ProductId) -> Self {
        Self::Number(value.into_i64())
    }
}

fn first_digit_run(text: &str) -> Option<&str> {
    let start = text.find(|ch: char| ch.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());

    Some(&rest[..end])
}
