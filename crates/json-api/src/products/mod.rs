//! Products

pub(crate) mod errors;
mod handlers;

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};

use scoops_app::domain::products::{records::ProductId, reference::ProductRef};

use crate::extensions::*;

pub(crate) use handlers::*;

/// Normalize a product reference taken from the request path.
pub(crate) fn path_product_id(raw: String) -> Result<ProductId, StatusError> {
    ProductRef::from(raw)
        .normalize()
        .or_400("invalid product id")
}

/// Product reference as sent in request bodies: `5` or `"producto-5"`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub(crate) enum ProductIdInput {
    Number(i64),
    Text(String),
}

impl From<ProductIdInput> for ProductRef {
    fn from(input: ProductIdInput) -> Self {
        match input {
            ProductIdInput::Number(id) => ProductRef::Number(id),
            ProductIdInput::Text(text) => ProductRef::Text(text),
        }
    }
}
