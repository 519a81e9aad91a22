//! Carts service errors.

use thiserror::Error;

use crate::domain::products::{records::ProductId, reference::InvalidProductRef};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error(transparent)]
    InvalidProductRef(#[from] InvalidProductRef),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("product {0} is not in the cart")]
    ItemNotFound(ProductId),

    #[error("only {remaining} of {name} left in stock")]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        remaining: u32,
    },

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
