//! Checkout service errors.

use std::time::Duration;

use thiserror::Error;

use crate::{
    database::{StatementTimeout, TransactionError, is_query_canceled},
    domain::products::{records::ProductId, reference::InvalidProductRef},
};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("{0}")]
    InvalidInput(&'static str),

    #[error(transparent)]
    InvalidProductRef(#[from] InvalidProductRef),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("only {remaining} of {name} left in stock")]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        remaining: u32,
    },

    #[error("storage error")]
    Sql(#[source] sqlx::Error),

    #[error("checkout exceeded {0:?}")]
    TimedOut(Duration),
}

impl From<sqlx::Error> for CheckoutServiceError {
    fn from(error: sqlx::Error) -> Self {
        Self::Sql(error)
    }
}

impl From<TransactionError> for CheckoutServiceError {
    fn from(error: TransactionError) -> Self {
        match error {
            TransactionError::Sql(source) => Self::Sql(source),
            TransactionError::TimedOut(limit) => Self::TimedOut(limit),
        }
    }
}

impl StatementTimeout for CheckoutServiceError {
    fn is_statement_timeout(&self) -> bool {
        matches!(self, Self::Sql(error) if is_query_canceled(error))
    }
}

impl CheckoutServiceError {
    /// Short label used for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EmptyCart => "empty_cart",
            Self::InvalidInput(_) | Self::InvalidProductRef(_) => "invalid_input",
            Self::ProductNotFound(_) => "product_not_found",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::Sql(_) => "storage_error",
            Self::TimedOut(_) => "timed_out",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_timeouts_keep_their_limit() {
        let error = CheckoutServiceError::from(TransactionError::TimedOut(Duration::from_secs(5)));

        assert!(matches!(error, CheckoutServiceError::TimedOut(limit) if limit == Duration::from_secs(5)));
        assert_eq!(error.kind(), "timed_out");
    }

    #[test]
    fn ordinary_storage_errors_are_not_statement_timeouts() {
        let error = CheckoutServiceError::from(sqlx::Error::PoolTimedOut);

        assert!(!error.is_statement_timeout());
        assert_eq!(error.kind(), "storage_error");
        assert!(!CheckoutServiceError::EmptyCart.is_statement_timeout());
    }
}
