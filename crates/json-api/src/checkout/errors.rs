//! Checkout Errors

use salvo::http::StatusError;
use tracing::error;

use scoops_app::domain::checkout::CheckoutServiceError;

pub(crate) fn into_status_error(error: CheckoutServiceError) -> StatusError {
    match error {
        CheckoutServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        CheckoutServiceError::InvalidInput(reason) => StatusError::bad_request().brief(reason),
        CheckoutServiceError::InvalidProductRef(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        error @ CheckoutServiceError::ProductNotFound(_) => {
            StatusError::not_found().brief(error.to_string())
        }
        error @ CheckoutServiceError::InsufficientStock { .. } => {
            StatusError::bad_request().brief(error.to_string())
        }
        CheckoutServiceError::Sql(source) => {
            error!("checkout storage error: {source}");

            StatusError::internal_server_error()
        }
        CheckoutServiceError::TimedOut(limit) => {
            error!("checkout transaction exceeded {limit:?}");

            StatusError::internal_server_error()
        }
    }
}
