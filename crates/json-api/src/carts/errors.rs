//! Errors

use salvo::http::StatusError;
use tracing::error;

use scoops_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be at least 1")
        }
        CartsServiceError::InvalidProductRef(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        CartsServiceError::ProductNotFound(_) => {
            StatusError::not_found().brief("Product not found")
        }
        CartsServiceError::ItemNotFound(_) => {
            StatusError::not_found().brief("Product is not in the cart")
        }
        error @ CartsServiceError::InsufficientStock { .. } => {
            StatusError::bad_request().brief(error.to_string())
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use scoops_app::domain::products::records::ProductId;

    use super::*;

    #[test]
    fn insufficient_stock_names_product_and_remaining_units() {
        let status = into_status_error(CartsServiceError::InsufficientStock {
            product_id: ProductId::from_i64(1),
            name: "Vanilla".to_string(),
            remaining: 2,
        });

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
        assert_eq!(status.brief, "only 2 of Vanilla left in stock");
    }

    #[test]
    fn missing_line_is_not_found() {
        let status = into_status_error(CartsServiceError::ItemNotFound(ProductId::from_i64(1)));

        assert_eq!(status.code, StatusCode::NOT_FOUND);
    }
}
