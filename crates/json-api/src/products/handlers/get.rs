//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use scoops_app::domain::products::records::ProductRecord;

use crate::{
    extensions::*,
    products::{errors::into_status_error, path_product_id},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub id: i64,

    pub name: String,

    pub description: Option<String>,

    /// The price of the product in cents
    pub price: u64,

    /// Units currently available
    pub stock: u32,

    pub category_id: Option<i64>,

    pub category_name: Option<String>,

    pub image_url: Option<String>,

    /// Inactive products are hidden from the catalog and cannot be ordered
    pub active: bool,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        ProductResponse {
            id: product.id.into_i64(),
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            category_id: product.category_id.map(Into::into),
            category_name: product.category_name,
            image_url: product.image_url,
            active: product.active,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Get Product Handler
///
/// Returns a product.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product found"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = path_product_id(product.into_inner())?;

    let product = state
        .app
        .products
        .get_product(product)
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use scoops_app::domain::products::{
        MockProductsService, ProductsServiceError, records::ProductId,
    };

    use crate::test_helpers::{make_product, products_service};

    use super::*;

    fn make_service(repo: MockProductsService) -> Service {
        products_service(repo, Router::with_path("products/{product}").get(handler))
    }

    #[tokio::test]
    async fn test_get_product_returns_product() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_get_product()
            .once()
            .withf(|id| *id == ProductId::from_i64(5))
            .return_once(|_| Ok(make_product(5)));

        let response: ProductResponse = TestClient::get("http://example.com/products/5")
            .send(&make_service(repo))
            .await
            .take_json()
            .await?;

        assert_eq!(response.id, 5);
        assert_eq!(response.name, "Scoop 5");
        assert_eq!(response.price, 1_000);
        assert_eq!(response.stock, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_accepts_prefixed_reference() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_get_product()
            .once()
            .withf(|id| *id == ProductId::from_i64(5))
            .return_once(|_| Ok(make_product(5)));

        let res = TestClient::get("http://example.com/products/producto-5")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_invalid_id_returns_400() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_get_product().never();

        let res = TestClient::get("http://example.com/products/vanilla")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_not_found_returns_404() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let res = TestClient::get("http://example.com/products/99")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
