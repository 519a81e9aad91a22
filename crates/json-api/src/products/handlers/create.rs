//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use scoops_app::domain::{categories::records::CategoryId, products::data::NewProduct};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in cents
    pub price: u64,
    pub stock: u32,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl TryFrom<CreateProductRequest> for NewProduct {
    type Error = StatusError;

    fn try_from(request: CreateProductRequest) -> Result<Self, Self::Error> {
        let name = request.name.trim();

        if name.is_empty() {
            return Err(StatusError::bad_request().brief("Product name is required"));
        }

        Ok(NewProduct {
            category_id: request.category_id.map(CategoryId::from_i64),
            name: name.to_string(),
            description: request.description,
            price: request.price,
            stock: request.stock,
            image_url: request.image_url,
        })
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Forbidden"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.create",
    skip(json, depot, res),
    fields(product_id = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = NewProduct::try_from(json.into_inner())?;

    let product = state
        .app
        .products
        .create_product(product)
        .await
        .map_err(into_status_error)?;

    let id = product.id;

    tracing::Span::current().record("product_id", tracing::field::display(id));

    res.add_header(LOCATION, format!("/api/products/{id}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    tracing::info!(product_id = %id, "created product");

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use scoops_app::domain::products::{MockProductsService, ProductsServiceError};

    use crate::test_helpers::{make_product, products_service};

    use super::*;

    fn make_service(repo: MockProductsService) -> Service {
        products_service(repo, Router::with_path("products").post(handler))
    }

    fn new_product() -> NewProduct {
        NewProduct {
            category_id: None,
            name: "Scoop 9".to_string(),
            description: None,
            price: 1_000,
            stock: 3,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_product_success() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .withf(|new| *new == new_product())
            .return_once(|_| Ok(make_product(9)));

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "  Scoop 9 ", "price": 1000, "stock": 3 }))
            .send(&make_service(repo))
            .await;

        let body: ProductResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some("/api/products/9"));
        assert_eq!(body.id, 9);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_blank_name_returns_400() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product().never();

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "  ", "price": 1000, "stock": 3 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_negative_price_returns_400() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product().never();

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Scoop", "price": -1, "stock": 3 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_unknown_category_returns_400() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::InvalidReference));

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Scoop", "price": 1000, "stock": 3, "category_id": 42 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
