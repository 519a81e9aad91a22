//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use scoops_app::domain::{categories::records::CategoryId, products::data::ProductUpdate};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse, path_product_id},
    state::State,
};

/// Update Product Request
///
/// Replaces every editable field of the product.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductRequest {
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
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl TryFrom<UpdateProductRequest> for ProductUpdate {
    type Error = StatusError;

    fn try_from(request: UpdateProductRequest) -> Result<Self, Self::Error> {
        let name = request.name.trim();

        if name.is_empty() {
            return Err(StatusError::bad_request().brief("Product name is required"));
        }

        Ok(ProductUpdate {
            category_id: request.category_id.map(CategoryId::from_i64),
            name: name.to_string(),
            description: request.description,
            price: request.price,
            stock: request.stock,
            image_url: request.image_url,
            active: request.active,
        })
    }
}

/// Product Update Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Forbidden"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(product, json, depot),
    fields(
        product_id = tracing::field::Empty,
        price = tracing::field::Empty,
        stock = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    product: PathParam<String>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = path_product_id(product.into_inner())?;
    let update = ProductUpdate::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("product_id", tracing::field::display(product));
    span.record("price", update.price);
    span.record("stock", update.stock);

    let updated = state
        .app
        .products
        .update_product(product, update)
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_id = %product, price = updated.price, "updated product");

    Ok(Json(updated.into()))
}
