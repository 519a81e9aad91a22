//! Checkout Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use scoops_app::domain::checkout::data::{CheckoutLine, CheckoutRequest, CustomerInfo};

use crate::{
    checkout::errors::into_status_error, extensions::*, observability, products::ProductIdInput,
    state::State,
};

/// A line submitted inline when the session cart is empty.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutItemRequest {
    #[serde(alias = "id")]
    pub product_id: ProductIdInput,

    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// Checkout Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequestBody {
    #[serde(default)]
    pub customer_name: String,

    #[serde(default)]
    pub customer_email: String,

    #[serde(default)]
    pub customer_phone: Option<String>,

    #[serde(default)]
    pub customer_address: Option<String>,

    /// Used only when the session cart is empty
    #[serde(default)]
    pub items: Vec<CheckoutItemRequest>,
}

impl CheckoutRequestBody {
    fn into_request(self, depot: &Depot) -> CheckoutRequest {
        CheckoutRequest {
            customer: CustomerInfo {
                name: self.customer_name,
                email: self.customer_email,
                phone: self.customer_phone,
                address: self.customer_address,
            },
            items: self
                .items
                .into_iter()
                .map(|item| CheckoutLine {
                    product: item.product_id.into(),
                    quantity: item.quantity,
                })
                .collect(),
            user_id: depot.caller().map(|caller| caller.user_id),
        }
    }
}

/// Order Placed Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderPlacedResponse {
    pub order_id: i64,

    /// Authoritative order total in cents
    pub total: u64,

    pub status: String,

    pub message: String,
}

/// Checkout Handler
///
/// Turns the session cart, or the inline items when the cart is empty, into a
/// pending order. A bearer token is optional; when present the order is linked
/// to its user.
#[endpoint(
    tags("checkout"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid input, empty cart or insufficient stock"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid bearer token"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkout",
    skip(json, depot, res),
    fields(
        user_id = tracing::field::Empty,
        order_id = tracing::field::Empty,
        total = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequestBody>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderPlacedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_500()?;
    let request = json.into_inner().into_request(depot);

    let span = tracing::Span::current();

    if let Some(user) = request.user_id {
        span.record("user_id", tracing::field::display(user));
    }

    let placed = match state.app.checkout.checkout(session, request).await {
        Ok(placed) => placed,
        Err(error) => {
            observability::observe_checkout(error.kind());

            return Err(into_status_error(error));
        }
    };

    observability::observe_checkout("placed");

    span.record("order_id", tracing::field::display(placed.order_id));
    span.record("total", placed.total);

    res.add_header(LOCATION, format!("/api/orders/{}", placed.order_id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(OrderPlacedResponse {
        order_id: placed.order_id.into_i64(),
        total: placed.total,
        status: placed.status.to_string(),
        message: "Order placed".to_string(),
    }))
}
