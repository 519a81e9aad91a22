//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use scoops_app::domain::orders::records::{OrderCustomer, OrderDetail, OrderId, OrderItemRecord};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderCustomerResponse {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<OrderCustomer> for OrderCustomerResponse {
    fn from(customer: OrderCustomer) -> Self {
        OrderCustomerResponse {
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub id: i64,
    pub product_id: i64,
    /// Product name when the order was placed
    pub product_name: String,
    /// Unit price in cents when the order was placed
    pub unit_price: u64,
    pub quantity: u32,
    pub subtotal: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            id: item.id.into_i64(),
            product_id: item.product_id.into_i64(),
            subtotal: item.subtotal(),
            product_name: item.product_name,
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    /// Order total in cents
    pub total: u64,
    pub status: String,
    pub customer: OrderCustomerResponse,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderDetail> for OrderResponse {
    fn from(order: OrderDetail) -> Self {
        OrderResponse {
            id: order.id.into_i64(),
            user_id: order.user_id.map(Into::into),
            total: order.total,
            status: order.status.to_string(),
            customer: order.customer.into(),
            created_at: order.created_at.to_string(),
            items: order.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Get Order Handler
///
/// Returns an order with its line items.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = OrderId::from_i64(order.into_inner());

    let order = state
        .app
        .orders
        .get_order(order)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
