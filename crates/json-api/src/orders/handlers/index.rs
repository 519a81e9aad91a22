//! Order Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use scoops_app::domain::orders::records::OrderSummary;

use crate::{extensions::*, orders::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderSummaryResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    /// Order total in cents
    pub total: u64,
    pub status: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub created_at: String,
    /// Number of distinct lines
    pub items_count: u64,
    /// Sum of line quantities
    pub total_items: u64,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(order: OrderSummary) -> Self {
        OrderSummaryResponse {
            id: order.id.into_i64(),
            user_id: order.user_id.map(Into::into),
            total: order.total,
            status: order.status.to_string(),
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            created_at: order.created_at.to_string(),
            items_count: order.items_count,
            total_items: order.total_items,
        }
    }
}

/// Order Index Handler
///
/// Administrators see every order, customers only their own.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Orders visible to the caller"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.index",
    skip(depot),
    fields(user_id = tracing::field::Empty, role = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<OrderSummaryResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.caller_or_401()?;

    let span = tracing::Span::current();

    span.record("user_id", tracing::field::display(caller.user_id));
    span.record("role", caller.role.as_str());

    let orders = state
        .app
        .orders
        .list_orders(caller.order_scope())
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}
