//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{carts::get::CartResponse, extensions::*, state::State};

/// Clear Cart Handler
#[endpoint(
    tags("carts"),
    summary = "Clear Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart cleared"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.clear", skip(depot), fields(session = tracing::field::Empty), err)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_500()?;

    tracing::Span::current().record("session", tracing::field::display(session));

    state.app.carts.clear(session).await;

    tracing::info!("cleared cart");

    Ok(Json(CartResponse {
        items: Vec::new(),
        total: 0,
    }))
}
