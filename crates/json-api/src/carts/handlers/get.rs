//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use scoops_app::domain::carts::models::{Cart, CartItem};

use crate::{extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub product_id: i64,

    pub name: String,

    /// Unit price in cents when the item was added; checkout reprices
    pub price: u64,

    pub image_url: Option<String>,

    pub quantity: u32,

    pub subtotal: u64,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        CartItemResponse {
            product_id: item.product_id.into_i64(),
            subtotal: item.subtotal(),
            name: item.name,
            price: item.price,
            image_url: item.image_url,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub items: Vec<CartItemResponse>,

    /// Sum of item subtotals in cents
    pub total: u64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        CartResponse {
            items: cart.items.into_iter().map(Into::into).collect(),
            total: cart.total,
        }
    }
}

/// Get Cart Handler
///
/// Returns the session's cart, empty when nothing has been added yet.
#[endpoint(tags("carts"), summary = "Get Cart")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_500()?;

    let cart = state.app.carts.get_cart(session).await;

    Ok(Json(cart.into()))
}
