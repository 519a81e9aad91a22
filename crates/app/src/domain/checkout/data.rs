//! Checkout Data

use crate::domain::{
    orders::records::{OrderId, OrderStatus},
    products::{records::ProductId, reference::ProductRef},
    users::records::UserId,
};

/// Contact details submitted with a checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A line as submitted by the client; validated before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub product: ProductRef,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub customer: CustomerInfo,

    /// Used only when the session cart is empty.
    pub items: Vec<CheckoutLine>,

    /// Authenticated customer placing the order, if any.
    pub user_id: Option<UserId>,
}

/// Line as persisted, priced from the locked product row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub total: u64,
    pub status: OrderStatus,
    pub items: Vec<PlacedOrderItem>,
}

/// Where the checked-out lines came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSource {
    Session,
    Inline,
}
