//! Order Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{products::records::ProductId, users::records::UserId},
    ids::TypedId,
};

/// Order ID
pub type OrderId = TypedId<OrderSummary>;

/// Order Item ID
pub type OrderItemId = TypedId<OrderItemRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status `{0}`")]
pub struct UnknownOrderStatus(pub String);

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

/// Which orders a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    All,
    Customer(UserId),
}

impl OrderScope {
    #[must_use]
    pub const fn user_id(self) -> Option<UserId> {
        match self {
            Self::All => None,
            Self::Customer(user) => Some(user),
        }
    }
}

/// Order listing row.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub total: u64,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub created_at: Timestamp,

    /// Number of distinct lines.
    pub items_count: u64,

    /// Sum of line quantities.
    pub total_items: u64,
}

/// Contact details shown on an order, order snapshot first then the linked user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Order item as captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: u64,
    pub quantity: u32,
}

impl OrderItemRecord {
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetail {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub total: u64,
    pub status: OrderStatus,
    pub customer: OrderCustomer,
    pub created_at: Timestamp,
    pub items: Vec<OrderItemRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Cancelled,
            OrderStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn scope_exposes_customer() {
        let user = UserId::from_i64(4);

        assert_eq!(OrderScope::All.user_id(), None);
        assert_eq!(OrderScope::Customer(user).user_id(), Some(user));
    }
}
