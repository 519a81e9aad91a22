//! Pre-transaction validation of checkout input.

use crate::domain::{
    carts::models::Cart,
    checkout::{
        data::{CheckoutLine, CustomerInfo},
        errors::CheckoutServiceError,
    },
    products::records::ProductId,
};

/// A normalized line: one per product, quantity at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Customer contact with surrounding whitespace removed and blanks dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerInfo {
    /// # Errors
    ///
    /// Returns [`CheckoutServiceError::InvalidInput`] when name or email is blank.
    pub fn validate(&self) -> Result<ValidatedCustomer, CheckoutServiceError> {
        let name = self.name.trim();
        let email = self.email.trim();

        if name.is_empty() {
            return Err(CheckoutServiceError::InvalidInput(
                "customer_name is required",
            ));
        }

        if email.is_empty() {
            return Err(CheckoutServiceError::InvalidInput(
                "customer_email is required",
            ));
        }

        Ok(ValidatedCustomer {
            name: name.to_string(),
            email: email.to_string(),
            phone: non_blank(self.phone.as_deref()),
            address: non_blank(self.address.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Lines for every item held in a session cart.
#[must_use]
pub fn from_cart(cart: &Cart) -> Vec<CheckoutLine> {
    cart.items
        .iter()
        .map(|item| CheckoutLine {
            product: item.product_id.into(),
            quantity: i64::from(item.quantity),
        })
        .collect()
}

/// Normalize, merge and order checkout lines.
///
/// Lines naming the same product are summed so stock is checked against the
/// combined quantity. The result is sorted by product id, which fixes the order
/// row locks are taken in.
///
/// # Errors
///
/// Fails on an unresolvable product reference or a quantity below 1.
pub fn coalesce(lines: &[CheckoutLine]) -> Result<Vec<OrderLine>, CheckoutServiceError> {
    let mut merged: Vec<OrderLine> = Vec::with_capacity(lines.len());

    for line in lines {
        let product_id = line.product.normalize()?;

        let quantity = u32::try_from(line.quantity)
            .ok()
            .filter(|quantity| *quantity >= 1)
            .ok_or(CheckoutServiceError::InvalidInput(
                "quantity must be at least 1",
            ))?;

        match merged.iter_mut().find(|m| m.product_id == product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(quantity).ok_or(
                    CheckoutServiceError::InvalidInput("quantity is too large"),
                )?;
            }
            None => merged.push(OrderLine {
                product_id,
                quantity,
            }),
        }
    }

    merged.sort_by_key(|line| line.product_id);

    Ok(merged)
}
