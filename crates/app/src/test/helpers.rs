//! Test Helpers

use crate::domain::{
    checkout::data::{CheckoutLine, CheckoutRequest, CustomerInfo},
    products::{data::NewProduct, records::ProductId},
    users::{data::NewUser, records::Role},
};

pub(crate) fn new_product(name: &str, price: u64, stock: u32) -> NewProduct {
    NewProduct {
        category_id: None,
        name: name.to_string(),
        description: None,
        price,
        stock,
        image_url: None,
    }
}

pub(crate) fn new_user(email: &str, role: Role) -> NewUser {
    NewUser {
        name: "Luis".to_string(),
        email: email.to_string(),
        role,
        phone: Some("555-0199".to_string()),
        address: Some("Av. Siempre Viva 742".to_string()),
    }
}

pub(crate) fn inline_line(product: ProductId, quantity: i64) -> CheckoutLine {
    CheckoutLine {
        product: product.into(),
        quantity,
    }
}

pub(crate) fn checkout_request(items: Vec<CheckoutLine>) -> CheckoutRequest {
    CheckoutRequest {
        customer: CustomerInfo {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: Some("555-0100".to_string()),
            address: Some("Calle 1".to_string()),
        },
        items,
        user_id: None,
    }
}
