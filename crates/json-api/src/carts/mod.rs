//! Session Carts

pub(crate) mod errors;
mod handlers;
pub(crate) mod items;

pub(crate) use handlers::*;
