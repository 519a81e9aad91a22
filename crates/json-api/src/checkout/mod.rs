//! Checkout

pub(crate) mod errors;
pub(crate) mod handler;
