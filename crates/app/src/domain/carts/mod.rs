//! Carts

pub mod errors;
pub mod models;
pub mod service;
pub mod session;
pub mod store;

pub use errors::CartsServiceError;
pub use service::*;
pub use session::SessionId;
pub use store::{CartStore, InMemoryCartStore};
