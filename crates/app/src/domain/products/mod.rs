//! Products

pub mod data;
pub mod errors;
pub mod records;
pub mod reference;
mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub(crate) use repository::PgProductsRepository;
pub use service::*;
