//! Categories service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CategoriesServiceError {
    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
