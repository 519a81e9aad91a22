//! Auth service errors.

use thiserror::Error;

use crate::{auth::TokenError, domain::users::UsersServiceError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("invalid token")]
    Token(#[from] TokenError),

    #[error("user lookup failed")]
    User(#[from] UsersServiceError),
}
