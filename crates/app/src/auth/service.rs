//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    auth::{AuthServiceError, Caller, TokenSigner},
    domain::users::{UsersService, records::UserId},
};

#[derive(Clone)]
pub struct TokenAuthService {
    signer: TokenSigner,
    users: Arc<dyn UsersService>,
}

impl TokenAuthService {
    #[must_use]
    pub fn new(signer: TokenSigner, users: Arc<dyn UsersService>) -> Self {
        Self { signer, users }
    }
}

#[async_trait]
impl AuthService for TokenAuthService {
    async fn authenticate_bearer(&self, token: &str) -> Result<Caller, AuthServiceError> {
        let claims = self.signer.verify(token, Timestamp::now())?;

        Ok(Caller {
            user_id: claims.user_id,
            role: claims.role,
        })
    }

    async fn issue_token(
        &self,
        user: UserId,
        expires_at: Timestamp,
    ) -> Result<String, AuthServiceError> {
        let user = self.users.get_user(user).await?;

        Ok(self.signer.issue(user.id, user.role, expires_at))
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify a bearer token and return the caller it names.
    async fn authenticate_bearer(&self, token: &str) -> Result<Caller, AuthServiceError>;

    /// Mint a token carrying the stored role of `user`.
    async fn issue_token(
        &self,
        user: UserId,
        expires_at: Timestamp,
    ) -> Result<String, AuthServiceError>;
}
