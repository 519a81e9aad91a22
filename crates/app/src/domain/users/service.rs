//! Users service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::users::{
        data::NewUser,
        errors::UsersServiceError,
        records::{UserId, UserRecord},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_user(&self, user: UserId) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Creates a user; emails are unique.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserId) -> Result<UserRecord, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::users::records::Role, test::TestContext};

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ana".to_string(),
            email: email.to_string(),
            role: Role::Customer,
            phone: Some("555-0100".to_string()),
            address: None,
        }
    }

    #[tokio::test]
    async fn create_user_then_get_returns_same_user() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.users.create_user(new_user("ana@example.com")).await?;
        let fetched = ctx.users.get_user(created.id).await?;

        assert_eq!(created, fetched);
        assert_eq!(fetched.role, Role::Customer);
        assert_eq!(fetched.phone.as_deref(), Some("555-0100"));

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.create_user(new_user("dup@example.com")).await?;

        let result = ctx.users.create_user(new_user("dup@example.com")).await;

        assert!(matches!(result, Err(UsersServiceError::AlreadyExists)));

        Ok(())
    }

    #[tokio::test]
    async fn get_unknown_user_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx.users.get_user(UserId::from_i64(31_337)).await;

        assert!(matches!(result, Err(UsersServiceError::NotFound)));

        Ok(())
    }
}
