//! Readiness checks.

use async_trait::async_trait;
use mockall::automock;
use sqlx::query_scalar;

use crate::database::Db;

#[derive(Debug, Clone)]
pub struct PgHealthService {
    db: Db,
}

impl PgHealthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HealthService for PgHealthService {
    async fn check_database(&self) -> Result<(), sqlx::Error> {
        let _: i32 = query_scalar("SELECT 1").fetch_one(self.db.pool()).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait HealthService: Send + Sync {
    /// Round-trip a trivial query to the database.
    async fn check_database(&self) -> Result<(), sqlx::Error>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn database_check_succeeds_against_live_pool() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.health.check_database().await?;

        Ok(())
    }
}
