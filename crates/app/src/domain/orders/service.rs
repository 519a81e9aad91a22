//! Orders service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        records::{OrderDetail, OrderId, OrderScope, OrderSummary},
        repository::PgOrdersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(&self, scope: OrderScope) -> Result<Vec<OrderSummary>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.repository.list_orders(&mut tx, scope).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(&self, order: OrderId) -> Result<OrderDetail, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut detail = self.repository.get_order(&mut tx, order).await?;

        let items = self.repository.list_order_items(&mut tx, order).await?;

        tx.commit().await?;

        detail.items.extend(items);

        Ok(detail)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Order summaries visible within `scope`, newest first.
    async fn list_orders(&self, scope: OrderScope) -> Result<Vec<OrderSummary>, OrdersServiceError>;

    /// Retrieve an order with its items.
    async fn get_order(&self, order: OrderId) -> Result<OrderDetail, OrdersServiceError>;
}
