//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{decode_u32, decode_u64},
    domain::{
        orders::records::{
            OrderCustomer, OrderDetail, OrderId, OrderItemId, OrderItemRecord, OrderScope,
            OrderStatus, OrderSummary,
        },
        products::records::ProductId,
        users::records::UserId,
    },
};

const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        scope: OrderScope,
    ) -> Result<Vec<OrderSummary>, sqlx::Error> {
        query_as::<Postgres, OrderSummary>(LIST_ORDERS_SQL)
            .bind(scope.user_id().map(UserId::into_i64))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<OrderDetail, sqlx::Error> {
        let row = query(GET_ORDER_SQL)
            .bind(order.into_i64())
            .fetch_one(&mut **tx)
            .await?;

        Ok(OrderDetail {
            id: OrderId::from_i64(row.try_get("id")?),
            user_id: decode_user(&row)?,
            total: decode_u64(&row, "total")?,
            status: decode_status(&row)?,
            customer: OrderCustomer {
                name: row.try_get("customer_name")?,
                email: row.try_get("customer_email")?,
                phone: row.try_get("customer_phone")?,
                address: row.try_get("customer_address")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            items: Vec::new(),
        })
    }

    pub(crate) async fn list_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(LIST_ORDER_ITEMS_SQL)
            .bind(order.into_i64())
            .fetch_all(&mut **tx)
            .await
    }
}

fn decode_user(row: &PgRow) -> sqlx::Result<Option<UserId>> {
    Ok(row
        .try_get::<Option<i64>, _>("user_id")?
        .map(UserId::from_i64))
}

fn decode_status(row: &PgRow) -> sqlx::Result<OrderStatus> {
    let status: String = row.try_get("status")?;

    status
        .parse::<OrderStatus>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })
}

impl<'r> FromRow<'r, PgRow> for OrderSummary {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: OrderId::from_i64(row.try_get("id")?),
            user_id: decode_user(row)?,
            total: decode_u64(row, "total")?,
            status: decode_status(row)?,
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            items_count: decode_u64(row, "items_count")?,
            total_items: decode_u64(row, "total_items")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: OrderItemId::from_i64(row.try_get("id")?),
            product_id: ProductId::from_i64(row.try_get("product_id")?),
            product_name: row.try_get("product_name")?,
            unit_price: decode_u64(row, "unit_price")?,
            quantity: decode_u32(row, "quantity")?,
        })
    }
}
