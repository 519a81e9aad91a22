//! Checkout Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{decode_u32, decode_u64, encode_u32, encode_u64},
    domain::{
        checkout::lines::ValidatedCustomer,
        orders::records::{OrderId, OrderStatus},
        products::records::ProductId,
        users::records::UserId,
    },
};

const LOCK_PRODUCT_SQL: &str = include_str!("sql/lock_product.sql");
const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const INSERT_ORDER_ITEM_SQL: &str = include_str!("sql/insert_order_item.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");

/// Product row read under a row lock.
#[derive(Debug, Clone)]
pub(crate) struct LockedProduct {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PgCheckoutRepository;

impl PgCheckoutRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn lock_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
    ) -> Result<Option<LockedProduct>, sqlx::Error> {
        query_as::<Postgres, LockedProduct>(LOCK_PRODUCT_SQL)
            .bind(product.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Option<UserId>,
        total: u64,
        customer: &ValidatedCustomer,
    ) -> Result<(OrderId, OrderStatus), sqlx::Error> {
        let row = query(INSERT_ORDER_SQL)
            .bind(user.map(UserId::into_i64))
            .bind(encode_u64(total)?)
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(customer.phone.as_deref())
            .bind(customer.address.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        let status: String = row.try_get("status")?;

        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok((OrderId::from_i64(row.try_get("id")?), status))
    }

    pub(crate) async fn insert_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        product: &LockedProduct,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_ORDER_ITEM_SQL)
            .bind(order.into_i64())
            .bind(product.id.into_i64())
            .bind(&product.name)
            .bind(encode_u64(product.price)?)
            .bind(encode_u32(quantity)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Returns the number of rows updated; zero when stock fell below `quantity`.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(product.into_i64())
            .bind(encode_u32(quantity)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for LockedProduct {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: ProductId::from_i64(row.try_get("id")?),
            name: row.try_get("name")?,
            price: decode_u64(row, "price")?,
            stock: decode_u32(row, "stock")?,
            active: row.try_get("active")?,
        })
    }
}
