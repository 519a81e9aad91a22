//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        carts::{errors::CartsServiceError, models::Cart, session::SessionId, store::CartStore},
        products::{
            PgProductsRepository,
            records::{ProductId, ProductRecord},
            reference::ProductRef,
        },
    },
};

#[derive(Clone)]
pub struct PgCartsService {
    db: Db,
    products: PgProductsRepository,
    store: Arc<dyn CartStore>,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db, store: Arc<dyn CartStore>) -> Self {
        Self {
            db,
            products: PgProductsRepository::new(),
            store,
        }
    }

    /// Current row for an active product.
    async fn active_product(&self, product: ProductId) -> Result<ProductRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = match self.products.get_product(&mut tx, product).await {
            Ok(record) => record,
            Err(sqlx::Error::RowNotFound) => return Err(CartsServiceError::ProductNotFound(product)),
            Err(error) => return Err(error.into()),
        };

        tx.commit().await?;

        if !record.active {
            return Err(CartsServiceError::ProductNotFound(product));
        }

        Ok(record)
    }
}

fn ensure_in_stock(product: &ProductRecord, quantity: u32) -> Result<(), CartsServiceError> {
    if quantity > product.stock {
        return Err(CartsServiceError::InsufficientStock {
            product_id: product.id,
            name: product.name.clone(),
            remaining: product.stock,
        });
    }

    Ok(())
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, session: &SessionId) -> Cart {
        self.store.get(session).await.unwrap_or_default()
    }

    async fn add_item(
        &self,
        session: &SessionId,
        product: ProductRef,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let product_id = product.normalize()?;
        let record = self.active_product(product_id).await?;

        let mut cart = self.get_cart(session).await;

        ensure_in_stock(
            &record,
            cart.quantity_of(product_id).saturating_add(quantity),
        )?;

        cart.add(&record, quantity);

        self.store.put(session, cart.clone()).await;

        Ok(cart)
    }

    async fn update_quantity(
        &self,
        session: &SessionId,
        product: ProductRef,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        let product_id = product.normalize()?;
        let mut cart = self.get_cart(session).await;

        if quantity == 0 {
            if cart.remove(product_id) {
                self.store.put(session, cart.clone()).await;
            }

            return Ok(cart);
        }

        if cart.item(product_id).is_none() {
            return Err(CartsServiceError::ItemNotFound(product_id));
        }

        let record = self.active_product(product_id).await?;

        ensure_in_stock(&record, quantity)?;

        cart.set_quantity(product_id, quantity);

        self.store.put(session, cart.clone()).await;

        Ok(cart)
    }

    async fn remove_item(
        &self,
        session: &SessionId,
        product: ProductRef,
    ) -> Result<Cart, CartsServiceError> {
        let product_id = product.normalize()?;
        let mut cart = self.get_cart(session).await;

        if !cart.remove(product_id) {
            return Err(CartsServiceError::ItemNotFound(product_id));
        }

        self.store.put(session, cart.clone()).await;

        Ok(cart)
    }

    async fn clear(&self, session: &SessionId) {
        self.store.delete(session).await;
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The session's cart, empty when none exists.
    async fn get_cart(&self, session: &SessionId) -> Cart;

    /// Add `quantity` units of a product, merging with an existing line.
    async fn add_item(
        &self,
        session: &SessionId,
        product: ProductRef,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Replace a line's quantity. Zero removes the line, and is a no-op when absent.
    async fn update_quantity(
        &self,
        session: &SessionId,
        product: ProductRef,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a line from the cart.
    async fn remove_item(
        &self,
        session: &SessionId,
        product: ProductRef,
    ) -> Result<Cart, CartsServiceError>;

    /// Forget the session's cart.
    async fn clear(&self, session: &SessionId);
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::products::ProductsService, test::TestContext};

    use super::*;

    fn session() -> SessionId {
        SessionId::new("test-session")
    }

    #[tokio::test]
    async fn get_cart_without_items_is_empty() {
        let ctx = TestContext::new().await;

        let cart = ctx.carts.get_cart(&session()).await;

        assert!(cart.is_empty());
        assert_eq!(cart.total, 0);
    }

    #[tokio::test]
    async fn add_item_snapshots_product_and_totals() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 3).await;

        let cart = ctx
            .carts
            .add_item(&session(), ProductRef::from(format!("producto-{}", product.id)), 2)
            .await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_id, product.id);
        assert_eq!(cart.items[0].name, "Vanilla");
        assert_eq!(cart.items[0].price, 1000);
        assert_eq!(cart.total, 2000);
        assert_eq!(ctx.carts.get_cart(&session()).await, cart);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_rejects_zero_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 3).await;

        let result = ctx
            .carts
            .add_item(&session(), product.id.into(), 0)
            .await;

        assert!(matches!(result, Err(CartsServiceError::InvalidQuantity)));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_merged_quantity_cannot_exceed_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 3).await;

        ctx.carts
            .add_item(&session(), product.id.into(), 2)
            .await?;

        let result = ctx
            .carts
            .add_item(&session(), product.id.into(), 2)
            .await;

        assert!(matches!(
            result,
            Err(CartsServiceError::InsufficientStock { remaining: 3, .. })
        ));
        assert_eq!(
            ctx.carts.get_cart(&session()).await.quantity_of(product.id),
            2
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_inactive_product_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Retired", 500, 9).await;

        ctx.products.deactivate_product(product.id).await?;

        let result = ctx
            .carts
            .add_item(&session(), product.id.into(), 1)
            .await;

        assert!(matches!(result, Err(CartsServiceError::ProductNotFound(id)) if id == product.id));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_with_unparseable_reference_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .add_item(&session(), ProductRef::from("vanilla"), 1)
            .await;

        assert!(matches!(result, Err(CartsServiceError::InvalidProductRef(_))));
    }

    #[tokio::test]
    async fn update_quantity_zero_on_missing_line_is_a_no_op() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx
            .carts
            .update_quantity(&session(), ProductRef::from(77_i64), 0)
            .await?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_replaces_and_removes() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 5).await;

        ctx.carts
            .add_item(&session(), product.id.into(), 1)
            .await?;

        let cart = ctx
            .carts
            .update_quantity(&session(), product.id.into(), 4)
            .await?;

        assert_eq!(cart.quantity_of(product.id), 4);
        assert_eq!(cart.total, 4000);

        let cart = ctx
            .carts
            .update_quantity(&session(), product.id.into(), 0)
            .await?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_checks_stock_and_missing_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 2).await;

        let missing = ctx
            .carts
            .update_quantity(&session(), product.id.into(), 1)
            .await;

        assert!(matches!(missing, Err(CartsServiceError::ItemNotFound(_))));

        ctx.carts
            .add_item(&session(), product.id.into(), 1)
            .await?;

        let too_many = ctx
            .carts
            .update_quantity(&session(), product.id.into(), 3)
            .await;

        assert!(matches!(
            too_many,
            Err(CartsServiceError::InsufficientStock { remaining: 2, .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_requires_existing_line() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 2).await;

        let missing = ctx
            .carts
            .remove_item(&session(), product.id.into())
            .await;

        assert!(matches!(missing, Err(CartsServiceError::ItemNotFound(_))));

        ctx.carts
            .add_item(&session(), product.id.into(), 1)
            .await?;

        let cart = ctx
            .carts
            .remove_item(&session(), product.id.into())
            .await?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn clear_forgets_the_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 2).await;

        ctx.carts
            .add_item(&session(), product.id.into(), 1)
            .await?;

        ctx.carts.clear(&session()).await;

        assert!(ctx.carts.get_cart(&session()).await.is_empty());

        Ok(())
    }
}
