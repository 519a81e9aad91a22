//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        carts::{SessionId, store::CartStore},
        checkout::{
            data::{CheckoutRequest, LineSource, PlacedOrder, PlacedOrderItem},
            errors::CheckoutServiceError,
            lines::{self, OrderLine, ValidatedCustomer},
            repository::{LockedProduct, PgCheckoutRepository},
        },
        users::records::UserId,
    },
};

#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    repository: PgCheckoutRepository,
    carts: Arc<dyn CartStore>,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, carts: Arc<dyn CartStore>) -> Self {
        Self {
            db,
            repository: PgCheckoutRepository::new(),
            carts,
        }
    }
}

/// Largest total the `orders.total` column can hold.
const MAX_ORDER_TOTAL: u64 = i64::MAX.unsigned_abs();

/// Sum of `price * quantity` over `lines`, bounded by [`MAX_ORDER_TOTAL`].
fn order_total(
    lines: impl IntoIterator<Item = (u64, u32)>,
) -> Result<u64, CheckoutServiceError> {
    lines
        .into_iter()
        .try_fold(0_u64, |total, (price, quantity)| {
            price
                .checked_mul(u64::from(quantity))
                .and_then(|subtotal| total.checked_add(subtotal))
        })
        .filter(|total| *total <= MAX_ORDER_TOTAL)
        .ok_or(CheckoutServiceError::InvalidInput("order total is too large"))
}

/// Lock, reprice and persist `lines` as one order inside `tx`.
async fn place_order(
    tx: &mut sqlx::Transaction<'static, sqlx::Postgres>,
    repository: PgCheckoutRepository,
    lines: Vec<OrderLine>,
    customer: ValidatedCustomer,
    user: Option<UserId>,
) -> Result<PlacedOrder, CheckoutServiceError> {
    let mut locked: Vec<(LockedProduct, u32)> = Vec::with_capacity(lines.len());

    for line in lines {
        let product = repository
            .lock_product(&mut *tx, line.product_id)
            .await?
            .filter(|product| product.active)
            .ok_or(CheckoutServiceError::ProductNotFound(line.product_id))?;

        if product.stock < line.quantity {
            return Err(CheckoutServiceError::InsufficientStock {
                product_id: product.id,
                name: product.name,
                remaining: product.stock,
            });
        }

        locked.push((product, line.quantity));
    }

    let total = order_total(
        locked
            .iter()
            .map(|(product, quantity)| (product.price, *quantity)),
    )?;

    let (order_id, status) = repository
        .insert_order(&mut *tx, user, total, &customer)
        .await?;

    let mut items = Vec::with_capacity(locked.len());

    for (product, quantity) in locked {
        repository
            .insert_order_item(&mut *tx, order_id, &product, quantity)
            .await?;

        let updated = repository
            .decrement_stock(&mut *tx, product.id, quantity)
            .await?;

        if updated == 0 {
            return Err(CheckoutServiceError::InsufficientStock {
                product_id: product.id,
                name: product.name,
                remaining: product.stock,
            });
        }

        items.push(PlacedOrderItem {
            product_id: product.id,
            product_name: product.name,
            unit_price: product.price,
            quantity,
        });
    }

    Ok(PlacedOrder {
        order_id,
        total,
        status,
        items,
    })
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.checkout",
        skip(self, request),
        fields(
            session = %session,
            source = tracing::field::Empty,
            line_count = tracing::field::Empty,
            order_id = tracing::field::Empty,
            total = tracing::field::Empty
        ),
        err
    )]
    async fn checkout(
        &self,
        session: &SessionId,
        request: CheckoutRequest,
    ) -> Result<PlacedOrder, CheckoutServiceError> {
        let span = Span::current();

        let (source, raw_lines) = match self.carts.get(session).await {
            Some(cart) if !cart.is_empty() => (LineSource::Session, lines::from_cart(&cart)),
            _ if !request.items.is_empty() => (LineSource::Inline, request.items),
            _ => return Err(CheckoutServiceError::EmptyCart),
        };

        span.record("source", tracing::field::debug(source));

        let customer = request.customer.validate()?;
        let order_lines = lines::coalesce(&raw_lines)?;

        span.record("line_count", order_lines.len());

        let repository = self.repository;
        let user = request.user_id;

        let placed = self
            .db
            .with_transaction::<PlacedOrder, CheckoutServiceError, _>(move |tx| {
                Box::pin(place_order(tx, repository, order_lines, customer, user))
            })
            .await
            .inspect_err(|error| warn!(kind = error.kind(), "checkout rolled back: {error}"))?;

        if source == LineSource::Session {
            self.carts.delete(session).await;
        }

        span.record("order_id", tracing::field::display(placed.order_id));
        span.record("total", placed.total);

        info!(order_id = %placed.order_id, total = placed.total, "placed order");

        Ok(placed)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Turn the session cart, or the inline items when the cart is empty, into
    /// a pending order, decrementing stock atomically.
    async fn checkout(
        &self,
        session: &SessionId,
        request: CheckoutRequest,
    ) -> Result<PlacedOrder, CheckoutServiceError>;
}

#[cfg(test)]
mod tests {
    use sqlx::query_scalar;
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::CartsService,
            checkout::data::CustomerInfo,
            orders::{OrdersService, records::OrderStatus},
            products::{ProductsService, data::ProductUpdate, records::ProductId},
        },
        test::{
            TestContext,
            helpers::{checkout_request, inline_line},
        },
    };

    use super::*;

    #[test]
    fn order_total_sums_lines() -> Result<(), CheckoutServiceError> {
        assert_eq!(order_total([(1000, 2), (450, 3)])?, 3350);
        assert_eq!(order_total([])?, 0);

        Ok(())
    }

    #[test]
    fn order_total_must_fit_the_total_column() -> Result<(), CheckoutServiceError> {
        assert_eq!(order_total([(MAX_ORDER_TOTAL, 1)])?, MAX_ORDER_TOTAL);

        let half = 1_u64 << 62;

        assert!(matches!(
            order_total([(half, 2)]),
            Err(CheckoutServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            order_total([(u64::MAX, 2)]),
            Err(CheckoutServiceError::InvalidInput(_))
        ));

        Ok(())
    }

    async fn order_count(ctx: &TestContext) -> i64 {
        query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(ctx.db.pool())
            .await
            .expect("count orders")
    }

    async fn stock_of(ctx: &TestContext, product: ProductId) -> u32 {
        ctx.products
            .get_product(product)
            .await
            .expect("product exists")
            .stock
    }

    #[tokio::test]
    async fn checkout_decrements_stock_and_totals() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 3).await;

        let placed = ctx
            .checkout
            .checkout(&ctx.session, checkout_request(vec![inline_line(product.id, 2)]))
            .await?;

        assert_eq!(placed.total, 2000);
        assert_eq!(placed.status, OrderStatus::Pending);
        assert_eq!(placed.items.len(), 1);
        assert_eq!(placed.items[0].unit_price, 1000);
        assert_eq!(stock_of(&ctx, product.id).await, 1);

        let detail = ctx.orders.get_order(placed.order_id).await?;
        let item_sum: u64 = detail.items.iter().map(|item| item.subtotal()).sum();

        assert_eq!(detail.total, item_sum);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_over_stock_leaves_no_trace() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 3).await;

        let result = ctx
            .checkout
            .checkout(&ctx.session, checkout_request(vec![inline_line(product.id, 5)]))
            .await;

        assert!(matches!(
            result,
            Err(CheckoutServiceError::InsufficientStock { remaining: 3, .. })
        ));
        assert_eq!(stock_of(&ctx, product.id).await, 3);
        assert_eq!(order_count(&ctx).await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_with_nothing_to_buy_is_empty_cart() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .checkout
            .checkout(&ctx.session, checkout_request(Vec::new()))
            .await;

        assert!(matches!(result, Err(CheckoutServiceError::EmptyCart)));
        assert_eq!(order_count(&ctx).await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_without_email_is_invalid_input() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 3).await;

        let mut request = checkout_request(vec![inline_line(product.id, 1)]);
        request.customer = CustomerInfo {
            email: String::new(),
            ..request.customer
        };

        let result = ctx.checkout.checkout(&ctx.session, request).await;

        assert!(matches!(result, Err(CheckoutServiceError::InvalidInput(_))));
        assert_eq!(stock_of(&ctx, product.id).await, 3);
        assert_eq!(order_count(&ctx).await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_lines_are_coalesced_before_stock_check() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 3).await;

        let result = ctx
            .checkout
            .checkout(
                &ctx.session,
                checkout_request(vec![inline_line(product.id, 2), inline_line(product.id, 2)]),
            )
            .await;

        assert!(matches!(
            result,
            Err(CheckoutServiceError::InsufficientStock { .. })
        ));
        assert_eq!(stock_of(&ctx, product.id).await, 3);

        Ok(())
    }

    #[tokio::test]
    async fn failure_on_later_line_rolls_back_earlier_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let plenty = ctx.create_product("Vanilla", 1000, 10).await;
        let scarce = ctx.create_product("Mango", 500, 1).await;

        let result = ctx
            .checkout
            .checkout(
                &ctx.session,
                checkout_request(vec![inline_line(plenty.id, 4), inline_line(scarce.id, 2)]),
            )
            .await;

        assert!(matches!(
            result,
            Err(CheckoutServiceError::InsufficientStock { product_id, .. }) if product_id == scarce.id
        ));
        assert_eq!(stock_of(&ctx, plenty.id).await, 10);
        assert_eq!(order_count(&ctx).await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn inactive_products_cannot_be_checked_out() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Retired", 1000, 3).await;

        ctx.products.deactivate_product(product.id).await?;

        let result = ctx
            .checkout
            .checkout(&ctx.session, checkout_request(vec![inline_line(product.id, 1)]))
            .await;

        assert!(matches!(
            result,
            Err(CheckoutServiceError::ProductNotFound(id)) if id == product.id
        ));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_products_are_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .checkout
            .checkout(
                &ctx.session,
                checkout_request(vec![inline_line(ProductId::from_i64(4_242), 1)]),
            )
            .await;

        assert!(matches!(result, Err(CheckoutServiceError::ProductNotFound(_))));

        Ok(())
    }

    #[tokio::test]
    async fn session_cart_is_repriced_and_cleared() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 5).await;

        ctx.carts
            .add_item(&ctx.session, product.id.into(), 2)
            .await?;

        ctx.products
            .update_product(
                product.id,
                ProductUpdate {
                    category_id: None,
                    name: "Vanilla".to_string(),
                    description: None,
                    price: 1250,
                    stock: 5,
                    image_url: None,
                    active: true,
                },
            )
            .await?;

        let placed = ctx
            .checkout
            .checkout(&ctx.session, checkout_request(vec![inline_line(product.id, 1)]))
            .await?;

        assert_eq!(placed.items[0].quantity, 2);
        assert_eq!(placed.items[0].unit_price, 1250);
        assert_eq!(placed.total, 2500);
        assert!(ctx.carts.get_cart(&ctx.session).await.is_empty());
        assert_eq!(stock_of(&ctx, product.id).await, 3);

        Ok(())
    }

    #[tokio::test]
    async fn failed_checkout_keeps_session_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanilla", 1000, 2).await;

        ctx.carts
            .add_item(&ctx.session, product.id.into(), 2)
            .await?;

        sqlx::query("UPDATE products SET stock = 1 WHERE id = $1")
            .bind(product.id.into_i64())
            .execute(ctx.db.pool())
            .await?;

        let result = ctx
            .checkout
            .checkout(&ctx.session, checkout_request(Vec::new()))
            .await;

        assert!(matches!(
            result,
            Err(CheckoutServiceError::InsufficientStock { remaining: 1, .. })
        ));
        assert_eq!(
            ctx.carts.get_cart(&ctx.session).await.quantity_of(product.id),
            2
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_for_last_unit_sell_once() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Last Scoop", 1000, 1).await;

        let first_session = SessionId::new("first");
        let second_session = SessionId::new("second");

        let (first, second) = tokio::join!(
            ctx.checkout.checkout(
                &first_session,
                checkout_request(vec![inline_line(product.id, 1)])
            ),
            ctx.checkout.checkout(
                &second_session,
                checkout_request(vec![inline_line(product.id, 1)])
            ),
        );

        let outcomes = [first, second];
        let successes = outcomes.iter().filter(|result| result.is_ok()).count();
        let sold_out = outcomes
            .iter()
            .filter(|result| {
                matches!(
                    result,
                    Err(CheckoutServiceError::InsufficientStock { remaining: 0, .. })
                )
            })
            .count();

        assert_eq!(successes, 1);
        assert_eq!(sold_out, 1);
        assert_eq!(stock_of(&ctx, product.id).await, 0);
        assert_eq!(order_count(&ctx).await, 1);

        Ok(())
    }
}
