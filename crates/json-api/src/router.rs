//! App Router

use salvo::Router;

use crate::{
    auth::middleware::{optional, require_admin, required},
    carts, categories, checkout, healthcheck, orders, products, session,
};

/// Routes served under `/api`.
pub(crate) fn app_router() -> Router {
    Router::with_path("api")
        .push(Router::with_path("health").get(healthcheck::handler))
        .push(Router::with_path("categories").get(categories::index::handler))
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::with_path("products")
                .hoop(required)
                .hoop(require_admin)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("cart")
                .hoop(session::handler)
                .get(carts::get::handler)
                .delete(carts::delete::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(
                            Router::with_path("{product}")
                                .patch(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("checkout")
                .hoop(session::handler)
                .hoop(optional)
                .post(checkout::handler::handler),
        )
        .push(
            Router::with_path("orders")
                .push(Router::new().hoop(required).get(orders::index::handler))
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
}
