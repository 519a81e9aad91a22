//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use scoops_app::{
    auth::{Caller, MockAuthService},
    context::AppContext,
    domain::{
        carts::{MockCartsService, SessionId},
        categories::MockCategoriesService,
        checkout::MockCheckoutService,
        orders::MockOrdersService,
        products::{
            MockProductsService,
            records::{ProductId, ProductRecord},
        },
        users::{
            MockUsersService,
            records::{Role, UserId},
        },
    },
    health::MockHealthService,
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_SESSION: &str = "test-session";

pub(crate) const TEST_ADMIN: Caller = Caller {
    user_id: UserId::from_i64(1),
    role: Role::Admin,
};

pub(crate) const TEST_CUSTOMER: Caller = Caller {
    user_id: UserId::from_i64(2),
    role: Role::Customer,
};

/// Context whose services fail the test on any unexpected call.
pub(crate) fn app_context() -> AppContext {
    AppContext {
        products: Arc::new(MockProductsService::new()),
        categories: Arc::new(MockCategoriesService::new()),
        carts: Arc::new(MockCartsService::new()),
        checkout: Arc::new(MockCheckoutService::new()),
        orders: Arc::new(MockOrdersService::new()),
        users: Arc::new(MockUsersService::new()),
        auth: Arc::new(MockAuthService::new()),
        health: Arc::new(MockHealthService::new()),
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    let mut app = app_context();

    app.auth = Arc::new(auth);

    State::from_app_context(app)
}

#[salvo::handler]
pub(crate) async fn inject_session(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_session(SessionId::new(TEST_SESSION));
    ctrl.call_next(req, depot, res).await;
}

/// Serve `route` with the given services, a fixed session and no caller.
pub(crate) fn service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .hoop(inject_session)
            .push(route),
    )
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_caller(TEST_ADMIN);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_caller(TEST_CUSTOMER);
    ctrl.call_next(req, depot, res).await;
}

/// Serve `route` behind an extra hoop, typically one injecting a caller.
pub(crate) fn service_with(app: AppContext, hoop: impl Handler, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .hoop(inject_session)
            .hoop(hoop)
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    let mut app = app_context();

    app.products = Arc::new(products);

    service(app, route)
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    let mut app = app_context();

    app.carts = Arc::new(carts);

    service(app, route)
}

pub(crate) fn make_product(id: i64) -> ProductRecord {
    ProductRecord {
        id: ProductId::from_i64(id),
        category_id: None,
        category_name: None,
        name: format!("Scoop {id}"),
        description: None,
        price: 1_000,
        stock: 3,
        image_url: None,
        active: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
