//! App Context

use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::{
    auth::{AuthService, TokenAuthService, TokenError, TokenSecret, TokenSigner},
    database::{self, Db},
    domain::{
        carts::{CartStore, CartsService, InMemoryCartStore, PgCartsService},
        categories::{CategoriesService, PgCategoriesService},
        checkout::{CheckoutService, PgCheckoutService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        users::{PgUsersService, UsersService},
    },
    health::{HealthService, PgHealthService},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("invalid token secret")]
    TokenSecret(#[source] TokenError),
}

/// Settings needed to assemble the application services.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub transaction_timeout: Duration,
    pub token_secret: String,
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub categories: Arc<dyn CategoriesService>,
    pub carts: Arc<dyn CartsService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub orders: Arc<dyn OrdersService>,
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
    pub health: Arc<dyn HealthService>,
}

impl AppContext {
    /// Build application context from settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the token secret is unusable or establishing a
    /// database connection fails.
    pub async fn from_settings(settings: &AppSettings) -> Result<Self, AppInitError> {
        let secret = TokenSecret::new(settings.token_secret.as_bytes())
            .map_err(AppInitError::TokenSecret)?;

        let signer = TokenSigner::new(&secret).map_err(AppInitError::TokenSecret)?;

        let pool = database::connect(&settings.database_url, settings.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool).with_transaction_timeout(settings.transaction_timeout);

        Ok(Self::from_parts(db, Arc::new(InMemoryCartStore::new()), signer))
    }

    /// Wire services over an existing pool and cart store.
    #[must_use]
    pub fn from_parts(db: Db, carts: Arc<dyn CartStore>, signer: TokenSigner) -> Self {
        let users: Arc<dyn UsersService> = Arc::new(PgUsersService::new(db.clone()));

        Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone(), Arc::clone(&carts))),
            checkout: Arc::new(PgCheckoutService::new(db.clone(), carts)),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            auth: Arc::new(TokenAuthService::new(signer, Arc::clone(&users))),
            health: Arc::new(PgHealthService::new(db)),
            users,
        }
    }
}
