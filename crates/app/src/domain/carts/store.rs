//! Session cart storage.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::domain::carts::{models::Cart, session::SessionId};

/// Keyed storage for carts. Writes for one session are last-write-wins.
#[automock]
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn get(&self, session: &SessionId) -> Option<Cart>;

    async fn put(&self, session: &SessionId, cart: Cart);

    async fn delete(&self, session: &SessionId);
}

/// Process-local cart storage; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    carts: RwLock<FxHashMap<SessionId, Cart>>,
}

impl InMemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn get(&self, session: &SessionId) -> Option<Cart> {
        self.carts.read().await.get(session).cloned()
    }

    async fn put(&self, session: &SessionId, cart: Cart) {
        self.carts.write().await.insert(session.clone(), cart);
    }

    async fn delete(&self, session: &SessionId) {
        self.carts.write().await.remove(session);
    }
}
