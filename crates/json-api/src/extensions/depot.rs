//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use scoops_app::{auth::Caller, domain::carts::SessionId};

const CALLER_DEPOT_KEY: &str = "caller";
const SESSION_DEPOT_KEY: &str = "session";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_caller(&mut self, caller: Caller);

    /// The authenticated caller, if the auth middleware accepted a token.
    fn caller(&self) -> Option<Caller>;

    fn caller_or_401(&self) -> Result<Caller, StatusError>;

    fn insert_session(&mut self, session: SessionId);

    fn session_or_500(&self) -> Result<&SessionId, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_caller(&mut self, caller: Caller) {
        self.insert(CALLER_DEPOT_KEY, caller);
    }

    fn caller(&self) -> Option<Caller> {
        self.get::<Caller>(CALLER_DEPOT_KEY).ok().copied()
    }

    fn caller_or_401(&self) -> Result<Caller, StatusError> {
        self.caller()
            .ok_or_else(|| StatusError::unauthorized().brief("Authentication required"))
    }

    fn insert_session(&mut self, session: SessionId) {
        self.insert(SESSION_DEPOT_KEY, session);
    }

    fn session_or_500(&self) -> Result<&SessionId, StatusError> {
        self.get::<SessionId>(SESSION_DEPOT_KEY)
            .map_err(|_ignored| StatusError::internal_server_error())
    }
}

#[cfg(test)]
mod tests {
    use scoops_app::domain::users::records::{Role, UserId};

    use super::*;

    #[test]
    fn caller_is_absent_until_inserted() {
        let mut depot = Depot::new();

        assert_eq!(depot.caller(), None);
        assert!(depot.caller_or_401().is_err(), "expected 401 without caller");

        let caller = Caller {
            user_id: UserId::from_i64(3),
            role: Role::Customer,
        };

        depot.insert_caller(caller);

        assert_eq!(depot.caller(), Some(caller));
    }

    #[test]
    fn session_round_trips() {
        let mut depot = Depot::new();

        assert!(depot.session_or_500().is_err(), "expected 500 without session");

        depot.insert_session(SessionId::new("abc"));

        assert_eq!(depot.session_or_500().map(SessionId::as_str).ok(), Some("abc"));
    }
}
