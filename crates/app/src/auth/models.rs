//! Auth data models.

use crate::domain::{
    orders::records::OrderScope,
    users::records::{Role, UserId},
};

/// Authenticated principal for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

impl Caller {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Orders this caller is allowed to list.
    #[must_use]
    pub const fn order_scope(&self) -> OrderScope {
        match self.role {
            Role::Admin => OrderScope::All,
            Role::Customer => OrderScope::Customer(self.user_id),
        }
    }
}
