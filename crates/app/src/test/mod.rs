//! Test support: a shared PostgreSQL container and per-test contexts.

pub(crate) mod helpers;

pub(crate) use context::TestContext;
pub(crate) use db::TestDb;
