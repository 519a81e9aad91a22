//! Storefront domain, persistence and checkout engine.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod health;
pub mod ids;

#[cfg(test)]
mod test;
