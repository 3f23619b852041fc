// server/src/db/mod.rs

//! Postgres persistence for the orders resource.

pub mod pg_store;

pub use pg_store::PgStore;
