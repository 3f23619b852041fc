// server/src/web/handlers/mod.rs

pub mod item_handlers;
pub mod order_handlers;
