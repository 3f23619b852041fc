// server/src/state.rs
use crate::config::AppConfig;
use crate::services::auth_service::TokenVerifier;
use crate::services::notifier::NotificationDispatcher;
use catalog_orders::OrdersResource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub resource: OrdersResource,
  pub verifier: Arc<dyn TokenVerifier>,
  pub notifier: NotificationDispatcher,
  pub config: Arc<AppConfig>, // Share loaded config
}
