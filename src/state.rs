use std::sync::Arc;
use sqlx::SqlitePool;
use crate::config::AppConfig;
use crate::external::price_provider::PriceProvider;
use crate::services::account_locks::AccountLocks;
use crate::session::SessionKeys;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub price_provider: Arc<dyn PriceProvider>,
    pub account_locks: AccountLocks,
    pub sessions: SessionKeys,
    pub starting_cash: i64,
}

impl AppState {
    pub fn new(pool: SqlitePool, price_provider: Arc<dyn PriceProvider>, config: &AppConfig) -> Self {
        Self {
            pool,
            price_provider,
            account_locks: AccountLocks::new(),
            sessions: SessionKeys::new(config.session_secret.as_bytes(), config.session_ttl_hours),
            starting_cash: config.starting_cash_cents,
        }
    }
}
