use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::db;
use crate::external::price_provider::{normalize_symbol, PriceProvider, PriceProviderError};
use crate::models::Quote;
use crate::services::account_locks::AccountLocks;
use crate::session::SessionKeys;
use crate::state::AppState;

/// Oracle stub with settable prices and symbols that fail on lookup.
#[derive(Default)]
pub struct FixedPrices {
    prices: RwLock<HashMap<String, i64>>,
    failing: RwLock<HashSet<String>>,
}

impl FixedPrices {
    pub fn new(prices: &[(&str, i64)]) -> Self {
        let fixed = Self::default();
        for (symbol, price) in prices {
            fixed.set_price(symbol, *price);
        }
        fixed
    }

    pub fn set_price(&self, symbol: &str, price: i64) {
        self.prices.write().unwrap().insert(symbol.to_uppercase(), price);
    }

    pub fn fail(&self, symbol: &str) {
        self.failing.write().unwrap().insert(symbol.to_uppercase());
    }
}

#[async_trait]
impl PriceProvider for FixedPrices {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, PriceProviderError> {
        let Some(symbol) = normalize_symbol(symbol) else {
            return Ok(None);
        };
        if self.failing.read().unwrap().contains(&symbol) {
            return Err(PriceProviderError::Network("stub outage".into()));
        }
        Ok(self.prices.read().unwrap().get(&symbol).map(|price| Quote {
            name: format!("{} Inc.", symbol),
            symbol: symbol.clone(),
            price: *price,
        }))
    }
}

/// Fresh in-memory store. A single connection keeps every query on the same database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::MIGRATOR.run(&pool).await.unwrap();
    pool
}

pub async fn seed_account(pool: &SqlitePool, username: &str, cash: i64) -> i64 {
    db::account_queries::create(pool, username, "not-a-real-hash", cash)
        .await
        .unwrap()
        .id
}

pub async fn test_state(prices: Arc<FixedPrices>) -> AppState {
    AppState {
        pool: memory_pool().await,
        price_provider: prices,
        account_locks: AccountLocks::new(),
        sessions: SessionKeys::new(b"test-secret", 1),
        starting_cash: 1_000_000,
    }
}
