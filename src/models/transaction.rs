use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Ledger rows store sells as negative share counts.
    pub fn signed(self, shares: i64) -> i64 {
        match self {
            Side::Buy => shares,
            Side::Sell => -shares,
        }
    }
}

// One row of the append-only trade ledger (`purchases`).
#[derive(Debug, Clone, FromRow)]
pub struct LedgerEntry {
    pub id: i64,
    pub user_id: i64,
    pub stock_symbol: String,
    pub purchase_price: i64,
    pub shares: i64,
    pub transacted_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub symbol: String,
    pub side: Side,
    pub shares: i64,
    pub price: i64,
    pub transacted_at: chrono::DateTime<chrono::Utc>,
}

impl From<LedgerEntry> for HistoryEntry {
    fn from(entry: LedgerEntry) -> Self {
        let side = if entry.shares < 0 { Side::Sell } else { Side::Buy };
        Self {
            symbol: entry.stock_symbol,
            side,
            shares: entry.shares.abs(),
            price: entry.purchase_price,
            transacted_at: entry.transacted_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TradeForm {
    pub symbol: Option<String>,
    pub shares: Option<String>,
}

/// What a completed buy or sell changed.
#[derive(Debug, Clone, Serialize)]
pub struct TradeReceipt {
    pub symbol: String,
    pub side: Side,
    pub shares: i64,
    pub price: i64,
    pub total: i64,
    pub cash_after: i64,
}
