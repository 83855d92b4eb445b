use serde::Serialize;
use sqlx::FromRow;

// Net position per symbol as aggregated from the ledger.
#[derive(Debug, Clone, FromRow)]
pub struct PositionRow {
    pub stock_symbol: String,
    pub shares: i64,
    pub bought_shares: i64,
    pub bought_cost: i64,
}

impl PositionRow {
    /// Average price paid across all buys of the symbol, in cents.
    pub fn average_price(&self) -> i64 {
        if self.bought_shares == 0 {
            0
        } else {
            self.bought_cost / self.bought_shares
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Holding {
    pub symbol: String,
    pub name: Option<String>,
    pub shares: i64,
    pub purchase_price: i64,
    pub current_price: Option<i64>,
    pub value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioView {
    pub cash: i64,
    pub holdings: Vec<Holding>,
    pub total_value: i64,
    pub grand_total: i64,
}
