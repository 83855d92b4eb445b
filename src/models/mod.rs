mod account;
mod holding;
mod quote;
mod transaction;

pub use account::{Account, LoginForm, RegisterForm};
pub use holding::{Holding, PortfolioView, PositionRow};
pub use quote::{Quote, QuoteForm, QuoteView};
pub use transaction::{HistoryEntry, LedgerEntry, Side, TradeForm, TradeReceipt};
