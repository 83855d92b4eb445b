pub mod account_locks;
pub mod auth_service;
pub mod portfolio_service;
pub mod quote_service;
pub mod trade_service;
