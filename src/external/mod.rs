use std::sync::Arc;

use tracing::info;

use crate::config::{AppConfig, ProviderKind};
use crate::external::alphavantage::AlphaVantageProvider;
use crate::external::iex::IexProvider;
use crate::external::multi_provider::MultiProvider;
use crate::external::price_provider::PriceProvider;

pub mod alphavantage;
pub mod iex;
pub mod multi_provider;
pub mod price_provider;

pub fn provider_from_config(config: &AppConfig) -> Arc<dyn PriceProvider> {
    match config.provider {
        ProviderKind::Iex => {
            info!("Using price provider: IEX Cloud");
            Arc::new(IexProvider::new(config.api_key.clone()))
        }
        ProviderKind::AlphaVantage => {
            info!("Using price provider: Alpha Vantage");
            Arc::new(AlphaVantageProvider::new(config.alphavantage_api_key.clone()))
        }
        ProviderKind::Multi => {
            info!("Using price provider: IEX Cloud with Alpha Vantage fallback");
            Arc::new(MultiProvider::new(
                Box::new(IexProvider::new(config.api_key.clone())),
                Box::new(AlphaVantageProvider::new(config.alphavantage_api_key.clone())),
            ))
        }
    }
}
