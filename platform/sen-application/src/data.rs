use parking_lot::Mutex;
use sen_domain::repositories::trading_data::TradingDataProvider;
use std::sync::Arc;

/// Provider handle injected into the navigation controller and every view.
pub type SharedTradingData = Arc<Mutex<dyn TradingDataProvider + Send>>;

pub fn share<P>(provider: P) -> SharedTradingData
where
    P: TradingDataProvider + Send + 'static,
{
    Arc::new(Mutex::new(provider))
}
