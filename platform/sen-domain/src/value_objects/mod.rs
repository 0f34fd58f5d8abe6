pub mod account;
pub mod profit_data;
pub mod strategy;
pub mod timeframe;
pub mod trade;
