use crate::value_objects::account::Account;
use crate::value_objects::profit_data::ProfitData;
use crate::value_objects::strategy::{Strategy, StrategyStatus};
use crate::value_objects::trade::Trade;

/// Source of account, strategy and profit snapshots for the dashboard.
///
/// Reads never fail: an adapter backed by fallible I/O must fall back to its
/// last good snapshot instead of surfacing errors to the refresh cycle.
pub trait TradingDataProvider {
    fn account(&self) -> Account;

    /// Strategies in insertion order.
    fn strategies(&self) -> Vec<Strategy>;

    /// Chronological, fully materialized history.
    fn profit_history(&self) -> Vec<ProfitData>;

    fn open_trades(&self) -> Vec<Trade>;

    /// Updates the status of the strategy with `id` in place.
    ///
    /// Unknown ids leave the strategy set untouched and return `false`.
    fn set_strategy_status(&mut self, id: &str, status: StrategyStatus) -> bool;
}
