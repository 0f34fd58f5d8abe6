use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sen_domain::repositories::trading_data::TradingDataProvider;
use sen_domain::services::profit::accumulate;
use sen_domain::value_objects::account::Account;
use sen_domain::value_objects::profit_data::ProfitData;
use sen_domain::value_objects::strategy::{Strategy, StrategyStatus};
use sen_domain::value_objects::timeframe::Timeframe;
use sen_domain::value_objects::trade::{Trade, TradeDirection};
use std::collections::HashSet;

pub const SAMPLE_BALANCE: f64 = 1215.0;
pub const SAMPLE_EQUITY: f64 = 345.0;
pub const PROFIT_HISTORY_DAYS: usize = 7;
const PROFIT_RANGE: std::ops::Range<f64> = -20.0..30.0;

/// How the in-memory store is populated when it is built.
#[derive(Debug, Clone)]
pub struct SampleDataOptions {
    /// Fixed seed for the profit history; `None` draws from entropy.
    pub seed: Option<u64>,
    pub now: DateTime<Utc>,
    pub history_days: usize,
    pub account: Account,
}

impl Default for SampleDataOptions {
    fn default() -> Self {
        Self {
            seed: None,
            now: Utc::now(),
            history_days: PROFIT_HISTORY_DAYS,
            account: Account::new(SAMPLE_BALANCE, SAMPLE_EQUITY),
        }
    }
}

/// Mock provider holding every entity in memory.
///
/// The profit history is generated once at construction and never appended to.
#[derive(Debug, Clone)]
pub struct InMemoryTradingData {
    account: Account,
    strategies: Vec<Strategy>,
    profit_history: Vec<ProfitData>,
    open_trades: Vec<Trade>,
}

impl InMemoryTradingData {
    pub fn new(
        account: Account,
        strategies: Vec<Strategy>,
        profit_history: Vec<ProfitData>,
        open_trades: Vec<Trade>,
    ) -> Result<Self, String> {
        let mut seen = HashSet::new();
        for strategy in &strategies {
            if !seen.insert(strategy.id.as_str()) {
                return Err(format!("duplicate strategy id: {}", strategy.id));
            }
        }
        Ok(Self {
            account,
            strategies,
            profit_history,
            open_trades,
        })
    }

    /// Sample dataset shown by the dashboard: two channel strategies, two open
    /// positions and a random daily profit history.
    pub fn sample(options: SampleDataOptions) -> Self {
        let profit_history =
            generate_profit_history(options.seed, options.now, options.history_days);
        tracing::debug!(
            seed = ?options.seed,
            points = profit_history.len(),
            "generated sample profit history"
        );
        Self {
            account: options.account,
            strategies: sample_strategies(),
            profit_history,
            open_trades: sample_trades(options.now),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::sample(SampleDataOptions {
            seed: Some(seed),
            ..SampleDataOptions::default()
        })
    }
}

impl TradingDataProvider for InMemoryTradingData {
    fn account(&self) -> Account {
        self.account.clone()
    }

    fn strategies(&self) -> Vec<Strategy> {
        self.strategies.clone()
    }

    fn profit_history(&self) -> Vec<ProfitData> {
        self.profit_history.clone()
    }

    fn open_trades(&self) -> Vec<Trade> {
        self.open_trades.clone()
    }

    fn set_strategy_status(&mut self, id: &str, status: StrategyStatus) -> bool {
        match self.strategies.iter_mut().find(|s| s.id == id) {
            Some(strategy) => {
                strategy.status = status;
                true
            }
            None => false,
        }
    }
}

pub fn sample_strategies() -> Vec<Strategy> {
    vec![
        Strategy {
            id: "1".to_string(),
            name: "L_CHANNEL_XAUUSD_M5".to_string(),
            symbol: "XAUUSD".to_string(),
            timeframe: Timeframe::M5,
            status: StrategyStatus::Active,
            profit: 12.5,
            trades_count: 8,
        },
        Strategy {
            id: "2".to_string(),
            name: "L_CHANNEL_BTCUSD_M15".to_string(),
            symbol: "BTCUSD".to_string(),
            timeframe: Timeframe::M15,
            status: StrategyStatus::Active,
            profit: -5.2,
            trades_count: 3,
        },
    ]
}

fn sample_trades(now: DateTime<Utc>) -> Vec<Trade> {
    vec![
        Trade {
            id: "T-1001".to_string(),
            symbol: "XAUUSD".to_string(),
            direction: TradeDirection::Buy,
            volume: 0.10,
            open_price: 2031.40,
            current_price: 2033.15,
            profit: 17.5,
            open_time: now - Duration::minutes(42),
        },
        Trade {
            id: "T-1002".to_string(),
            symbol: "BTCUSD".to_string(),
            direction: TradeDirection::Sell,
            volume: 0.01,
            open_price: 43120.0,
            current_price: 43210.0,
            profit: -0.9,
            open_time: now - Duration::minutes(15),
        },
    ]
}

/// One point per day, starting `days` days before `now`.
pub fn generate_profit_history(
    seed: Option<u64>,
    now: DateTime<Utc>,
    days: usize,
) -> Vec<ProfitData> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let base = now - Duration::days(days as i64);
    accumulate((0..days).map(|i| {
        let profit = rng.gen_range(PROFIT_RANGE);
        (base + Duration::days(i as i64), profit)
    }))
}

#[cfg(test)]
mod tests {
    use super::{generate_profit_history, InMemoryTradingData, PROFIT_HISTORY_DAYS};
    use chrono::{TimeZone, Utc};
    use sen_domain::repositories::trading_data::TradingDataProvider;
    use sen_domain::value_objects::account::Account;

    #[test]
    fn seeded_history_is_reproducible() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let a = generate_profit_history(Some(7), now, PROFIT_HISTORY_DAYS);
        let b = generate_profit_history(Some(7), now, PROFIT_HISTORY_DAYS);
        assert_eq!(a, b);
        assert_eq!(a.len(), PROFIT_HISTORY_DAYS);
        assert!(a.iter().all(|p| (-20.0..30.0).contains(&p.profit)));
    }

    #[test]
    fn history_ends_one_day_before_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let history = generate_profit_history(Some(1), now, 3);
        assert_eq!(history[0].timestamp, now - chrono::Duration::days(3));
        assert_eq!(history[2].timestamp, now - chrono::Duration::days(1));
    }

    #[test]
    fn new_rejects_duplicate_strategy_ids() {
        let mut strategies = super::sample_strategies();
        strategies[1].id = strategies[0].id.clone();
        let err = InMemoryTradingData::new(Account::new(1.0, 1.0), strategies, vec![], vec![])
            .expect_err("duplicate ids");
        assert!(err.contains("duplicate strategy id"));
    }

    #[test]
    fn sample_account_matches_dashboard_defaults() {
        let data = InMemoryTradingData::seeded(3);
        let account = data.account();
        assert_eq!(account.balance, 1215.0);
        assert_eq!(account.equity, 345.0);
        assert_eq!(account.drawdown, 0.0);
        assert_eq!(data.open_trades().len(), 2);
    }
}
