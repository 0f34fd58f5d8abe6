use crate::value_objects::profit_data::ProfitData;
use chrono::{DateTime, Datelike, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProfitSummary {
    pub total: f64,
    pub today: f64,
    pub best_period: f64,
    pub worst_period: f64,
}

/// Totals as shown on the dashboard header: the last cumulative value and the
/// last period delta. An empty history summarizes to zeros.
pub fn summarize(history: &[ProfitData]) -> ProfitSummary {
    let Some(last) = history.last() else {
        return ProfitSummary::default();
    };
    let best_period = history
        .iter()
        .map(|p| p.profit)
        .fold(f64::NEG_INFINITY, f64::max);
    let worst_period = history
        .iter()
        .map(|p| p.profit)
        .fold(f64::INFINITY, f64::min);
    ProfitSummary {
        total: last.cumulative_profit,
        today: last.profit,
        best_period,
        worst_period,
    }
}

/// Builds a history from period deltas, filling the running sum.
pub fn accumulate(points: impl IntoIterator<Item = (DateTime<Utc>, f64)>) -> Vec<ProfitData> {
    let mut cumulative = 0.0;
    points
        .into_iter()
        .map(|(timestamp, profit)| {
            cumulative += profit;
            ProfitData {
                timestamp,
                profit,
                cumulative_profit: cumulative,
            }
        })
        .collect()
}

pub fn weekday_label(timestamp: &DateTime<Utc>) -> &'static str {
    match timestamp.weekday() {
        chrono::Weekday::Mon => "Mon",
        chrono::Weekday::Tue => "Tue",
        chrono::Weekday::Wed => "Wed",
        chrono::Weekday::Thu => "Thu",
        chrono::Weekday::Fri => "Fri",
        chrono::Weekday::Sat => "Sat",
        chrono::Weekday::Sun => "Sun",
    }
}
