use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use sen_domain::services::profit::{accumulate, summarize};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn cumulative_profit_is_running_sum(deltas in prop::collection::vec(-20.0f64..30.0, 1..60)) {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let history = accumulate(
            deltas
                .iter()
                .copied()
                .enumerate()
                .map(|(i, d)| (t0 + chrono::Duration::days(i as i64), d)),
        );

        prop_assert_eq!(history.len(), deltas.len());
        let mut running = 0.0;
        for (point, delta) in history.iter().zip(deltas.iter()) {
            running += delta;
            prop_assert!((point.cumulative_profit - running).abs() < 1e-9);
        }
        prop_assert!(history.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

        let summary = summarize(&history);
        prop_assert!((summary.total - running).abs() < 1e-9);
        prop_assert!(summary.worst_period <= summary.today && summary.today <= summary.best_period);
    }
}
