use chrono::{DateTime, Duration, TimeZone, Utc};
use churnwatch_core::{
    config::IntervalConfig,
    interval::{analyze_intervals, ewma, valid_gaps},
    Transaction,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

fn orders_on(days: &[i64]) -> Vec<Transaction> {
    days.iter()
        .enumerate()
        .map(|(i, d)| Transaction::new(format!("T-{i}"), day(*d), 1_000.0))
        .collect()
}

fn cfg() -> IntervalConfig {
    IntervalConfig::default()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Fewer than six transactions never yields statistics.
#[test]
fn fewer_than_six_transactions_is_insufficient() {
    let txns = orders_on(&[0, 30, 60, 90, 120]);
    assert!(analyze_intervals(&txns, &cfg()).is_none());
}

/// Seven transactions, but the two sub-week gaps are shipment noise,
/// leaving only four real gaps.
#[test]
fn too_few_valid_gaps_is_insufficient() {
    let txns = orders_on(&[0, 2, 4, 40, 80, 120, 160]);
    assert_eq!(valid_gaps(&txns, &cfg()).len(), 4);
    assert!(analyze_intervals(&txns, &cfg()).is_none());
}

/// Gaps 10,20,30,40,50 in chronological order.
#[test]
fn ewma_follows_chronological_recursion() {
    let txns = orders_on(&[0, 10, 30, 60, 100, 150]);
    let stats = analyze_intervals(&txns, &cfg()).expect("enough data");

    let expected: f64 =
        0.3 * 50.0 + 0.7 * (0.3 * 40.0 + 0.7 * (0.3 * 30.0 + 0.7 * (0.3 * 20.0 + 0.7 * 10.0)));
    assert_eq!(stats.ewma_interval_days, expected.round() as i64);
    assert_eq!(stats.ewma_interval_days, 32);

    assert_eq!(stats.avg_interval_days, 30);
    assert_eq!(stats.median_interval_days, 30);
    assert_eq!(stats.min_interval_days, 10);
    assert_eq!(stats.max_interval_days, 50);
    assert_eq!(stats.std_dev_days, 14, "population std dev of 10..50 is √200");
    assert_eq!(stats.gap_count, 5);
    assert!(stats.is_consistent, "cv={} should be < 0.5", stats.coefficient_of_variation);
}

/// The same gaps in reverse order give a different EWMA: recent gaps weigh more.
#[test]
fn ewma_is_order_sensitive() {
    let forward = ewma(&[10.0, 20.0, 30.0, 40.0, 50.0], 0.3).unwrap();
    let backward = ewma(&[50.0, 40.0, 30.0, 20.0, 10.0], 0.3).unwrap();
    assert!((forward - 32.269).abs() < 1e-9, "forward={forward}");
    assert!((backward - 27.731).abs() < 1e-9, "backward={backward}");
    assert!(ewma(&[], 0.3).is_none());
}

/// Ledger order does not matter; the analyzer sorts by date first.
#[test]
fn unsorted_input_matches_sorted_input() {
    let sorted = orders_on(&[0, 10, 30, 60, 100, 150]);
    let mut shuffled = sorted.clone();
    shuffled.swap(0, 4);
    shuffled.swap(1, 5);

    assert_eq!(analyze_intervals(&sorted, &cfg()), analyze_intervals(&shuffled, &cfg()));
}

/// A split shipment two days after an order is dropped, not averaged in.
#[test]
fn split_shipment_gaps_are_discarded() {
    let txns = orders_on(&[0, 30, 60, 62, 90, 120, 150]);
    let stats = analyze_intervals(&txns, &cfg()).expect("five valid gaps remain");

    assert_eq!(stats.gap_count, 5);
    assert_eq!(stats.min_interval_days, 28);
    assert_eq!(stats.avg_interval_days, 30);
}

/// Median is nearest-rank (index n/2 of the sorted gaps), not interpolated.
#[test]
fn median_is_nearest_rank() {
    // Gaps 10, 20, 30, 40, 50, 60
    let txns = orders_on(&[0, 10, 30, 60, 100, 150, 210]);
    let stats = analyze_intervals(&txns, &cfg()).unwrap();
    assert_eq!(stats.median_interval_days, 40);
    assert_eq!(stats.avg_interval_days, 35);
}

/// Alternating 10/100-day gaps have a coefficient of variation near 1.
#[test]
fn erratic_rhythm_is_not_consistent() {
    let txns = orders_on(&[0, 10, 110, 120, 220, 230]);
    let stats = analyze_intervals(&txns, &cfg()).unwrap();
    assert!(!stats.is_consistent);
    assert!(stats.coefficient_of_variation > 0.9);
}

/// Perfectly regular ordering has zero dispersion.
#[test]
fn regular_rhythm_is_consistent() {
    let days: Vec<i64> = (0..10).map(|i| i * 30).collect();
    let stats = analyze_intervals(&orders_on(&days), &cfg()).unwrap();
    assert_eq!(stats.std_dev_days, 0);
    assert_eq!(stats.ewma_interval_days, 30);
    assert!(stats.is_consistent);
}
