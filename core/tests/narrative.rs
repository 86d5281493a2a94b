use churnwatch_core::{
    anomaly::{IntervalAnomaly, Severity, SizeAnomaly},
    config::NarrativeConfig,
    interval::IntervalStatistics,
    narrative::{generate_narrative, NarrativeInput},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn stats(consistent: bool) -> IntervalStatistics {
    IntervalStatistics {
        avg_interval_days:        30,
        median_interval_days:     30,
        min_interval_days:        28,
        max_interval_days:        32,
        std_dev_days:             1,
        ewma_interval_days:       30,
        coefficient_of_variation: if consistent { 0.05 } else { 0.8 },
        is_consistent:            consistent,
        gap_count:                9,
    }
}

fn overdue() -> IntervalAnomaly {
    IntervalAnomaly {
        days_since_last_order:  70,
        expected_interval_days: 30,
        days_overdue:           40,
        overdue_ratio:          70.0 / 30.0,
        severity:               Severity::Warning,
        explanation:            String::new(),
    }
}

fn shrinking() -> SizeAnomaly {
    SizeAnomaly {
        recent_avg:     4_000.0,
        historical_avg: 10_000.0,
        decline_pct:    60.0,
        severity:       Severity::Critical,
        explanation:    String::new(),
    }
}

fn input<'a>(
    order_count: usize,
    days: i64,
    stats: Option<&'a IntervalStatistics>,
    interval: Option<&'a IntervalAnomaly>,
    size: Option<&'a SizeAnomaly>,
) -> NarrativeInput<'a> {
    NarrativeInput {
        display_name:          "Cedar Kitchen Supply",
        order_count,
        days_since_last_order: days,
        interval_stats:        stats,
        interval_anomaly:      interval,
        size_anomaly:          size,
    }
}

fn narrate(n: &NarrativeInput) -> String {
    generate_narrative(n, &NarrativeConfig::default())
}

// ── Opening sentence ─────────────────────────────────────────────────────────

#[test]
fn established_pattern_needs_ten_consistent_orders() {
    let s = stats(true);
    assert_eq!(
        narrate(&input(12, 10, Some(&s), None, None)),
        "Cedar Kitchen Supply has an established ordering pattern of roughly every 30 days across 12 orders."
    );
}

/// Plenty of orders but an erratic rhythm: state facts, claim nothing.
#[test]
fn erratic_history_gets_raw_facts_only() {
    let s = stats(false);
    let text = narrate(&input(12, 10, Some(&s), None, None));
    assert_eq!(text, "Cedar Kitchen Supply has placed 12 orders; the most recent was 10 days ago.");
    assert!(!text.contains("pattern"));
}

#[test]
fn six_to_nine_orders_get_softer_phrasing() {
    let s = stats(true);
    let text = narrate(&input(7, 10, Some(&s), None, None));
    assert!(text.contains("typically about 30 days apart"), "{text}");
    assert!(!text.contains("established"), "{text}");
}

#[test]
fn sparse_history_states_facts_and_lapse() {
    assert_eq!(
        narrate(&input(3, 200, None, None, None)),
        "Cedar Kitchen Supply has placed 3 orders; the most recent was 200 days ago. \
         The last order was about 7 months ago."
    );
    assert_eq!(
        narrate(&input(1, 5, None, None, None)),
        "Cedar Kitchen Supply has placed 1 order; the most recent was 5 days ago."
    );
}

#[test]
fn no_orders_at_all() {
    assert_eq!(narrate(&input(0, 0, None, None, None)), "Cedar Kitchen Supply has no recorded orders.");
}

// ── Follow-up sentence ───────────────────────────────────────────────────────

#[test]
fn overdue_and_shrinking_are_described_together() {
    let s = stats(true);
    let (i, z) = (overdue(), shrinking());
    let text = narrate(&input(9, 70, Some(&s), Some(&i), Some(&z)));
    assert!(text.contains("40 days past the expected 30-day interval (2.3x)"), "{text}");
    assert!(text.contains("60% smaller than the historical average"), "{text}");
}

/// Size claims need at least eight orders even when an anomaly is present.
#[test]
fn size_decline_withheld_below_eight_orders() {
    let s = stats(true);
    let (i, z) = (overdue(), shrinking());
    let text = narrate(&input(7, 70, Some(&s), Some(&i), Some(&z)));
    assert!(text.contains("past the expected"), "{text}");
    assert!(!text.contains("smaller"), "{text}");
}

#[test]
fn size_decline_alone() {
    let s = stats(true);
    let z = shrinking();
    let text = narrate(&input(8, 10, Some(&s), None, Some(&z)));
    assert!(text.ends_with("Recent orders average $4000, down 60% from a historical average of $10000."), "{text}");
}

/// Interval anomaly beats the raw lapse sentence.
#[test]
fn interval_anomaly_takes_priority_over_lapse() {
    let s = stats(true);
    let mut i = overdue();
    i.days_since_last_order = 150;
    let text = narrate(&input(12, 150, Some(&s), Some(&i), None));
    assert!(text.contains("150 days since the last order"), "{text}");
    assert!(!text.contains("months ago"), "{text}");
}
