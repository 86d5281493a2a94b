//! Narrative generator.
//!
//! Phrasing is gated on how much history backs it: a pattern is only
//! asserted when there are enough orders and the rhythm is consistent;
//! sparse histories get the raw facts and nothing more.
//!
//! Both sentences come from ordered rule tables evaluated first-match.

use crate::{
    anomaly::{IntervalAnomaly, SizeAnomaly},
    config::NarrativeConfig,
    interval::IntervalStatistics,
    types::Days,
};

pub struct NarrativeInput<'a> {
    pub display_name:          &'a str,
    pub order_count:           usize,
    pub days_since_last_order: Days,
    pub interval_stats:        Option<&'a IntervalStatistics>,
    pub interval_anomaly:      Option<&'a IntervalAnomaly>,
    pub size_anomaly:          Option<&'a SizeAnomaly>,
}

struct NarrativeRule {
    applies: fn(&NarrativeInput, &NarrativeConfig) -> bool,
    render:  fn(&NarrativeInput) -> String,
}

const OPENING_RULES: &[NarrativeRule] = &[
    NarrativeRule { applies: is_established,  render: established_pattern },
    NarrativeRule { applies: is_typical,      render: typical_spacing },
    NarrativeRule { applies: has_no_orders,   render: no_orders },
    NarrativeRule { applies: always,          render: raw_facts },
];

const FOLLOW_UP_RULES: &[NarrativeRule] = &[
    NarrativeRule { applies: overdue_and_shrinking, render: overdue_with_decline },
    NarrativeRule { applies: overdue,               render: overdue_only },
    NarrativeRule { applies: shrinking,             render: decline_only },
    NarrativeRule { applies: long_lapse,            render: months_since_last },
];

pub fn generate_narrative(input: &NarrativeInput, cfg: &NarrativeConfig) -> String {
    let first_match = |rules: &[NarrativeRule]| {
        rules
            .iter()
            .find(|rule| (rule.applies)(input, cfg))
            .map(|rule| (rule.render)(input))
    };

    [first_match(OPENING_RULES), first_match(FOLLOW_UP_RULES)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Predicates ───────────────────────────────────────────────────────────────

fn is_established(n: &NarrativeInput, cfg: &NarrativeConfig) -> bool {
    n.order_count >= cfg.established_min_orders
        && n.interval_stats.is_some_and(|s| s.is_consistent)
}

fn is_typical(n: &NarrativeInput, cfg: &NarrativeConfig) -> bool {
    (cfg.typical_min_orders..cfg.established_min_orders).contains(&n.order_count)
        && n.interval_stats.is_some()
}

fn has_no_orders(n: &NarrativeInput, _: &NarrativeConfig) -> bool {
    n.order_count == 0
}

fn always(_: &NarrativeInput, _: &NarrativeConfig) -> bool {
    true
}

fn overdue_and_shrinking(n: &NarrativeInput, cfg: &NarrativeConfig) -> bool {
    overdue(n, cfg) && shrinking(n, cfg)
}

fn overdue(n: &NarrativeInput, cfg: &NarrativeConfig) -> bool {
    n.interval_anomaly.is_some() && n.order_count >= cfg.typical_min_orders
}

fn shrinking(n: &NarrativeInput, cfg: &NarrativeConfig) -> bool {
    n.size_anomaly.is_some() && n.order_count >= cfg.size_min_orders
}

fn long_lapse(n: &NarrativeInput, cfg: &NarrativeConfig) -> bool {
    n.days_since_last_order > cfg.lapse_days
}

// ── Templates ────────────────────────────────────────────────────────────────

fn expected_interval(n: &NarrativeInput) -> Days {
    n.interval_stats.map(|s| s.ewma_interval_days).unwrap_or_default()
}

fn established_pattern(n: &NarrativeInput) -> String {
    format!(
        "{} has an established ordering pattern of roughly every {} days across {} orders.",
        n.display_name, expected_interval(n), n.order_count,
    )
}

fn typical_spacing(n: &NarrativeInput) -> String {
    format!(
        "{}'s orders are typically about {} days apart, based on {} orders.",
        n.display_name, expected_interval(n), n.order_count,
    )
}

fn no_orders(n: &NarrativeInput) -> String {
    format!("{} has no recorded orders.", n.display_name)
}

fn raw_facts(n: &NarrativeInput) -> String {
    let plural = if n.order_count == 1 { "order" } else { "orders" };
    format!(
        "{} has placed {} {plural}; the most recent was {} days ago.",
        n.display_name, n.order_count, n.days_since_last_order,
    )
}

fn overdue_sentence(a: &IntervalAnomaly) -> String {
    format!(
        "It has now been {} days since the last order, {} days past the expected {}-day interval ({:.1}x)",
        a.days_since_last_order, a.days_overdue, a.expected_interval_days, a.overdue_ratio,
    )
}

fn overdue_with_decline(n: &NarrativeInput) -> String {
    match (n.interval_anomaly, n.size_anomaly) {
        (Some(i), Some(s)) => format!(
            "{}, and recent orders are {:.0}% smaller than the historical average.",
            overdue_sentence(i), s.decline_pct,
        ),
        _ => overdue_only(n),
    }
}

fn overdue_only(n: &NarrativeInput) -> String {
    n.interval_anomaly
        .map(|a| format!("{}.", overdue_sentence(a)))
        .unwrap_or_default()
}

fn decline_only(n: &NarrativeInput) -> String {
    n.size_anomaly
        .map(|s| {
            format!(
                "Recent orders average ${:.0}, down {:.0}% from a historical average of ${:.0}.",
                s.recent_avg, s.decline_pct, s.historical_avg,
            )
        })
        .unwrap_or_default()
}

fn months_since_last(n: &NarrativeInput) -> String {
    let months = (n.days_since_last_order as f64 / 30.0).round() as i64;
    format!("The last order was about {months} months ago.")
}
