//! Deterministic synthetic order histories.
//!
//! RULE: same (seed, index, archetype, now) → same history, byte for byte.
//! Each customer gets its own PCG stream derived from
//! (master_seed XOR index·φ), so adding customers never changes the
//! histories already generated for lower indices.

use chrono::{DateTime, Duration, Utc};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::types::{OrderHistory, Transaction};

/// A seeded RNG for one synthetic customer.
pub struct SynthRng {
    inner: Pcg64Mcg,
}

impl SynthRng {
    pub fn new(master_seed: u64, index: u64) -> Self {
        let derived_seed = master_seed ^ (index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self { inner: Pcg64Mcg::seed_from_u64(derived_seed) }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Uniform in [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Multiplicative noise in [1 − spread, 1 + spread).
    pub fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + (self.next_f64() - 0.5) * 2.0 * spread
    }

    pub fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.next_u64_below(items.len() as u64) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    /// Regular cadence, stable order sizes, ordered recently.
    Steady,
    /// Regular cadence, then silent for over three cycles.
    Lapsing,
    /// Regular cadence, last three orders cut to roughly a third.
    Shrinking,
    /// A handful of irregular orders.
    Sporadic,
}

impl Archetype {
    pub const ALL: [Archetype; 4] =
        [Archetype::Steady, Archetype::Lapsing, Archetype::Shrinking, Archetype::Sporadic];
}

const CADENCE_JITTER: f64 = 0.15;
const AMOUNT_JITTER: f64 = 0.10;
const SHRINK_FACTOR: f64 = 0.35;

pub fn generate_history(
    master_seed: u64,
    index: u64,
    archetype: Archetype,
    now: DateTime<Utc>,
) -> OrderHistory {
    let mut rng = SynthRng::new(master_seed, index);

    let display_name = business_name(&mut rng);
    let base_amount = rng.range(500.0, 20_000.0);
    let cadence = rng.range(21.0, 60.0);

    let (order_count, last_offset_days) = match archetype {
        Archetype::Steady | Archetype::Shrinking => {
            (12 + rng.next_u64_below(7) as usize, rng.range(0.0, 0.8) * cadence)
        }
        Archetype::Lapsing => (12 + rng.next_u64_below(7) as usize, rng.range(3.2, 4.0) * cadence),
        Archetype::Sporadic => (2 + rng.next_u64_below(4) as usize, rng.range(10.0, 200.0)),
    };

    // Walk backwards from the most recent order.
    let mut offsets = Vec::with_capacity(order_count);
    let mut offset = last_offset_days;
    for _ in 0..order_count {
        offsets.push(offset);
        offset += match archetype {
            Archetype::Sporadic => rng.range(7.0, 240.0),
            _ => cadence * rng.jitter(CADENCE_JITTER),
        };
    }
    offsets.reverse();

    let transactions = offsets
        .iter()
        .enumerate()
        .map(|(k, days_ago)| {
            let mut amount = base_amount * rng.jitter(AMOUNT_JITTER);
            if archetype == Archetype::Shrinking && k + 3 >= order_count {
                amount *= SHRINK_FACTOR;
            }
            let date = now - Duration::seconds((days_ago * 86_400.0).round() as i64);
            Transaction::new(format!("T-{index:05}-{k:03}"), date, (amount * 100.0).round() / 100.0)
        })
        .collect();

    let segment = if base_amount >= 10_000.0 {
        "major"
    } else if base_amount >= 3_000.0 {
        "standard"
    } else {
        "small"
    };

    OrderHistory::new(format!("C-{index:05}"), display_name, segment, transactions)
}

/// `n` customers, archetypes assigned round-robin.
pub fn generate_population(master_seed: u64, n: usize, now: DateTime<Utc>) -> Vec<OrderHistory> {
    (0..n)
        .map(|i| generate_history(master_seed, i as u64, Archetype::ALL[i % Archetype::ALL.len()], now))
        .collect()
}

fn business_name(rng: &mut SynthRng) -> String {
    const PREFIXES: &[&str] = &[
        "Harbor", "Summit", "Cedar", "Iron", "Prairie", "Copper", "Northfield", "Bluestone",
        "Maple", "Riverside", "Granite", "Lakeshore",
    ];
    const TRADES: &[&str] = &[
        "Kitchen", "Hardware", "Outfitters", "Mercantile", "Provisions", "Home Goods",
        "Trading", "Supply",
    ];
    const SUFFIXES: &[&str] = &["Co.", "LLC", "Inc.", "& Sons", "Group"];

    format!("{} {} {}", rng.pick(PREFIXES), rng.pick(TRADES), rng.pick(SUFFIXES))
}
