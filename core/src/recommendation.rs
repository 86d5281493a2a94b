//! Recommendation engine — ordered first-match table from risk level,
//! signal mix, and segment to one canned action.

use crate::{
    config::EngineConfig,
    risk::{ChurnSignal, RiskLevel, SignalType},
};

pub const ACTION_SENIOR_ESCALATION: &str =
    "Escalate to senior account leadership for personal outreach today.";
pub const ACTION_SAME_DAY_OUTREACH: &str =
    "Sales rep outreach today: ordering has slowed and order sizes are shrinking.";
pub const ACTION_THIS_WEEK_OUTREACH: &str =
    "Schedule sales rep outreach this week to check on the account.";
pub const ACTION_DIAGNOSTIC_CALL: &str =
    "Book a diagnostic check-in call to learn what changed in their ordering.";
pub const ACTION_PRODUCT_MIX_REVIEW: &str =
    "Review product mix and pricing with the customer.";
pub const ACTION_PROACTIVE_LIST: &str =
    "Add to the proactive outreach list.";
pub const ACTION_MONITOR: &str =
    "Monitor ordering over the next 30 days.";
pub const ACTION_NONE: &str =
    "No action needed.";

#[derive(Debug, Clone, Copy)]
pub struct RecommendationInput {
    pub risk_level:        RiskLevel,
    pub top_tier:          bool,
    pub interval_extended: bool,
    pub size_declining:    bool,
    pub pattern_break:     bool,
}

impl RecommendationInput {
    pub fn new(
        risk_level: RiskLevel,
        signals: &[ChurnSignal],
        segment: &str,
        cfg: &EngineConfig,
    ) -> Self {
        let has = |t: SignalType| signals.iter().any(|s| s.signal_type == t);
        Self {
            risk_level,
            top_tier:          cfg.is_top_tier(segment),
            interval_extended: has(SignalType::IntervalExtended),
            size_declining:    has(SignalType::SizeDeclining),
            pattern_break:     has(SignalType::PatternBreak),
        }
    }
}

type Rule = (fn(&RecommendationInput) -> bool, &'static str);

const RULES: &[Rule] = &[
    (|r| r.risk_level == RiskLevel::Critical && r.top_tier,                             ACTION_SENIOR_ESCALATION),
    (|r| r.risk_level == RiskLevel::Critical && r.interval_extended && r.size_declining, ACTION_SAME_DAY_OUTREACH),
    (|r| r.risk_level == RiskLevel::Critical,                                           ACTION_THIS_WEEK_OUTREACH),
    (|r| r.risk_level == RiskLevel::High && r.pattern_break,                            ACTION_DIAGNOSTIC_CALL),
    (|r| r.risk_level == RiskLevel::High && r.size_declining,                           ACTION_PRODUCT_MIX_REVIEW),
    (|r| r.risk_level == RiskLevel::High,                                               ACTION_PROACTIVE_LIST),
    (|r| r.risk_level == RiskLevel::Medium,                                             ACTION_MONITOR),
];

pub fn recommend_action(input: &RecommendationInput) -> &'static str {
    RULES
        .iter()
        .find(|(applies, _)| applies(input))
        .map(|(_, action)| *action)
        .unwrap_or(ACTION_NONE)
}
