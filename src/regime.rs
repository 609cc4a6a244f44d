use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Regime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeThresholds {
    pub high_liq_score: Decimal,
    pub imbalance_neutral: Decimal,
    pub high_liq_spread: Decimal,
    pub stressed_score: Decimal,
    pub stressed_spread: Decimal,
    pub one_sided: Decimal,
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            high_liq_score: dec!(500),
            imbalance_neutral: dec!(0.2),
            high_liq_spread: dec!(0.3),
            stressed_score: dec!(150),
            stressed_spread: dec!(0.6),
            one_sided: dec!(0.5),
        }
    }
}

/// Inputs to one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub spread: Decimal,
    pub imbalance: Decimal,
    pub liquidity_score: Decimal,
}

pub struct Rule {
    pub regime: Regime,
    pub matches: fn(&Observation, &RegimeThresholds) -> bool,
}

/// Evaluated top to bottom, first match wins. `high_liquidity` and `stressed`
/// can both hold for the same observation; position decides.
pub const RULES: [Rule; 4] = [
    Rule {
        regime: Regime::HighLiquidity,
        matches: |o, t| {
            o.liquidity_score > t.high_liq_score
                && o.imbalance.abs() < t.imbalance_neutral
                && o.spread < t.high_liq_spread
        },
    },
    Rule {
        regime: Regime::Stressed,
        matches: |o, t| o.liquidity_score < t.stressed_score || o.spread > t.stressed_spread,
    },
    Rule {
        regime: Regime::OneSidedBuy,
        matches: |o, t| o.imbalance > t.one_sided,
    },
    Rule {
        regime: Regime::OneSidedSell,
        matches: |o, t| o.imbalance < -t.one_sided,
    },
];

/// Label used when no rule matches.
pub const FALLBACK: Regime = Regime::Normal;

pub fn classify_regime(
    spread: Decimal,
    imbalance: Decimal,
    liquidity_score: Decimal,
    thresholds: &RegimeThresholds,
) -> Regime {
    let obs = Observation { spread, imbalance, liquidity_score };
    let regime = RULES
        .iter()
        .find(|r| (r.matches)(&obs, thresholds))
        .map(|r| r.regime)
        .unwrap_or(FALLBACK);

    tracing::debug!(
        spread = %spread,
        imbalance = %imbalance,
        liquidity_score = %liquidity_score,
        regime = %regime,
        "classified"
    );
    regime
}
