use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::simulation::TimeSeries;
use crate::types::{Regime, RiskAssessment, RiskLevel};

/// Cut-offs for the `high` and `medium` risk levels. A window is `high` if any
/// of the high conditions holds, else `medium` if any medium condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub high_frac_stressed: Decimal,
    pub high_avg_spread: Decimal,
    pub high_avg_liq_score: Decimal,
    pub medium_frac_stressed: Decimal,
    pub medium_avg_spread: Decimal,
    pub medium_avg_liq_score: Decimal,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_frac_stressed: dec!(0.4),
            high_avg_spread: dec!(0.8),
            high_avg_liq_score: dec!(150),
            medium_frac_stressed: dec!(0.2),
            medium_avg_spread: dec!(0.5),
            medium_avg_liq_score: dec!(250),
        }
    }
}

impl RiskThresholds {
    pub fn level(&self, frac_stressed: Decimal, avg_spread: Decimal, avg_liq_score: Decimal) -> RiskLevel {
        if frac_stressed > self.high_frac_stressed
            || avg_spread > self.high_avg_spread
            || avg_liq_score < self.high_avg_liq_score
        {
            RiskLevel::High
        } else if frac_stressed > self.medium_frac_stressed
            || avg_spread > self.medium_avg_spread
            || avg_liq_score < self.medium_avg_liq_score
        {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

pub fn assess_risk(
    series: &TimeSeries,
    lookback: usize,
    thresholds: &RiskThresholds,
) -> Result<RiskAssessment, InputError> {
    assess_window(series.spreads(), series.liq_scores(), series.regimes(), lookback, thresholds)
}

/// Summarize the trailing `lookback` entries of aligned sequences. A lookback
/// longer than the sequences is clamped to their full length.
pub fn assess_window(
    spreads: &[Decimal],
    liq_scores: &[Decimal],
    regimes: &[Regime],
    lookback: usize,
    thresholds: &RiskThresholds,
) -> Result<RiskAssessment, InputError> {
    if lookback == 0 {
        return Err(InputError::ZeroLookback);
    }
    if spreads.len() != liq_scores.len() || spreads.len() != regimes.len() {
        return Err(InputError::Misaligned {
            spreads: spreads.len(),
            liq_scores: liq_scores.len(),
            regimes: regimes.len(),
        });
    }
    if spreads.is_empty() {
        return Err(InputError::EmptySeries);
    }

    let n = lookback.min(spreads.len());
    let start = spreads.len() - n;
    let spreads = &spreads[start..];
    let liq_scores = &liq_scores[start..];
    let regimes = &regimes[start..];

    let len = Decimal::from(n);
    let avg_spread = mean(spreads, len);
    let avg_liq_score = mean(liq_scores, len);
    let frac_stressed = fraction(regimes, Regime::Stressed, len);
    let frac_high_liq = fraction(regimes, Regime::HighLiquidity, len);

    Ok(RiskAssessment {
        lookback,
        window_len: n,
        avg_spread,
        avg_liq_score,
        frac_stressed,
        frac_high_liq,
        risk_level: thresholds.level(frac_stressed, avg_spread, avg_liq_score),
    })
}

/// Arithmetic mean that never panics. Falls back to summing pre-divided terms
/// when the plain sum overflows, saturating at the `Decimal` bounds.
fn mean(xs: &[Decimal], len: Decimal) -> Decimal {
    match xs.iter().try_fold(Decimal::ZERO, |acc, x| acc.checked_add(*x)) {
        Some(sum) => sum / len,
        None => xs
            .iter()
            .fold(Decimal::ZERO, |acc, x| acc.saturating_add(*x / len)),
    }
}

fn fraction(regimes: &[Regime], label: Regime, len: Decimal) -> Decimal {
    Decimal::from(regimes.iter().filter(|r| **r == label).count()) / len
}
