use std::collections::BTreeMap;

use rand::{RngCore, SeedableRng};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::{DataError, InputError, SimulationError};
use crate::metrics::{extract_metrics, liquidity_score, DEFAULT_FLOOR_SPREAD};
use crate::regime::{classify_regime, RegimeThresholds};
use crate::source::SnapshotSource;
use crate::types::Regime;

/// Decimal places kept from each price perturbation draw.
const DRAW_DP: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationParams {
    pub steps: usize,
    pub start_price: Decimal,
    /// Std dev of the per-step normal perturbation of the reference price.
    pub sigma: f64,
    pub levels: usize,
    pub floor_spread: Decimal,
    pub thresholds: RegimeThresholds,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            steps: 1000,
            start_price: dec!(100),
            sigma: 0.02,
            levels: 5,
            floor_spread: DEFAULT_FLOOR_SPREAD,
            thresholds: RegimeThresholds::default(),
        }
    }
}

/// Parallel per-step sequences. Index `i` refers to the same step in every
/// sequence; only the runner appends, so lengths always agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeSeries {
    spreads: Vec<Decimal>,
    mids: Vec<Decimal>,
    imbalances: Vec<Decimal>,
    liq_scores: Vec<Decimal>,
    regimes: Vec<Regime>,
}

impl TimeSeries {
    fn with_capacity(n: usize) -> Self {
        Self {
            spreads: Vec::with_capacity(n),
            mids: Vec::with_capacity(n),
            imbalances: Vec::with_capacity(n),
            liq_scores: Vec::with_capacity(n),
            regimes: Vec::with_capacity(n),
        }
    }

    /// Rebuild a series from recorded sequences, rejecting misaligned input.
    pub fn from_parts(
        spreads: Vec<Decimal>,
        mids: Vec<Decimal>,
        imbalances: Vec<Decimal>,
        liq_scores: Vec<Decimal>,
        regimes: Vec<Regime>,
    ) -> Result<Self, InputError> {
        let n = spreads.len();
        if [mids.len(), imbalances.len(), liq_scores.len(), regimes.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(InputError::MisalignedSeries {
                spreads: n,
                mids: mids.len(),
                imbalances: imbalances.len(),
                liq_scores: liq_scores.len(),
                regimes: regimes.len(),
            });
        }
        Ok(Self { spreads, mids, imbalances, liq_scores, regimes })
    }

    fn push(&mut self, spread: Decimal, mid: Decimal, imbalance: Decimal, score: Decimal, regime: Regime) {
        self.spreads.push(spread);
        self.mids.push(mid);
        self.imbalances.push(imbalance);
        self.liq_scores.push(score);
        self.regimes.push(regime);
    }

    pub fn len(&self) -> usize {
        self.spreads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spreads.is_empty()
    }

    pub fn spreads(&self) -> &[Decimal] {
        &self.spreads
    }

    pub fn mids(&self) -> &[Decimal] {
        &self.mids
    }

    pub fn imbalances(&self) -> &[Decimal] {
        &self.imbalances
    }

    pub fn liq_scores(&self) -> &[Decimal] {
        &self.liq_scores
    }

    pub fn regimes(&self) -> &[Regime] {
        &self.regimes
    }

    pub fn last_mid(&self) -> Option<Decimal> {
        self.mids.last().copied()
    }

    /// Number of steps spent in each regime. Every label is present, possibly zero.
    pub fn regime_counts(&self) -> BTreeMap<Regime, usize> {
        let mut counts: BTreeMap<Regime, usize> = Regime::ALL.iter().map(|r| (*r, 0)).collect();
        for r in &self.regimes {
            *counts.entry(*r).or_default() += 1;
        }
        counts
    }
}

/// Drive `params.steps` snapshot -> metrics -> score -> regime steps.
///
/// The reference price follows a random walk with normal increments drawn from
/// `rng`, which is also handed to the source. Any step failing to produce
/// metrics aborts the whole run.
pub fn run_simulation<R: RngCore>(
    params: &SimulationParams,
    source: &mut dyn SnapshotSource,
    rng: &mut R,
) -> Result<TimeSeries, SimulationError> {
    if params.steps == 0 {
        return Err(InputError::ZeroSteps.into());
    }
    if params.levels == 0 {
        return Err(InputError::ZeroLevels.into());
    }
    if params.start_price <= Decimal::ZERO {
        return Err(InputError::InvalidStartPrice { start_price: params.start_price }.into());
    }
    if !params.sigma.is_finite() {
        return Err(InputError::InvalidSigma { sigma: params.sigma }.into());
    }
    let walk = Normal::new(0.0, params.sigma)
        .map_err(|_| InputError::InvalidSigma { sigma: params.sigma })?;

    let mut series = TimeSeries::with_capacity(params.steps);
    let mut price = params.start_price;

    for step in 0..params.steps {
        let draw: f64 = walk.sample(rng);
        let delta = Decimal::from_f64(draw)
            .ok_or(InputError::UnrepresentableDraw { draw })?
            .round_dp(DRAW_DP);
        price = price.checked_add(delta).ok_or(SimulationError::Data {
            step,
            source: DataError::PriceOverflow { price },
        })?;

        let book = source
            .get_snapshot(price, params.levels, rng)
            .map_err(|source| SimulationError::Data { step, source })?;
        let m = extract_metrics(&book).map_err(|source| SimulationError::Data { step, source })?;

        let score = liquidity_score(m.spread, Decimal::from(m.total_depth), params.floor_spread);
        let regime = classify_regime(m.spread, m.imbalance, score, &params.thresholds);

        series.push(m.spread, m.mid, m.imbalance, score, regime);
    }

    tracing::debug!(
        steps = series.len(),
        start_price = %params.start_price,
        last_mid = ?series.last_mid(),
        "simulation finished"
    );
    Ok(series)
}

/// Convenience wrapper owning a freshly seeded generator.
pub fn run_seeded(
    params: &SimulationParams,
    source: &mut dyn SnapshotSource,
    seed: u64,
) -> Result<TimeSeries, SimulationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    run_simulation(params, source, &mut rng)
}
