use rust_decimal::Decimal;
use serde::Deserialize;

use crate::regime::RegimeThresholds;
use crate::risk::RiskThresholds;
use crate::simulation::SimulationParams;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub steps: usize,
    pub start_price: Decimal,
    pub sigma: f64,
    pub levels: usize,
    pub tick_size: Decimal,

    pub seed: u64,
    pub runs: usize,
    pub batch_concurrency: usize,

    pub lookback: usize,

    /// Minimum denominator for the liquidity score when spread <= 0.
    pub floor_spread: Decimal,

    // Regime thresholds
    pub high_liq_score_threshold: Decimal,
    pub imbalance_neutral_threshold: Decimal,
    pub high_liq_spread_threshold: Decimal,
    pub stressed_score_threshold: Decimal,
    pub stressed_spread_threshold: Decimal,
    pub one_sided_threshold: Decimal,

    // Risk-level thresholds
    pub risk_high_frac_stressed: Decimal,
    pub risk_high_avg_spread: Decimal,
    pub risk_high_avg_liq_score: Decimal,
    pub risk_medium_frac_stressed: Decimal,
    pub risk_medium_avg_spread: Decimal,
    pub risk_medium_avg_liq_score: Decimal,

    // Optional recorded books instead of the synthetic ladder
    pub replay_path: Option<String>,

    // Output
    pub report_jsonl_path: Option<String>,
    pub stats_log_every_runs: u64,
}

impl Settings {
    /// Defaults overlaid with `LOB_*` environment variables (and `.env`).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let c = Self::builder()?
            .add_source(config::Environment::with_prefix("LOB"))
            .build()?;
        let s: Self = c.try_deserialize()?;
        s.validate()?;
        Ok(s)
    }

    fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let regime = RegimeThresholds::default();
        let risk = RiskThresholds::default();
        Ok(config::Config::builder()
            .set_default("steps", 1000_i64)?
            .set_default("start_price", "100.0")?
            .set_default("sigma", 0.02)?
            .set_default("levels", 5_i64)?
            .set_default("tick_size", "0.1")?
            .set_default("seed", 0_i64)?
            .set_default("runs", 1_i64)?
            .set_default("batch_concurrency", 4_i64)?
            .set_default("lookback", 200_i64)?
            .set_default("floor_spread", crate::metrics::DEFAULT_FLOOR_SPREAD.to_string())?
            .set_default("high_liq_score_threshold", regime.high_liq_score.to_string())?
            .set_default("imbalance_neutral_threshold", regime.imbalance_neutral.to_string())?
            .set_default("high_liq_spread_threshold", regime.high_liq_spread.to_string())?
            .set_default("stressed_score_threshold", regime.stressed_score.to_string())?
            .set_default("stressed_spread_threshold", regime.stressed_spread.to_string())?
            .set_default("one_sided_threshold", regime.one_sided.to_string())?
            .set_default("risk_high_frac_stressed", risk.high_frac_stressed.to_string())?
            .set_default("risk_high_avg_spread", risk.high_avg_spread.to_string())?
            .set_default("risk_high_avg_liq_score", risk.high_avg_liq_score.to_string())?
            .set_default("risk_medium_frac_stressed", risk.medium_frac_stressed.to_string())?
            .set_default("risk_medium_avg_spread", risk.medium_avg_spread.to_string())?
            .set_default("risk_medium_avg_liq_score", risk.medium_avg_liq_score.to_string())?
            .set_default("stats_log_every_runs", 10_i64)?)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.steps >= 1, "steps must be at least 1");
        anyhow::ensure!(self.levels >= 1, "levels must be at least 1");
        anyhow::ensure!(self.runs >= 1, "runs must be at least 1");
        anyhow::ensure!(self.lookback >= 1, "lookback must be at least 1");
        anyhow::ensure!(self.sigma.is_finite() && self.sigma >= 0.0, "sigma must be finite and >= 0");
        anyhow::ensure!(self.start_price > Decimal::ZERO, "start_price must be positive");
        anyhow::ensure!(self.tick_size > Decimal::ZERO, "tick_size must be positive");
        anyhow::ensure!(self.floor_spread > Decimal::ZERO, "floor_spread must be positive");
        Ok(())
    }

    pub fn regime_thresholds(&self) -> RegimeThresholds {
        RegimeThresholds {
            high_liq_score: self.high_liq_score_threshold,
            imbalance_neutral: self.imbalance_neutral_threshold,
            high_liq_spread: self.high_liq_spread_threshold,
            stressed_score: self.stressed_score_threshold,
            stressed_spread: self.stressed_spread_threshold,
            one_sided: self.one_sided_threshold,
        }
    }

    pub fn risk_thresholds(&self) -> RiskThresholds {
        RiskThresholds {
            high_frac_stressed: self.risk_high_frac_stressed,
            high_avg_spread: self.risk_high_avg_spread,
            high_avg_liq_score: self.risk_high_avg_liq_score,
            medium_frac_stressed: self.risk_medium_frac_stressed,
            medium_avg_spread: self.risk_medium_avg_spread,
            medium_avg_liq_score: self.risk_medium_avg_liq_score,
        }
    }

    pub fn simulation_params(&self) -> SimulationParams {
        SimulationParams {
            steps: self.steps,
            start_price: self.start_price,
            sigma: self.sigma,
            levels: self.levels,
            floor_spread: self.floor_spread,
            thresholds: self.regime_thresholds(),
        }
    }

    /// One seed per run, counting up from `seed`.
    pub fn seeds(&self) -> Vec<u64> {
        (0..self.runs as u64).map(|i| self.seed.wrapping_add(i)).collect()
    }
}
