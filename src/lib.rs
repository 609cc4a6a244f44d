//! Order-book liquidity analytics: snapshot metrics, liquidity scoring,
//! regime classification and rolling risk aggregation.

pub mod batch;
pub mod config;
pub mod error;
pub mod metrics;
pub mod regime;
pub mod report;
pub mod risk;
pub mod simulation;
pub mod source;
pub mod stats;
pub mod types;

pub use error::{DataError, InputError, SimulationError};
pub use metrics::{extract_metrics, liquidity_score};
pub use regime::{classify_regime, RegimeThresholds};
pub use risk::{assess_risk, RiskThresholds};
pub use simulation::{run_seeded, run_simulation, SimulationParams, TimeSeries};
pub use source::SnapshotSource;
pub use types::{BookLevel, BookMetrics, BookSnapshot, Regime, RiskAssessment, RiskLevel, Side};
