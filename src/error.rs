use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::Side;

/// Malformed or incomplete book data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("snapshot has no {side} levels")]
    MissingSide { side: Side },

    #[error("malformed book level: {reason}")]
    Malformed { reason: String },

    #[error("{side} depth overflows u64")]
    DepthOverflow { side: Side },

    #[error("total depth overflows u64: bid={bid_depth} ask={ask_depth}")]
    TotalDepthOverflow { bid_depth: u64, ask_depth: u64 },

    #[error("price arithmetic overflowed near {price}")]
    PriceOverflow { price: Decimal },
}

/// Caller-contract violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("series is empty")]
    EmptySeries,

    #[error("series are misaligned: spreads={spreads} liq_scores={liq_scores} regimes={regimes}")]
    Misaligned {
        spreads: usize,
        liq_scores: usize,
        regimes: usize,
    },

    #[error(
        "series are misaligned: spreads={spreads} mids={mids} imbalances={imbalances} \
         liq_scores={liq_scores} regimes={regimes}"
    )]
    MisalignedSeries {
        spreads: usize,
        mids: usize,
        imbalances: usize,
        liq_scores: usize,
        regimes: usize,
    },

    #[error("lookback must be at least 1")]
    ZeroLookback,

    #[error("step count must be at least 1")]
    ZeroSteps,

    #[error("level count must be at least 1")]
    ZeroLevels,

    #[error("start price {start_price} must be positive")]
    InvalidStartPrice { start_price: Decimal },

    #[error("invalid sigma {sigma}: must be finite and non-negative")]
    InvalidSigma { sigma: f64 },

    #[error("perturbation draw {draw} is not representable as a price")]
    UnrepresentableDraw { draw: f64 },
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("step {step}: {source}")]
    Data {
        step: usize,
        #[source]
        source: DataError,
    },
}
