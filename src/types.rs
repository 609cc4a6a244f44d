use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Bid,
    Ask,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => f.write_str("bid"),
            Side::Ask => f.write_str("ask"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub side: Side,
    pub price: Decimal,
    pub size: u64,
}

impl BookLevel {
    pub fn bid(price: Decimal, size: u64) -> Self {
        Self { side: Side::Bid, price, size }
    }

    pub fn ask(price: Decimal, size: u64) -> Self {
        Self { side: Side::Ask, price, size }
    }
}

/// Unordered collection of levels. Metrics need at least one level per side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub levels: Vec<BookLevel>,
}

impl BookSnapshot {
    pub fn new(levels: Vec<BookLevel>) -> Self {
        Self { levels }
    }

    pub fn side(&self, side: Side) -> impl Iterator<Item = &BookLevel> + '_ {
        self.levels.iter().filter(move |l| l.side == side)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookMetrics {
    pub best_bid: Decimal,
    pub best_ask: Decimal,
    /// Negative when the book is crossed.
    pub spread: Decimal,
    pub mid: Decimal,
    pub bid_depth: u64,
    pub ask_depth: u64,
    pub total_depth: u64,
    /// In [-1, 1]; zero for an empty book.
    pub imbalance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    HighLiquidity,
    Stressed,
    OneSidedBuy,
    OneSidedSell,
    Normal,
}

impl Regime {
    pub const ALL: [Regime; 5] = [
        Regime::HighLiquidity,
        Regime::Stressed,
        Regime::OneSidedBuy,
        Regime::OneSidedSell,
        Regime::Normal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::HighLiquidity => "high_liquidity",
            Regime::Stressed => "stressed",
            Regime::OneSidedBuy => "one_sided_buy",
            Regime::OneSidedSell => "one_sided_sell",
            Regime::Normal => "normal",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => f.write_str("low"),
            RiskLevel::Medium => f.write_str("medium"),
            RiskLevel::High => f.write_str("high"),
        }
    }
}

/// Summary of a trailing window. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    /// Requested window size.
    pub lookback: usize,
    /// Window actually used after clamping to the series length.
    pub window_len: usize,
    pub avg_spread: Decimal,
    pub avg_liq_score: Decimal,
    pub frac_stressed: Decimal,
    pub frac_high_liq: Decimal,
    pub risk_level: RiskLevel,
}
