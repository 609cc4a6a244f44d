use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::DataError;
use crate::types::{BookMetrics, BookSnapshot, Side};

/// Denominator used by [`liquidity_score`] when the spread is zero or crossed.
pub const DEFAULT_FLOOR_SPREAD: Decimal = dec!(0.000001);

/// Reduce one snapshot to top-of-book and depth metrics.
///
/// Level order does not matter. A snapshot missing either side is rejected
/// rather than producing a meaningless best price.
pub fn extract_metrics(book: &BookSnapshot) -> Result<BookMetrics, DataError> {
    let best_bid = book
        .side(Side::Bid)
        .map(|l| l.price)
        .max()
        .ok_or(DataError::MissingSide { side: Side::Bid })?;
    let best_ask = book
        .side(Side::Ask)
        .map(|l| l.price)
        .min()
        .ok_or(DataError::MissingSide { side: Side::Ask })?;

    let bid_depth = depth(book, Side::Bid)?;
    let ask_depth = depth(book, Side::Ask)?;
    let total_depth = bid_depth
        .checked_add(ask_depth)
        .ok_or(DataError::TotalDepthOverflow { bid_depth, ask_depth })?;

    let spread = best_ask
        .checked_sub(best_bid)
        .ok_or(DataError::PriceOverflow { price: best_ask })?;
    let mid = best_bid
        .checked_add(spread / dec!(2))
        .ok_or(DataError::PriceOverflow { price: best_bid })?;

    let imbalance = if total_depth > 0 {
        (Decimal::from(bid_depth) - Decimal::from(ask_depth)) / Decimal::from(total_depth)
    } else {
        Decimal::ZERO
    };

    Ok(BookMetrics {
        best_bid,
        best_ask,
        spread,
        mid,
        bid_depth,
        ask_depth,
        total_depth,
        imbalance,
    })
}

fn depth(book: &BookSnapshot, side: Side) -> Result<u64, DataError> {
    book.side(side)
        .try_fold(0u64, |acc, l| acc.checked_add(l.size))
        .ok_or(DataError::DepthOverflow { side })
}

/// Depth-to-spread ratio. Spreads at or below zero fall back to `floor_spread`.
pub fn liquidity_score(spread: Decimal, total_depth: Decimal, floor_spread: Decimal) -> Decimal {
    let effective = if spread > Decimal::ZERO { spread } else { floor_spread };
    total_depth.checked_div(effective).unwrap_or(Decimal::MAX)
}
