use rand::{Rng, RngCore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::DataError;
use crate::source::SnapshotSource;
use crate::types::{BookLevel, BookSnapshot};

pub const MIN_LEVEL_SIZE: u64 = 10;
pub const MAX_LEVEL_SIZE: u64 = 50;

/// Symmetric ladder around the reference price, one tick apart, with sizes
/// drawn uniformly from `[MIN_LEVEL_SIZE, MAX_LEVEL_SIZE)`.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    tick: Decimal,
}

impl SyntheticSource {
    pub fn new(tick: Decimal) -> Self {
        Self { tick }
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(dec!(0.1))
    }
}

impl SnapshotSource for SyntheticSource {
    fn get_snapshot(
        &mut self,
        reference_price: Decimal,
        n_levels: usize,
        rng: &mut dyn RngCore,
    ) -> Result<BookSnapshot, DataError> {
        let offsets: Vec<Decimal> = (1..=n_levels)
            .map(|k| self.tick.checked_mul(Decimal::from(k)))
            .collect::<Option<_>>()
            .ok_or(DataError::PriceOverflow { price: self.tick })?;

        // all bid sizes first, then ask sizes
        let bid_sizes: Vec<u64> = offsets
            .iter()
            .map(|_| rng.gen_range(MIN_LEVEL_SIZE..MAX_LEVEL_SIZE))
            .collect();
        let ask_sizes: Vec<u64> = offsets
            .iter()
            .map(|_| rng.gen_range(MIN_LEVEL_SIZE..MAX_LEVEL_SIZE))
            .collect();

        let overflow = DataError::PriceOverflow { price: reference_price };
        let mut levels = Vec::with_capacity(n_levels * 2);
        for (off, sz) in offsets.iter().zip(bid_sizes) {
            let px = reference_price.checked_sub(*off).ok_or_else(|| overflow.clone())?;
            levels.push(BookLevel::bid(px, sz));
        }
        for (off, sz) in offsets.iter().zip(ask_sizes) {
            let px = reference_price.checked_add(*off).ok_or_else(|| overflow.clone())?;
            levels.push(BookLevel::ask(px, sz));
        }

        Ok(BookSnapshot::new(levels))
    }
}
