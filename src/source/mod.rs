pub mod replay;
pub mod synthetic;

use rand::RngCore;
use rust_decimal::Decimal;

use crate::error::DataError;
use crate::types::BookSnapshot;

/// Supplier of book snapshots (synthetic, recorded, or live).
///
/// Randomness is always passed in by the caller so a run is reproducible from
/// its seed alone. Sources that do not need it ignore `rng`.
pub trait SnapshotSource: Send {
    fn get_snapshot(
        &mut self,
        reference_price: Decimal,
        n_levels: usize,
        rng: &mut dyn RngCore,
    ) -> Result<BookSnapshot, DataError>;
}

pub use replay::ReplaySource;
pub use synthetic::SyntheticSource;
