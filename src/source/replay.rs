use anyhow::{Context, Result};
use rand::RngCore;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::DataError;
use crate::source::SnapshotSource;
use crate::types::{BookLevel, BookSnapshot, Side};

/// Plays back recorded books in order, wrapping around at the end.
///
/// Recorded books carry their own prices, so the reference price and level
/// count requested by the caller are ignored. Levels are kept as raw strings
/// until a snapshot is requested; a bad field fails that step, not the load.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    books: Vec<RecordedBook>,
    cursor: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct RecordedLvl {
    price: String,
    size: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RecordedBook {
    #[serde(default)]
    bids: Vec<RecordedLvl>,
    #[serde(default)]
    asks: Vec<RecordedLvl>,
}

impl ReplaySource {
    /// One JSON book per line, blank lines skipped.
    pub fn from_jsonl(text: &str) -> Result<Self> {
        let books = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| {
                serde_json::from_str::<RecordedBook>(l)
                    .with_context(|| format!("decode recorded book on line {}", i + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        anyhow::ensure!(!books.is_empty(), "no recorded books");
        tracing::debug!(books = books.len(), "replay source loaded");
        Ok(Self { books, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl SnapshotSource for ReplaySource {
    fn get_snapshot(
        &mut self,
        _reference_price: Decimal,
        _n_levels: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<BookSnapshot, DataError> {
        let book = &self.books[self.cursor % self.books.len()];
        self.cursor = (self.cursor + 1) % self.books.len();

        let mut levels = Vec::with_capacity(book.bids.len() + book.asks.len());
        for lvl in &book.bids {
            levels.push(convert_level(Side::Bid, lvl)?);
        }
        for lvl in &book.asks {
            levels.push(convert_level(Side::Ask, lvl)?);
        }
        Ok(BookSnapshot::new(levels))
    }
}

fn convert_level(side: Side, lvl: &RecordedLvl) -> Result<BookLevel, DataError> {
    let price = lvl
        .price
        .trim()
        .parse::<Decimal>()
        .map_err(|_| DataError::Malformed {
            reason: format!("{side} price {:?} is not numeric", lvl.price),
        })?;
    let size = lvl
        .size
        .trim()
        .parse::<u64>()
        .map_err(|_| DataError::Malformed {
            reason: format!("{side} size {:?} is not a non-negative integer", lvl.size),
        })?;
    Ok(BookLevel { side, price, size })
}
