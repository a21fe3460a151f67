use std::fmt;

use tracing::{trace, warn};

/// Running statistics for a single symbol.
///
/// Prices are tracked as `Option` so an accumulator that has never seen a
/// trade has no max/min at all rather than a placeholder value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulator {
    symbol: String,
    max_price: Option<i64>,
    min_price: Option<i64>,
    total_notional: i128,
    total_volume: i128,
    trade_count: u64,
}

impl Accumulator {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            max_price: None,
            min_price: None,
            total_notional: 0,
            total_volume: 0,
            trade_count: 0,
        }
    }

    /// Fold one trade into the running totals.
    ///
    /// Sign is not checked here; the record source rejects negative values.
    /// Totals are kept in `i128`, so volume stays exact for any input; notional
    /// only saturates once it passes `i128::MAX`.
    pub fn update(&mut self, volume: i64, price: i64) {
        self.total_volume += i128::from(volume);
        match self
            .total_notional
            .checked_add(i128::from(volume) * i128::from(price))
        {
            Some(notional) => self.total_notional = notional,
            None => {
                warn!(symbol = %self.symbol, volume, price, "Notional saturated");
                self.total_notional = i128::MAX;
            }
        }
        self.trade_count = self.trade_count.saturating_add(1);
        self.max_price = Some(self.max_price.map_or(price, |p| p.max(price)));
        self.min_price = Some(self.min_price.map_or(price, |p| p.min(price)));

        trace!(
            symbol = %self.symbol,
            volume,
            price,
            total_volume = self.total_volume,
            trades = self.trade_count,
            "Applied trade"
        );
    }

    /// Total notional over total volume, truncated toward zero. 0 with no volume.
    pub fn average_price(&self) -> i64 {
        if self.total_volume > 0 {
            let avg = self.total_notional / self.total_volume;
            // |avg| <= max |price| whenever volumes are non-negative
            i64::try_from(avg).unwrap_or(if avg.is_negative() { i64::MIN } else { i64::MAX })
        } else {
            0
        }
    }

    pub fn summary_line(&self) -> String {
        self.to_string()
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn max_price(&self) -> Option<i64> {
        self.max_price
    }

    pub fn min_price(&self) -> Option<i64> {
        self.min_price
    }

    pub fn total_notional(&self) -> i128 {
        self.total_notional
    }

    pub fn total_volume(&self) -> i128 {
        self.total_volume
    }

    pub fn trade_count(&self) -> u64 {
        self.trade_count
    }
}

struct PriceCell(Option<i64>);

impl fmt::Display for PriceCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "{}", p),
            None => f.write_str("-"),
        }
    }
}

impl fmt::Display for Accumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Symbol: {} Max Price: {} Min Price: {} Average Price: {} Total Volume: {}",
            self.symbol,
            PriceCell(self.max_price),
            PriceCell(self.min_price),
            self.average_price(),
            self.total_volume
        )
    }
}
