use ahash::AHashMap;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::engine::accumulator::Accumulator;
use crate::engine::types::TradeRecord;

/// Owns one `Accumulator` per symbol. Grows on first sighting, never shrinks.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    accumulators: AHashMap<String, Accumulator>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a trade to the accumulator for `symbol`, creating it if needed.
    pub fn record_trade(&mut self, symbol: impl Into<String>, volume: i64, price: i64) {
        let acc = self
            .accumulators
            .entry(symbol.into())
            .or_insert_with_key(|key| {
                debug!(symbol = %key, "First trade for symbol");
                Accumulator::new(key.clone())
            });
        acc.update(volume, price);
    }

    pub fn apply(&mut self, trade: TradeRecord) {
        self.record_trade(trade.symbol, trade.volume, trade.price);
    }

    pub fn get(&self, symbol: &str) -> Option<&Accumulator> {
        self.accumulators.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.accumulators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accumulators.is_empty()
    }

    /// Accumulators ordered by symbol (byte-wise ascending).
    pub fn sorted(&self) -> impl Iterator<Item = &Accumulator> {
        self.accumulators
            .iter()
            .sorted_unstable_by(|a, b| a.0.cmp(b.0))
            .map(|(_, acc)| acc)
    }

    /// One summary line per symbol in symbol order, joined by `\n`.
    /// No trailing newline; empty registry gives an empty string.
    #[instrument(level = "debug", skip(self), fields(symbols = self.len()))]
    pub fn report(&self) -> String {
        self.sorted().map(Accumulator::summary_line).join("\n")
    }
}
