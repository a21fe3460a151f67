// Trade as handed over by a record source (already parsed and validated)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRecord {
    pub timestamp: i64,
    pub symbol: String,
    pub volume: i64,
    pub price: i64,
}

impl TradeRecord {
    pub fn new(timestamp: i64, symbol: impl Into<String>, volume: i64, price: i64) -> Self {
        Self { timestamp, symbol: symbol.into(), volume, price }
    }
}
