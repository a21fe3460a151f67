// Aggregation core: per-symbol accumulators and the registry that owns them
pub mod types;
pub mod accumulator;
pub mod registry;

pub use accumulator::Accumulator;
pub use registry::Registry;
pub use types::TradeRecord;
