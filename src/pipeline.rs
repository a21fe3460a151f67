use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::config::Settings;
use crate::engine::registry::Registry;
use crate::engine::types::TradeRecord;
use crate::ingest::error::{IngestError, IngestResult};
use crate::ingest::sink::ReportSink;
use crate::ingest::source::CsvTradeSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub records: u64,
    pub skipped: u64,
    pub symbols: usize,
}

/// Feed records into the registry in arrival order. Stops at the first error.
pub fn ingest<I>(registry: &mut Registry, records: I) -> IngestResult<u64>
where
    I: IntoIterator<Item = IngestResult<TradeRecord>>,
{
    // per record, so an aborted run still reports what it applied
    let records_total = metrics::counter!("tradestats_records_total");
    let symbols = metrics::gauge!("tradestats_symbols");
    let mut applied = 0u64;
    for record in records {
        registry.apply(record?);
        records_total.increment(1);
        symbols.set(registry.len() as f64);
        applied += 1;
    }
    Ok(applied)
}

/// Read the whole trade file, then hand the sorted report to `sink`.
#[instrument(skip(settings, sink), fields(input = %settings.input_path.display()))]
pub fn run<S: ReportSink>(settings: &Settings, sink: &mut S) -> IngestResult<RunSummary> {
    let start = Instant::now();
    let mut source = CsvTradeSource::open(&settings.input_path, settings.on_malformed)?;
    let mut registry = Registry::new();

    let records = ingest(&mut registry, source.by_ref())?;
    let report = registry.report();
    sink.emit(&report).map_err(IngestError::Sink)?;

    let summary = RunSummary { records, skipped: source.skipped(), symbols: registry.len() };
    debug!(elapsed_us = start.elapsed().as_micros() as u64, "Report emitted");
    info!(
        records = summary.records,
        skipped = summary.skipped,
        symbols = summary.symbols,
        "Run complete"
    );
    Ok(summary)
}
