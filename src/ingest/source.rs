//! CSV record source.
//!
//! Rows look like `<timestamp>,<symbol>,<volume>,<price>` with no header.
//! All shape and sign validation happens here so the aggregation core only
//! ever sees well-formed trades.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::engine::types::TradeRecord;
use crate::ingest::error::{IngestError, IngestResult};

const FIELD_COUNT: usize = 4;

/// What to do with a row that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Abort the run on the first bad row.
    #[default]
    Fail,
    /// Log and drop the row, keep going.
    Skip,
}

pub struct CsvTradeSource<R> {
    reader: csv::Reader<R>,
    record: StringRecord,
    policy: MalformedPolicy,
    skipped: u64,
    done: bool,
}

impl CsvTradeSource<File> {
    pub fn open(path: impl AsRef<Path>, policy: MalformedPolicy) -> IngestResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?policy, "Opened trade file");
        Ok(Self::from_reader(file, policy))
    }
}

impl<R: Read> CsvTradeSource<R> {
    pub fn from_reader(rdr: R, policy: MalformedPolicy) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(rdr);
        Self { reader, record: StringRecord::new(), policy, skipped: 0, done: false }
    }

    /// Rows dropped under `MalformedPolicy::Skip`.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    fn line(&self) -> u64 {
        self.record.position().map_or(0, |p| p.line())
    }

    // Ok(None) at end of input
    fn read_next(&mut self) -> IngestResult<Option<TradeRecord>> {
        loop {
            if !self.reader.read_record(&mut self.record)? {
                return Ok(None);
            }
            // whitespace-only line trims down to a single empty field
            if self.record.len() == 1 && self.record[0].is_empty() {
                continue;
            }
            return parse_record(&self.record, self.line()).map(Some);
        }
    }
}

impl<R: Read> Iterator for CsvTradeSource<R> {
    type Item = IngestResult<TradeRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.read_next() {
                Ok(Some(trade)) => return Some(Ok(trade)),
                Ok(None) => self.done = true,
                Err(e) if self.policy == MalformedPolicy::Skip && is_skippable(&e) => {
                    self.skipped += 1;
                    warn!(error = %e, skipped = self.skipped, "Skipping bad trade row");
                    metrics::counter!("tradestats_records_skipped_total").increment(1);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

fn is_skippable(err: &IngestError) -> bool {
    match err {
        IngestError::Malformed { .. } => true,
        IngestError::Csv(e) => !e.is_io_error(),
        _ => false,
    }
}

fn parse_record(record: &StringRecord, line: u64) -> IngestResult<TradeRecord> {
    let malformed = |reason: String| IngestError::Malformed { line, reason };

    if record.len() != FIELD_COUNT {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            FIELD_COUNT,
            record.len()
        )));
    }

    let int_field = |idx: usize, name: &str| -> IngestResult<i64> {
        record[idx]
            .parse::<i64>()
            .map_err(|e| malformed(format!("{} {:?} is not an integer ({})", name, &record[idx], e)))
    };

    let timestamp = int_field(0, "timestamp")?;
    let symbol = &record[1];
    let volume = int_field(2, "volume")?;
    let price = int_field(3, "price")?;

    if symbol.is_empty() {
        return Err(malformed("empty symbol".to_string()));
    }
    if volume < 0 {
        return Err(malformed(format!("negative volume {}", volume)));
    }
    if price < 0 {
        return Err(malformed(format!("negative price {}", price)));
    }

    Ok(TradeRecord::new(timestamp, symbol, volume, price))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(input: &str, policy: MalformedPolicy) -> CsvTradeSource<&[u8]> {
        CsvTradeSource::from_reader(input.as_bytes(), policy)
    }

    #[test]
    fn test_parses_rows_in_order() {
        let trades: Vec<TradeRecord> = source(
            "1627283888,ABC,100,50\n1627283889,XYZ,200,75\n",
            MalformedPolicy::Fail,
        )
        .collect::<Result<_, _>>()
        .unwrap();

        assert_eq!(
            trades,
            vec![
                TradeRecord::new(1627283888, "ABC", 100, 50),
                TradeRecord::new(1627283889, "XYZ", 200, 75),
            ]
        );
    }

    #[test]
    fn test_blank_lines_and_padding_ignored() {
        let trades: Vec<TradeRecord> = source(
            "\n1627283888, ABC ,100, 50\n   \n1627283890,ABC,150,60",
            MalformedPolicy::Fail,
        )
        .collect::<Result<_, _>>()
        .unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].symbol, "ABC");
        assert_eq!(trades[0].price, 50);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(source("", MalformedPolicy::Fail).count(), 0);
    }

    #[test]
    fn test_fail_fast_on_bad_number() {
        let mut src = source(
            "1627283888,ABC,100,50\n1627283889,XYZ,lots,75\n1627283890,ABC,150,60\n",
            MalformedPolicy::Fail,
        );

        assert!(src.next().unwrap().is_ok());
        match src.next() {
            Some(Err(IngestError::Malformed { line, reason })) => {
                assert_eq!(line, 2);
                assert!(reason.contains("volume"), "{}", reason);
            }
            other => panic!("expected malformed error, got {:?}", other),
        }
        // fused after the first failure
        assert!(src.next().is_none());
    }

    #[test]
    fn test_wrong_field_count() {
        let err = source("1627283888,ABC,100\n", MalformedPolicy::Fail)
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, IngestError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_rejects_negative_and_empty_symbol() {
        for row in ["1,ABC,-1,50", "1,ABC,10,-5", "1,,10,5"] {
            let result = source(row, MalformedPolicy::Fail).next().unwrap();
            assert!(matches!(result, Err(IngestError::Malformed { .. })), "{}", row);
        }
    }

    #[test]
    fn test_skip_policy_continues() {
        let mut src = source(
            "1627283888,ABC,100,50\nnot,a,trade,row\n1627283890,ABC\n1627283891,ABC,150,60\n",
            MalformedPolicy::Skip,
        );

        let trades: Vec<TradeRecord> = src.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(src.skipped(), 2);
    }

    #[test]
    fn test_open_missing_file() {
        let err = CsvTradeSource::open("./definitely/not/here.csv", MalformedPolicy::Fail)
            .err()
            .unwrap();
        assert!(matches!(err, IngestError::Open { .. }));
    }
}
