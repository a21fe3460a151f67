use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot open trade file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed trade record on line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("failed to write report: {0}")]
    Sink(#[source] io::Error),
}

pub type IngestResult<T> = Result<T, IngestError>;
