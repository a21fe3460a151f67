// Edges of the pipeline: where trades come from and where the report goes
pub mod error;
pub mod source;
pub mod sink;

pub use error::{IngestError, IngestResult};
pub use sink::{ReportSink, WriterSink};
pub use source::{CsvTradeSource, MalformedPolicy};
