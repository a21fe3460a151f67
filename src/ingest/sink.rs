use std::io::{self, Stdout, Write};

/// Destination for the finished report.
pub trait ReportSink {
    fn emit(&mut self, report: &str) -> io::Result<()>;
}

/// Writes the report plus a trailing newline to any `io::Write`.
pub struct WriterSink<W> {
    out: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl WriterSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ReportSink for WriterSink<W> {
    fn emit(&mut self, report: &str) -> io::Result<()> {
        writeln!(self.out, "{}", report)?;
        self.out.flush()
    }
}
