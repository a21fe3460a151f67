use anyhow::Context;
use clap::Parser;

use tradestats::config::{Cli, Settings};
use tradestats::ingest::WriterSink;
use tradestats::{pipeline, telemetry};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let cli = Cli::parse();
    let settings = Settings::load(&cli).context("loading settings")?;

    telemetry::init_tracing(&settings.log_filter);
    telemetry::init_metrics()?;

    let mut sink = WriterSink::stdout();
    pipeline::run(&settings, &mut sink)
        .with_context(|| format!("summarising {}", settings.input_path.display()))?;

    Ok(())
}
