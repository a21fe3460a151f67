//! Layered run settings: defaults < config file < `TRADESTATS_*` env < CLI.

use std::path::PathBuf;

use clap::Parser;
use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;

use crate::ingest::source::MalformedPolicy;

pub const DEFAULT_INPUT_PATH: &str = "./input_data.csv";
pub const DEFAULT_CONFIG_NAME: &str = "tradestats";
pub const ENV_PREFIX: &str = "TRADESTATS";

#[derive(Debug, Default, Parser)]
#[command(name = "tradestats", version, about = "Per-symbol trade summary from a CSV trade file")]
pub struct Cli {
    /// Trade file to read (timestamp,symbol,volume,price per line)
    pub input: Option<PathBuf>,

    /// Settings file; `tradestats.toml` is picked up if present
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Drop malformed rows with a warning instead of aborting
    #[arg(long)]
    pub skip_malformed: bool,

    /// Log filter, e.g. `debug` or `tradestats=trace`
    #[arg(long = "log")]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub input_path: PathBuf,
    pub on_malformed: MalformedPolicy,
    pub log_filter: String,
}

impl Settings {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        Self::layered(file, cli)
    }

    fn layered<S>(file: S, cli: &Cli) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .set_default("input_path", DEFAULT_INPUT_PATH)?
            .set_default("on_malformed", "fail")?
            .set_default("log_filter", "info")?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .set_override_option(
                "input_path",
                cli.input.as_ref().map(|p| p.display().to_string()),
            )?
            .set_override_option("on_malformed", cli.skip_malformed.then_some("skip"))?
            .set_override_option("log_filter", cli.log_filter.clone())?
            .build()?
            .try_deserialize()
    }
}
