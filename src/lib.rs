pub mod config;
pub mod engine;
pub mod ingest;
pub mod pipeline;
pub mod telemetry;
