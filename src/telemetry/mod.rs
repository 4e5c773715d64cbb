//! Telemetry wire types
//!
//! 5分粒度テレメトリの入出力型とバリデーション

pub mod parse;
pub mod types;

pub use parse::parse_records;
pub use types::{FlaggedRecord, TelemetryRecord};
