//! # pvwatch
//!
//! Anomaly triage for five-minute solar-plant telemetry.
//!
//! The core is [`analytics::AnomalyFilter`]: a pure, multi-method filter that
//! unions rule-based thresholds, additive seasonal decomposition, a seeded
//! Isolation Forest and rolling-mean/temperature statistics into one
//! per-record decision. Around it sit a typed investigation store and an LLM
//! summarizer seam for the UI layer.

pub mod analytics;
pub mod config;
pub mod error;
pub mod investigation;
pub mod llm;
pub mod logging;
pub mod store;
pub mod telemetry;

pub use analytics::{AnomalyFilter, AnomalyFlags, FilterReport};
pub use config::{AppConfig, ConfigLoader, FilterConfig};
pub use error::{Error, Result};
pub use investigation::AppContext;
pub use telemetry::{FlaggedRecord, TelemetryRecord};
