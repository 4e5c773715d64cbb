//! Anomaly analytics
//!
//! 5分テレメトリ異常検知。ルールベース・季節分解・Isolation Forest・
//! 統計的外れ値の各検知器を独立に走らせ、論理ORで統合する。

pub mod decomposition;
pub mod features;
pub mod filter;
pub mod isolation_forest;
pub mod rules;
pub mod statistics;
pub mod types;

pub use filter::AnomalyFilter;
pub use isolation_forest::IsolationForest;
pub use types::{AnomalyFlags, FilterReport};
