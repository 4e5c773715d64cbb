//! Logging initialization
//!
//! ログ初期化（コンソール出力、EnvFilterによるレベル制御）

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is applied to the
/// whole crate.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pvwatch={default_level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent_enough() {
        // Second call fails because a global subscriber is already set; the
        // first call must succeed.
        let first = init_logging("debug");
        let second = init_logging("info");
        assert!(first.is_ok() || second.is_err());
    }
}
