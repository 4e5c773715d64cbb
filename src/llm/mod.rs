//! LLM summarizer seam
//!
//! 調査結果の自然言語要約はホスト型モデルに委ねる。推論そのものは
//! コード化せず、このトレイトの背後に置く。

pub mod provider;
pub mod types;

use crate::error::Result;
use async_trait::async_trait;

pub use provider::{OpenAiCompatProvider, StaticSummarizer};
pub use types::{SummaryRequest, SummaryResponse};

/// Structured-output LLM call: prompt in, parsed summary out.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn generate(&self, request: SummaryRequest) -> Result<SummaryResponse>;
}
