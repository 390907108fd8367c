//! Entry points that run the squaring pipeline over a batch of tokens.

use crate::core::{CollectSummary, Error, RawItem, Result};
use crate::pipeline::Pipeline;
use crate::sinks::PrintSink;
use crate::transformers::SquareTransformer;

/// Run the squaring pipeline over `items`, printing one line per outcome.
///
/// Builds its own multi-threaded runtime, so it must not be called from
/// inside an async context; use [`run_async`] there.
///
/// ```rust,no_run
/// let summary = splitweld::run(["4", "9", "a", "16"])?;
/// assert_eq!(summary.processed, 3);
/// # Ok::<(), splitweld::Error>(())
/// ```
pub fn run<I, T>(items: I) -> Result<CollectSummary>
where
    I: IntoIterator<Item = T>,
    T: Into<RawItem>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::custom(format!("Failed to start runtime: {}", e)))?;
    runtime.block_on(run_async(items))
}

/// Async form of [`run`].
pub async fn run_async<I, T>(items: I) -> Result<CollectSummary>
where
    I: IntoIterator<Item = T>,
    T: Into<RawItem>,
{
    let items: Vec<RawItem> = items.into_iter().map(Into::into).collect();
    tracing::info!(batch = items.len(), "running squaring pipeline");

    Pipeline::from_batch(items, SquareTransformer::new())
        .collect(PrintSink::new())
        .await
}
