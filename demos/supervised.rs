//! Runs the pipeline under a deadline and a cancellation token, over a slow
//! stream of tokens, writing outcomes to a file as well as stdout.
//!
//! Run with: cargo run --example supervised

use std::time::Duration;
use splitweld::prelude::*;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("splitweld=info")),
        )
        .init();

    println!("=== Slow stream, drained to completion ===");
    let raw = vec!["12", "x", "-7", "0010"];
    let slow = tokio_stream::iter(raw.into_iter().map(String::from))
        .throttle(Duration::from_millis(25));
    let source = StreamSource::new(Box::pin(slow));

    let summary = Pipeline::new(source, SquareTransformer::new())
        .termination(Termination::Drain)
        .operation_timeout(Duration::from_secs(1))
        .collect(PrintSink::new())
        .await?;
    println!("{:?}\n", summary);

    println!("=== Cancelled while waiting ===");
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let endless = tokio_stream::iter(std::iter::repeat("3".to_string()))
        .throttle(Duration::from_millis(30));
    let result = Pipeline::new(StreamSource::new(Box::pin(endless)), SquareTransformer::new())
        .demand_batch_size(1)
        .cancellation_token(token)
        .collect(PrintSink::with_prefix("endless".to_string()))
        .await;
    println!("endless run ended with: {:?}\n", result.err());

    println!("=== Outcomes to a file ===");
    let path = std::env::temp_dir().join("splitweld-outcomes.log");
    let sink = FileSink::new(&path)
        .await
        .map_err(Error::sink_error)?;
    Pipeline::from_batch(
        vec!["1".to_string(), "two".to_string(), "3".to_string()],
        SquareTransformer::new(),
    )
    .collect(sink)
    .await?;
    println!("wrote {}", path.display());

    Ok(())
}
