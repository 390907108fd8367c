//! The transformer stage: converts each raw item and routes the outcome.

use tokio::sync::mpsc;

use crate::core::{Result, TransformReport, Transformer};

/// Receive from `input` until it is closed and drained, routing each
/// transformed item to `outputs` and each failure to `errors`.
///
/// Failures never end the stage. The stage only fails when the collector has
/// gone away and an outcome can no longer be delivered. If the collector goes
/// away while the stage is idle, it stops without an error.
pub async fn run<X>(
    mut transformer: X,
    mut input: mpsc::Receiver<X::Input>,
    outputs: mpsc::Sender<X::Output>,
    errors: mpsc::Sender<X::Failure>,
) -> Result<TransformReport>
where
    X: Transformer + Send,
{
    let mut report = TransformReport::default();

    loop {
        let item = tokio::select! {
            biased;
            item = input.recv() => item,
            _ = collector_gone(&outputs, &errors) => {
                tracing::debug!(consumed = report.consumed, "outcome channels closed while idle");
                break;
            }
        };
        let Some(item) = item else {
            break;
        };
        report.consumed += 1;
        match transformer.transform(item).await {
            Ok(value) => {
                outputs.send(value).await?;
                report.processed += 1;
                tracing::debug!(consumed = report.consumed, "routed result to output channel");
                #[cfg(feature = "metrics")]
                crate::metrics::record_processed();
            }
            Err(failure) => {
                errors.send(failure).await?;
                report.failed += 1;
                tracing::debug!(consumed = report.consumed, "routed failure to error channel");
                #[cfg(feature = "metrics")]
                crate::metrics::record_failed();
            }
        }
    }

    tracing::info!(
        consumed = report.consumed,
        processed = report.processed,
        failed = report.failed,
        "transformer finished"
    );
    Ok(report)
}

async fn collector_gone<T, E>(outputs: &mpsc::Sender<T>, errors: &mpsc::Sender<E>) {
    tokio::join!(outputs.closed(), errors.closed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::transformers::SquareTransformer;
    use std::time::Duration;

    #[tokio::test]
    async fn test_routes_results_and_failures() {
        let (input_tx, input_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);
        let (err_tx, mut err_rx) = mpsc::channel(8);

        for raw in ["4", "9", "a", "16", "3.5"] {
            input_tx.send(raw.to_string()).await.unwrap();
        }
        drop(input_tx);

        let report = run(SquareTransformer::new(), input_rx, out_tx, err_tx)
            .await
            .unwrap();
        assert_eq!(
            report,
            TransformReport {
                consumed: 5,
                processed: 3,
                failed: 2
            }
        );
        assert_eq!(report.emitted(), report.consumed);

        let mut results = Vec::new();
        while let Some(value) = out_rx.recv().await {
            results.push(value);
        }
        assert_eq!(results, vec![16, 81, 256]);

        let mut failures = Vec::new();
        while let Some(err) = err_rx.recv().await {
            failures.push(err.into_input());
        }
        assert_eq!(failures, vec!["a", "3.5"]);
    }

    #[tokio::test]
    async fn test_waits_for_closure_not_emptiness() {
        let (input_tx, input_rx) = mpsc::channel(1);
        let (out_tx, mut out_rx) = mpsc::channel(1);
        let (err_tx, _err_rx) = mpsc::channel(1);

        let stage = tokio::spawn(run(SquareTransformer::new(), input_rx, out_tx, err_tx));

        input_tx.send("2".to_string()).await.unwrap();
        assert_eq!(out_rx.recv().await, Some(4));

        // The input channel is momentarily empty but still open.
        tokio::task::yield_now().await;
        assert!(!stage.is_finished());

        input_tx.send("3".to_string()).await.unwrap();
        assert_eq!(out_rx.recv().await, Some(9));
        drop(input_tx);

        let report = stage.await.unwrap().unwrap();
        assert_eq!(report.consumed, 2);
    }

    #[tokio::test]
    async fn test_fails_when_collector_is_gone() {
        let (input_tx, input_rx) = mpsc::channel(1);
        let (out_tx, out_rx) = mpsc::channel(1);
        let (err_tx, _err_rx) = mpsc::channel(1);
        drop(out_rx);

        input_tx.send("5".to_string()).await.unwrap();
        drop(input_tx);

        let err = run(SquareTransformer::new(), input_rx, out_tx, err_tx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ChannelClosed));
    }

    #[tokio::test]
    async fn test_stops_when_collector_leaves_while_idle() {
        let (input_tx, input_rx) = mpsc::channel::<String>(1);
        let (out_tx, mut out_rx) = mpsc::channel(1);
        let (err_tx, err_rx) = mpsc::channel(1);

        let stage = tokio::spawn(run(SquareTransformer::new(), input_rx, out_tx, err_tx));
        input_tx.send("6".to_string()).await.unwrap();
        assert_eq!(out_rx.recv().await, Some(36));

        // The input channel stays open; only the collector leaves.
        drop(out_rx);
        drop(err_rx);

        let report = tokio::time::timeout(Duration::from_secs(2), stage)
            .await
            .expect("transformer should notice the collector leaving")
            .unwrap()
            .unwrap();
        assert_eq!(report.emitted(), 1);
        assert!(input_tx.is_closed());
    }
}
