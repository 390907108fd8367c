//! The producer stage: drains a source into the input channel.

use tokio::sync::mpsc;

use crate::core::{Result, Source};

/// Send every item of `source`, in order, onto `input`.
///
/// `input` is the only sender of the input channel. It is dropped when this
/// function returns, which closes the channel exactly once and after the last
/// send. Returns the number of items sent.
///
/// If the transformer goes away while the source is still producing, the
/// stage stops without an error: nothing it had was lost. A send that fails
/// because the transformer is gone is [`Error::ChannelClosed`](crate::core::Error::ChannelClosed).
pub async fn run<S>(mut source: S, input: mpsc::Sender<S::Item>, demand: usize) -> Result<usize>
where
    S: Source + Send,
{
    let demand = demand.max(1);
    let mut sent = 0;

    loop {
        let batch = tokio::select! {
            biased;
            batch = source.handle_demand(demand) => batch?,
            _ = input.closed() => {
                tracing::debug!(sent, "input channel closed while waiting on source");
                break;
            }
        };
        if batch.is_empty() {
            break;
        }
        for item in batch {
            input.send(item).await?;
            sent += 1;
            tracing::debug!(sent, "producer sent item");
            #[cfg(feature = "metrics")]
            crate::metrics::record_produced();
        }
    }

    tracing::info!(sent, "producer finished, closing input channel");
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::sources::{StreamSource, VecSource};
    use std::time::Duration;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn test_sends_in_order_then_closes() {
        let (tx, mut rx) = mpsc::channel(8);
        let source = VecSource::new(vec!["4", "9", "a", "16"]);

        let sent = run(source, tx, 3).await.unwrap();
        assert_eq!(sent, 4);

        let mut received = Vec::new();
        while let Some(item) = rx.recv().await {
            received.push(item);
        }
        assert_eq!(received, vec!["4", "9", "a", "16"]);
    }

    #[tokio::test]
    async fn test_blocks_until_reader_is_ready() {
        let (tx, mut rx) = mpsc::channel(1);
        let producer = tokio::spawn(run(VecSource::new(vec![1, 2, 3]), tx, 10));

        // Capacity one: the producer can only run ahead by a single item.
        tokio::task::yield_now().await;
        assert!(!producer.is_finished());

        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
        assert_eq!(rx.recv().await, Some(3));
        assert_eq!(rx.recv().await, None);
        assert_eq!(producer.await.unwrap().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_empty_source_closes_immediately() {
        let (tx, mut rx) = mpsc::channel::<String>(1);

        assert_eq!(run(VecSource::new(vec![]), tx, 1).await.unwrap(), 0);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_fails_when_reader_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let err = run(VecSource::new(vec![1]), tx, 1).await.unwrap_err();
        assert!(matches!(err, Error::ChannelClosed));
    }

    #[tokio::test]
    async fn test_stops_when_reader_leaves_during_stall() {
        let (tx, mut rx) = mpsc::channel(4);
        let stream = futures::stream::iter(vec![1, 2]).chain(futures::stream::pending());
        let producer = tokio::spawn(run(StreamSource::new(stream), tx, 1));

        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
        drop(rx);

        let sent = tokio::time::timeout(Duration::from_secs(2), producer)
            .await
            .expect("producer should notice the closed channel")
            .unwrap()
            .unwrap();
        assert_eq!(sent, 2);
    }
}
