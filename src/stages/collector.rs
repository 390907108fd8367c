//! The collector stage: fans the output and error channels back in.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::{CollectSummary, Error, Outcome, Result, Sink, Termination};

/// Multiplexed receiver over the output and error channels.
///
/// Each call to [`recv`](OutcomeReceiver::recv) resumes as soon as either
/// channel has a value. When both are ready the pick is random. A channel that
/// has closed drops out of the wait.
pub struct OutcomeReceiver<T, E> {
    outputs: mpsc::Receiver<T>,
    errors: mpsc::Receiver<E>,
    outputs_open: bool,
    errors_open: bool,
}

impl<T, E> OutcomeReceiver<T, E> {
    pub fn new(outputs: mpsc::Receiver<T>, errors: mpsc::Receiver<E>) -> Self {
        Self {
            outputs,
            errors,
            outputs_open: true,
            errors_open: true,
        }
    }

    /// Wait for the next outcome, or `None` once both channels are closed
    /// and drained. Cancel safe.
    pub async fn recv(&mut self) -> Option<Outcome<T, E>> {
        loop {
            tokio::select! {
                value = self.outputs.recv(), if self.outputs_open => match value {
                    Some(value) => return Some(Outcome::Processed(value)),
                    None => self.outputs_open = false,
                },
                failure = self.errors.recv(), if self.errors_open => match failure {
                    Some(failure) => return Some(Outcome::Failed(failure)),
                    None => self.errors_open = false,
                },
                else => return None,
            }
        }
    }
}

/// Settings that bound how long the collector waits.
#[derive(Debug, Clone, Default)]
pub struct CollectorOptions {
    pub termination: Termination,
    /// Deadline for each individual wait
    pub operation_timeout: Option<Duration>,
    /// Cancelling this token stops the collector with [`Error::Shutdown`]
    pub cancellation: CancellationToken,
}

/// Collect outcomes into `sink` until `options.termination` is satisfied.
///
/// With [`Termination::Count`] the collector performs exactly that many
/// iterations; if both channels close first it reports [`Error::Starved`]
/// instead of waiting forever.
pub async fn run<T, E, K>(
    mut receiver: OutcomeReceiver<T, E>,
    sink: &mut K,
    options: &CollectorOptions,
) -> Result<CollectSummary>
where
    K: Sink<Item = Outcome<T, E>> + Send,
    T: Send + 'static,
    E: Send + 'static,
{
    let mut summary = CollectSummary::default();

    while options.termination.wants_more(summary.total()) {
        let next = tokio::select! {
            _ = options.cancellation.cancelled() => {
                tracing::warn!(observed = summary.total(), "collector cancelled");
                return Err(Error::Shutdown);
            }
            next = with_deadline(options.operation_timeout, receiver.recv()) => next?,
        };

        let Some(outcome) = next else {
            if let Termination::Count(expected) = options.termination {
                tracing::warn!(
                    expected,
                    observed = summary.total(),
                    "outcome channels closed before the expected count"
                );
                return Err(Error::Starved {
                    expected,
                    observed: summary.total(),
                });
            }
            break;
        };

        summary.record(&outcome);
        tracing::debug!(
            observed = summary.total(),
            processed = outcome.is_processed(),
            "collector received outcome"
        );
        #[cfg(feature = "metrics")]
        crate::metrics::record_collected();

        sink.write(outcome).await?;
    }

    sink.finish().await?;
    tracing::info!(
        processed = summary.processed,
        failed = summary.failed,
        "collector finished"
    );
    Ok(summary)
}

async fn with_deadline<F: Future>(timeout: Option<Duration>, fut: F) -> Result<F::Output> {
    match timeout {
        Some(duration) => tokio::time::timeout(duration, fut)
            .await
            .map_err(|_| Error::elapsed(duration)),
        None => Ok(fut.await),
    }
}
