//! Pipeline orchestration and execution.
//!
//! This module wires a source, a transformer and a sink into the three-stage
//! pipeline: the producer and transformer run as spawned tasks, the collector
//! runs on the caller's task and fans the two outcome channels back in.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::{
    CollectSummary, Error, Outcome, Result, Sink, Source, Termination, TransformReport, Transformer,
};
use crate::sources::VecSource;
use crate::stages::{self, CollectorOptions, OutcomeReceiver};

/// Configuration for pipeline execution
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Capacity of each of the three channels (at least one)
    pub buffer_size: usize,
    /// How many items the producer requests from its source at a time
    pub demand_batch_size: usize,
    /// Maximum time the collector waits for any single outcome
    pub operation_timeout: Option<Duration>,
    /// When the collector stops
    pub termination: Termination,
    /// Cancelling this token stops the collector
    pub cancellation: CancellationToken,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1,
            demand_batch_size: 100,
            operation_timeout: None,
            termination: Termination::Drain,
            cancellation: CancellationToken::new(),
        }
    }
}

/// A pipeline connects a source, a transformer and a sink through an input
/// channel, an output channel and an error channel.
pub struct Pipeline<S, X> {
    source: S,
    transformer: X,
    config: PipelineConfig,
}

impl<X> Pipeline<VecSource<X::Input>, X>
where
    X: Transformer + Send + 'static,
{
    /// Create a pipeline over an in-memory batch.
    ///
    /// The collector expects exactly one outcome per item.
    pub fn from_batch<I>(items: I, transformer: X) -> Self
    where
        I: IntoIterator<Item = X::Input>,
    {
        let source: VecSource<X::Input> = items.into_iter().collect();
        let expected = source.len();
        Self::new(source, transformer).expect(expected)
    }
}

impl<S, X> Pipeline<S, X>
where
    S: Source<Item = X::Input> + Send + 'static,
    X: Transformer + Send + 'static,
{
    /// Create a new pipeline that collects until the transformer is done
    pub fn new(source: S, transformer: X) -> Self {
        Self {
            source,
            transformer,
            config: PipelineConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the capacity of each channel; zero is treated as one
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Set the demand batch size used by the producer
    pub fn demand_batch_size(mut self, size: usize) -> Self {
        self.config.demand_batch_size = size;
        self
    }

    /// Set the per-outcome timeout
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.config.operation_timeout = Some(timeout);
        self
    }

    /// Set the collector's termination rule
    pub fn termination(mut self, termination: Termination) -> Self {
        self.config.termination = termination;
        self
    }

    /// Stop the collector after exactly `count` outcomes
    pub fn expect(self, count: usize) -> Self {
        self.termination(Termination::Count(count))
    }

    /// Set the token that cancels the run
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.config.cancellation = token;
        self
    }

    /// Run the pipeline, writing every outcome into `sink`
    pub async fn collect<K>(self, mut sink: K) -> Result<CollectSummary>
    where
        K: Sink<Item = Outcome<X::Output, X::Failure>> + Send,
    {
        let Pipeline {
            source,
            transformer,
            config,
        } = self;
        let capacity = config.buffer_size.max(1);

        let (input_tx, input_rx) = mpsc::channel(capacity);
        let (output_tx, output_rx) = mpsc::channel(capacity);
        let (error_tx, error_rx) = mpsc::channel(capacity);

        let producer = tokio::spawn(stages::producer::run(
            source,
            input_tx,
            config.demand_batch_size,
        ));
        let transformer = tokio::spawn(stages::transformer::run(
            transformer,
            input_rx,
            output_tx,
            error_tx,
        ));

        let options = CollectorOptions {
            termination: config.termination,
            operation_timeout: config.operation_timeout,
            cancellation: config.cancellation,
        };
        // The receivers are dropped when the collector returns; the upstream
        // stages watch for that and stop.
        let collected = stages::collector::run(
            OutcomeReceiver::new(output_rx, error_rx),
            &mut sink,
            &options,
        )
        .await;

        settle(collected, producer, transformer).await
    }
}

/// Join the upstream stages and decide the overall result of a run.
///
/// The collector has dropped its receivers by now, so both upstream stages
/// unwind on their own and the join is bounded.
async fn settle(
    collected: Result<CollectSummary>,
    producer: JoinHandle<Result<usize>>,
    transformer: JoinHandle<Result<TransformReport>>,
) -> Result<CollectSummary> {
    let summary = match collected {
        Ok(summary) => summary,
        Err(e @ Error::Starved { .. }) => {
            // The outcome channels closed early: a failed stage is the cause.
            let (produced, transformed) = join_stages(producer, transformer).await;
            transformed?;
            produced?;
            return Err(e);
        }
        Err(e) => {
            // Anything upstream reports now is fallout from the collector leaving.
            producer.abort();
            transformer.abort();
            return Err(e);
        }
    };

    let (produced, transformed) = join_stages(producer, transformer).await;
    match (transformed, produced) {
        (Err(Error::ChannelClosed), _) | (_, Err(Error::ChannelClosed)) => {
            tracing::warn!(
                expected = summary.total(),
                "upstream could not deliver items after the collector stopped"
            );
            Err(Error::Unconsumed {
                expected: summary.total(),
            })
        }
        (Ok(report), _) if report.emitted() > summary.total() => {
            tracing::warn!(
                expected = summary.total(),
                emitted = report.emitted(),
                "collector stopped before the transformer finished"
            );
            Err(Error::Unconsumed {
                expected: summary.total(),
            })
        }
        (Err(e), _) | (Ok(_), Err(e)) => Err(e),
        (Ok(_), Ok(_)) => Ok(summary),
    }
}

async fn join_stages(
    producer: JoinHandle<Result<usize>>,
    transformer: JoinHandle<Result<TransformReport>>,
) -> (Result<usize>, Result<TransformReport>) {
    let (produced, transformed) = tokio::join!(producer, transformer);
    (
        produced.map_err(Error::from).and_then(|r| r),
        transformed.map_err(Error::from).and_then(|r| r),
    )
}
