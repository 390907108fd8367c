//! Core traits for the three pipeline stages.
//!
//! A [`Source`] feeds raw items, a [`Transformer`] turns each item into either
//! an output or a failure, and a [`Sink`] receives the outcomes the collector
//! fans back in.

use crate::core::error::Result;
use async_trait::async_trait;

/// A source generates raw items on demand using GenStage-style demand signaling.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use splitweld::core::{Result, Source};
///
/// struct CounterSource {
///     current: u64,
///     max: u64,
/// }
///
/// #[async_trait]
/// impl Source for CounterSource {
///     type Item = String;
///
///     async fn handle_demand(&mut self, demand: usize) -> Result<Vec<Self::Item>> {
///         let mut items = Vec::with_capacity(demand);
///         while items.len() < demand && self.current <= self.max {
///             items.push(self.current.to_string());
///             self.current += 1;
///         }
///         Ok(items)
///     }
/// }
/// ```
#[async_trait]
pub trait Source {
    /// The type of items this source generates
    type Item: Send + 'static;

    /// Handle demand for multiple items.
    ///
    /// Sources return up to `demand` items, or fewer if exhausted.
    /// An empty Vec indicates the source is completely exhausted.
    async fn handle_demand(&mut self, demand: usize) -> Result<Vec<Self::Item>>;

    /// Get the next single item (convenience method).
    async fn next(&mut self) -> Result<Option<Self::Item>> {
        let items = self.handle_demand(1).await?;
        Ok(items.into_iter().next())
    }
}

/// A transformer converts one input into either an output or a failure.
///
/// A failure is an ordinary value, not an `Err` of the stage: the transformer
/// stage routes it onto the error channel and moves on to the next item.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use splitweld::core::Transformer;
///
/// struct Halve;
///
/// #[async_trait]
/// impl Transformer for Halve {
///     type Input = u32;
///     type Output = u32;
///     type Failure = String;
///
///     async fn transform(&mut self, item: u32) -> Result<u32, String> {
///         if item % 2 == 0 {
///             Ok(item / 2)
///         } else {
///             Err(format!("{} is odd", item))
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Transformer {
    /// The type of items this transformer accepts
    type Input: Send + 'static;
    /// The type of successful results
    type Output: Send + 'static;
    /// The type describing why an input could not be converted
    type Failure: Send + 'static;

    /// Transform a single input.
    async fn transform(
        &mut self,
        item: Self::Input,
    ) -> std::result::Result<Self::Output, Self::Failure>;
}

/// A sink receives every outcome the collector observes.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use splitweld::core::{Result, Sink};
///
/// struct LogSink;
///
/// #[async_trait]
/// impl Sink for LogSink {
///     type Item = String;
///
///     async fn write(&mut self, item: Self::Item) -> Result<()> {
///         println!("Received: {}", item);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Sink {
    /// The type of items this sink accepts
    type Item: Send + 'static;

    /// Accept a single item.
    async fn write(&mut self, item: Self::Item) -> Result<()>;

    /// Called once after the collector has observed its last outcome.
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
