//! Source implementations for the splitweld library.
//!
//! This module provides the sources the producer stage drains into the input
//! channel.

use async_trait::async_trait;
use futures_core::Stream;
use std::collections::VecDeque;
use std::future::poll_fn;
use std::pin::Pin;
use std::task::Poll;
use tokio_stream::StreamExt;

use crate::core::{Result, Source};

/// A source that yields items from an in-memory batch, in order
pub struct VecSource<T> {
    items: VecDeque<T>,
}

impl<T> VecSource<T> {
    /// Create a new vector source
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Check if the source has more items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of remaining items
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> FromIterator<T> for VecSource<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl<T: Send + 'static> Source for VecSource<T> {
    type Item = T;

    async fn handle_demand(&mut self, demand: usize) -> Result<Vec<Self::Item>> {
        let take = demand.min(self.items.len());
        Ok(self.items.drain(..take).collect())
    }
}

/// A source that pulls items from an async stream.
///
/// A demand waits for the first item, then takes whatever else is already
/// ready, up to `demand`, without waiting further. The stream ending is the
/// end of the batch. A stream that never ends keeps the producer alive until
/// the transformer stops; pair it with [`Termination::Drain`] only when the
/// stream is finite, or bound the run with a timeout or a cancellation token.
///
/// [`Termination::Drain`]: crate::core::Termination::Drain
pub struct StreamSource<S> {
    stream: S,
    done: bool,
}

impl<S> StreamSource<S>
where
    S: Stream + Send + Unpin,
{
    /// Create a new stream source
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            done: false,
        }
    }
}

#[async_trait]
impl<S> Source for StreamSource<S>
where
    S: Stream + Send + Unpin,
    S::Item: Send + 'static,
{
    type Item = S::Item;

    async fn handle_demand(&mut self, demand: usize) -> Result<Vec<Self::Item>> {
        if self.done || demand == 0 {
            return Ok(Vec::new());
        }

        let Some(first) = self.stream.next().await else {
            self.done = true;
            return Ok(Vec::new());
        };
        let mut items = vec![first];

        while items.len() < demand {
            let stream = &mut self.stream;
            match poll_fn(|cx| Poll::Ready(Pin::new(&mut *stream).poll_next(cx))).await {
                Poll::Ready(Some(item)) => items.push(item),
                Poll::Ready(None) => {
                    self.done = true;
                    break;
                }
                Poll::Pending => break,
            }
        }
        Ok(items)
    }
}
