//! Transformer implementations for the splitweld library.
//!
//! [`SquareTransformer`] is the parse-and-square worker the pipeline is built
//! around; [`TryMapTransformer`] adapts any fallible closure.

use async_trait::async_trait;
use std::marker::PhantomData;
use std::num::ParseIntError;

use crate::core::{RawItem, Transformer};

/// Why one raw token could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid input: {input}")]
pub struct ProcessingError {
    input: RawItem,
    #[source]
    source: ParseIntError,
}

impl ProcessingError {
    pub fn new(input: impl Into<RawItem>, source: ParseIntError) -> Self {
        Self {
            input: input.into(),
            source,
        }
    }

    /// The offending raw text
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Take back the offending raw text
    pub fn into_input(self) -> RawItem {
        self.input
    }
}

/// Parses each token as a base-10 `i64` and squares it.
///
/// Squares are widened to `i128` so every `i64` input has a result.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquareTransformer;

impl SquareTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Parse and square a single token
    pub fn square(raw: &str) -> Result<i128, ProcessingError> {
        let number: i64 = raw
            .parse()
            .map_err(|source| ProcessingError::new(raw, source))?;
        let number = i128::from(number);
        Ok(number * number)
    }
}

#[async_trait]
impl Transformer for SquareTransformer {
    type Input = RawItem;
    type Output = i128;
    type Failure = ProcessingError;

    async fn transform(&mut self, item: RawItem) -> Result<i128, ProcessingError> {
        match Self::square(&item) {
            Ok(value) => Ok(value),
            Err(ProcessingError { source, .. }) => Err(ProcessingError::new(item, source)),
        }
    }
}

/// A transformer that applies a fallible function to each item.
pub struct TryMapTransformer<F, T, U, E> {
    f: F,
    _phantom: PhantomData<fn(T) -> Result<U, E>>,
}

impl<F, T, U, E> TryMapTransformer<F, T, U, E> {
    /// Create a new try-map transformer
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<F, T, U, E> Transformer for TryMapTransformer<F, T, U, E>
where
    F: FnMut(T) -> Result<U, E> + Send + 'static,
    T: Send + 'static,
    U: Send + 'static,
    E: Send + 'static,
{
    type Input = T;
    type Output = U;
    type Failure = E;

    async fn transform(&mut self, item: T) -> Result<U, E> {
        (self.f)(item)
    }
}
