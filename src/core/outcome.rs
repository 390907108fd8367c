//! Values exchanged between the stages and reported back to the caller.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An unvalidated input token awaiting conversion.
pub type RawItem = String;

/// What the collector hands to its sink: a result from the output channel or
/// a failure from the error channel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Outcome<T, E> {
    /// A successfully computed value
    Processed(T),
    /// A description of why one input could not be converted
    Failed(E),
}

impl<T, E> Outcome<T, E> {
    /// Returns true if this outcome came from the output channel
    pub fn is_processed(&self) -> bool {
        matches!(self, Outcome::Processed(_))
    }

    /// Returns true if this outcome came from the error channel
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// The processed value, if any
    pub fn processed(self) -> Option<T> {
        match self {
            Outcome::Processed(value) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    /// The failure, if any
    pub fn failed(self) -> Option<E> {
        match self {
            Outcome::Processed(_) => None,
            Outcome::Failed(error) => Some(error),
        }
    }

    /// Convert into a standard `Result`
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Processed(value) => Ok(value),
            Outcome::Failed(error) => Err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Processed(value),
            Err(error) => Outcome::Failed(error),
        }
    }
}

impl<T: fmt::Display, E: fmt::Display> fmt::Display for Outcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Processed(value) => write!(f, "Processed result: {}", value),
            Outcome::Failed(error) => write!(f, "Error: {}", error),
        }
    }
}

/// When the collector stops waiting for outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// Stop after exactly this many outcomes
    Count(usize),
    /// Stop once both outcome channels have closed
    #[default]
    Drain,
}

impl Termination {
    /// Whether the collector should wait for another outcome after `observed`
    pub fn wants_more(&self, observed: usize) -> bool {
        match self {
            Termination::Count(expected) => observed < *expected,
            Termination::Drain => true,
        }
    }
}

/// Counts observed by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollectSummary {
    /// Outcomes received from the output channel
    pub processed: usize,
    /// Outcomes received from the error channel
    pub failed: usize,
}

impl CollectSummary {
    pub fn total(&self) -> usize {
        self.processed + self.failed
    }

    pub(crate) fn record<T, E>(&mut self, outcome: &Outcome<T, E>) {
        match outcome {
            Outcome::Processed(_) => self.processed += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Counts kept by the transformer stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransformReport {
    /// Items received from the input channel
    pub consumed: usize,
    /// Results sent on the output channel
    pub processed: usize,
    /// Failures sent on the error channel
    pub failed: usize,
}

impl TransformReport {
    /// Outcomes delivered to either channel
    pub fn emitted(&self) -> usize {
        self.processed + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        let ok: Outcome<i128, String> = Outcome::Processed(16);
        let err: Outcome<i128, String> = Outcome::Failed("invalid input: a".to_string());

        assert_eq!(ok.to_string(), "Processed result: 16");
        assert_eq!(err.to_string(), "Error: invalid input: a");
    }

    #[test]
    fn test_outcome_from_result() {
        let outcome: Outcome<u8, &str> = Ok(3).into();
        assert!(outcome.is_processed());
        assert_eq!(outcome.processed(), Some(3));

        let outcome: Outcome<u8, &str> = Err("bad").into();
        assert!(outcome.is_failed());
        assert_eq!(outcome.into_result(), Err("bad"));
    }

    #[test]
    fn test_termination() {
        assert!(!Termination::Count(0).wants_more(0));
        assert!(Termination::Count(2).wants_more(1));
        assert!(!Termination::Count(2).wants_more(2));
        assert!(Termination::Drain.wants_more(usize::MAX));
        assert_eq!(Termination::default(), Termination::Drain);
    }

    #[test]
    fn test_summary_record() {
        let mut summary = CollectSummary::default();
        summary.record(&Outcome::<i32, ()>::Processed(1));
        summary.record(&Outcome::<i32, ()>::Failed(()));
        summary.record(&Outcome::<i32, ()>::Processed(2));

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 3);
    }
}
