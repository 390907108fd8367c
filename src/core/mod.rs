//! Core traits and types for the splitweld library.
//!
//! This module contains the stage traits, the error type and the values that
//! travel between stages.

pub mod error;
pub mod outcome;
pub mod traits;

// Re-export core items
pub use error::{Error, Result};
pub use outcome::{CollectSummary, Outcome, RawItem, Termination, TransformReport};
pub use traits::{Sink, Source, Transformer};
