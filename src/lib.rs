//! # Split-and-Rejoin Channel Pipeline
//!
//! This crate runs a fixed batch of raw tokens through three concurrent
//! stages connected by channels:
//!
//! - **Producer**: sends each raw item onto the input channel, then closes it
//! - **Transformer**: converts each item and routes it to the output channel or
//!   the error channel
//! - **Collector**: waits on both channels at once and hands whichever outcome
//!   arrives to a sink, until the expected number of outcomes has been seen
//!
//! ## Example
//!
//! ```rust
//! use splitweld::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let sink = CollectSink::new();
//!     let summary = Pipeline::from_batch(
//!         vec!["4".to_string(), "9".to_string(), "a".to_string()],
//!         SquareTransformer::new(),
//!     )
//!     .collect(sink.clone())
//!     .await?;
//!
//!     assert_eq!(summary.processed, 2);
//!     assert_eq!(summary.failed, 1);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod core;
pub mod pipeline;
pub mod sinks;
pub mod sources;
pub mod stages;
pub mod transformers;

// Re-export commonly used items
pub mod prelude {
    pub use crate::core::{
        CollectSummary, Error, Outcome, RawItem, Result, Sink, Source, Termination,
        TransformReport, Transformer,
    };
    pub use crate::pipeline::{Pipeline, PipelineConfig};
    pub use crate::sinks::{CollectSink, FileSink, PrintSink};
    pub use crate::sources::{StreamSource, VecSource};
    pub use crate::transformers::{ProcessingError, SquareTransformer, TryMapTransformer};
}

// Re-export main entry points and error type
pub use batch::{run, run_async};
pub use crate::core::{Error, Result};

// Feature flags for optional dependencies
#[cfg(feature = "metrics")]
pub mod metrics;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
