//! The three pipeline stages.
//!
//! Each stage is a free async function that owns its end of the channels it
//! touches. [`Pipeline`](crate::pipeline::Pipeline) wires them together.

pub mod collector;
pub mod producer;
pub mod transformer;

pub use collector::{CollectorOptions, OutcomeReceiver};
