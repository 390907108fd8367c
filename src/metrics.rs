//! Counters emitted through the `metrics` facade.

use metrics::counter;

pub const ITEMS_PRODUCED: &str = "splitweld_items_produced_total";
pub const ITEMS_PROCESSED: &str = "splitweld_items_processed_total";
pub const ITEMS_FAILED: &str = "splitweld_items_failed_total";
pub const OUTCOMES_COLLECTED: &str = "splitweld_outcomes_collected_total";

pub(crate) fn record_produced() {
    counter!(ITEMS_PRODUCED).increment(1);
}

pub(crate) fn record_processed() {
    counter!(ITEMS_PROCESSED).increment(1);
}

pub(crate) fn record_failed() {
    counter!(ITEMS_FAILED).increment(1);
}

pub(crate) fn record_collected() {
    counter!(OUTCOMES_COLLECTED).increment(1);
}
