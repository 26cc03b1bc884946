//! # wa-aggregators
//!
//! The feeder aggregators: a thread-safe tar batcher and a time-windowed
//! JSON batcher built on top of it (spec §4.5/§4.6). Unlike the container
//! engine, these are stateful objects — each instance owns one
//! mutex-guarded buffer, and mutating calls serialise on that mutex.

mod error;
mod tar_aggregator;
mod timed_json_aggregator;

pub use error::AggregatorError;
pub use tar_aggregator::TarAggregator;
pub use timed_json_aggregator::TimedJsonAggregator;
