//! # Stream Analysis
//!
//! Folds a sequence of raw lines into [`StreamStats`], summarizes a single
//! stream and compares two streams captured at the same time from different
//! outputs of the same device.
//!
//! ```text
//! raw lines -> CaptureFraming -> classify -> StreamAggregator -> ClosedStream
//!                                                                   |
//!                                          ClosedStream -> compare -> ComparisonReport
//! ```

mod aggregate;
mod capture;
mod channel;
mod compare;
mod summary;

pub use aggregate::{ClosedStream, StreamAggregator, StreamStats};
pub use capture::CaptureFraming;
pub use channel::{CapturedLine, PairAnalysis, StreamWorker, analyze_pair};
pub use compare::{ComparisonReport, compare};
pub use summary::{CoordinateSummary, StreamSummary, TimingSummary, Verdict};
