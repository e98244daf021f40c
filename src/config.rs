//! # Analysis Configuration
//!
//! Named thresholds used by the aggregator, the comparator and the summary, and
//! [`AnalysisConfig`], which bundles them for a stream.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{grammar::TalkerType, stream::CaptureFraming};

/// Lower bound (exclusive) of a plausible RMC fix interval, in seconds.
pub const PLAUSIBLE_INTERVAL_MIN: f64 = 0.5;
/// Upper bound (exclusive) of a plausible RMC fix interval, in seconds.
pub const PLAUSIBLE_INTERVAL_MAX: f64 = 2.0;

/// Expected gap between two fixes, in seconds.
pub const TARGET_FIX_INTERVAL: f64 = 1.0;
/// Allowed deviation of the average interval when comparing two streams.
pub const SYNC_INTERVAL_TOLERANCE: f64 = 0.1;
/// Allowed deviation of the average interval of a single serial stream.
pub const SERIAL_INTERVAL_TOLERANCE: f64 = 0.2;
/// Allowed deviation of the average interval in a stream summary.
pub const SUMMARY_TIMING_TOLERANCE: f64 = 0.05;

/// Minimum `min/max` ratio of two streams' sentence counts.
pub const MIN_COUNT_RATIO: f64 = 0.8;
/// Minimum share of the smaller stream's sentences found in the other stream.
pub const MIN_OVERLAP_RATIO: f64 = 0.5;
/// Minimum number of sentence types present in both streams.
pub const MIN_SHARED_TYPES: usize = 4;

/// Streams with fewer checksum and format errors than this are mostly valid.
pub const MINOR_ISSUE_LIMIT: usize = 5;
/// Success rate, in percent, a stream needs to pass.
pub const MIN_SUCCESS_RATE: f64 = 95.0;
/// Distinct sentence types a stream needs to pass.
pub const MIN_DISTINCT_TYPES: usize = 4;
/// Sentences per second of capture a stream needs to pass.
pub const MIN_SENTENCE_RATE: f64 = 5.0;
/// Sentence types a receiver is expected to emit every fix.
pub const EXPECTED_TYPES: [TalkerType; 4] = [
    TalkerType::Rmc,
    TalkerType::Gga,
    TalkerType::Gsa,
    TalkerType::GpGsv,
];

/// Marker a logic-analyzer UART decoder puts before the decoded bytes.
pub const DEFAULT_CAPTURE_MARKER: &str = "uart-1:";
/// Placeholder for an unprintable byte in capture output.
pub const DEFAULT_PLACEHOLDER: &str = "??";
/// Lines buffered between a producer and its stream worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Open interval of plausible gaps between consecutive fixes.
///
/// Gaps outside the window come from dropped or duplicated sentences and are
/// left out of the interval samples.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalWindow {
    pub min: f64,
    pub max: f64,
}

impl IntervalWindow {
    /// Whether `interval` lies strictly inside the window.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_analyzer::config::IntervalWindow;
    ///
    /// let window = IntervalWindow::default();
    /// assert!(window.contains(1.0));
    /// assert!(!window.contains(0.5));
    /// assert!(!window.contains(2.0));
    /// ```
    pub fn contains(&self, interval: f64) -> bool {
        self.min < interval && interval < self.max
    }
}

impl Default for IntervalWindow {
    fn default() -> Self {
        IntervalWindow {
            min: PLAUSIBLE_INTERVAL_MIN,
            max: PLAUSIBLE_INTERVAL_MAX,
        }
    }
}

/// Thresholds two streams must meet to be considered consistent.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsistencyThresholds {
    pub min_count_ratio: f64,
    pub min_overlap_ratio: f64,
    pub min_shared_types: usize,
    pub target_interval: f64,
    pub interval_tolerance: f64,
}

impl ConsistencyThresholds {
    /// Whether `average` is within the tolerance of the target interval.
    pub fn interval_ok(&self, average: f64) -> bool {
        let tolerance = self.interval_tolerance;
        (self.target_interval - tolerance..=self.target_interval + tolerance).contains(&average)
    }
}

impl Default for ConsistencyThresholds {
    fn default() -> Self {
        ConsistencyThresholds {
            min_count_ratio: MIN_COUNT_RATIO,
            min_overlap_ratio: MIN_OVERLAP_RATIO,
            min_shared_types: MIN_SHARED_TYPES,
            target_interval: TARGET_FIX_INTERVAL,
            interval_tolerance: SYNC_INTERVAL_TOLERANCE,
        }
    }
}

/// Settings for analysing one or two streams.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::config::{AnalysisConfig, IntervalWindow, SERIAL_INTERVAL_TOLERANCE};
/// use nmea0183_analyzer::stream::CaptureFraming;
///
/// let config = AnalysisConfig::new()
///     .interval_window(IntervalWindow { min: 0.2, max: 5.0 })
///     .interval_tolerance(SERIAL_INTERVAL_TOLERANCE)
///     .framing(CaptureFraming::new("uart-0:", "??"))
///     .retain_sentences(false);
///
/// assert_eq!(config.thresholds.interval_tolerance, 0.2);
/// assert!(!config.retain_sentences);
/// ```
#[must_use]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Plausible RMC interval window
    pub window: IntervalWindow,

    /// Comparison thresholds
    pub thresholds: ConsistencyThresholds,

    /// Capture framing for lines from a logic-analyzer decoder
    pub framing: CaptureFraming,

    /// Keep the exact text of every sentence for overlap comparison.
    ///
    /// Turn off for unbounded streams that will never be compared.
    pub retain_sentences: bool,

    /// Allowed deviation of the average interval in a stream summary
    pub summary_tolerance: f64,
}

impl AnalysisConfig {
    /// Creates a configuration with the default thresholds.
    ///
    /// The default settings are:
    /// - Interval window: `(0.5, 2.0)` seconds
    /// - Comparison: count ratio 0.8, overlap 0.5, 4 shared types, 1.0 ± 0.1 s
    /// - Framing: `uart-1:` marker, `??` placeholder
    /// - Sentence retention: on
    pub fn new() -> Self {
        AnalysisConfig {
            window: IntervalWindow::default(),
            thresholds: ConsistencyThresholds::default(),
            framing: CaptureFraming::default(),
            retain_sentences: true,
            summary_tolerance: SUMMARY_TIMING_TOLERANCE,
        }
    }

    pub fn interval_window(mut self, window: IntervalWindow) -> Self {
        self.window = window;
        self
    }

    pub fn thresholds(mut self, thresholds: ConsistencyThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Sets only the allowed deviation of the average interval from the target.
    ///
    /// Use [`SERIAL_INTERVAL_TOLERANCE`] for a single serial stream.
    pub fn interval_tolerance(mut self, tolerance: f64) -> Self {
        self.thresholds.interval_tolerance = tolerance;
        self
    }

    pub fn framing(mut self, framing: CaptureFraming) -> Self {
        self.framing = framing;
        self
    }

    pub fn retain_sentences(mut self, retain: bool) -> Self {
        self.retain_sentences = retain;
        self
    }

    pub fn summary_tolerance(mut self, tolerance: f64) -> Self {
        self.summary_tolerance = tolerance;
        self
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig::new()
    }
}
