use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    config::ConsistencyThresholds, error::Inconsistency, grammar::TalkerType,
    stream::ClosedStream,
};

/// How closely two simultaneously captured streams agree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    /// `min/max` of the two sentence totals
    pub count_ratio: f64,
    /// Shared sentence texts relative to the smaller sentence set
    pub overlap_ratio: f64,
    /// Talker types seen in both streams
    pub shared_types: BTreeSet<TalkerType>,
    /// Mean decoded RMC interval per stream
    pub avg_rmc_interval: (Option<f64>, Option<f64>),
    /// Mean RMC arrival interval per stream, when timestamps were supplied
    pub avg_arrival_interval: (Option<f64>, Option<f64>),
    pub consistent: bool,
    /// Every check that failed; empty iff `consistent`
    pub failures: Vec<Inconsistency>,
}

/// Compares two closed streams.
///
/// The streams are consistent when the count ratio, the overlap ratio and the
/// number of shared types reach their thresholds and both average RMC
/// intervals are within the tolerance of the target interval.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::{
///     config::{AnalysisConfig, ConsistencyThresholds},
///     stream::{StreamAggregator, compare},
/// };
///
/// let lines = ["$GNTXT,01,01,02,ANTENNA OK*28"];
/// let a = StreamAggregator::run(AnalysisConfig::default(), lines);
/// let b = StreamAggregator::run(AnalysisConfig::default(), lines);
///
/// let report = compare(&a, &b, &ConsistencyThresholds::default());
/// assert_eq!(report.count_ratio, 1.0);
/// assert_eq!(report.overlap_ratio, 1.0);
/// // One shared type and no fix intervals
/// assert!(!report.consistent);
/// ```
pub fn compare(
    a: &ClosedStream,
    b: &ClosedStream,
    thresholds: &ConsistencyThresholds,
) -> ComparisonReport {
    let (first, second) = (a.stats.total, b.stats.total);
    let count_ratio = ratio(first.min(second), first.max(second));

    let common = a.sentences.intersection(&b.sentences).count();
    let overlap_ratio = ratio(common, a.sentences.len().min(b.sentences.len()));

    let shared_types: BTreeSet<_> = a
        .stats
        .type_counts
        .keys()
        .filter(|talker| b.stats.type_counts.contains_key(talker))
        .copied()
        .collect();

    let avg_rmc_interval = (
        a.stats.average_rmc_interval(),
        b.stats.average_rmc_interval(),
    );

    let mut failures = Vec::new();

    if count_ratio < thresholds.min_count_ratio {
        failures.push(Inconsistency::CountRatio {
            first,
            second,
            ratio: count_ratio,
        });
    }

    if overlap_ratio < thresholds.min_overlap_ratio {
        failures.push(Inconsistency::Overlap {
            ratio: overlap_ratio,
        });
    }

    if shared_types.len() < thresholds.min_shared_types {
        failures.push(Inconsistency::SharedTypes {
            shared: shared_types.len(),
            required: thresholds.min_shared_types,
        });
    }

    for (stream, average) in [(1, avg_rmc_interval.0), (2, avg_rmc_interval.1)] {
        match average {
            None => failures.push(Inconsistency::NoIntervals { stream }),
            Some(average) if !thresholds.interval_ok(average) => {
                failures.push(Inconsistency::IntervalDeviation { stream, average })
            }
            Some(_) => {}
        }
    }

    for failure in &failures {
        tracing::debug!(%failure, "streams inconsistent");
    }

    ComparisonReport {
        count_ratio,
        overlap_ratio,
        shared_types,
        avg_rmc_interval,
        avg_arrival_interval: (
            a.stats.average_arrival_interval(),
            b.stats.average_arrival_interval(),
        ),
        consistent: failures.is_empty(),
        failures,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }

    numerator as f64 / denominator as f64
}
