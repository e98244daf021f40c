use std::{fmt, time::Duration};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    config::{
        AnalysisConfig, EXPECTED_TYPES, MIN_DISTINCT_TYPES, MIN_SENTENCE_RATE, MIN_SUCCESS_RATE,
        MINOR_ISSUE_LIMIT,
    },
    grammar::TalkerType,
    stream::{StreamStats, aggregate::mean},
};

/// Overall judgement of a stream.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No checksum or format errors
    AllValid,
    /// Fewer than [`MINOR_ISSUE_LIMIT`] checksum and format errors
    MostlyValid,
    SignificantIssues,
}

impl Verdict {
    /// Judges a stream by its checksum and format error counts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_analyzer::stream::Verdict;
    ///
    /// assert_eq!(Verdict::judge(0, 0), Verdict::AllValid);
    /// assert_eq!(Verdict::judge(2, 2), Verdict::MostlyValid);
    /// assert_eq!(Verdict::judge(3, 2), Verdict::SignificantIssues);
    /// ```
    pub fn judge(checksum_errors: usize, format_errors: usize) -> Self {
        match checksum_errors + format_errors {
            0 => Verdict::AllValid,
            n if n < MINOR_ISSUE_LIMIT => Verdict::MostlyValid,
            _ => Verdict::SignificantIssues,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::AllValid => "all sentences valid",
            Verdict::MostlyValid => "mostly valid, minor issues detected",
            Verdict::SignificantIssues => "significant issues",
        })
    }
}

/// Spread of a set of fix intervals, in seconds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingSummary {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub target: f64,
    /// The average lies within the tolerance of the target
    pub accurate: bool,
}

impl TimingSummary {
    /// Summarizes `intervals`, [`None`] if there are none.
    pub fn of(intervals: &[f64], target: f64, tolerance: f64) -> Option<Self> {
        let average = mean(intervals)?;
        let min = intervals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = intervals.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(TimingSummary {
            average,
            min,
            max,
            target,
            accurate: (target - tolerance..=target + tolerance).contains(&average),
        })
    }
}

/// Bounding box of the accepted positions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSummary {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    pub samples: usize,
}

impl CoordinateSummary {
    pub fn of(lat_samples: &[f64], lon_samples: &[f64]) -> Option<Self> {
        if lat_samples.is_empty() || lon_samples.is_empty() {
            return None;
        }

        let (lat_min, lat_max) = bounds(lat_samples);
        let (lon_min, lon_max) = bounds(lon_samples);

        Some(CoordinateSummary {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
            samples: lat_samples.len(),
        })
    }
}

fn bounds(samples: &[f64]) -> (f64, f64) {
    samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}

/// End-of-stream report on a single stream.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Percentage of valid sentences, [`None`] for an empty stream
    pub success_rate: Option<f64>,
    pub checksum_errors: usize,
    pub format_errors: usize,
    pub not_a_sentence: usize,
    /// Sentence counts ordered by talker type
    pub type_distribution: Vec<(TalkerType, usize)>,
    /// Entries of [`EXPECTED_TYPES`] never seen
    pub missing_types: Vec<TalkerType>,
    /// Decoded RMC intervals
    pub timing: Option<TimingSummary>,
    /// RMC arrival intervals
    pub arrival_timing: Option<TimingSummary>,
    pub coordinates: Option<CoordinateSummary>,
    pub verdict: Verdict,
}

impl StreamSummary {
    /// Whether at least `min_rate` percent of the sentences are valid.
    ///
    /// An empty stream never passes.
    pub fn meets_success_rate(&self, min_rate: f64) -> bool {
        self.success_rate.is_some_and(|rate| rate >= min_rate)
    }

    /// Whether a stream captured for `capture` passes.
    ///
    /// A passing stream has at least [`MIN_SUCCESS_RATE`] percent valid
    /// sentences, [`MIN_DISTINCT_TYPES`] recognized sentence types and
    /// [`MIN_SENTENCE_RATE`] sentences per second of capture. Missing
    /// [`EXPECTED_TYPES`] are reported in `missing_types` only.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    ///
    /// use nmea0183_analyzer::{config::AnalysisConfig, stream::StreamAggregator};
    ///
    /// let config = AnalysisConfig::default();
    /// let closed = StreamAggregator::run(config.clone(), ["$GNTXT,01,01,02,ANTENNA OK*28"]);
    /// let summary = closed.stats.summary(&config);
    ///
    /// assert_eq!(summary.missing_types.len(), 4);
    /// assert!(!summary.passes(Duration::from_secs(1)));
    /// ```
    pub fn passes(&self, capture: Duration) -> bool {
        let mut passed = true;

        if !self.meets_success_rate(MIN_SUCCESS_RATE) {
            tracing::debug!(rate = ?self.success_rate, "success rate too low");
            passed = false;
        }

        let types = self.type_distribution.len();
        if types < MIN_DISTINCT_TYPES {
            tracing::debug!(types, "too few sentence types");
            passed = false;
        }

        let required = capture.as_secs_f64() * MIN_SENTENCE_RATE;
        if (self.total as f64) < required {
            tracing::debug!(total = self.total, required, "too few sentences");
            passed = false;
        }

        if !self.missing_types.is_empty() {
            tracing::debug!(missing = ?self.missing_types, "expected sentence types missing");
        }

        passed
    }
}

impl StreamStats {
    /// Summarizes the stream.
    ///
    /// Decoded intervals are judged against the summary tolerance, arrival
    /// intervals against the comparison interval tolerance.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_analyzer::{
    ///     config::{AnalysisConfig, MIN_SUCCESS_RATE},
    ///     stream::{StreamAggregator, Verdict},
    /// };
    ///
    /// let config = AnalysisConfig::default();
    /// let closed = StreamAggregator::run(config.clone(), ["$GNTXT,01,01,02,ANTENNA OK*28"]);
    /// let summary = closed.stats.summary(&config);
    ///
    /// assert_eq!(summary.success_rate, Some(100.0));
    /// assert_eq!(summary.verdict, Verdict::AllValid);
    /// assert!(summary.meets_success_rate(MIN_SUCCESS_RATE));
    /// assert!(summary.timing.is_none());
    /// ```
    pub fn summary(&self, config: &AnalysisConfig) -> StreamSummary {
        let target = config.thresholds.target_interval;

        StreamSummary {
            total: self.total,
            valid: self.valid_count,
            invalid: self.invalid_count(),
            success_rate: (self.total > 0).then(|| self.success_rate()),
            checksum_errors: self.checksum_error_count,
            format_errors: self.format_error_count,
            not_a_sentence: self.not_a_sentence_count,
            type_distribution: self.type_counts.iter().map(|(&t, &n)| (t, n)).collect(),
            missing_types: EXPECTED_TYPES
                .into_iter()
                .filter(|talker| !self.type_counts.contains_key(talker))
                .collect(),
            timing: TimingSummary::of(&self.rmc_intervals, target, config.summary_tolerance),
            arrival_timing: TimingSummary::of(
                &self.arrival_intervals,
                target,
                config.thresholds.interval_tolerance,
            ),
            coordinates: CoordinateSummary::of(&self.lat_samples, &self.lon_samples),
            verdict: Verdict::judge(self.checksum_error_count, self.format_error_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::MIN_SUCCESS_RATE,
        stream::StreamAggregator,
        tests::fixtures::{GGA, GPGSV, GSA, RMC, TXT, burst, gga_at, rmc_at, sentence},
    };

    fn summarize<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> StreamSummary {
        let config = AnalysisConfig::default();
        StreamAggregator::run(config.clone(), lines).stats.summary(&config)
    }

    fn seconds(count: u32) -> Vec<String> {
        (0..count)
            .flat_map(|s| burst(&format!("1200{s:02}.00")))
            .collect()
    }

    /// RMC, GGA and GSA every second, plus `extra` if given.
    fn fixes(count: u32, extra: Option<&str>) -> Vec<String> {
        (0..count)
            .flat_map(|s| {
                let mut lines = vec![
                    rmc_at(&format!("1200{s:02}.00")),
                    sentence(GGA),
                    sentence(GSA),
                ];
                lines.extend(extra.map(sentence));
                lines
            })
            .collect()
    }

    #[test]
    fn test_verdict_boundaries() {
        assert_eq!(Verdict::judge(0, 0), Verdict::AllValid);
        assert_eq!(Verdict::judge(1, 0), Verdict::MostlyValid);
        assert_eq!(Verdict::judge(0, 4), Verdict::MostlyValid);
        assert_eq!(Verdict::judge(0, 5), Verdict::SignificantIssues);
        assert_eq!(Verdict::judge(10, 10), Verdict::SignificantIssues);
    }

    #[test]
    fn test_timing() {
        let timing = TimingSummary::of(&[1.0, 0.9, 1.2], 1.0, 0.05).unwrap();
        assert_eq!(timing.min, 0.9);
        assert_eq!(timing.max, 1.2);
        assert!((timing.average - 31.0 / 30.0).abs() < 1e-9);
        assert!(timing.accurate);

        let timing = TimingSummary::of(&[1.5, 1.5], 1.0, 0.05).unwrap();
        assert!(!timing.accurate);

        assert_eq!(TimingSummary::of(&[], 1.0, 0.05), None);
    }

    #[test]
    fn test_coordinates() {
        assert_eq!(CoordinateSummary::of(&[], &[]), None);

        let coordinates = CoordinateSummary::of(&[48.0, -33.5, 10.0], &[11.5, -70.0, 0.0]).unwrap();
        assert_eq!(coordinates.lat_min, -33.5);
        assert_eq!(coordinates.lat_max, 48.0);
        assert_eq!(coordinates.lon_min, -70.0);
        assert_eq!(coordinates.lon_max, 11.5);
        assert_eq!(coordinates.samples, 3);
    }

    #[test]
    fn test_summary() {
        let config = AnalysisConfig::default();
        let mut lines = burst("120000.00");
        lines.extend(burst("120001.00"));
        lines.push(gga_at("3330.00000", 'S', "07000.00000", 'W'));
        lines.push(format!("${RMC}*00"));
        lines.push("noise".to_owned());

        let summary = StreamAggregator::run(config.clone(), &lines).stats.summary(&config);

        assert_eq!(summary.total, 14);
        assert_eq!(summary.valid, 13);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.checksum_errors, 1);
        assert_eq!(summary.format_errors, 0);
        assert_eq!(summary.not_a_sentence, 1);
        assert_eq!(summary.verdict, Verdict::MostlyValid);
        assert!(!summary.meets_success_rate(MIN_SUCCESS_RATE));
        assert!(summary.meets_success_rate(90.0));

        assert_eq!(summary.type_distribution[0], (TalkerType::Rmc, 3));
        assert_eq!(summary.type_distribution[1], (TalkerType::Gga, 3));
        assert_eq!(summary.type_distribution.len(), 6);

        let timing = summary.timing.unwrap();
        assert_eq!(timing.average, 1.0);
        assert!(timing.accurate);
        assert_eq!(summary.arrival_timing, None);

        let coordinates = summary.coordinates.unwrap();
        assert_eq!(coordinates.samples, 6);
        assert_eq!(coordinates.lat_min, -33.5);
        assert_eq!(coordinates.lon_min, -70.0);
    }

    #[test]
    fn test_empty_summary() {
        let config = AnalysisConfig::default();
        let summary = StreamStats::default().summary(&config);

        assert_eq!(summary.success_rate, None);
        assert_eq!(summary.verdict, Verdict::AllValid);
        assert!(!summary.meets_success_rate(0.0));
        assert!(summary.type_distribution.is_empty());
        assert_eq!(summary.coordinates, None);
    }

    #[test]
    fn test_passes_sentence_rate_boundary() {
        // 10 sentences, 6 types
        let summary = summarize(&seconds(2)[..10]);
        assert!(summary.missing_types.is_empty());
        assert!(summary.passes(Duration::from_secs(2)));
        assert!(!summary.passes(Duration::from_millis(2001)));
        assert!(summary.passes(Duration::ZERO));
    }

    #[test]
    fn test_passes_success_rate_boundary() {
        // 19 valid of 20: exactly 95 %
        let mut lines = seconds(4)[..19].to_vec();
        lines.push(format!("${TXT}*00"));
        let summary = summarize(&lines);
        assert_eq!(summary.success_rate, Some(95.0));
        assert!(summary.passes(Duration::from_secs(4)));

        // 18 valid of 20
        lines[0] = format!("${RMC}*00");
        let summary = summarize(&lines);
        assert_eq!(summary.success_rate, Some(90.0));
        assert!(!summary.passes(Duration::from_secs(4)));
    }

    #[test]
    fn test_passes_distinct_types_boundary() {
        let summary = summarize(fixes(3, Some(GPGSV)));
        assert_eq!(summary.type_distribution.len(), 4);
        assert!(summary.missing_types.is_empty());
        assert!(summary.passes(Duration::from_secs(2)));

        let summary = summarize(fixes(3, None));
        assert_eq!(summary.type_distribution.len(), 3);
        assert_eq!(summary.missing_types, [TalkerType::GpGsv]);
        assert!(!summary.passes(Duration::from_secs(1)));
    }

    #[test]
    fn test_missing_types_do_not_fail() {
        let summary = summarize(fixes(3, Some(TXT)));
        assert_eq!(summary.missing_types, [TalkerType::GpGsv]);
        assert!(summary.passes(Duration::from_secs(2)));
    }

    #[test]
    fn test_empty_stream_fails() {
        let summary = StreamStats::default().summary(&AnalysisConfig::default());
        assert_eq!(summary.missing_types, EXPECTED_TYPES);
        assert!(!summary.passes(Duration::ZERO));
    }

    #[test]
    fn test_significant_issues() {
        let lines: Vec<String> = (0..5).map(|_| sentence("GNRMC,bad")).collect();
        let config = AnalysisConfig::default();
        let summary = StreamAggregator::run(config.clone(), &lines).stats.summary(&config);

        assert_eq!(summary.format_errors, 5);
        assert_eq!(summary.verdict, Verdict::SignificantIssues);
        assert_eq!(summary.success_rate, Some(0.0));
    }
}
