use std::{
    collections::{BTreeMap, HashSet},
    time::Duration,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    classify::{ValidationResult, classify},
    config::AnalysisConfig,
    decode::interval,
    grammar::TalkerType,
};

/// Counters and samples accumulated over one stream.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamStats {
    /// Sentences seen (lines starting with `$`)
    pub total: usize,
    pub valid_count: usize,
    pub checksum_error_count: usize,
    pub format_error_count: usize,
    /// Lines without a leading `$`; not part of `total`.
    ///
    /// Blank lines are skipped before classification and never counted here,
    /// although [`classify`] rejects them as not a sentence.
    pub not_a_sentence_count: usize,
    /// Sentences per recognized talker type
    pub type_counts: BTreeMap<TalkerType, usize>,
    /// Gaps between decoded RMC times, inside the plausibility window
    pub rmc_intervals: Vec<f64>,
    /// Gaps between RMC arrival times, for lines pushed with a timestamp
    pub arrival_intervals: Vec<f64>,
    pub lat_samples: Vec<f64>,
    pub lon_samples: Vec<f64>,
}

impl StreamStats {
    pub fn invalid_count(&self) -> usize {
        self.total - self.valid_count
    }

    /// Percentage of valid sentences, 0 for an empty stream.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        self.valid_count as f64 * 100.0 / self.total as f64
    }

    pub fn average_rmc_interval(&self) -> Option<f64> {
        mean(&self.rmc_intervals)
    }

    pub fn average_arrival_interval(&self) -> Option<f64> {
        mean(&self.arrival_intervals)
    }
}

pub(crate) fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// A finished stream: its statistics and the exact text of its sentences.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClosedStream {
    pub stats: StreamStats,
    /// Trimmed sentence texts; empty when retention is off
    pub sentences: HashSet<String>,
}

/// Single-pass accumulator over the lines of one stream.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::{config::AnalysisConfig, stream::StreamAggregator};
///
/// let mut aggregator = StreamAggregator::new(AnalysisConfig::default());
/// aggregator.push_line("$GNTXT,01,01,02,ANTENNA OK*28");
/// aggregator.push_line("$GNTXT,01,01,02,ANTENNA OK*00");
/// aggregator.push_line("");
/// aggregator.push_line("garbage");
///
/// let closed = aggregator.close();
/// assert_eq!(closed.stats.total, 2);
/// assert_eq!(closed.stats.valid_count, 1);
/// assert_eq!(closed.stats.checksum_error_count, 1);
/// assert_eq!(closed.stats.not_a_sentence_count, 1);
/// ```
#[derive(Debug)]
pub struct StreamAggregator {
    config: AnalysisConfig,
    stats: StreamStats,
    sentences: HashSet<String>,
    last_fix_time: Option<f64>,
    last_fix_arrival: Option<Duration>,
}

impl StreamAggregator {
    pub fn new(config: AnalysisConfig) -> Self {
        StreamAggregator {
            config,
            stats: StreamStats::default(),
            sentences: HashSet::new(),
            last_fix_time: None,
            last_fix_arrival: None,
        }
    }

    /// Aggregates every line of `lines` and closes the stream.
    pub fn run<I, S>(config: AnalysisConfig, lines: I) -> ClosedStream
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut aggregator = StreamAggregator::new(config);
        for line in lines {
            aggregator.push_line(line.as_ref());
        }
        aggregator.close()
    }

    /// Feeds one raw line, framed or plain.
    pub fn push_line(&mut self, line: &str) {
        self.push(None, line);
    }

    /// Feeds one raw line received at `at`, measured from any fixed origin.
    ///
    /// Besides the decoded-time intervals, RMC arrival gaps are recorded.
    pub fn push_timed(&mut self, at: Duration, line: &str) {
        self.push(Some(at), line);
    }

    /// Folds an already classified sentence into the statistics.
    pub fn record(&mut self, result: &ValidationResult) {
        self.record_at(None, result);
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    pub fn close(self) -> ClosedStream {
        ClosedStream {
            stats: self.stats,
            sentences: self.sentences,
        }
    }

    fn push(&mut self, at: Option<Duration>, line: &str) {
        if let Some(spans) = self.config.framing.sentences(line) {
            for span in &spans {
                self.push_sentence(at, span);
            }
            return;
        }

        let text = line.trim();
        if !text.is_empty() {
            self.push_sentence(at, text);
        }
    }

    fn push_sentence(&mut self, at: Option<Duration>, text: &str) {
        match classify(text) {
            Ok(result) => self.record_at(at, &result),
            Err(e) => {
                tracing::debug!(error = %e, "skipping line");
                self.stats.not_a_sentence_count += 1;
            }
        }
    }

    fn record_at(&mut self, at: Option<Duration>, result: &ValidationResult) {
        let stats = &mut self.stats;

        stats.total += 1;
        if !result.checksum_ok() {
            stats.checksum_error_count += 1;
        }
        if !result.format_ok() {
            stats.format_error_count += 1;
        }
        if result.valid() {
            stats.valid_count += 1;
        }

        if result.talker_type != TalkerType::Unknown {
            *stats.type_counts.entry(result.talker_type).or_default() += 1;
        }

        if self.config.retain_sentences {
            self.sentences.insert(result.sentence.clone());
        }

        if result.talker_type == TalkerType::Rmc {
            if let Some(time) = result.derived.time_of_day {
                if let Some(prev) = self.last_fix_time {
                    let gap = interval(prev, time);
                    if self.config.window.contains(gap) {
                        stats.rmc_intervals.push(gap);
                    } else {
                        tracing::debug!(interval = gap, "discarding implausible fix interval");
                    }
                }
                self.last_fix_time = Some(time);
            }

            if let Some(at) = at {
                if let Some(prev) = self.last_fix_arrival {
                    stats
                        .arrival_intervals
                        .push(at.saturating_sub(prev).as_secs_f64());
                }
                self.last_fix_arrival = Some(at);
            }
        }

        if matches!(result.talker_type, TalkerType::Rmc | TalkerType::Gga)
            && let Some(position) = result.derived.position
        {
            stats.lat_samples.push(position.latitude);
            stats.lon_samples.push(position.longitude);
        }
    }
}
