//! Threaded aggregation of live captures.
//!
//! Each [`StreamWorker`] owns one [`StreamAggregator`] on its own thread and is
//! fed through a bounded queue. Dropping every sender ends the stream;
//! [`StreamWorker::finish`] joins the thread and hands back the closed stream.

use std::{
    sync::mpsc::{self, Receiver, SyncSender},
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{
    config::{AnalysisConfig, DEFAULT_QUEUE_CAPACITY},
    error::StreamError,
    stream::{ClosedStream, ComparisonReport, StreamAggregator, compare},
};

/// A raw line as received from a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    /// Receive time from any fixed origin, if the transport provides one
    pub at: Option<Duration>,
    pub text: String,
}

impl CapturedLine {
    pub fn new(text: impl Into<String>) -> Self {
        CapturedLine {
            at: None,
            text: text.into(),
        }
    }

    pub fn timed(at: Duration, text: impl Into<String>) -> Self {
        CapturedLine {
            at: Some(at),
            text: text.into(),
        }
    }
}

impl From<&str> for CapturedLine {
    fn from(text: &str) -> Self {
        CapturedLine::new(text)
    }
}

impl From<String> for CapturedLine {
    fn from(text: String) -> Self {
        CapturedLine::new(text)
    }
}

/// A stream aggregator running on a named thread.
#[derive(Debug)]
pub struct StreamWorker {
    name: String,
    sender: SyncSender<CapturedLine>,
    handle: JoinHandle<ClosedStream>,
}

impl StreamWorker {
    /// Starts a worker whose queue holds up to `capacity` lines.
    ///
    /// # Errors
    ///
    /// [`StreamError::Spawn`] if the thread cannot be created.
    pub fn spawn(
        name: impl Into<String>,
        config: AnalysisConfig,
        capacity: usize,
    ) -> Result<Self, StreamError> {
        let name = name.into();
        let (sender, receiver) = mpsc::sync_channel(capacity);

        let thread_name = name.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || drain(&thread_name, config, receiver))
            .map_err(|source| StreamError::Spawn {
                name: name.clone(),
                source,
            })?;

        tracing::info!(stream = %name, capacity, "stream worker started");

        Ok(StreamWorker {
            name,
            sender,
            handle,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A handle for feeding the worker. Sends block while the queue is full.
    ///
    /// Every clone must be dropped before [`finish`](Self::finish) can return.
    pub fn sender(&self) -> SyncSender<CapturedLine> {
        self.sender.clone()
    }

    /// Ends the stream and waits for the worker to close it.
    ///
    /// # Errors
    ///
    /// [`StreamError::WorkerPanicked`] if the worker thread panicked.
    pub fn finish(self) -> Result<ClosedStream, StreamError> {
        let StreamWorker {
            name,
            sender,
            handle,
        } = self;

        drop(sender);
        handle
            .join()
            .map_err(|_| StreamError::WorkerPanicked { name })
    }
}

fn drain(name: &str, config: AnalysisConfig, receiver: Receiver<CapturedLine>) -> ClosedStream {
    let mut aggregator = StreamAggregator::new(config);

    for line in receiver {
        match line.at {
            Some(at) => aggregator.push_timed(at, &line.text),
            None => aggregator.push_line(&line.text),
        }
    }

    let closed = aggregator.close();
    tracing::info!(
        stream = name,
        total = closed.stats.total,
        valid = closed.stats.valid_count,
        "stream closed"
    );

    closed
}

/// Both closed streams of a simultaneous capture and their comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct PairAnalysis {
    pub first: ClosedStream,
    pub second: ClosedStream,
    pub report: ComparisonReport,
}

/// Aggregates two line sources concurrently and compares the results.
///
/// Each source is drained on its own scoped thread into a [`StreamWorker`].
/// The comparison runs only after both workers have closed their streams.
///
/// # Errors
///
/// [`StreamError`] if a thread cannot be spawned, or if a worker or a source
/// panics.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::{config::AnalysisConfig, stream::{CapturedLine, analyze_pair}};
///
/// let usb = vec![CapturedLine::new("$GNTXT,01,01,02,ANTENNA OK*28")];
/// let gpio = vec![CapturedLine::new("uart-1: $GNTXT,01,01,02,ANTENNA OK*28??")];
///
/// let analysis = analyze_pair(&AnalysisConfig::default(), usb, gpio).unwrap();
/// assert_eq!(analysis.report.overlap_ratio, 1.0);
/// ```
pub fn analyze_pair<A, B>(
    config: &AnalysisConfig,
    first: A,
    second: B,
) -> Result<PairAnalysis, StreamError>
where
    A: IntoIterator<Item = CapturedLine> + Send,
    B: IntoIterator<Item = CapturedLine> + Send,
{
    let first_worker = StreamWorker::spawn("first", config.clone(), DEFAULT_QUEUE_CAPACITY)?;
    let second_worker = StreamWorker::spawn("second", config.clone(), DEFAULT_QUEUE_CAPACITY)?;

    let (first, second) = thread::scope(|scope| {
        let first_tx = first_worker.sender();
        let first_feed = scope.spawn(move || feed(first, first_tx));
        let second_tx = second_worker.sender();
        let second_feed = scope.spawn(move || feed(second, second_tx));

        let first = first_worker.finish();
        let second = second_worker.finish();

        first_feed
            .join()
            .map_err(|_| StreamError::WorkerPanicked {
                name: "first source".to_owned(),
            })?;
        second_feed
            .join()
            .map_err(|_| StreamError::WorkerPanicked {
                name: "second source".to_owned(),
            })?;

        Ok::<_, StreamError>((first?, second?))
    })?;

    let report = compare(&first, &second, &config.thresholds);
    tracing::info!(
        consistent = report.consistent,
        count_ratio = report.count_ratio,
        overlap_ratio = report.overlap_ratio,
        "streams compared"
    );

    Ok(PairAnalysis {
        first,
        second,
        report,
    })
}

fn feed<I: IntoIterator<Item = CapturedLine>>(lines: I, sender: SyncSender<CapturedLine>) {
    for line in lines {
        if sender.send(line).is_err() {
            break;
        }
    }
}
