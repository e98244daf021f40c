//! # NMEA 0183 Analyzer
//!
//! This library validates and analyzes NMEA 0183 sentences of the form
//! `$HHHHH,D1,D2,...,Dn*CC` as emitted by a GPS receiver or simulator.
//!
//! It provides:
//! - Checksum verification with diagnostics ([`verify`], [`nmea0183::inspect`])
//! - Per-type field grammars for RMC, GGA, GSA, GSV and TXT sentences ([`grammar`])
//! - Decoding of times, positions, dates and satellite data ([`decode`])
//! - Single-pass stream statistics, summaries and two-stream consistency checks
//!   ([`stream`])
//!
//! Transport is left to the caller: feed lines from a file, a serial port or a
//! logic-analyzer dump.
//!
//! ## Usage
//!
//! ```rust
//! use nmea0183_analyzer::{classify, config::AnalysisConfig, stream::StreamAggregator};
//!
//! let result = classify("$GNTXT,01,01,02,ANTENNA OK*28").unwrap();
//! assert!(result.valid());
//!
//! let lines = [
//!     "$GNTXT,01,01,02,ANTENNA OK*28",
//!     "uart-1: $GNTXT,01,01,02,ANTENNA OK*28??",
//!     "$GNTXT,01,01,02,ANTENNA OK*29",
//! ];
//! let config = AnalysisConfig::default();
//! let closed = StreamAggregator::run(config.clone(), lines);
//! let summary = closed.stats.summary(&config);
//!
//! assert_eq!(summary.total, 3);
//! assert_eq!(summary.checksum_errors, 1);
//! ```

pub mod classify;
pub mod config;
pub mod decode;
pub mod error;
pub mod grammar;
pub mod nmea0183;
pub mod parsing;
pub mod stream;

pub use classify::{ValidationResult, classify};
pub use error::{Error, Fault, IResult, Inconsistency, NotASentence, StreamError};
pub use grammar::TalkerType;
pub use nmea0183::{checksum, format_checksum, verify};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct README;
