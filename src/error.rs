//! # Error Types
//!
//! This module defines the error types used throughout the analysis engine.
//!
//! Two layers exist:
//! - [`Error`] / [`IResult`] are the nom-facing errors produced by the checksum
//!   claim parser and the per-field grammar predicates.
//! - [`NotASentence`], [`Fault`], [`Inconsistency`] and [`StreamError`] are the
//!   values callers see. None of the per-sentence ones abort a stream scan; they
//!   are counted and reported.

use nom::error::{ErrorKind, FromExternalError, ParseError};
use std::fmt::Debug;

use crate::grammar::TalkerType;

/// Holds the result of parsing functions.
///
/// It depends on the input type `I`, the output type `O`, and the error type `E`
/// (by default `nom::error::Error<I>`).
///
/// The `Ok` side is a pair containing the remainder of the input (the part of the data that
/// was not parsed) and the produced value. The `Err` side contains an instance of `nom::Err`.
pub type IResult<I, O, E = nom::error::Error<I>> = nom::IResult<I, O, Error<E>>;

/// Errors raised by the nom parsers inside the engine.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// The provided input contains non-ASCII characters.
    ///
    /// The checksum is defined over ASCII bytes only.
    NonAscii,

    /// The checksum of the sentence was incorrect.
    ChecksumMismatch {
        /// The checksum calculated from the message content
        expected: u8,
        /// The checksum found in the message
        found: u8,
    },

    /// The sentence could not be parsed because its format was invalid.
    ParsingError(E),
}

impl<I, E> ParseError<I> for Error<E>
where
    E: ParseError<I>,
{
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Error::ParsingError(E::from_error_kind(input, kind))
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I, E, EX> FromExternalError<I, EX> for Error<E>
where
    E: FromExternalError<I, EX>,
{
    fn from_external_error(input: I, kind: ErrorKind, e: EX) -> Self {
        Error::ParsingError(E::from_external_error(input, kind, e))
    }
}

/// The input line is not an NMEA sentence (empty, or no leading `$`).
///
/// Terminal for the line: it is never checksum- or format-checked and is
/// counted separately from checksum and format errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a valid NMEA sentence: {line:?}")]
pub struct NotASentence {
    /// The trimmed input line
    pub line: String,
}

/// Why a sentence failed its checksum or grammar check.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    /// No `*` delimiter in the sentence.
    #[error("no checksum delimiter found")]
    MissingChecksum,

    /// The characters after `*` are not two hexadecimal digits.
    #[error("checksum parsing error: {0:?} is not a two-digit hex value")]
    MalformedChecksum(String),

    /// The payload contains non-ASCII characters.
    #[error("payload contains non-ASCII characters")]
    NonAscii,

    /// The claimed checksum differs from the computed one.
    #[error("checksum mismatch: expected {found:02X}, got {expected:02X}")]
    ChecksumMismatch {
        /// Computed over the payload
        expected: u8,
        /// Claimed after `*`
        found: u8,
    },

    /// Field 0 names no known grammar.
    #[error("unknown sentence type {0:?}")]
    UnknownSentence(String),

    /// Wrong number of fields for the grammar.
    #[error("format invalid for {talker}: expected {expected} fields, found {found}")]
    FieldCount {
        talker: TalkerType,
        expected: usize,
        found: usize,
    },

    /// A field did not satisfy its rule.
    #[error("format invalid for {talker}: field {index} {value:?}")]
    InvalidField {
        talker: TalkerType,
        /// Index into the sentence fields (field 0 is the header)
        index: usize,
        value: String,
    },

    /// The text after the payload is not `*` followed by two uppercase hex digits.
    #[error("format invalid for {talker}: bad checksum suffix {suffix:?}")]
    ChecksumSuffix { talker: TalkerType, suffix: String },
}

/// A failed consistency check between two streams.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Inconsistency {
    #[error("sentence count mismatch: {first} vs {second} (ratio {ratio:.2})")]
    CountRatio {
        first: usize,
        second: usize,
        ratio: f64,
    },

    #[error("insufficient matching sentences (overlap {ratio:.2})")]
    Overlap { ratio: f64 },

    #[error("only {shared} sentence types in common, need {required}")]
    SharedTypes { shared: usize, required: usize },

    #[error("stream {stream} has no RMC fix intervals")]
    NoIntervals { stream: usize },

    #[error("stream {stream} average interval {average:.3}s deviates from target")]
    IntervalDeviation { stream: usize, average: f64 },
}

/// Failures of the threaded capture harness.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The worker thread could not be started.
    #[error("failed to spawn aggregator thread {name:?}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The worker thread panicked before closing its stream.
    #[error("aggregator thread {name:?} panicked")]
    WorkerPanicked { name: String },
}
