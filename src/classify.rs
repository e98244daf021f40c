//! # Sentence Classification
//!
//! Turns one line of text into a [`ValidationResult`]: checksum verdict, grammar
//! verdict, talker type and decoded values.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    decode::Derived,
    error::{Fault, NotASentence},
    grammar::{Grammar, TalkerType},
    nmea0183::{Frame, frame, inspect},
};

/// A line that starts with `$`, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence<'a> {
    /// The trimmed line
    pub text: &'a str,
    /// Payload and checksum suffix
    pub frame: Frame<'a>,
    /// Comma split of `$` + payload; field 0 is the header
    pub fields: Vec<&'a str>,
}

impl<'a> Sentence<'a> {
    /// Trims `line` and splits it into fields.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_analyzer::classify::Sentence;
    ///
    /// let sentence = Sentence::parse("  $GNTXT,01,01,02,ANTENNA OK*28\r\n").unwrap();
    /// assert_eq!(sentence.header(), "$GNTXT");
    /// assert_eq!(sentence.fields.len(), 5);
    /// assert_eq!(sentence.frame.suffix, Some("28"));
    ///
    /// assert!(Sentence::parse("").is_err());
    /// assert!(Sentence::parse("GNTXT,01,01,02,ANTENNA OK*28").is_err());
    /// ```
    pub fn parse(line: &'a str) -> Result<Self, NotASentence> {
        let text = line.trim();
        let (_, frame) = frame(text).map_err(|_| NotASentence {
            line: text.to_owned(),
        })?;

        let fields = text[..1 + frame.payload.len()].split(',').collect();

        Ok(Sentence {
            text,
            frame,
            fields,
        })
    }

    /// Field 0, the `$`-prefixed talker and sentence identifier.
    pub fn header(&self) -> &'a str {
        self.fields.first().copied().unwrap_or_default()
    }

    pub fn talker_type(&self) -> TalkerType {
        TalkerType::from_header(self.header())
    }

    /// Checks the fields and suffix against the grammar for the header.
    pub fn check_format(&self) -> Result<(), Fault> {
        match Grammar::lookup(self.header()) {
            Some(grammar) => grammar.validate(&self.fields, self.frame.suffix),
            None => Err(Fault::UnknownSentence(self.header().to_owned())),
        }
    }
}

/// Everything learned from a single sentence.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// The trimmed sentence text
    pub sentence: String,
    pub talker_type: TalkerType,
    /// The verified checksum, or why it failed
    pub checksum: Result<u8, Fault>,
    /// Grammar verdict
    pub format: Result<(), Fault>,
    pub derived: Derived,
}

impl ValidationResult {
    pub fn checksum_ok(&self) -> bool {
        self.checksum.is_ok()
    }

    pub fn format_ok(&self) -> bool {
        self.format.is_ok()
    }

    /// Both the checksum and the format are correct.
    pub fn valid(&self) -> bool {
        self.checksum_ok() && self.format_ok()
    }
}

/// Classifies one line of text.
///
/// The checksum and the grammar are always both evaluated, and decoding runs
/// for every recognized talker whether or not the sentence is valid.
///
/// # Errors
///
/// [`NotASentence`] if the trimmed line is empty or does not start with `$`.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::{classify, grammar::TalkerType};
///
/// let result = classify("$GNTXT,01,01,02,ANTENNA OK*28").unwrap();
/// assert!(result.valid());
/// assert_eq!(result.talker_type, TalkerType::Txt);
///
/// let result = classify("$XXUNK,1,2*00").unwrap();
/// assert!(!result.checksum_ok());
/// assert!(!result.format_ok());
/// assert_eq!(result.talker_type, TalkerType::Unknown);
///
/// assert!(classify("hello").is_err());
/// ```
pub fn classify(line: &str) -> Result<ValidationResult, NotASentence> {
    let sentence = Sentence::parse(line)?;
    let talker_type = sentence.talker_type();

    let checksum = inspect(&sentence.frame);
    let format = sentence.check_format();
    let derived = Derived::decode(talker_type, &sentence.fields);

    if let Err(fault) = &checksum {
        tracing::debug!(sentence = sentence.text, %fault, "checksum invalid");
    }
    if let Err(fault) = &format {
        tracing::debug!(sentence = sentence.text, %fault, "format invalid");
    }
    tracing::trace!(
        sentence = sentence.text,
        %talker_type,
        checksum_ok = checksum.is_ok(),
        format_ok = format.is_ok(),
        "classified"
    );

    Ok(ValidationResult {
        sentence: sentence.text.to_owned(),
        talker_type,
        checksum,
        format,
        derived,
    })
}
