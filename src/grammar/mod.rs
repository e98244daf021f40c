//! # Sentence Grammars
//!
//! One [`Grammar`] per supported sentence header, each an ordered list of
//! [`FieldRule`]s. The table is data: supporting a new sentence type means adding
//! an entry to [`GRAMMARS`], not touching the validator.
//!
//! ## Supported Sentence Types
//!
//! | Header  | Talker type          | Description                                |
//! |---------|----------------------|--------------------------------------------|
//! | `GNRMC` | [`TalkerType::Rmc`]   | Recommended Minimum Navigation Information |
//! | `GNGGA` | [`TalkerType::Gga`]   | Global Positioning System Fix Data         |
//! | `GNGSA` | [`TalkerType::Gsa`]   | GNSS DOP and active satellites             |
//! | `GPGSV` | [`TalkerType::GpGsv`] | GPS satellites in view                     |
//! | `BDGSV` | [`TalkerType::BdGsv`] | BeiDou satellites in view                  |
//! | `GNTXT` | [`TalkerType::Txt`]   | Text transmission                          |

mod rules;

pub use rules::FieldRule;

use nom::{Parser, bytes::complete::take_while_m_n, error::ErrorKind};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{IResult, error::Fault, parsing::consumed};

use FieldRule::*;

/// The sentence type a header resolves to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TalkerType {
    /// Recommended Minimum Navigation Information
    Rmc,
    /// Global Positioning System Fix Data
    Gga,
    /// DOP and active satellites
    Gsa,
    /// Satellites in view, GPS talker
    GpGsv,
    /// Satellites in view, BeiDou talker
    BdGsv,
    /// Text transmission
    Txt,
    /// No grammar matches the header
    Unknown,
}

impl TalkerType {
    /// Resolves field 0 of a sentence (`$` included) to its talker type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_analyzer::grammar::TalkerType;
    ///
    /// assert_eq!(TalkerType::from_header("$GNRMC"), TalkerType::Rmc);
    /// assert_eq!(TalkerType::from_header("$BDGSV"), TalkerType::BdGsv);
    /// assert_eq!(TalkerType::from_header("$XXUNK"), TalkerType::Unknown);
    /// assert_eq!(TalkerType::from_header("GNRMC"), TalkerType::Unknown);
    /// ```
    pub fn from_header(field: &str) -> Self {
        Grammar::lookup(field).map_or(TalkerType::Unknown, |g| g.talker_type)
    }

    /// The grammar for this talker type, [`None`] for [`TalkerType::Unknown`].
    pub fn grammar(self) -> Option<&'static Grammar> {
        GRAMMARS.iter().find(|g| g.talker_type == self)
    }

    pub fn name(self) -> &'static str {
        match self {
            TalkerType::Rmc => "RMC",
            TalkerType::Gga => "GGA",
            TalkerType::Gsa => "GSA",
            TalkerType::GpGsv => "GSV(GP)",
            TalkerType::BdGsv => "GSV(BD)",
            TalkerType::Txt => "TXT",
            TalkerType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TalkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field structure of one sentence type.
#[derive(Debug)]
pub struct Grammar {
    pub talker_type: TalkerType,
    /// Talker and sentence identifier, without the leading `$`
    pub header: &'static str,
    /// Rules for the fields after the header, in order
    pub rules: &'static [FieldRule],
}

/// Every supported sentence type.
///
/// ```text
/// $GNRMC,hhmmss.ss,A,ddmm.mmmmm,a,dddmm.mmmmm,a,x.x,x.x,ddmmyy,x.x,a,m,s*hh
/// $GNGGA,hhmmss.ss,ddmm.mmmmm,a,dddmm.mmmmm,a,x,xx,x.x,x.x,M,x.x,M,x.x,xxxx*hh
/// $GNGSA,a,x,xx,xx,xx,xx,xx,xx,xx,xx,xx,xx,xx,xx,x.x,x.x,x.x,x*hh
/// $GPGSV,x,x,xx,...*hh
/// $BDGSV,x,x,xx,...*hh
/// $GNTXT,xx,xx,xx,c--c*hh
/// ```
pub static GRAMMARS: &[Grammar] = &[
    Grammar {
        talker_type: TalkerType::Rmc,
        header: "GNRMC",
        rules: &[
            Fixed { int: 6, frac: 2 },
            OneOf("AV"),
            Fixed { int: 4, frac: 5 },
            OneOf("NS"),
            Fixed { int: 5, frac: 5 },
            OneOf("EW"),
            Decimal,
            OptionalDecimal,
            Digits(6),
            Text,
            Text,
            OneOf("AV"),
            Rest,
        ],
    },
    Grammar {
        talker_type: TalkerType::Gga,
        header: "GNGGA",
        rules: &[
            Fixed { int: 6, frac: 2 },
            Fixed { int: 4, frac: 5 },
            OneOf("NS"),
            Fixed { int: 5, frac: 5 },
            OneOf("EW"),
            OneOf("012"),
            Digits(2),
            Decimal,
            Decimal,
            Literal("M"),
            Decimal,
            Literal("M"),
            Text,
            Rest,
        ],
    },
    Grammar {
        talker_type: TalkerType::Gsa,
        header: "GNGSA",
        rules: &[
            OneOf("AM"),
            OneOf("123"),
            OptionalDigits,
            OptionalDigits,
            OptionalDigits,
            OptionalDigits,
            OptionalDigits,
            OptionalDigits,
            OptionalDigits,
            OptionalDigits,
            OptionalDigits,
            OptionalDigits,
            OptionalDigits,
            OptionalDigits,
            Decimal,
            Decimal,
            Decimal,
            OneOf("1234"),
        ],
    },
    Grammar {
        talker_type: TalkerType::GpGsv,
        header: "GPGSV",
        rules: &[OneOf("1234"), OneOf("1234"), Digits(2), Rest],
    },
    Grammar {
        talker_type: TalkerType::BdGsv,
        header: "BDGSV",
        rules: &[OneOf("1234"), OneOf("1234"), Digits(2), Rest],
    },
    Grammar {
        talker_type: TalkerType::Txt,
        header: "GNTXT",
        rules: &[Digits(2), Digits(2), Digits(2), Rest],
    },
];

impl Grammar {
    /// Finds the grammar whose `$`-prefixed header equals `field`.
    pub fn lookup(field: &str) -> Option<&'static Grammar> {
        let header = field.strip_prefix('$')?;
        GRAMMARS.iter().find(|g| g.header == header)
    }

    /// Checks sentence fields against this grammar.
    ///
    /// `fields` is the comma split of the sentence up to its `*` (field 0 is the
    /// header) and `suffix` the text after the `*`, if any.
    ///
    /// The field count must be exact, except that a trailing [`FieldRule::Rest`]
    /// absorbs any further comma-separated tokens. The suffix must be exactly two
    /// uppercase hexadecimal digits.
    pub fn validate(&self, fields: &[&str], suffix: Option<&str>) -> Result<(), Fault> {
        let data = fields.get(1..).unwrap_or_default();
        let open_ended = matches!(self.rules.last(), Some(Rest));

        let count_ok = if open_ended {
            data.len() >= self.rules.len()
        } else {
            data.len() == self.rules.len()
        };

        if !count_ok {
            return Err(Fault::FieldCount {
                talker: self.talker_type,
                expected: self.rules.len(),
                found: data.len(),
            });
        }

        for (index, (rule, field)) in self.rules.iter().zip(data).enumerate() {
            if rule.check(field).is_err() {
                return Err(Fault::InvalidField {
                    talker: self.talker_type,
                    index: index + 1,
                    value: (*field).to_owned(),
                });
            }
        }

        let suffix = suffix.unwrap_or_default();
        if checksum_suffix(suffix).is_err() {
            return Err(Fault::ChecksumSuffix {
                talker: self.talker_type,
                suffix: suffix.to_owned(),
            });
        }

        Ok(())
    }
}

/// Exactly two uppercase hexadecimal digits and nothing else.
fn checksum_suffix(i: &str) -> IResult<&str, &str> {
    consumed(
        take_while_m_n(2, 2, |c: char| matches!(c, '0'..='9' | 'A'..='F')),
        ErrorKind::HexDigit,
    )
    .parse(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::{fields_of, sentence};

    fn validate(text: &str) -> Result<TalkerType, Fault> {
        let (fields, suffix) = fields_of(text);
        let grammar = Grammar::lookup(fields[0])
            .ok_or_else(|| Fault::UnknownSentence(fields[0].to_owned()))?;
        grammar.validate(&fields, suffix)?;
        Ok(grammar.talker_type)
    }

    #[test]
    fn test_every_grammar_has_a_unique_header() {
        for (i, a) in GRAMMARS.iter().enumerate() {
            for b in &GRAMMARS[i + 1..] {
                assert_ne!(a.header, b.header);
                assert_ne!(a.talker_type, b.talker_type);
            }
            assert_eq!(a.talker_type.grammar().map(|g| g.header), Some(a.header));
        }
        assert!(TalkerType::Unknown.grammar().is_none());
    }

    #[test]
    fn test_valid_sentences() {
        let cases = [
            (
                "GNRMC,123519.00,A,4807.03800,N,01131.00000,E,22.4,84.4,230394,,,A,V",
                TalkerType::Rmc,
            ),
            (
                "GNRMC,000000.00,V,0000.00000,S,00000.00000,W,0.,,010100,003.1,W,V,",
                TalkerType::Rmc,
            ),
            (
                "GNGGA,123519.00,4807.03800,N,01131.00000,E,1,08,0.9,545.4,M,46.9,M,,",
                TalkerType::Gga,
            ),
            (
                "GNGGA,123519.00,4807.03800,S,01131.00000,W,0,00,99.,0.0,M,0.0,M,1.5,0000",
                TalkerType::Gga,
            ),
            (
                "GNGSA,A,3,01,02,03,04,05,06,07,08,09,10,11,12,1.5,1.0,2.0,1",
                TalkerType::Gsa,
            ),
            ("GNGSA,M,1,,,,,,,,,,,,,99.9,99.9,99.9,4", TalkerType::Gsa),
            ("GPGSV,3,1,11,01,65,123,45,02,40,210,30", TalkerType::GpGsv),
            ("GPGSV,1,1,00,", TalkerType::GpGsv),
            ("BDGSV,1,1,04,01,45,120,25", TalkerType::BdGsv),
            ("GNTXT,01,01,02,ANTENNA OK", TalkerType::Txt),
            ("GNTXT,01,01,02,", TalkerType::Txt),
        ];

        for (payload, talker) in cases {
            let text = sentence(payload);
            assert_eq!(validate(&text), Ok(talker), "Failed: {text:?}");
        }
    }

    #[test]
    fn test_invalid_fields() {
        let cases = [
            // Time without hundredths
            ("GNRMC,123519,A,4807.03800,N,01131.00000,E,22.4,84.4,230394,,,A,V", 1),
            // Status not A/V
            ("GNRMC,123519.00,X,4807.03800,N,01131.00000,E,22.4,84.4,230394,,,A,V", 2),
            // Three decimal latitude
            ("GNRMC,123519.00,A,4807.038,N,01131.00000,E,22.4,84.4,230394,,,A,V", 3),
            // Speed without decimal point
            ("GNRMC,123519.00,A,4807.03800,N,01131.00000,E,22,84.4,230394,,,A,V", 7),
            // Empty speed
            ("GNRMC,123519.00,A,4807.03800,N,01131.00000,E,,84.4,230394,,,A,V", 7),
            // Non-numeric course
            ("GNRMC,123519.00,A,4807.03800,N,01131.00000,E,22.4,abc,230394,,,A,V", 8),
            // Short date
            ("GNRMC,123519.00,A,4807.03800,N,01131.00000,E,22.4,84.4,23039,,,A,V", 9),
            // Mode not A/V
            ("GNRMC,123519.00,A,4807.03800,N,01131.00000,E,22.4,84.4,230394,,,N,V", 12),
            // Fix quality 3
            ("GNGGA,123519.00,4807.03800,N,01131.00000,E,3,08,0.9,545.4,M,46.9,M,,", 6),
            // Single digit satellite count
            ("GNGGA,123519.00,4807.03800,N,01131.00000,E,1,8,0.9,545.4,M,46.9,M,,", 7),
            // Negative geoid separation
            ("GNGGA,123519.00,4807.03800,N,01131.00000,E,1,08,0.9,545.4,M,-46.9,M,,", 11),
            // Altitude unit
            ("GNGGA,123519.00,4807.03800,N,01131.00000,E,1,08,0.9,545.4,F,46.9,M,,", 10),
            // Selection mode
            ("GNGSA,X,3,01,02,03,04,05,06,07,08,09,10,11,12,1.5,1.0,2.0,1", 1),
            // Fix type 4
            ("GNGSA,A,4,01,02,03,04,05,06,07,08,09,10,11,12,1.5,1.0,2.0,1", 2),
            // Non-numeric satellite slot
            ("GNGSA,A,3,01,02,XX,04,05,06,07,08,09,10,11,12,1.5,1.0,2.0,1", 5),
            // Non-numeric PDOP
            ("GNGSA,A,3,01,02,03,04,05,06,07,08,09,10,11,12,A,1.0,2.0,1", 15),
            // System id 5
            ("GNGSA,A,3,01,02,03,04,05,06,07,08,09,10,11,12,1.5,1.0,2.0,5", 18),
            // Message count 5
            ("GPGSV,5,1,11,01,65,123,45", 1),
            // Message index 0
            ("BDGSV,1,0,04,01,45,120,25", 2),
            // Satellites in view with three digits
            ("GPGSV,1,1,100,01,65,123,45", 3),
            // Text message number with one digit
            ("GNTXT,01,1,02,ANTENNA OK", 2),
        ];

        for (payload, index) in cases {
            let text = sentence(payload);
            match validate(&text) {
                Err(Fault::InvalidField { index: found, .. }) => {
                    assert_eq!(found, index, "Failed: {text:?}")
                }
                other => panic!("Unexpected result for {text:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_field_count() {
        let cases = [
            // Missing navigational status
            "GNRMC,123519.00,A,4807.03800,N,01131.00000,E,22.4,84.4,230394,,,A",
            // Extra VDOP
            "GNGSA,A,3,01,02,03,04,05,06,07,08,09,10,11,12,1.5,1.0,2.0,2.0,1",
            // Eleven satellite slots
            "GNGSA,A,3,01,02,03,04,05,06,07,08,09,10,11,1.5,1.0,2.0,1",
            // No satellite block
            "GPGSV,1,1,00",
            "GNTXT,01,01,02",
        ];

        for payload in cases {
            let text = sentence(payload);
            assert!(
                matches!(validate(&text), Err(Fault::FieldCount { .. })),
                "Failed: {text:?}"
            );
        }
    }

    #[test]
    fn test_rest_absorbs_commas() {
        let text = sentence("GNTXT,01,01,02,ANTENNA OK,SPARE,FIELDS");
        assert_eq!(validate(&text), Ok(TalkerType::Txt));
    }

    #[test]
    fn test_checksum_suffix() {
        let payload = "GNTXT,01,01,02,ANTENNA OK";
        for text in [
            format!("${payload}"),
            format!("${payload}*"),
            format!("${payload}*2"),
            format!("${payload}*2a"),
            format!("${payload}*280"),
            format!("${payload}*28*"),
        ] {
            assert!(
                matches!(validate(&text), Err(Fault::ChecksumSuffix { .. })),
                "Failed: {text:?}"
            );
        }

        // The grammar checks only the shape of the claim, not its value.
        assert_eq!(validate(&format!("${payload}*00")), Ok(TalkerType::Txt));
    }

    #[test]
    fn test_header_must_match_exactly() {
        for text in [
            sentence("GPRMC,123519.00,A,4807.03800,N,01131.00000,E,22.4,84.4,230394,,,A,V"),
            sentence("GNRMCX,123519.00,A,4807.03800,N,01131.00000,E,22.4,84.4,230394,,,A,V"),
            sentence("XXUNK,1,2"),
        ] {
            assert!(
                matches!(validate(&text), Err(Fault::UnknownSentence(_))),
                "Failed: {text:?}"
            );
        }
    }
}
