use nom::{
    Parser,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{opt, recognize, rest},
    error::ErrorKind,
};

use crate::{
    IResult,
    parsing::{consumed, digits},
};

/// Constraint on a single comma-delimited field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Exactly this text, e.g. the `M` unit after an altitude
    Literal(&'static str),
    /// A single character from the set
    OneOf(&'static str),
    /// Exactly `n` digits
    Digits(usize),
    /// Zero or more digits
    OptionalDigits,
    /// `int` digits, a decimal point, then `frac` digits (`hhmmss.ss`, `ddmm.mmmmm`)
    Fixed { int: usize, frac: usize },
    /// One or more digits followed by a decimal point and optional digits
    Decimal,
    /// Empty, digits, or digits with a decimal point
    OptionalDecimal,
    /// Any field
    Text,
    /// Free text up to the checksum; only valid as the last rule
    Rest,
}

impl FieldRule {
    /// Parses a whole field with this rule.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_analyzer::grammar::FieldRule;
    ///
    /// assert!(FieldRule::Fixed { int: 6, frac: 2 }.check("123519.00").is_ok());
    /// assert!(FieldRule::Fixed { int: 6, frac: 2 }.check("123519").is_err());
    /// assert!(FieldRule::OptionalDecimal.check("").is_ok());
    /// assert!(FieldRule::Decimal.check("").is_err());
    /// ```
    pub fn check<'a>(&self, field: &'a str) -> IResult<&'a str, &'a str> {
        match *self {
            FieldRule::Literal(literal) => consumed(tag(literal), ErrorKind::Tag).parse(field),
            FieldRule::OneOf(set) => {
                consumed(recognize(one_of(set)), ErrorKind::OneOf).parse(field)
            }
            FieldRule::Digits(n) => consumed(digits(n), ErrorKind::Digit).parse(field),
            FieldRule::OptionalDigits => consumed(digit0, ErrorKind::Digit).parse(field),
            FieldRule::Fixed { int, frac } => consumed(
                recognize((digits(int), char('.'), digits(frac))),
                ErrorKind::Float,
            )
            .parse(field),
            FieldRule::Decimal => consumed(
                recognize((digit1, char('.'), digit0)),
                ErrorKind::Float,
            )
            .parse(field),
            FieldRule::OptionalDecimal => consumed(
                recognize((digit0, opt((char('.'), digit0)))),
                ErrorKind::Float,
            )
            .parse(field),
            FieldRule::Text | FieldRule::Rest => rest.parse(field),
        }
    }
}
