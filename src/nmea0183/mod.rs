//! # NMEA 0183 Framing and Checksum
//!
//! This module splits a sentence of the form `$HHHHH,D1,D2,...,Dn*CC` into its
//! payload and checksum suffix and verifies the XOR checksum.
//!
//! Framing only requires the leading `$`. A missing `*`, a short or non-hex
//! claim and a non-ASCII payload are reported by [`inspect`] as a [`Fault`].

use nom::{
    Parser,
    branch::alt,
    bytes::complete::{take, take_until},
    character::complete::{char, hex_digit1},
    combinator::{opt, rest},
    error::ErrorKind,
    number::complete::hex_u32,
    sequence::preceded,
};

use crate::{Error, IResult, error::Fault, parsing::consumed};

/// A sentence split at its `$` and first `*` delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Text strictly between `$` and the first `*` (or the end of the sentence).
    pub payload: &'a str,
    /// Text after the first `*`, [`None`] if the sentence has no `*`.
    pub suffix: Option<&'a str>,
}

/// Splits a sentence into [`Frame`].
///
/// Fails only if the input does not start with `$`.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::nmea0183::frame;
///
/// let (_, f) = frame("$GPGGA,123456,data*41").unwrap();
/// assert_eq!(f.payload, "GPGGA,123456,data");
/// assert_eq!(f.suffix, Some("41"));
///
/// let (_, f) = frame("$GPGGA,123456,data").unwrap();
/// assert_eq!(f.suffix, None);
///
/// assert!(frame("GPGGA,123456,data*41").is_err());
/// ```
pub fn frame(i: &str) -> IResult<&str, Frame<'_>> {
    let (i, _) = char('$').parse(i)?;
    let (i, payload) = alt((take_until("*"), rest)).parse(i)?;
    let (i, suffix) = opt(preceded(char('*'), rest)).parse(i)?;

    Ok((i, Frame { payload, suffix }))
}

/// Parses the claimed checksum: the two characters following `*`.
///
/// Both hex cases are accepted. Anything after the two digits is returned as the
/// remainder and left for the grammar to judge.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::{IResult, nmea0183::claimed_checksum};
///
/// let result: IResult<_, _> = claimed_checksum("6A");
/// assert_eq!(result, Ok(("", 0x6A)));
///
/// let result: IResult<_, _> = claimed_checksum("6a\r\n");
/// assert_eq!(result, Ok(("\r\n", 0x6A)));
///
/// assert!(claimed_checksum("6").is_err());
/// assert!(claimed_checksum("6Z").is_err());
/// ```
pub fn claimed_checksum(i: &str) -> IResult<&str, u8> {
    let (i, cc) = take(2u8).parse(i)?;
    let (_, cc) = consumed(hex_digit1, ErrorKind::IsA).parse(cc)?;
    let (_, cc) = hex_u32.map(|cc| cc as u8).parse(cc)?;

    Ok((i, cc))
}

/// Calculates the NMEA 0183 checksum of a payload.
///
/// The checksum is the XOR of every byte between the `$` prefix and the `*`
/// delimiter, both excluded.
///
/// The payload is assumed to be ASCII, where bytes and characters coincide.
/// Other text is folded byte by byte over its UTF-8 encoding; [`inspect`]
/// rejects such payloads with [`Fault::NonAscii`] before comparing.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::checksum;
///
/// assert_eq!(checksum("GPGGA,123456,data"), 0x41);
/// assert_eq!(checksum(""), 0);
/// ```
pub fn checksum(payload: &str) -> u8 {
    payload
        .as_bytes()
        .iter()
        .fold(0u8, |accumulated_xor, &byte| accumulated_xor ^ byte)
}

/// Formats a checksum value as a two-digit uppercase hexadecimal string.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::format_checksum;
///
/// assert_eq!(format_checksum(0x41), "41");
/// assert_eq!(format_checksum(0x0A), "0A");
/// ```
pub fn format_checksum(checksum: u8) -> String {
    format!("{checksum:02X}")
}

/// Checks the claimed checksum of a framed sentence.
///
/// Returns the verified checksum, or the [`Fault`] that explains the failure.
pub fn inspect(frame: &Frame<'_>) -> Result<u8, Fault> {
    let suffix = frame.suffix.ok_or(Fault::MissingChecksum)?;

    let found = match verify_claim(frame.payload, suffix) {
        Ok((_, found)) => found,
        Err(nom::Err::Error(Error::NonAscii) | nom::Err::Failure(Error::NonAscii)) => {
            return Err(Fault::NonAscii);
        }
        Err(nom::Err::Error(Error::ChecksumMismatch { expected, found }))
        | Err(nom::Err::Failure(Error::ChecksumMismatch { expected, found })) => {
            return Err(Fault::ChecksumMismatch { expected, found });
        }
        Err(_) => {
            return Err(Fault::MalformedChecksum(suffix.chars().take(2).collect()));
        }
    };

    Ok(found)
}

/// Verifies the checksum of a complete sentence.
///
/// Fails when the sentence has no `$` prefix or no `*` delimiter, when the two
/// characters after `*` are not hexadecimal, or when the computed checksum
/// differs from the claimed one.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::verify;
///
/// assert!(verify("$GPGGA,123456,data*41"));
/// assert!(!verify("$GPGGA,123456,data*42"));
/// assert!(!verify("$GPGGA,123456,data"));
/// assert!(!verify("$GPGGA,123456,data*4"));
/// ```
pub fn verify(sentence: &str) -> bool {
    frame(sentence)
        .map(|(_, frame)| inspect(&frame).is_ok())
        .unwrap_or(false)
}

fn verify_claim<'a>(payload: &'a str, suffix: &'a str) -> IResult<&'a str, u8> {
    if !payload.is_ascii() {
        return Err(nom::Err::Error(Error::NonAscii));
    }

    let (i, found) = claimed_checksum(suffix)?;
    let expected = checksum(payload);

    if found != expected {
        return Err(nom::Err::Error(Error::ChecksumMismatch { expected, found }));
    }

    Ok((i, found))
}

#[cfg(test)]
mod tests {
    mod checksum;
    mod frame;
}
