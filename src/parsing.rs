//! # Parsing Utilities
//!
//! Small nom combinators shared by the checksum engine, the grammar predicates
//! and the field decoders.

use nom::{
    AsChar, Err, Input, Mode, OutputMode, PResult, Parser, ToUsize,
    bytes::complete::{take, take_while_m_n},
    error::{ErrorKind, ParseError},
};

/// Runs `f` and fails with `e` unless it consumed the whole input.
///
/// Every grammar field and decoded token must match in full; a field such as
/// `12a` must not pass a two-digit rule just because its prefix does.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::parsing::consumed;
/// use nom::{IResult, Parser, bytes::complete::take, error::ErrorKind};
///
/// let mut parser = consumed(take(3u8), ErrorKind::Count);
/// let result: IResult<_, _> = parser.parse("abc");
/// assert!(result.is_ok());
///
/// let result: IResult<_, _> = parser.parse("abcd");
/// assert!(result.is_err());
/// ```
pub fn consumed<I, E: ParseError<I>, F>(
    f: F,
    e: ErrorKind,
) -> impl Parser<I, Output = <F as Parser<I>>::Output, Error = E>
where
    I: Input,
    F: Parser<I, Error = E>,
{
    Consumed { f, e }
}

/// Exactly `n` ASCII digits.
pub fn digits<I, E>(n: usize) -> impl Parser<I, Output = I, Error = E>
where
    I: Input,
    <I as Input>::Item: AsChar,
    E: ParseError<I>,
{
    take_while_m_n(n, n, |c: <I as Input>::Item| c.is_dec_digit())
}

/// Takes `count` characters and parses them entirely with `f`.
///
/// Used for the fixed-width leading parts of NMEA fields, such as the two
/// degree characters of a latitude.
pub fn with_take<I, E, F, C>(count: C, f: F) -> impl Parser<I, Output = F::Output, Error = E>
where
    I: Input,
    E: ParseError<I>,
    F: Parser<I, Error = E>,
    C: ToUsize,
{
    take(count).and_then(consumed(f, ErrorKind::Count))
}

struct Consumed<F> {
    f: F,
    e: ErrorKind,
}

impl<I, F> Parser<I> for Consumed<F>
where
    I: Input,
    F: Parser<I>,
{
    type Output = <F as Parser<I>>::Output;
    type Error = <F as Parser<I>>::Error;

    fn process<OM: OutputMode>(&mut self, i: I) -> PResult<OM, I, Self::Output, Self::Error> {
        let (i, o) = self.f.process::<OM>(i)?;

        if i.input_len() != 0 {
            return Err(Err::Error(OM::Error::bind(|| {
                <F as Parser<I>>::Error::from_error_kind(i, self.e)
            })));
        }

        Ok((i, o))
    }
}
