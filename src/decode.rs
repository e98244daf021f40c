//! # Field Decoding
//!
//! Converts raw sentence fields into typed values. Every decoder returns
//! [`None`] when it cannot produce a value; a declined decode is never an error
//! and simply leaves the derived value unreported.

use nom::{
    Parser,
    character::complete::{u8, u32},
    error::ErrorKind,
    number::complete::double,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    IResult,
    grammar::TalkerType,
    parsing::{consumed, with_take},
};

/// Length of a day, added to a negative interval on midnight rollover.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of satellite id slots in a GSA sentence.
pub const GSA_SLOTS: usize = 12;

/// A decoded position in decimal degrees, negative south and west.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Field indices to decode for one talker type.
///
/// Indices count field 0 (the `$` header) as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldLayout {
    /// `hhmmss.ss` time of day
    pub time: Option<usize>,
    /// First of four fields: latitude, N/S, longitude, E/W
    pub position: Option<usize>,
    /// `ddmmyy` date
    pub date: Option<usize>,
    /// Satellites in use or in view
    pub satellites: Option<usize>,
    /// First of [`GSA_SLOTS`] satellite id slots
    pub prns: Option<usize>,
}

impl FieldLayout {
    pub const fn of(talker: TalkerType) -> Self {
        match talker {
            TalkerType::Rmc => FieldLayout {
                time: Some(1),
                position: Some(3),
                date: Some(9),
                satellites: None,
                prns: None,
            },
            TalkerType::Gga => FieldLayout {
                time: Some(1),
                position: Some(2),
                date: None,
                satellites: Some(7),
                prns: None,
            },
            TalkerType::Gsa => FieldLayout {
                time: None,
                position: None,
                date: None,
                satellites: None,
                prns: Some(3),
            },
            TalkerType::GpGsv | TalkerType::BdGsv => FieldLayout {
                time: None,
                position: None,
                date: None,
                satellites: Some(3),
                prns: None,
            },
            TalkerType::Txt | TalkerType::Unknown => FieldLayout {
                time: None,
                position: None,
                date: None,
                satellites: None,
                prns: None,
            },
        }
    }
}

/// Values decoded from a sentence's fields.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derived {
    /// Seconds since midnight
    pub time_of_day: Option<f64>,
    /// Range-checked position
    pub position: Option<Position>,
    /// Fix date in UTC
    pub fix_date: Option<time::Date>,
    /// Satellites in use (GGA) or in view (GSV)
    pub satellites: Option<u8>,
    /// Non-empty satellite id slots of a GSA
    pub active_prns: heapless::Vec<u8, GSA_SLOTS>,
}

impl Derived {
    /// Decodes the fields named by the talker's [`FieldLayout`].
    ///
    /// Out-of-range indices decode to nothing, so truncated sentences are safe.
    pub fn decode(talker: TalkerType, fields: &[&str]) -> Self {
        let layout = FieldLayout::of(talker);
        let field = |index: Option<usize>| index.and_then(|i| fields.get(i).copied());

        let position = layout.position.and_then(|i| match fields.get(i..i + 4) {
            Some(&[lat, lat_hemisphere, lon, lon_hemisphere]) => {
                position(lat, lat_hemisphere, lon, lon_hemisphere)
            }
            _ => None,
        });

        let active_prns = layout
            .prns
            .and_then(|i| fields.get(i..))
            .map(|slots| active_prns(&slots[..slots.len().min(GSA_SLOTS)]))
            .unwrap_or_default();

        Derived {
            time_of_day: field(layout.time).and_then(time_of_day),
            position,
            fix_date: field(layout.date).and_then(fix_date),
            satellites: field(layout.satellites).and_then(satellite_count),
            active_prns,
        }
    }
}

/// Decodes `hhmmss.ss` into seconds since midnight.
///
/// Needs at least six characters: two hour digits, two minute digits, then the
/// seconds as a decimal number.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::decode::time_of_day;
///
/// assert_eq!(time_of_day("123519.50"), Some(45_319.5));
/// assert_eq!(time_of_day("000001"), Some(1.0));
/// assert_eq!(time_of_day("12351"), None);
/// assert_eq!(time_of_day("12a519"), None);
/// ```
pub fn time_of_day(field: &str) -> Option<f64> {
    if field.chars().count() < 6 {
        return None;
    }

    let result: IResult<_, _> = consumed(
        (with_take(2u8, u32), with_take(2u8, u32), double),
        ErrorKind::Float,
    )
    .parse(field);

    let (_, (hours, minutes, seconds)) = result.ok()?;
    let time = f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + seconds;
    time.is_finite().then_some(time)
}

/// Gap between two decoded times of day, corrected for midnight rollover.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::decode::{interval, time_of_day};
///
/// let prev = time_of_day("235959.00").unwrap();
/// let curr = time_of_day("000001.00").unwrap();
/// assert_eq!(interval(prev, curr), 2.0);
/// ```
pub fn interval(prev: f64, curr: f64) -> f64 {
    let gap = curr - prev;
    if gap < 0.0 { gap + SECONDS_PER_DAY } else { gap }
}

/// Decodes a `ddmm.mmmmm` latitude; negative for `S`.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::decode::latitude;
///
/// let north = latitude("4807.038", "N").unwrap();
/// assert!((north - 48.1173).abs() < 1e-4);
/// assert_eq!(latitude("4807.038", "S"), Some(-north));
/// assert_eq!(latitude("9130.000", "N"), None);
/// assert_eq!(latitude("4807.038", ""), None);
/// ```
pub fn latitude(value: &str, hemisphere: &str) -> Option<f64> {
    coordinate(value, hemisphere, 2, "S").filter(|lat| (-90.0..=90.0).contains(lat))
}

/// Decodes a `dddmm.mmmmm` longitude; negative for `W`.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::decode::longitude;
///
/// let east = longitude("01131.000", "E").unwrap();
/// assert!((east - 11.516_666).abs() < 1e-6);
/// assert_eq!(longitude("01131.000", "W"), Some(-east));
/// ```
pub fn longitude(value: &str, hemisphere: &str) -> Option<f64> {
    coordinate(value, hemisphere, 3, "W").filter(|lon| (-180.0..=180.0).contains(lon))
}

/// Decodes a latitude/longitude pair; both must decode and be in range.
pub fn position(
    lat: &str,
    lat_hemisphere: &str,
    lon: &str,
    lon_hemisphere: &str,
) -> Option<Position> {
    Some(Position {
        latitude: latitude(lat, lat_hemisphere)?,
        longitude: longitude(lon, lon_hemisphere)?,
    })
}

/// Decodes a `ddmmyy` date. Two-digit years 83..=99 are 19xx, others 20xx.
///
/// # Examples
///
/// ```rust
/// use nmea0183_analyzer::decode::fix_date;
/// use time::{Date, Month};
///
/// assert_eq!(fix_date("230394"), Date::from_calendar_date(1994, Month::March, 23).ok());
/// assert_eq!(fix_date("010125"), Date::from_calendar_date(2025, Month::January, 1).ok());
/// assert_eq!(fix_date("310225"), None);
/// ```
pub fn fix_date(field: &str) -> Option<time::Date> {
    let result: IResult<_, _> = consumed(
        (with_take(2u8, u8), with_take(2u8, u8), with_take(2u8, u8)),
        ErrorKind::Count,
    )
    .parse(field);

    let (_, (day, month, year)) = result.ok()?;
    let month = time::Month::try_from(month).ok()?;
    let year = match year {
        83..=99 => 1900 + i32::from(year),
        _ => 2000 + i32::from(year),
    };

    time::Date::from_calendar_date(year, month, day).ok()
}

/// Decodes a satellite count field.
pub fn satellite_count(field: &str) -> Option<u8> {
    let result: IResult<_, _> = consumed(u8, ErrorKind::Digit).parse(field);
    result.ok().map(|(_, count)| count)
}

/// Collects the non-empty, numeric satellite id slots.
pub fn active_prns(slots: &[&str]) -> heapless::Vec<u8, GSA_SLOTS> {
    slots
        .iter()
        .filter(|slot| !slot.is_empty())
        .filter_map(|slot| satellite_count(slot))
        .take(GSA_SLOTS)
        .collect()
}

fn coordinate(value: &str, hemisphere: &str, degree_width: u8, negative: &str) -> Option<f64> {
    if value.is_empty() || hemisphere.is_empty() {
        return None;
    }

    let result: IResult<_, _> =
        consumed((with_take(degree_width, u32), double), ErrorKind::Float).parse(value);
    let (_, (degrees, minutes)) = result.ok()?;

    let magnitude = f64::from(degrees) + minutes / 60.0;
    if hemisphere == negative {
        Some(-magnitude)
    } else {
        Some(magnitude)
    }
}
