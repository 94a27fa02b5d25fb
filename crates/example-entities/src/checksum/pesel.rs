//! Polish personal identification number (PESEL).
//!
//! Layout: `YY MM DD SSS X C`. The month carries a century band so that the
//! two-digit year can be told apart across centuries, `X` is a random even
//! digit plus one for males, and `C` is the weighted check digit.

use chrono::{Datelike, NaiveDate};
use rand::{Rng, RngCore};

use super::{ChecksumCodec, parse_digits, push_digits, render_digits, weighted_sum};
use crate::entity::Sex;
use crate::error::IdentifierError;

/// Positional weights applied to the first ten digits.
pub const PESEL_WEIGHTS: [u32; 10] = [1, 3, 7, 9, 1, 3, 7, 9, 1, 3];

/// Century bands as `(first year, last year, month offset)`.
///
/// Years 2100 and 2200 sit outside every band, as do years before 1800 and
/// from 2300 on; those encode with no offset and decode as the 1900s.
const CENTURY_BANDS: [(i32, i32, u32); 4] = [
    (1800, 1899, 80),
    (2000, 2099, 20),
    (2101, 2199, 40),
    (2201, 2299, 60),
];

/// Codec for PESEL numbers.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use example_entities::{ChecksumCodec, Pesel, Sex};
///
/// let date = NaiveDate::from_ymd_opt(1995, 6, 15).expect("valid date");
/// let pesel = Pesel::encode_with(date, Sex::Male, 137, 0);
///
/// assert_eq!(pesel, "95061513712");
/// assert_eq!(Pesel.is_valid(&pesel), Ok(true));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pesel;

impl Pesel {
    /// Number of characters in a PESEL.
    pub const LENGTH: usize = 11;

    /// Encodes a PESEL with a random serial number and sex digit.
    pub fn encode<R>(date: NaiveDate, sex: Sex, rng: &mut R) -> String
    where
        R: RngCore + ?Sized,
    {
        let serial = rng.random_range(0..1000u16);
        let draw = rng.random_range(0..5u8);
        Self::encode_with(date, sex, serial, draw)
    }

    /// Encodes a PESEL from a fixed serial number and sex-digit draw.
    ///
    /// `serial` is reduced modulo 1000 and `draw` modulo 5, so every input
    /// yields a well-formed identifier.
    #[must_use]
    pub fn encode_with(date: NaiveDate, sex: Sex, serial: u16, draw: u8) -> String {
        let year = date.year();
        let mut digits = Vec::with_capacity(Self::LENGTH);
        push_digits(&mut digits, year.rem_euclid(100).unsigned_abs(), 2);
        push_digits(&mut digits, date.month() + century_offset(year), 2);
        push_digits(&mut digits, date.day(), 2);
        push_digits(&mut digits, u32::from(serial.rem_euclid(1000)), 3);
        digits.push(u32::from(draw.rem_euclid(5)) * 2 + u32::from(sex.is_male()));
        digits.push(check_digit(&digits));
        render_digits(&digits)
    }

    /// Recovers the birth date encoded in a PESEL.
    ///
    /// Returns `Ok(None)` when the candidate has the wrong length or the
    /// month and day do not describe a calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidCharacter`] for non-digit input.
    pub fn birth_date(candidate: &str) -> Result<Option<NaiveDate>, IdentifierError> {
        if candidate.chars().count() != Self::LENGTH {
            return Ok(None);
        }
        let digits = parse_digits(candidate)?;
        let [y1, y2, m1, m2, d1, d2, ..] = digits.as_slice() else {
            return Ok(None);
        };
        let coded_month = m1 * 10 + m2;
        let Some((century, month)) = decode_month(coded_month) else {
            return Ok(None);
        };
        let Ok(two_digit_year) = i32::try_from(y1 * 10 + y2) else {
            return Ok(None);
        };
        Ok(NaiveDate::from_ymd_opt(
            century + two_digit_year,
            month,
            d1 * 10 + d2,
        ))
    }
}

impl ChecksumCodec for Pesel {
    fn length(&self) -> usize {
        Self::LENGTH
    }

    fn is_valid(&self, candidate: &str) -> Result<bool, IdentifierError> {
        if candidate.chars().count() != Self::LENGTH {
            return Ok(false);
        }
        let digits = parse_digits(candidate)?;
        let Some((check, body)) = digits.split_last() else {
            return Ok(false);
        };
        Ok(check_digit(body) == *check)
    }
}

/// Month offset for the century band containing `year`.
fn century_offset(year: i32) -> u32 {
    CENTURY_BANDS
        .iter()
        .find(|(first, last, _)| (*first..=*last).contains(&year))
        .map_or(0, |(_, _, offset)| *offset)
}

/// Splits a coded month into the century start year and the calendar month.
fn decode_month(coded: u32) -> Option<(i32, u32)> {
    let (century, offset) = match coded {
        1..=12 => (1900, 0),
        81..=92 => (1800, 80),
        21..=32 => (2000, 20),
        41..=52 => (2100, 40),
        61..=72 => (2200, 60),
        _ => return None,
    };
    Some((century, coded - offset))
}

fn check_digit(body: &[u32]) -> u32 {
    (10 - weighted_sum(body, &PESEL_WEIGHTS).rem_euclid(10)).rem_euclid(10)
}
