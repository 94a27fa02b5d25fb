//! Chinese resident identity card number.
//!
//! Layout: six-digit region code, `YYYYMMDD` birth date, three-digit sequence
//! whose parity encodes the sex (odd for males), and an ISO 7064 MOD 11-2
//! check character.

use chrono::{Datelike, NaiveDate};
use rand::{Rng, RngCore};

use super::{ChecksumCodec, parse_digits, push_digits, render_digits, weighted_sum};
use crate::entity::Sex;
use crate::error::IdentifierError;

/// Positional weights applied to the first seventeen digits.
pub const RESIDENT_ID_WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];

/// Check characters indexed by `sum mod 11`.
const CHECK_CHARACTERS: [char; 11] = ['1', '0', 'X', '9', '8', '7', '6', '5', '4', '3', '2'];

const REGION_LENGTH: usize = 6;

/// Codec for resident identity card numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResidentId;

impl ResidentId {
    /// Number of characters in a resident identity card number.
    pub const LENGTH: usize = 18;

    /// Encodes an identifier with a random sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when `region` is not six digits.
    pub fn encode<R>(
        region: &str,
        date: NaiveDate,
        sex: Sex,
        rng: &mut R,
    ) -> Result<String, IdentifierError>
    where
        R: RngCore + ?Sized,
    {
        let sequence = rng.random_range(0..500u16) * 2 + u16::from(sex.is_male());
        Self::encode_with(region, date, sequence)
    }

    /// Encodes an identifier from a fixed sequence number (reduced modulo
    /// 1000).
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when `region` is not six digits.
    pub fn encode_with(
        region: &str,
        date: NaiveDate,
        sequence: u16,
    ) -> Result<String, IdentifierError> {
        let mut digits = parse_digits(region)?;
        if digits.len() != REGION_LENGTH {
            return Err(IdentifierError::InvalidLength {
                expected: REGION_LENGTH,
                actual: digits.len(),
            });
        }
        push_digits(&mut digits, date.year().rem_euclid(10_000).unsigned_abs(), 4);
        push_digits(&mut digits, date.month(), 2);
        push_digits(&mut digits, date.day(), 2);
        push_digits(&mut digits, u32::from(sequence.rem_euclid(1000)), 3);

        let mut id = render_digits(&digits);
        id.push(check_character(&digits));
        Ok(id)
    }
}

impl ChecksumCodec for ResidentId {
    fn length(&self) -> usize {
        Self::LENGTH
    }

    fn is_valid(&self, candidate: &str) -> Result<bool, IdentifierError> {
        if candidate.chars().count() != Self::LENGTH {
            return Ok(false);
        }
        let body: String = candidate.chars().take(Self::LENGTH - 1).collect();
        let digits = parse_digits(&body)?;
        let Some(check) = candidate.chars().last() else {
            return Ok(false);
        };
        if !(check.is_ascii_digit() || check == 'X') {
            return Err(IdentifierError::InvalidCharacter {
                position: Self::LENGTH - 1,
                character: check,
            });
        }
        Ok(check_character(&digits) == check)
    }
}

fn check_character(body: &[u32]) -> char {
    let index = weighted_sum(body, &RESIDENT_ID_WEIGHTS).rem_euclid(11);
    usize::try_from(index)
        .ok()
        .and_then(|i| CHECK_CHARACTERS.get(i))
        .copied()
        .unwrap_or('1')
}
