//! Chinese unified social credit code.
//!
//! Layout: registration authority `9`, entity category `1`, six-digit region
//! code, nine-character organisation code, and a check character. All
//! characters come from a 31-symbol alphabet that omits `I`, `O`, `S`, `V`,
//! and `Z`.

use rand::{Rng, RngCore};

use super::{ChecksumCodec, parse_digits, weighted_sum};
use crate::error::IdentifierError;

/// Symbols in value order.
const ALPHABET: [char; 31] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J',
    'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'T', 'U', 'W', 'X', 'Y',
];

/// Positional weights applied to the first seventeen symbols.
pub const CREDIT_CODE_WEIGHTS: [u32; 17] = [
    1, 3, 9, 27, 19, 26, 16, 17, 20, 29, 25, 13, 8, 24, 10, 30, 28,
];

const PREFIX: [u32; 2] = [9, 1];
const REGION_LENGTH: usize = 6;
const ORGANISATION_LENGTH: usize = 9;

/// Codec for unified social credit codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreditCode;

impl CreditCode {
    /// Number of characters in a credit code.
    pub const LENGTH: usize = 18;

    /// Encodes a code for an enterprise registered in `region` with a random
    /// numeric organisation code.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when `region` is not six digits.
    pub fn encode<R>(region: &str, rng: &mut R) -> Result<String, IdentifierError>
    where
        R: RngCore + ?Sized,
    {
        let region_digits = parse_digits(region)?;
        if region_digits.len() != REGION_LENGTH {
            return Err(IdentifierError::InvalidLength {
                expected: REGION_LENGTH,
                actual: region_digits.len(),
            });
        }
        let mut values = PREFIX.to_vec();
        values.extend(region_digits);
        values.extend((0..ORGANISATION_LENGTH).map(|_| rng.random_range(0..10u32)));
        values.push(check_value(&values));
        Ok(values.into_iter().map(symbol).collect())
    }
}

impl ChecksumCodec for CreditCode {
    fn length(&self) -> usize {
        Self::LENGTH
    }

    fn is_valid(&self, candidate: &str) -> Result<bool, IdentifierError> {
        if candidate.chars().count() != Self::LENGTH {
            return Ok(false);
        }
        let values = candidate
            .chars()
            .enumerate()
            .map(|(position, character)| {
                value_of(character).ok_or(IdentifierError::InvalidCharacter {
                    position,
                    character,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let Some((check, body)) = values.split_last() else {
            return Ok(false);
        };
        Ok(check_value(body) == *check)
    }
}

fn check_value(body: &[u32]) -> u32 {
    (31 - weighted_sum(body, &CREDIT_CODE_WEIGHTS).rem_euclid(31)).rem_euclid(31)
}

fn symbol(value: u32) -> char {
    usize::try_from(value)
        .ok()
        .and_then(|index| ALPHABET.get(index))
        .copied()
        .unwrap_or('0')
}

fn value_of(character: char) -> Option<u32> {
    ALPHABET
        .iter()
        .position(|c| *c == character)
        .and_then(|index| u32::try_from(index).ok())
}
