//! Self-validating identifier codecs.
//!
//! Each codec encodes structured inputs into a fixed-width identifier with a
//! trailing check character and validates arbitrary candidates. Validation
//! treats a wrong length as an invalid identifier and a character outside the
//! identifier alphabet as malformed input.

mod credit_code;
mod nip;
mod pesel;
mod resident_id;

pub use credit_code::CreditCode;
pub use nip::Nip;
pub use pesel::Pesel;
pub use resident_id::ResidentId;

use crate::entity::{Person, parse_date, parse_sex};
use crate::error::{GenerationError, IdentifierError};
use crate::provider::Resolution;

/// Table of six-digit administrative region codes used by `zh` identifiers.
pub(crate) const REGION_CODES: &str = "regionCodes";

/// Encode/validate behaviour shared by every identifier format.
pub trait ChecksumCodec {
    /// Returns the identifier length in characters.
    fn length(&self) -> usize;

    /// Checks a candidate identifier.
    ///
    /// Returns `Ok(false)` when the length is wrong or the check character
    /// does not match.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidCharacter`] when the candidate holds
    /// a character outside the identifier alphabet.
    fn is_valid(&self, candidate: &str) -> Result<bool, IdentifierError>;
}

/// The identifier formats a locale bundle can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierCodec {
    /// Polish personal identification number.
    Pesel,
    /// Polish tax identification number.
    Nip,
    /// Chinese resident identity card number.
    ResidentId,
    /// Chinese unified social credit code.
    CreditCode,
}

impl IdentifierCodec {
    /// Data tables the codec reads while generating.
    pub(crate) const fn tables(self) -> &'static [&'static str] {
        match self {
            Self::Pesel | Self::Nip => &[],
            Self::ResidentId | Self::CreditCode => &[REGION_CODES],
        }
    }

    /// Generates an identifier from the already-resolved sibling fields.
    pub(crate) fn generate(
        self,
        field: &'static str,
        resolution: &mut Resolution<'_>,
    ) -> Result<String, GenerationError> {
        match self {
            Self::Pesel => {
                let date = parse_date(
                    Person::DATE_OF_BIRTH,
                    resolution.text(Person::DATE_OF_BIRTH)?,
                )?;
                let sex = parse_sex(Person::SEX, resolution.text(Person::SEX)?)?;
                Ok(Pesel::encode(date, sex, resolution.rng()))
            }
            Self::Nip => Ok(Nip::encode(resolution.rng())),
            Self::ResidentId => {
                let date = parse_date(
                    Person::DATE_OF_BIRTH,
                    resolution.text(Person::DATE_OF_BIRTH)?,
                )?;
                let sex = parse_sex(Person::SEX, resolution.text(Person::SEX)?)?;
                let region = resolution.pick(REGION_CODES)?;
                ResidentId::encode(&region, date, sex, resolution.rng())
                    .map_err(|err| invalid_region(field, &region, &err))
            }
            Self::CreditCode => {
                let region = resolution.pick(REGION_CODES)?;
                CreditCode::encode(&region, resolution.rng())
                    .map_err(|err| invalid_region(field, &region, &err))
            }
        }
    }
}

impl ChecksumCodec for IdentifierCodec {
    fn length(&self) -> usize {
        match self {
            Self::Pesel => Pesel.length(),
            Self::Nip => Nip.length(),
            Self::ResidentId => ResidentId.length(),
            Self::CreditCode => CreditCode.length(),
        }
    }

    fn is_valid(&self, candidate: &str) -> Result<bool, IdentifierError> {
        match self {
            Self::Pesel => Pesel.is_valid(candidate),
            Self::Nip => Nip.is_valid(candidate),
            Self::ResidentId => ResidentId.is_valid(candidate),
            Self::CreditCode => CreditCode.is_valid(candidate),
        }
    }
}

fn invalid_region(field: &str, region: &str, err: &IdentifierError) -> GenerationError {
    GenerationError::InvalidFieldValue {
        field: field.to_owned(),
        value: region.to_owned(),
        message: format!("region code {err}"),
    }
}

/// Parses every character of `candidate` as a decimal digit.
pub(crate) fn parse_digits(candidate: &str) -> Result<Vec<u32>, IdentifierError> {
    candidate
        .chars()
        .enumerate()
        .map(|(position, character)| {
            character
                .to_digit(10)
                .ok_or(IdentifierError::InvalidCharacter {
                    position,
                    character,
                })
        })
        .collect()
}

/// Appends `value` as exactly `width` decimal digits, most significant first.
pub(crate) fn push_digits(digits: &mut Vec<u32>, value: u32, width: u32) {
    for exponent in (0..width).rev() {
        digits.push(value.div_euclid(10u32.pow(exponent)).rem_euclid(10));
    }
}

/// Sums each digit multiplied by its positional weight.
pub(crate) fn weighted_sum(digits: &[u32], weights: &[u32]) -> u32 {
    digits.iter().zip(weights).map(|(d, w)| d * w).sum()
}

/// Renders decimal digit values as a string.
pub(crate) fn render_digits(digits: &[u32]) -> String {
    digits
        .iter()
        .filter_map(|d| char::from_digit(*d, 10))
        .collect()
}
