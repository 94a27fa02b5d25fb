//! Polish tax identification number (NIP).

use rand::{Rng, RngCore};

use super::{ChecksumCodec, parse_digits, render_digits, weighted_sum};
use crate::error::IdentifierError;

/// Positional weights applied to the first nine digits.
pub const NIP_WEIGHTS: [u32; 9] = [6, 5, 7, 2, 3, 4, 5, 6, 7];

/// Codec for NIP numbers: nine digits followed by `sum mod 11`.
///
/// A body whose remainder is 10 has no valid check digit. Generation avoids
/// it by bumping the ninth digit, which moves the remainder off 10.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nip;

impl Nip {
    /// Number of digits in a NIP.
    pub const LENGTH: usize = 10;

    /// Encodes a random NIP. The tax office prefix never starts with zero.
    pub fn encode<R>(rng: &mut R) -> String
    where
        R: RngCore + ?Sized,
    {
        let mut body = Vec::with_capacity(Self::LENGTH);
        body.push(rng.random_range(1..10u32));
        for _ in 1..NIP_WEIGHTS.len() {
            body.push(rng.random_range(0..10u32));
        }
        Self::encode_body(body)
    }

    /// Completes a nine-digit body with its check digit.
    fn encode_body(mut body: Vec<u32>) -> String {
        if remainder(&body) == 10 {
            if let Some(last) = body.last_mut() {
                *last = (*last + 1).rem_euclid(10);
            }
        }
        body.push(remainder(&body));
        render_digits(&body)
    }
}

impl ChecksumCodec for Nip {
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
        let expected = remainder(body);
        Ok(expected != 10 && expected == *check)
    }
}

fn remainder(body: &[u32]) -> u32 {
    weighted_sum(body, &NIP_WEIGHTS).rem_euclid(11)
}
