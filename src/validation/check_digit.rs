use crate::utils::text::{trim_fillers, FILLER};
use crate::utils::MrzError;

const WEIGHTS: [u32; 3] = [7, 3, 1];

/// ICAO 9303 check digit: weights 7-3-1 repeating, `<` = 0, digits as
/// themselves, `A`..`Z` = 10..35, sum modulo 10.
pub struct CheckDigit;

impl CheckDigit {
    pub fn compute(value: &str) -> Result<u8, MrzError> {
        let mut sum: u32 = 0;
        for (i, c) in value.chars().enumerate() {
            sum += WEIGHTS[i % 3] * Self::char_value(c)?;
        }
        Ok((sum % 10) as u8)
    }

    /// Compare the computed digit against `check_digit`.
    ///
    /// A `<` check digit is only accepted for an all-filler value, which is
    /// how unused optional fields are encoded.
    pub fn is_value_valid(value: &str, check_digit: char) -> bool {
        if check_digit == FILLER {
            return trim_fillers(value).is_empty();
        }
        let expected = match check_digit.to_digit(10) {
            Some(digit) => digit as u8,
            None => return false,
        };
        match Self::compute(value) {
            Ok(computed) => computed == expected,
            Err(_) => false,
        }
    }

    fn char_value(c: char) -> Result<u32, MrzError> {
        match c {
            FILLER => Ok(0),
            '0'..='9' => Ok(c as u32 - '0' as u32),
            'A'..='Z' => Ok(c as u32 - 'A' as u32 + 10),
            _ => Err(MrzError::InvalidCharacter(c)),
        }
    }
}
