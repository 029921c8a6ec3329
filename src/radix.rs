//! Positional base-N decoding of share values.
//!
//! Share values arrive as digit strings in any radix from 2 to 16, using the
//! case-insensitive alphabet `0-9a-f`. Values routinely exceed 64 bits, so
//! every step is carried out on a [`BigUint`].

use crate::SssError;
use num_bigint::BigUint;
use num_traits::Zero;

/// Smallest radix accepted by [`decode`] and [`encode`].
pub const MIN_BASE: u32 = 2;
/// Largest radix accepted by [`decode`] and [`encode`].
pub const MAX_BASE: u32 = 16;

const ALPHABET: &[u8; 16] = b"0123456789abcdef";

/// Decodes `digits`, read most significant digit first, in the given `base`.
///
/// # Returns
/// * `Ok(BigUint)` - The exact value of the digit string
/// * `Err(SssError::UnsupportedBase)` - If `base` is outside `2..=16`
/// * `Err(SssError::MalformedInput)` - If `digits` is empty after trimming
/// * `Err(SssError::InvalidDigit)` - If a character is not in `0-9a-fA-F`
/// * `Err(SssError::DigitOutOfRange)` - If a digit is not smaller than `base`
///
/// # Example
/// ```
/// use num_bigint::BigUint;
/// use shamir_recover::radix::decode;
///
/// assert_eq!(decode("213", 8).unwrap(), BigUint::from(139u32));
/// assert_eq!(decode("FF", 16).unwrap(), BigUint::from(255u32));
/// ```
pub fn decode(digits: &str, base: u32) -> Result<BigUint, SssError> {
    check_base(base)?;

    let digits = digits.trim();
    if digits.is_empty() {
        return Err(SssError::MalformedInput("empty digit string".into()));
    }

    let radix = BigUint::from(base);
    let mut result = BigUint::zero();

    for character in digits.chars() {
        let digit = character
            .to_digit(MAX_BASE)
            .ok_or(SssError::InvalidDigit { character, base })?;
        if digit >= base {
            return Err(SssError::DigitOutOfRange { digit, base });
        }
        result = result * &radix + digit;
    }

    Ok(result)
}

/// Encodes `value` in the given `base`, lowercase, most significant digit first.
///
/// Zero encodes as `"0"`.
pub fn encode(value: &BigUint, base: u32) -> Result<String, SssError> {
    check_base(base)?;

    if value.is_zero() {
        return Ok("0".to_string());
    }

    let digits: String = value
        .to_radix_be(base)
        .into_iter()
        .map(|d| ALPHABET[d as usize] as char)
        .collect();
    Ok(digits)
}

fn check_base(base: u32) -> Result<(), SssError> {
    if (MIN_BASE..=MAX_BASE).contains(&base) {
        Ok(())
    } else {
        Err(SssError::UnsupportedBase(base))
    }
}
