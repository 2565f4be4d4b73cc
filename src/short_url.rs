//! Base62 short-link codec for UUIDs.
//!
//! A UUID is treated as an unsigned 128-bit integer and written in base 62
//! using the alphabet `0-9A-Za-z`, most significant digit first. Codes are not
//! padded, so UUIDs with leading zero bits produce shorter codes.

use thiserror::Error;
use uuid::Uuid;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const BASE: u128 = 62;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShortUrlError {
    #[error("short code is empty")]
    Empty,
    #[error("invalid character {0:?} in short code")]
    InvalidCharacter(char),
    #[error("short code does not fit in 128 bits")]
    Overflow,
}

fn digit_value(byte: u8) -> Option<u128> {
    let value = match byte {
        b'0'..=b'9' => byte - b'0',
        b'A'..=b'Z' => byte - b'A' + 10,
        b'a'..=b'z' => byte - b'a' + 36,
        _ => return None,
    };
    Some(u128::from(value))
}

/// Encodes a UUID as a base62 string. The zero UUID encodes to `"0"`.
pub fn uuid_to_base62(uuid: &Uuid) -> String {
    let mut value = uuid.as_u128();
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(22);
    while value > 0 {
        digits.push(ALPHABET[(value % BASE) as usize]);
        value /= BASE;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

/// Decodes a base62 string produced by [`uuid_to_base62`].
pub fn base62_to_uuid(code: &str) -> Result<Uuid, ShortUrlError> {
    if code.is_empty() {
        return Err(ShortUrlError::Empty);
    }

    let mut value: u128 = 0;
    for ch in code.chars() {
        let digit = u8::try_from(ch)
            .ok()
            .and_then(digit_value)
            .ok_or(ShortUrlError::InvalidCharacter(ch))?;
        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or(ShortUrlError::Overflow)?;
    }

    Ok(Uuid::from_u128(value))
}

/// Convenience wrapper returning the canonical hyphenated lower-case UUID.
pub fn base62_to_uuid_string(code: &str) -> Result<String, ShortUrlError> {
    base62_to_uuid(code).map(|uuid| uuid.hyphenated().to_string())
}
