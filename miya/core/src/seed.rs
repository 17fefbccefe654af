//! Canonical fixed-width encodings of typed values
//!
//! Integers are little-endian at their declared width. Variable-length byte
//! strings carry a u32 little-endian length prefix inside instruction and
//! account data, but are used raw as derivation seeds since the position in
//! the seed list already fixes their boundary.

use crate::{Error, Result};
use std::fmt::Display;

/// The size of the length prefix of variable-length fields
pub const LENGTH_PREFIX: usize = 4;

/// Fit a value into a narrower integer type
pub fn fit<T, V>(field: &'static str, value: V) -> Result<T>
where
    V: TryInto<T> + Display + Copy,
{
    value.try_into().map_err(|_| {
        Error::field(
            field,
            format!(
                "{value} does not fit in {} bits",
                core::mem::size_of::<T>() * 8
            ),
        )
    })
}

/// Encode a value as a 16-bit little-endian seed
pub fn le_u16<V>(field: &'static str, value: V) -> Result<[u8; 2]>
where
    V: TryInto<u16> + Display + Copy,
{
    fit::<u16, V>(field, value).map(u16::to_le_bytes)
}

/// Encode a value as a 32-bit little-endian seed
pub fn le_u32<V>(field: &'static str, value: V) -> Result<[u8; 4]>
where
    V: TryInto<u32> + Display + Copy,
{
    fit::<u32, V>(field, value).map(u32::to_le_bytes)
}

/// Encode a value as a 64-bit little-endian seed
pub fn le_u64<V>(field: &'static str, value: V) -> Result<[u8; 8]>
where
    V: TryInto<u64> + Display + Copy,
{
    fit::<u64, V>(field, value).map(u64::to_le_bytes)
}

/// Encode a byte string with its u32 length prefix
///
/// The declared length has to match the supplied bytes exactly.
pub fn length_prefixed(field: &'static str, declared: usize, bytes: &[u8]) -> Result<Vec<u8>> {
    if declared != bytes.len() {
        return Err(Error::InvalidLength {
            field,
            declared,
            actual: bytes.len(),
        });
    }

    let mut encoded = Vec::with_capacity(LENGTH_PREFIX + bytes.len());
    encoded.extend_from_slice(&le_u32(field, declared)?);
    encoded.extend_from_slice(bytes);
    Ok(encoded)
}

#[cfg(test)]
use crate::ErrorKind;

#[test]
fn test_little_endian_widths() {
    assert_eq!(le_u16("chain_id", 0x0102u32).unwrap(), [0x02, 0x01]);
    assert_eq!(le_u16("chain_id", 65535u64).unwrap(), [0xff, 0xff]);
    assert_eq!(
        le_u64("deposit_amount", 1_000_000_000u64).unwrap(),
        [0x00, 0xca, 0x9a, 0x3b, 0, 0, 0, 0]
    );
}

#[test]
fn test_overflowing_width() {
    let err = le_u16("fee_bps", 65536u32).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert!(err.to_string().contains("fee_bps"));

    assert!(fit::<u16, i64>("chain_id", -1).is_err());
    assert!(le_u64("amount", -1i64).is_err());
}

#[test]
fn test_length_prefixed() {
    let encoded = length_prefixed("name", 3, b"sol").unwrap();
    assert_eq!(encoded, [3, 0, 0, 0, b's', b'o', b'l']);

    let err = length_prefixed("name", 4, b"sol").unwrap_err();
    assert_eq!(
        err,
        Error::InvalidLength {
            field: "name",
            declared: 4,
            actual: 3
        }
    );
}
