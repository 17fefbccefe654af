//! Utility traits for the core library

use crate::{Error, Result};

/// Convert byte slices into fixed-size arrays
pub trait FixedBytes {
    /// Convert to 32 bytes
    fn bytes32(&self, field: &'static str) -> Result<[u8; 32]>;
}

fn fixed<const N: usize>(bytes: &[u8], field: &'static str) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| Error::InvalidLength {
        field,
        declared: N,
        actual: bytes.len(),
    })
}

impl<T: AsRef<[u8]>> FixedBytes for T {
    fn bytes32(&self, field: &'static str) -> Result<[u8; 32]> {
        fixed(self.as_ref(), field)
    }
}

#[test]
fn test_fixed_bytes() {
    assert_eq!(vec![1u8; 32].bytes32("nullifier").unwrap(), [1u8; 32]);
    assert_eq!(
        vec![1u8; 31].bytes32("nullifier").unwrap_err(),
        Error::InvalidLength {
            field: "nullifier",
            declared: 32,
            actual: 31
        }
    );
}
