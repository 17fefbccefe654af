//! Byte cursors for instruction and account layouts
//!
//! Instructions are `[discriminant, 0 x 7] ++ fields`, accounts are
//! `discriminator[8] ++ fields`. Fields are fixed-width little-endian
//! integers or `u32 length ++ bytes`.

use crate::{seed, Error, Result, DISCRIMINATOR_LEN, HEADER_LEN};
use solana_sdk::{hash, pubkey::Pubkey};

/// The account discriminator of the named account type
///
/// The first 8 bytes of `sha256("account:<name>")`.
pub fn discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let hash = hash::hash(format!("account:{name}").as_bytes());
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&hash.to_bytes()[..DISCRIMINATOR_LEN]);
    discriminator
}

/// A variable-length byte string with its declared length
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarBytes {
    declared: usize,
    bytes: Vec<u8>,
}

impl VarBytes {
    /// Create from bytes, declaring their actual length
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            declared: bytes.len(),
            bytes,
        }
    }

    /// Create from bytes with an explicitly declared length
    pub fn with_declared(declared: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            declared,
            bytes: bytes.into(),
        }
    }

    /// The declared length
    pub fn declared(&self) -> usize {
        self.declared
    }

    /// The actual bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The actual length
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// If there are no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The encoded size including the length prefix
    pub fn encoded_len(&self) -> usize {
        seed::LENGTH_PREFIX + self.bytes.len()
    }

    /// Consume into the inner bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<Vec<u8>> for VarBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for VarBytes {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for VarBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Byte writer with the size computed up front
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Start an instruction with the header
    pub fn instruction(discriminant: u8, payload: usize) -> Self {
        let mut buf = Vec::with_capacity(HEADER_LEN + payload);
        buf.push(discriminant);
        buf.resize(HEADER_LEN, 0);
        Self { buf }
    }

    /// Start an account with its discriminator
    pub fn account(discriminator: &[u8; DISCRIMINATOR_LEN], payload: usize) -> Self {
        let mut buf = Vec::with_capacity(DISCRIMINATOR_LEN + payload);
        buf.extend_from_slice(discriminator);
        Self { buf }
    }

    /// Write a byte
    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    /// Write a boolean as a byte
    pub fn bool(&mut self, value: bool) -> &mut Self {
        self.u8(value as u8)
    }

    /// Write a little-endian u16
    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Write a little-endian u64
    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Write 32 raw bytes
    pub fn bytes32(&mut self, value: &[u8; 32]) -> &mut Self {
        self.buf.extend_from_slice(value);
        self
    }

    /// Write a public key
    pub fn pubkey(&mut self, value: &Pubkey) -> &mut Self {
        self.buf.extend_from_slice(value.as_ref());
        self
    }

    /// Write a length-prefixed byte string
    pub fn var(&mut self, field: &'static str, value: &VarBytes) -> Result<&mut Self> {
        let encoded = seed::length_prefixed(field, value.declared(), value.as_bytes())?;
        self.buf.extend_from_slice(&encoded);
        Ok(self)
    }

    /// Write a length-prefixed utf-8 string
    pub fn string(&mut self, field: &'static str, value: &str) -> Result<&mut Self> {
        let encoded = seed::length_prefixed(field, value.len(), value.as_bytes())?;
        self.buf.extend_from_slice(&encoded);
        Ok(self)
    }

    /// Finish writing
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

#[derive(Clone, Copy)]
enum Target {
    Account(&'static str),
    Instruction,
}

/// Bounds-checked byte reader
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
    target: Target,
}

impl<'a> Reader<'a> {
    /// Read an account, checking its discriminator
    pub fn account(
        name: &'static str,
        data: &'a [u8],
        discriminator: &[u8; DISCRIMINATOR_LEN],
    ) -> Result<Self> {
        let mut reader = Self {
            data,
            offset: 0,
            target: Target::Account(name),
        };

        if reader.take(DISCRIMINATOR_LEN, "discriminator")? != discriminator {
            return Err(reader.malformed("discriminator mismatch".into()));
        }
        Ok(reader)
    }

    /// Read an instruction, returning its discriminant
    pub fn instruction(data: &'a [u8]) -> Result<(u8, Self)> {
        let mut reader = Self {
            data,
            offset: 0,
            target: Target::Instruction,
        };

        let header = reader.take(HEADER_LEN, "header")?;
        Ok((header[0], reader))
    }

    /// Bytes left after the current offset
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn malformed(&self, reason: String) -> Error {
        match self.target {
            Target::Account(account) => Error::MalformedAccount { account, reason },
            Target::Instruction => Error::MalformedInstruction { reason },
        }
    }

    fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(self.malformed(format!(
                "`{field}` needs {len} bytes at offset {}, {} left",
                self.offset,
                self.remaining()
            )));
        }

        let data = self.data;
        let bytes = &data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N, field)?);
        Ok(array)
    }

    /// Read a byte
    pub fn u8(&mut self, field: &'static str) -> Result<u8> {
        self.array::<1>(field).map(|[byte]| byte)
    }

    /// Read a strict boolean byte
    pub fn bool(&mut self, field: &'static str) -> Result<bool> {
        match self.u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.malformed(format!("`{field}` is not a boolean: {other}"))),
        }
    }

    /// Read a little-endian u16
    pub fn u16(&mut self, field: &'static str) -> Result<u16> {
        self.array(field).map(u16::from_le_bytes)
    }

    /// Read a little-endian u32
    pub fn u32(&mut self, field: &'static str) -> Result<u32> {
        self.array(field).map(u32::from_le_bytes)
    }

    /// Read a little-endian u64
    pub fn u64(&mut self, field: &'static str) -> Result<u64> {
        self.array(field).map(u64::from_le_bytes)
    }

    /// Read 32 raw bytes
    pub fn bytes32(&mut self, field: &'static str) -> Result<[u8; 32]> {
        self.array(field)
    }

    /// Read a public key
    pub fn pubkey(&mut self, field: &'static str) -> Result<Pubkey> {
        self.array(field).map(Pubkey::new_from_array)
    }

    /// Read a length-prefixed byte string
    ///
    /// The length is checked against the remaining buffer before slicing.
    pub fn var(&mut self, field: &'static str) -> Result<VarBytes> {
        let len = self.u32(field)? as usize;
        self.take(len, field).map(VarBytes::from)
    }

    /// Read a length-prefixed utf-8 string
    pub fn string(&mut self, field: &'static str) -> Result<String> {
        let bytes = self.var(field)?.into_inner();
        String::from_utf8(bytes).map_err(|e| self.malformed(format!("`{field}` {e}")))
    }

    /// Require that all bytes were consumed
    pub fn finish(self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(self.malformed(format!("{} trailing bytes", self.remaining())));
        }
        Ok(())
    }
}

#[cfg(test)]
use crate::ErrorKind;

#[cfg(test)]
const DISC: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

#[test]
fn test_account_discriminator() {
    let pool = discriminator("Pool");
    assert_eq!(pool, discriminator("Pool"));
    assert_ne!(pool, discriminator("TokenPair"));
    assert_eq!(pool, [241, 154, 109, 4, 17, 177, 109, 188]);
    assert_eq!(
        discriminator("TokenPair"),
        [17, 214, 45, 176, 229, 149, 197, 71]
    );
}

#[test]
fn test_instruction_header() {
    let mut writer = Writer::instruction(4, 2);
    writer.u16(0xbeef);
    let data = writer.finish();
    assert_eq!(data, [4, 0, 0, 0, 0, 0, 0, 0, 0xef, 0xbe]);

    let (discriminant, mut reader) = Reader::instruction(&data).unwrap();
    assert_eq!(discriminant, 4);
    assert_eq!(reader.u16("value").unwrap(), 0xbeef);
    reader.finish().unwrap();
}

#[test]
fn test_length_prefix_recovers_exact_bytes() -> anyhow::Result<()> {
    for len in [0usize, 1, 31, 32, 33, 64, 300] {
        let bytes = (0..len).map(|i| i as u8).collect::<Vec<_>>();
        let mut writer = Writer::account(&DISC, 4 + len);
        writer.var("bytes", &VarBytes::new(bytes.clone()))?;
        let data = writer.finish();
        assert_eq!(data.len(), 8 + 4 + len);

        let mut reader = Reader::account("Test", &data, &DISC)?;
        let decoded = reader.var("bytes")?;
        assert_eq!(decoded.len(), len);
        assert_eq!(decoded.as_bytes(), &bytes[..]);
    }
    Ok(())
}

#[test]
fn test_declared_length_mismatch() {
    let mut writer = Writer::instruction(0, 8);
    let err = writer
        .var("proof", &VarBytes::with_declared(4, vec![1, 2, 3]))
        .err()
        .unwrap();
    assert_eq!(
        err,
        Error::InvalidLength {
            field: "proof",
            declared: 4,
            actual: 3
        }
    );
}

#[test]
fn test_length_past_end_is_malformed() {
    let mut data = DISC.to_vec();
    data.extend_from_slice(&100u32.to_le_bytes());
    data.extend_from_slice(&[0; 10]);

    let mut reader = Reader::account("Test", &data, &DISC).unwrap();
    let err = reader.var("name").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedAccount);
}

#[test]
fn test_discriminator_and_bool() {
    let data = [0u8; 9];
    let err = Reader::account("Test", &data, &DISC).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::MalformedAccount);

    let mut data = DISC.to_vec();
    data.push(2);
    let mut reader = Reader::account("Test", &data, &DISC).unwrap();
    assert!(reader.bool("is_active").is_err());
}
