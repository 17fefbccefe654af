//! Core primitives for the miya protocol clients

pub use {
    codec::{discriminator, Reader, VarBytes, Writer},
    error::{Error, ErrorKind, Result},
    ledger::Ledger,
    util::FixedBytes,
};

pub mod codec;
mod error;
pub mod ledger;
pub mod pda;
pub mod seed;
pub mod util;

/// The size of the instruction header
///
/// Byte 0 carries the discriminant, bytes 1..8 are reserved.
pub const HEADER_LEN: usize = 8;

/// The size of the account discriminator
pub const DISCRIMINATOR_LEN: usize = 8;

/// The hash type of commitments and nullifiers
pub type Hash = [u8; 32];
