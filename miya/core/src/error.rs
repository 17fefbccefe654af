//! Error taxonomy of the protocol layer

/// Result alias of the protocol layer
pub type Result<T> = core::result::Result<T, Error>;

/// Errors of the protocol layer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A field is out of its declared range
    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        /// The name of the field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// The declared length of a field does not match the supplied bytes
    #[error("invalid length of `{field}`: declared {declared}, got {actual}")]
    InvalidLength {
        /// The name of the field
        field: &'static str,
        /// The declared length
        declared: usize,
        /// The actual length
        actual: usize,
    },

    /// No bump in [0, 255] produced an off-curve address
    #[error("no valid program address found for the provided seeds")]
    NoValidAddress,

    /// Account data does not match the expected layout
    #[error("malformed {account} account: {reason}")]
    MalformedAccount {
        /// The account type being decoded
        account: &'static str,
        /// What is wrong with the data
        reason: String,
    },

    /// Instruction data does not match the expected layout
    #[error("malformed instruction: {reason}")]
    MalformedInstruction {
        /// What is wrong with the data
        reason: String,
    },

    /// A deposit note was moved through an illegal transition
    #[error("invalid note transition from {from} to {to}")]
    InvalidTransition {
        /// The current state
        from: &'static str,
        /// The requested state
        to: &'static str,
    },
}

/// The kind of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller supplied an out-of-range or mis-sized field
    Encoding,
    /// Address derivation exhausted its search space
    NoValidAddress,
    /// Remote account data does not match the expected layout
    MalformedAccount,
    /// Instruction bytes do not match the expected layout
    MalformedInstruction,
    /// Illegal note state transition
    InvalidTransition,
}

impl Error {
    /// Shortcut for [`Error::InvalidField`]
    pub fn field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Get the kind of the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidField { .. } | Self::InvalidLength { .. } => ErrorKind::Encoding,
            Self::NoValidAddress => ErrorKind::NoValidAddress,
            Self::MalformedAccount { .. } => ErrorKind::MalformedAccount,
            Self::MalformedInstruction { .. } => ErrorKind::MalformedInstruction,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
        }
    }
}

#[test]
fn test_error_kinds() {
    let invalid = Error::field("fee_bps", "10001 exceeds 10000");
    assert_eq!(invalid.kind(), ErrorKind::Encoding);
    assert_eq!(
        invalid.to_string(),
        "invalid field `fee_bps`: 10001 exceeds 10000"
    );

    let length = Error::InvalidLength {
        field: "proof",
        declared: 4,
        actual: 3,
    };
    assert_eq!(length.kind(), ErrorKind::Encoding);
    assert_eq!(Error::NoValidAddress.kind(), ErrorKind::NoValidAddress);
}
