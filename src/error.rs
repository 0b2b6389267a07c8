//! Error type shared by the codec entry points.
//!
//! Every failure is terminal for the call that produced it. Nothing is
//! retried and no partial frame or value is ever returned.

/// Represents all possible errors of the encode and decode paths.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required top-level field is absent from the request.
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    /// A field is present but has the wrong shape.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// `params` carried more than one identifier.
    #[error("Found {0} identifiers in params, expecting exactly one")]
    MultipleIdentifiers(usize),

    /// The function code is not part of the register catalog.
    #[error("Function code {0} is not supported")]
    UnsupportedFunctionCode(String),

    /// The identifier is not defined for the given function code.
    #[error("Identifier '{identifier}' is not supported for function code {function_code}")]
    UnsupportedIdentifier {
        function_code: String,
        identifier: String,
    },

    /// The write value has no operation code.
    #[error("Value {0} has no operation code, expecting 0 or 1")]
    InvalidOperationValue(String),

    /// The wire operation code has no reverse mapping.
    #[error("Operation code {0:04X} is not supported")]
    UnsupportedOperationCode(u16),

    /// The frame is too short for its function code.
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// The device address does not fit into a single byte.
    #[error("Address {0} is out of range (0..=255)")]
    AddressOutOfRange(i64),

    /// The frame was answered by another device.
    #[error("Frame address {actual:02X} does not match expected address {expected:02X}")]
    AddressMismatch { expected: u8, actual: u8 },

    /// The trailing checksum does not match the frame content.
    #[error("CRC validation failed: expected={expected:04X}, actual={actual:04X}")]
    ChecksumMismatch { expected: u16, actual: u16 },

    /// Wraps `hex::FromHexError`.
    #[error("Invalid hex data: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Wraps `base64::DecodeError`.
    #[error("Invalid base64 data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Wraps `serde_json::Error`.
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// The result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
