//! Frame decoder.
//!
//! Extracts the value carried by a response frame. The function code at
//! offset 1 selects the rule:
//!
//! - `01`, `04`: byte 2 holds the payload length `L`, the payload at
//!   `3..3 + L` is a big-endian unsigned integer of any width up to 255
//!   bytes. Scaling and sign are left to the caller.
//! - `05`: the echoed operation code at `4..6` maps back onto a
//!   [`SwitchState`].
use crate::catalog;
use crate::protocol::{FrameEncoding, FunctionCode, SwitchState};
use crate::{Error, Result};
use base64::Engine;
use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Shortest frame the decoder accepts.
pub const MIN_FRAME_LEN: usize = 6;

/// Value extracted from a response frame.
///
/// Serializes as a bare JSON number, whatever the width of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    /// Raw register or coil content of a read response.
    Unsigned(BigUint),
    /// Relay position acknowledged by a write response.
    Switch(SwitchState),
}

impl Serialize for DecodedValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DecodedValue::Unsigned(value) => serde_json::Number::from_str(&value.to_string())
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer),
            DecodedValue::Switch(state) => state.serialize(serializer),
        }
    }
}

impl From<u64> for DecodedValue {
    fn from(value: u64) -> Self {
        DecodedValue::Unsigned(BigUint::from(value))
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Unsigned(value) => write!(f, "{value}"),
            DecodedValue::Switch(state) => write!(f, "{state}"),
        }
    }
}

/// Decodes a response frame given as raw bytes.
pub fn decode(frame: &[u8]) -> Result<DecodedValue> {
    if frame.len() < MIN_FRAME_LEN {
        return Err(Error::MalformedFrame(format!(
            "{} bytes, expecting at least {MIN_FRAME_LEN}",
            frame.len()
        )));
    }

    match FunctionCode::try_from(frame[1])? {
        FunctionCode::ReadCoils | FunctionCode::ReadInputRegisters => {
            let len = frame[2] as usize;
            let payload = frame.get(3..3 + len).ok_or_else(|| {
                Error::MalformedFrame(format!(
                    "payload of {len} bytes exceeds frame of {} bytes",
                    frame.len()
                ))
            })?;
            Ok(DecodedValue::Unsigned(BigUint::from_bytes_be(payload)))
        }
        FunctionCode::WriteSingleCoil => {
            let operation_code = u16::from_be_bytes([frame[4], frame[5]]);
            catalog::switch_state_for(operation_code)
                .map(DecodedValue::Switch)
                .ok_or(Error::UnsupportedOperationCode(operation_code))
        }
        other => Err(Error::UnsupportedFunctionCode(other.to_string())),
    }
}

/// Turns the text form of a frame into bytes.
///
/// Hex input may contain whitespace and a leading `0x`.
pub fn parse_frame(text: &str, encoding: FrameEncoding) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    match encoding {
        FrameEncoding::Hex => {
            let digits = compact
                .strip_prefix("0x")
                .or_else(|| compact.strip_prefix("0X"))
                .unwrap_or(&compact);
            Ok(hex::decode(digits)?)
        }
        FrameEncoding::Base64 => Ok(base64::engine::general_purpose::STANDARD.decode(compact)?),
    }
}

/// Decodes a response frame given as a hex string.
pub fn decode_hex(text: &str) -> Result<DecodedValue> {
    decode(&parse_frame(text, FrameEncoding::Hex)?)
}
