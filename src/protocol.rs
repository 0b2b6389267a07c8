//! Typed wire values of the 485 single-phase leakage breaker protocol.
//!
//! The device speaks Modbus RTU. A frame starts with the device [`Address`],
//! followed by the [`FunctionCode`], the function specific payload and a
//! CRC16/MODBUS checksum transmitted low byte first.
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref, str::FromStr};

/// Device address on the RS485 bus, rendered as two hex digits on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(u8);

impl Address {
    /// The factory default address of the breaker.
    pub const DEFAULT: Address = Address(0x01);

    /// Parses an address given either as a JSON integer or as a decimal string.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let number = match value {
            serde_json::Value::Number(number) => {
                number.as_i64().ok_or_else(|| Error::InvalidField {
                    field: "address",
                    reason: format!("{number} is not an integer"),
                })?
            }
            serde_json::Value::String(text) => {
                text.trim().parse::<i64>().map_err(|err| Error::InvalidField {
                    field: "address",
                    reason: format!("'{text}': {err}"),
                })?
            }
            other => {
                return Err(Error::InvalidField {
                    field: "address",
                    reason: format!("expected integer or string, got {other}"),
                })
            }
        };
        Self::try_from(number)
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Deref for Address {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u8> for Address {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for Address {
    type Error = Error;
    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_| Error::AddressOutOfRange(value))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", self.0)
    }
}

/// The function codes known to this device profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FunctionCode {
    ReadCoils = 0x01,
    ReadInputRegisters = 0x04,
    WriteSingleCoil = 0x05,
    WriteSingleRegister = 0x06,
}

impl FunctionCode {
    /// All function codes in catalog order.
    pub const ALL: [FunctionCode; 4] = [
        FunctionCode::ReadCoils,
        FunctionCode::ReadInputRegisters,
        FunctionCode::WriteSingleCoil,
        FunctionCode::WriteSingleRegister,
    ];

    /// `true` for the read family (`01`, `04`).
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            FunctionCode::ReadCoils | FunctionCode::ReadInputRegisters
        )
    }

    /// `true` for the single write family (`05`, `06`).
    pub fn is_write(&self) -> bool {
        !self.is_read()
    }
}

impl TryFrom<u8> for FunctionCode {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(FunctionCode::ReadCoils),
            0x04 => Ok(FunctionCode::ReadInputRegisters),
            0x05 => Ok(FunctionCode::WriteSingleCoil),
            0x06 => Ok(FunctionCode::WriteSingleRegister),
            _ => Err(Error::UnsupportedFunctionCode(format!("{value:02X}"))),
        }
    }
}

impl FromStr for FunctionCode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != 2 {
            return Err(Error::UnsupportedFunctionCode(s.to_string()));
        }
        let value = u8::from_str_radix(digits, 16)
            .map_err(|_| Error::UnsupportedFunctionCode(s.to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", *self as u8)
    }
}

/// Relay position written by `05`/`06` and echoed in the acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SwitchState {
    /// Breaker open.
    Off = 0,
    /// Breaker closed.
    On = 1,
}

impl SwitchState {
    /// Maps a request value onto a switch state.
    ///
    /// Accepts the numbers `0`/`1` (`0.0`/`1.0` included) and the booleans
    /// `false`/`true`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Bool(on) => Ok(Self::from(*on)),
            serde_json::Value::Number(number) => match number.as_f64() {
                Some(v) if v == 0.0 => Ok(SwitchState::Off),
                Some(v) if v == 1.0 => Ok(SwitchState::On),
                _ => Err(Error::InvalidOperationValue(number.to_string())),
            },
            other => Err(Error::InvalidOperationValue(other.to_string())),
        }
    }
}

impl From<bool> for SwitchState {
    fn from(on: bool) -> Self {
        if on {
            SwitchState::On
        } else {
            SwitchState::Off
        }
    }
}

impl From<SwitchState> for u8 {
    fn from(state: SwitchState) -> u8 {
        state as u8
    }
}

impl TryFrom<u8> for SwitchState {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(SwitchState::Off),
            1 => Ok(SwitchState::On),
            _ => Err(Error::InvalidOperationValue(value.to_string())),
        }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// Text rendering of a raw frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameEncoding {
    /// Uppercase hex digits, two per byte.
    #[default]
    Hex,
    /// Standard base64 with padding.
    Base64,
}

impl FrameEncoding {
    /// Parses the optional `encoding` field of a message.
    pub fn from_json(value: Option<&serde_json::Value>) -> Result<Self> {
        match value {
            None | Some(serde_json::Value::Null) => Ok(FrameEncoding::default()),
            Some(serde_json::Value::String(name)) => name.parse(),
            Some(other) => Err(Error::InvalidField {
                field: "encoding",
                reason: format!("expected string, got {other}"),
            }),
        }
    }
}

impl FromStr for FrameEncoding {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(FrameEncoding::Hex),
            "base64" => Ok(FrameEncoding::Base64),
            _ => Err(Error::InvalidField {
                field: "encoding",
                reason: format!("'{s}' is neither 'hex' nor 'base64'"),
            }),
        }
    }
}

impl fmt::Display for FrameEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameEncoding::Hex => write!(f, "hex"),
            FrameEncoding::Base64 => write!(f, "base64"),
        }
    }
}
