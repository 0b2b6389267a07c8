//! Frame encoder.
//!
//! Builds the request frame for a single catalog parameter:
//!
//! | function code | body                                              |
//! |---------------|---------------------------------------------------|
//! | `01`, `04`    | address, code, memory address, word count, CRC    |
//! | `05`, `06`    | address, code, memory address, operation code, CRC |
use crate::catalog::{self, RegisterEntry};
use crate::crc;
use crate::protocol::{Address, FrameEncoding, FunctionCode, SwitchState};
use crate::{Error, Result};
use base64::Engine;

/// Builds the complete frame bytes, checksum included.
///
/// For read function codes `value` is ignored. For write function codes it
/// must map onto a [`SwitchState`].
pub fn encode_frame(
    address: Address,
    function_code: FunctionCode,
    identifier: &str,
    value: &serde_json::Value,
) -> Result<Vec<u8>> {
    let entry = catalog::lookup(function_code, identifier)?;
    let word = match entry {
        RegisterEntry::Read { length, .. } if function_code.is_read() => length,
        RegisterEntry::Write { .. } if function_code.is_write() => {
            let state = SwitchState::from_json(value)?;
            entry
                .operation_code(state)
                .ok_or_else(|| Error::InvalidOperationValue(value.to_string()))?
        }
        _ => return Err(Error::UnsupportedFunctionCode(function_code.to_string())),
    };

    let mut frame = Vec::with_capacity(8);
    frame.push(*address);
    frame.push(function_code as u8);
    frame.extend_from_slice(&entry.memory_address().to_be_bytes());
    frame.extend_from_slice(&word.to_be_bytes());
    crc::append_crc(&mut frame);
    Ok(frame)
}

/// Builds the frame and renders it as an uppercase hex string.
pub fn encode(
    address: Address,
    function_code: FunctionCode,
    identifier: &str,
    value: &serde_json::Value,
) -> Result<String> {
    encode_frame(address, function_code, identifier, value).map(hex::encode_upper)
}

/// Renders raw frame bytes in the requested text encoding.
pub fn render(frame: &[u8], encoding: FrameEncoding) -> String {
    match encoding {
        FrameEncoding::Hex => hex::encode_upper(frame),
        FrameEncoding::Base64 => base64::engine::general_purpose::STANDARD.encode(frame),
    }
}
