//! JSON entry points.
//!
//! The device management platform hands the codec one JSON object per call
//! and expects a frame string or a value back:
//!
//! ```text
//! {"address":"1","functionCode":"04","params":{"Ua":true}}  ->  "010400080001B008"
//! {"data":"01040200FE38B0"}                                  ->  254
//! ```
use crate::decoder::{self, DecodedValue};
use crate::encoder;
use crate::protocol::{Address, FrameEncoding, FunctionCode};
use crate::{crc, Error, Result};
use serde_json::{Map, Value};

const KEY_ADDRESS: &str = "address";
const KEY_FUNCTION_CODE: &str = "functionCode";
const KEY_PARAMS: &str = "params";
const KEY_DATA: &str = "data";
const KEY_ENCODING: &str = "encoding";
const KEY_VERIFY_CHECKSUM: &str = "verifyChecksum";

fn as_object<'a>(value: &'a Value, field: &'static str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| Error::InvalidField {
        field,
        reason: format!("expected object, got {value}"),
    })
}

/// A single-parameter command towards the device.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolRequest {
    pub address: Address,
    pub function_code: FunctionCode,
    pub identifier: String,
    pub value: Value,
    pub encoding: FrameEncoding,
}

impl ProtocolRequest {
    /// Validates a request object and extracts its single parameter.
    pub fn from_value(request: &Value) -> Result<Self> {
        let object = as_object(request, "request")?;
        let address = object
            .get(KEY_ADDRESS)
            .ok_or(Error::MissingField(KEY_ADDRESS))?;
        let function_code = object
            .get(KEY_FUNCTION_CODE)
            .ok_or(Error::MissingField(KEY_FUNCTION_CODE))?;
        let params = object
            .get(KEY_PARAMS)
            .ok_or(Error::MissingField(KEY_PARAMS))?;

        // Params sometimes arrive as a JSON document embedded in a string.
        let params = match params {
            Value::String(text) => serde_json::from_str::<Value>(text)?,
            other => other.clone(),
        };
        let params = as_object(&params, KEY_PARAMS)?;
        if params.len() > 1 {
            return Err(Error::MultipleIdentifiers(params.len()));
        }
        let (identifier, value) = params
            .iter()
            .next()
            .ok_or(Error::MissingField(KEY_PARAMS))?;

        let function_code = match function_code {
            Value::String(code) => code.parse()?,
            other => return Err(Error::UnsupportedFunctionCode(other.to_string())),
        };

        Ok(Self {
            address: Address::from_json(address)?,
            function_code,
            identifier: identifier.clone(),
            value: value.clone(),
            encoding: FrameEncoding::from_json(object.get(KEY_ENCODING))?,
        })
    }

    /// Builds the frame and renders it in the requested encoding.
    pub fn encode(&self) -> Result<String> {
        let frame = encoder::encode_frame(
            self.address,
            self.function_code,
            &self.identifier,
            &self.value,
        )?;
        Ok(encoder::render(&frame, self.encoding))
    }
}

/// A frame received from the device.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub frame: Vec<u8>,
    pub expected_address: Option<Address>,
    pub verify_checksum: bool,
}

impl RawResponse {
    /// Validates a response object and turns its `data` into frame bytes.
    pub fn from_value(response: &Value) -> Result<Self> {
        let object = as_object(response, "response")?;
        let data = object.get(KEY_DATA).ok_or(Error::MissingField(KEY_DATA))?;
        let data = data.as_str().ok_or_else(|| Error::InvalidField {
            field: KEY_DATA,
            reason: format!("expected string, got {data}"),
        })?;
        let encoding = FrameEncoding::from_json(object.get(KEY_ENCODING))?;
        let expected_address = match object.get(KEY_ADDRESS) {
            None | Some(Value::Null) => None,
            Some(address) => Some(Address::from_json(address)?),
        };
        let verify_checksum = match object.get(KEY_VERIFY_CHECKSUM) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                return Err(Error::InvalidField {
                    field: KEY_VERIFY_CHECKSUM,
                    reason: format!("expected boolean, got {other}"),
                })
            }
        };

        Ok(Self {
            frame: decoder::parse_frame(data, encoding)?,
            expected_address,
            verify_checksum,
        })
    }

    /// Applies the optional checks and decodes the frame.
    pub fn decode(&self) -> Result<DecodedValue> {
        if self.verify_checksum {
            crc::verify(&self.frame)?;
        }
        if let (Some(expected), Some(&actual)) = (self.expected_address, self.frame.first()) {
            if *expected != actual {
                return Err(Error::AddressMismatch {
                    expected: *expected,
                    actual,
                });
            }
        }
        decoder::decode(&self.frame)
    }
}

/// Turns a JSON command into the frame to transmit.
pub fn protocol_to_raw_data(request: &str) -> Result<String> {
    let request: Value = serde_json::from_str(request)?;
    ProtocolRequest::from_value(&request)?.encode()
}

/// Turns a JSON wrapped response frame into the value it carries.
pub fn raw_data_to_protocol(response: &str) -> Result<DecodedValue> {
    let response: Value = serde_json::from_str(response)?;
    RawResponse::from_value(&response)?.decode()
}
