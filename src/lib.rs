//! A codec between the JSON device management protocol and the Modbus RTU
//! frames of the 485 single-phase leakage breaker.
//!
//! The crate covers both directions of a single request/response exchange:
//!
//! 1.  **Cloud to device**: [`message::protocol_to_raw_data`] turns a command
//!     such as `{"address":"1","functionCode":"04","params":{"Ua":true}}`
//!     into the frame to put on the bus, CRC16/MODBUS checksum included.
//!
//! 2.  **Device to cloud**: [`message::raw_data_to_protocol`] extracts the
//!     register value or relay position from a received frame.
//!
//! ## Features
//!
//! - **Register Catalog**: Every readable measurement and the relay control of the device, see [`catalog`].
//! - **Strongly-Typed API**: [`protocol::Address`], [`protocol::FunctionCode`] and [`protocol::SwitchState`] keep frames well formed.
//! - **Pure Functions**: No I/O and no shared mutable state, calls may run on any thread.
//!
//! Transport is out of scope. Frames are handed over as hex (or base64) text.
//!
//! ## Quick Start
//!
//! ```
//! use breaker_codec_lib::message::{protocol_to_raw_data, raw_data_to_protocol};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let frame = protocol_to_raw_data(r#"{"address":"1","functionCode":"04","params":{"Ua":true}}"#)?;
//!     assert_eq!(frame, "010400080001B008");
//!
//!     let value = raw_data_to_protocol(r#"{"data":"01040200FE38B0"}"#)?;
//!     println!("Ua raw value: {}", value);
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod crc;
pub mod decoder;
pub mod encoder;
mod error;
pub mod message;
pub mod protocol;

pub use error::{Error, Result};
