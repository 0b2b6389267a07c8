use crate::config::CodecConfig;
use breaker_codec_lib::protocol as proto;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};

fn parse_address(s: &str) -> Result<proto::Address, String> {
    let address_val =
        clap_num::maybe_hex::<u8>(s).map_err(|e| format!("Invalid address format: {e}"))?;
    Ok(proto::Address::from(address_val))
}

fn parse_function_code(s: &str) -> Result<proto::FunctionCode, String> {
    s.parse::<proto::FunctionCode>().map_err(|e| e.to_string())
}

fn parse_encoding(s: &str) -> Result<proto::FrameEncoding, String> {
    s.parse::<proto::FrameEncoding>().map_err(|e| e.to_string())
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommands {
    /// Convert a JSON command into the raw frame to transmit.
    /// Example: '{"address":"1","functionCode":"04","params":{"Ua":true}}'
    /// Without an argument one request per line is read from stdin.
    #[clap(verbatim_doc_comment)]
    Encode {
        /// The JSON request.
        request: Option<String>,
    },

    /// Extract the value carried by a raw response frame.
    /// Example: '{"data":"01040200FE38B0"}'
    /// Without an argument one response per line is read from stdin.
    #[clap(verbatim_doc_comment)]
    Decode {
        /// The JSON response.
        response: Option<String>,
    },

    /// Build a frame from plain arguments instead of JSON.
    Frame {
        /// The Modbus RTU device address (0 to 255).
        /// Can be specified in decimal or hexadecimal (e.g., "0x01").
        /// Defaults to the address from the config file.
        #[arg(short, long, value_parser = parse_address, verbatim_doc_comment)]
        address: Option<proto::Address>,

        /// Function code: 01, 04, 05 or 06.
        #[arg(value_parser = parse_function_code)]
        function_code: proto::FunctionCode,

        /// Parameter identifier, e.g. "Ua" or "Relay".
        identifier: String,

        /// Value for write function codes: 1 closes the relay, 0 opens it.
        value: Option<u8>,
    },

    /// Print the register catalog of the device.
    Catalog,

    /// Print the CRC16/MODBUS checksum of a hex byte sequence.
    Crc {
        /// Hex bytes, e.g. "010400080001".
        data: String,
    },
}

const fn about_text() -> &'static str {
    "Leakage breaker codec - Translate JSON commands to Modbus RTU frames and back."
}

#[derive(Parser, Debug)]
#[command(name="breakercodec", author, version, about=about_text(), long_about = None, propagate_version = true)]
pub struct CliArgs {
    /// Configure verbosity of logging output.
    /// -v for info, -vv for debug, -vvv for trace. Default is warn.
    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,

    /// The configuration file.
    #[arg(global = true, long, default_value_t = CodecConfig::DEFAULT_CONFIG_FILE.to_string())]
    pub config_file: String,

    /// Text encoding of frames, "hex" or "base64". Overrides the config file.
    #[arg(global = true, long, value_parser = parse_encoding)]
    pub encoding: Option<proto::FrameEncoding>,

    /// Verify the CRC of decoded frames. Overrides the config file.
    #[arg(global = true, long, overrides_with = "no_verify_checksum")]
    pub verify_checksum: bool,

    /// Skip CRC verification even when the config file enables it.
    #[arg(global = true, long, overrides_with = "verify_checksum")]
    pub no_verify_checksum: bool,

    #[command(subcommand)]
    pub command: CliCommands,
}

impl CliArgs {
    /// Checksum verification requested on the command line, if any.
    pub fn verify_checksum_override(&self) -> Option<bool> {
        match (self.verify_checksum, self.no_verify_checksum) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_frame_command() {
        let args = CliArgs::try_parse_from([
            "breakercodec",
            "frame",
            "--address",
            "0x0A",
            "05",
            "Relay",
            "1",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            CliCommands::Frame {
                address: Some(proto::Address::from(0x0A)),
                function_code: proto::FunctionCode::WriteSingleCoil,
                identifier: "Relay".to_string(),
                value: Some(1),
            }
        );
        assert_eq!(args.verify_checksum_override(), None);
    }

    #[test]
    fn reject_unknown_function_code() {
        assert!(CliArgs::try_parse_from(["breakercodec", "frame", "03", "Ua"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "breakercodec",
            "decode",
            "--verify-checksum",
            "--encoding",
            "base64",
        ])
        .unwrap();
        assert_eq!(args.verify_checksum_override(), Some(true));
        assert_eq!(args.encoding, Some(proto::FrameEncoding::Base64));
        assert_eq!(args.command, CliCommands::Decode { response: None });
    }

    #[test]
    fn checksum_flags_override_each_other() {
        let args =
            CliArgs::try_parse_from(["breakercodec", "decode", "--no-verify-checksum"]).unwrap();
        assert_eq!(args.verify_checksum_override(), Some(false));

        let args = CliArgs::try_parse_from([
            "breakercodec",
            "--verify-checksum",
            "decode",
            "--no-verify-checksum",
        ])
        .unwrap();
        assert_eq!(args.verify_checksum_override(), Some(false));
    }
}
