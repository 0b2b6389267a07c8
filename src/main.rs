//! Leakage Breaker Codec CLI
//!
//! A command-line interface (CLI) application for translating between the JSON
//! device management protocol and the Modbus RTU frames of the 485 single-phase
//! leakage breaker.
//!
//! This tool allows users to:
//! - Convert JSON commands into frames (hex or base64).
//! - Extract values from received frames, optionally verifying the checksum.
//! - Build frames from plain command-line arguments.
//! - List the register catalog of the device.
//! - Compute CRC16/MODBUS checksums.
//!
//! The CLI leverages the `breaker_codec_lib` crate for all protocol handling.
//! It never opens a serial port, frames are printed for another tool to send.

use anyhow::{Context, Result};
use breaker_codec_lib::{catalog, crc, encoder, message, protocol as proto};
use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use log::*;
use serde_json::Value;
use std::io::{stdin, BufRead};
use std::panic;

mod commandline;
mod config;

fn logging_init(loglevel: LevelFilter) -> LoggerHandle {
    let log_handle = Logger::try_with_env_or_str(loglevel.as_str())
        .expect("Cannot init logging")
        .start()
        .expect("Cannot start logging");

    panic::set_hook(Box::new(|panic_info| {
        let (filename, line, column) = panic_info
            .location()
            .map(|loc| (loc.file(), loc.line(), loc.column()))
            .unwrap_or(("<unknown_file>", 0, 0));

        let cause_str = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            *s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.as_str()
        } else {
            "<unknown_panic_cause>"
        };

        error!(
            target: "panic",
            "Thread '{}' panicked at '{}': {}:{} - Cause: {}",
            std::thread::current().name().unwrap_or("<unnamed>"),
            filename,
            line,
            column,
            cause_str
        );
    }));
    log_handle
}

/// Settings merged from the config file and the global CLI flags.
struct Settings {
    encoding: proto::FrameEncoding,
    verify_checksum: bool,
    default_address: proto::Address,
}

impl Settings {
    fn new(args: &commandline::CliArgs, file: config::CodecConfig) -> Self {
        Self {
            encoding: args.encoding.unwrap_or(file.encoding),
            verify_checksum: args
                .verify_checksum_override()
                .unwrap_or(file.verify_checksum),
            default_address: proto::Address::from(file.default_address),
        }
    }
}

/// Fills `key` of a JSON object unless the message already sets it.
fn with_default(message: &str, key: &str, value: Value) -> Result<String> {
    let mut json: Value = serde_json::from_str(message)
        .with_context(|| format!("Cannot parse JSON message: {message}"))?;
    if let Value::Object(object) = &mut json {
        object.entry(key).or_insert(value);
    }
    Ok(json.to_string())
}

fn encode_line(request: &str, settings: &Settings) -> Result<String> {
    let request = with_default(request, "encoding", Value::from(settings.encoding.to_string()))?;
    debug!("Encoding request {request}");
    message::protocol_to_raw_data(&request)
        .with_context(|| format!("Cannot encode request {request}"))
}

fn decode_line(response: &str, settings: &Settings) -> Result<String> {
    let mut response = with_default(
        response,
        "encoding",
        Value::from(settings.encoding.to_string()),
    )?;
    if settings.verify_checksum {
        response = with_default(&response, "verifyChecksum", Value::Bool(true))?;
    }
    debug!("Decoding response {response}");
    let value = message::raw_data_to_protocol(&response)
        .with_context(|| format!("Cannot decode response {response}"))?;
    Ok(serde_json::to_string(&value)?)
}

/// Runs `handler` on the argument or on every non-empty stdin line.
fn run_messages(
    argument: &Option<String>,
    settings: &Settings,
    handler: fn(&str, &Settings) -> Result<String>,
) -> Result<()> {
    if let Some(message) = argument {
        println!("{}", handler(message, settings)?);
        return Ok(());
    }
    info!("Reading messages from stdin, one per line");
    let mut failures = 0usize;
    for line in stdin().lock().lines() {
        let line = line.context("Cannot read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        match handler(&line, settings) {
            Ok(output) => println!("{output}"),
            Err(error) => {
                failures += 1;
                error!("{error:#}");
            }
        }
    }
    if failures > 0 {
        anyhow::bail!("{failures} message(s) could not be processed");
    }
    Ok(())
}

fn print_catalog() {
    for function_code in proto::FunctionCode::ALL {
        println!("Function code {function_code}:");
        for (identifier, entry) in catalog::entries(function_code) {
            match entry {
                catalog::RegisterEntry::Read {
                    memory_address,
                    length,
                } => println!("  {identifier:<10} address {memory_address:04X} length {length}"),
                catalog::RegisterEntry::Write {
                    memory_address,
                    operation_codes,
                } => {
                    let codes = operation_codes
                        .iter()
                        .map(|(state, code)| format!("{state}={code:04X}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    println!("  {identifier:<10} address {memory_address:04X} codes {codes}")
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let args = commandline::CliArgs::parse();

    // 1. Initialize logging as early as possible
    let _log_handle = logging_init(args.verbose.log_level_filter());
    info!(
        "Leakage breaker codec started. Log level: {}",
        args.verbose.log_level_filter()
    );

    // 2. Merge config file and command-line flags
    let file_config = config::CodecConfig::load(&args.config_file)?;
    let settings = Settings::new(&args, file_config);

    // 3. Execute the command
    match &args.command {
        commandline::CliCommands::Encode { request } => {
            info!("Executing: Encode");
            run_messages(request, &settings, encode_line)?;
        }
        commandline::CliCommands::Decode { response } => {
            info!("Executing: Decode");
            run_messages(response, &settings, decode_line)?;
        }
        commandline::CliCommands::Frame {
            address,
            function_code,
            identifier,
            value,
        } => {
            let address = address.unwrap_or(settings.default_address);
            info!("Executing: Frame {function_code} {identifier} for address {address}");
            let value = value.map(Value::from).unwrap_or(Value::Null);
            let frame = encoder::encode_frame(address, *function_code, identifier, &value)
                .with_context(|| format!("Cannot build frame for {function_code} {identifier}"))?;
            println!("{}", encoder::render(&frame, settings.encoding));
        }
        commandline::CliCommands::Catalog => {
            info!("Executing: Catalog");
            print_catalog();
        }
        commandline::CliCommands::Crc { data } => {
            info!("Executing: CRC");
            let bytes = hex::decode(data.trim())
                .with_context(|| format!("Invalid hex data: '{data}'"))?;
            let checksum = crc::crc16_modbus(&bytes);
            println!(
                "CRC16/MODBUS: {checksum:04X} (wire order: {})",
                crc::render_swapped(checksum)
            );
        }
    }

    Ok(())
}
