use anyhow::{Context, Result};
use breaker_codec_lib::protocol as proto;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CodecConfig {
    /// Text encoding of frames produced by `encode` and `frame`.
    #[serde(default)]
    pub encoding: proto::FrameEncoding,
    /// Check the trailing CRC of frames handed to `decode`.
    #[serde(default)]
    pub verify_checksum: bool,
    /// Device address used by `frame` when `--address` is not given.
    #[serde(default = "default_address")]
    pub default_address: u8,
}

fn default_address() -> u8 {
    *proto::Address::DEFAULT
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            encoding: proto::FrameEncoding::default(),
            verify_checksum: false,
            default_address: default_address(),
        }
    }
}

impl CodecConfig {
    pub const DEFAULT_CONFIG_FILE: &'static str = "breakercodec.yaml";

    /// Loads the configuration file, a missing file yields the defaults.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            log::debug!("Config file {path:?} not found, using defaults");
            return Ok(Self::default());
        }
        log::debug!("Loading config file from {path:?}");
        let config_file =
            File::open(path).with_context(|| format!("Cannot open config file {path:?}"))?;
        let config: CodecConfig = serde_yaml::from_reader(&config_file)
            .with_context(|| format!("Cannot parse config file {path:?}"))?;
        Ok(config)
    }
}
