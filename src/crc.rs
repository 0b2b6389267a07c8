//! CRC16/MODBUS checksum.
//!
//! The checksum is transmitted low byte first, so the value appended to a
//! frame is the byte swapped accumulator.
use crate::{Error, Result};

const CRC_INIT: u16 = 0xFFFF;
const CRC_POLY: u16 = 0xA001;

/// Computes the CRC16/MODBUS checksum of `data`.
pub fn crc16_modbus(data: &[u8]) -> u16 {
    let mut crc = CRC_INIT;
    for &byte in data {
        crc ^= byte as u16;
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ CRC_POLY;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Renders `crc` in wire order as 4 uppercase hex digits.
pub fn render_swapped(crc: u16) -> String {
    format!("{:04X}", crc.swap_bytes())
}

/// Appends the checksum of `frame` to itself, low byte first.
pub fn append_crc(frame: &mut Vec<u8>) {
    let crc = crc16_modbus(frame);
    frame.extend_from_slice(&crc.to_le_bytes());
}

/// Checks the trailing checksum of a complete frame.
pub fn verify(frame: &[u8]) -> Result<()> {
    if frame.len() < 3 {
        return Err(Error::MalformedFrame(format!(
            "{} bytes cannot carry a checksum",
            frame.len()
        )));
    }
    let data_len = frame.len() - 2;
    let actual = u16::from_le_bytes([frame[data_len], frame[data_len + 1]]);
    let expected = crc16_modbus(&frame[..data_len]);
    if actual == expected {
        Ok(())
    } else {
        Err(Error::ChecksumMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value() {
        assert_eq!(crc16_modbus(b"123456789"), 0x4B37);
        assert_eq!(crc16_modbus(&[]), 0xFFFF);
    }

    #[test]
    fn read_register_request() {
        let crc = crc16_modbus(&[0x01, 0x04, 0x00, 0x04, 0x00, 0x01]);
        assert_eq!(crc, 0x0B70);
        assert_eq!(render_swapped(crc), "700B");

        let crc = crc16_modbus(&[0x01, 0x04, 0x00, 0x08, 0x00, 0x01]);
        assert_eq!(render_swapped(crc), "B008");
    }

    #[test]
    fn append_and_verify() {
        let mut frame = vec![0x01, 0x05, 0x00, 0x01, 0xFF, 0x00];
        append_crc(&mut frame);
        assert_eq!(frame[6..], [0xDD, 0xFA]);
        assert!(verify(&frame).is_ok());

        frame[3] = 0x02;
        assert!(matches!(
            verify(&frame),
            Err(Error::ChecksumMismatch { actual: 0xFADD, .. })
        ));
    }

    #[test]
    fn verify_short_frame() {
        assert!(matches!(verify(&[]), Err(Error::MalformedFrame(..))));
        assert!(matches!(verify(&[0x01, 0x04]), Err(Error::MalformedFrame(..))));
    }
}
