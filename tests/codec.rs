use assert_matches::assert_matches;
use breaker_codec_lib::{
    catalog, crc,
    decoder::{self, DecodedValue},
    message::{protocol_to_raw_data, raw_data_to_protocol},
    protocol::{FunctionCode, SwitchState},
    Error,
};
use num_bigint::BigUint;

#[test]
fn read_request_for_ua() {
    let frame =
        protocol_to_raw_data(r#"{"address":"1","functionCode":"04","params":{"Ua":true}}"#)
            .unwrap();
    assert!(frame.starts_with("010400080001"));
    assert_eq!(frame, "010400080001B008");
}

#[test]
fn known_request_frames() {
    for (request, expected) in [
        (
            r#"{"address":1,"functionCode":"04","params":{"Ia":true}}"#,
            "010400090001E1C8",
        ),
        (
            r#"{"address":1,"functionCode":"04","params":{"PEnergy":true}}"#,
            "0104002500026000",
        ),
        (
            r#"{"address":1,"functionCode":"01","params":{"Relay":true}}"#,
            "010100010001AC0A",
        ),
        (
            r#"{"address":1,"functionCode":"05","params":{"Relay":1}}"#,
            "01050001FF00DDFA",
        ),
        (
            r#"{"address":"10","functionCode":"0x04","params":{"Uc":true}}"#,
            "0A04001A00011176",
        ),
    ] {
        assert_eq!(protocol_to_raw_data(request).unwrap(), expected, "{request}");
    }
}

#[test]
fn base64_request_frame() {
    assert_eq!(
        protocol_to_raw_data(
            r#"{"address":1,"functionCode":"05","params":{"Relay":1},"encoding":"base64"}"#
        )
        .unwrap(),
        "AQUAAf8A3fo="
    );
}

#[test]
fn write_round_trip() {
    let frame =
        protocol_to_raw_data(r#"{"address":1,"functionCode":"05","params":{"Relay":1}}"#).unwrap();
    assert_eq!(&frame[8..12], "FF00");

    let value = raw_data_to_protocol(&format!(r#"{{"data":"{frame}"}}"#)).unwrap();
    assert_eq!(value, DecodedValue::Switch(SwitchState::On));
    assert_eq!(serde_json::to_string(&value).unwrap(), "1");
}

#[test]
fn read_round_trip() {
    for identifier in catalog::identifiers(FunctionCode::ReadInputRegisters) {
        let request = format!(r#"{{"address":7,"functionCode":"04","params":{{"{identifier}":true}}}}"#);
        let frame = hex::decode(protocol_to_raw_data(&request).unwrap()).unwrap();
        let words = u16::from_be_bytes([frame[4], frame[5]]) as usize;

        // Synthetic response with the requested number of words.
        let mut response = vec![frame[0], frame[1], (words * 2) as u8];
        response.extend((0..words * 2).map(|i| 0x11 * (i as u8 + 1)));
        crc::append_crc(&mut response);

        let expected = BigUint::from_bytes_be(&response[3..3 + words * 2]);
        let value = raw_data_to_protocol(&format!(
            r#"{{"data":"{}","verifyChecksum":true,"address":7}}"#,
            hex::encode_upper(&response)
        ))
        .unwrap();
        assert_eq!(value, DecodedValue::Unsigned(expected), "{identifier}");
    }
}

#[test]
fn known_response_frames() {
    assert_eq!(
        raw_data_to_protocol(r#"{"data":"01040200FE38B0"}"#).unwrap(),
        DecodedValue::from(254u64)
    );
    assert_eq!(
        raw_data_to_protocol(r#"{"data":"AQEBAFGI","encoding":"base64"}"#).unwrap(),
        DecodedValue::from(0u64)
    );
}

#[test]
fn wide_read_response() {
    let value = raw_data_to_protocol(r#"{"data":"010409000000000000000001AABB"}"#).unwrap();
    assert_eq!(value, DecodedValue::from(1u64));
    assert_eq!(serde_json::to_string(&value).unwrap(), "1");

    let value =
        raw_data_to_protocol(r#"{"data":"01040A0100000000000000000000"}"#).unwrap();
    assert_eq!(
        serde_json::to_string(&value).unwrap(),
        "4722366482869645213696"
    );
}

#[test]
fn write_value_as_whole_float() {
    assert_eq!(
        protocol_to_raw_data(r#"{"address":1,"functionCode":"05","params":{"Relay":1.0}}"#)
            .unwrap(),
        "01050001FF00DDFA"
    );
    assert_matches!(
        protocol_to_raw_data(r#"{"address":1,"functionCode":"05","params":{"Relay":0.5}}"#),
        Err(Error::InvalidOperationValue(..))
    );
}

#[test]
fn multiple_identifiers_for_every_function_code() {
    for code in ["01", "04", "05", "06", "03"] {
        let request =
            format!(r#"{{"address":1,"functionCode":"{code}","params":{{"Relay":1,"Ua":true}}}}"#);
        assert_matches!(
            protocol_to_raw_data(&request),
            Err(Error::MultipleIdentifiers(2))
        );
    }
}

#[test]
fn unsupported_identifier() {
    assert_matches!(
        protocol_to_raw_data(r#"{"address":1,"functionCode":"05","params":{"Ua":1}}"#),
        Err(Error::UnsupportedIdentifier { identifier, function_code })
            if identifier == "Ua" && function_code == "05"
    );
}

#[test]
fn unsupported_function_code() {
    assert_matches!(
        protocol_to_raw_data(r#"{"address":1,"functionCode":"03","params":{"Ua":true}}"#),
        Err(Error::UnsupportedFunctionCode(..))
    );
}

#[test]
fn invalid_operation_value() {
    assert_matches!(
        protocol_to_raw_data(r#"{"address":1,"functionCode":"06","params":{"Relay":"on"}}"#),
        Err(Error::InvalidOperationValue(..))
    );
}

#[test]
fn address_out_of_range() {
    assert_matches!(
        protocol_to_raw_data(r#"{"address":"256","functionCode":"04","params":{"Ua":true}}"#),
        Err(Error::AddressOutOfRange(256))
    );
}

#[test]
fn short_frames() {
    let full = "01040200FE38B0";
    for bytes in 0..decoder::MIN_FRAME_LEN {
        let data = &full[..bytes * 2];
        assert_matches!(
            raw_data_to_protocol(&format!(r#"{{"data":"{data}"}}"#)),
            Err(Error::MalformedFrame(..))
        );
    }
}

#[test]
fn unknown_acknowledgement_code() {
    assert_matches!(
        raw_data_to_protocol(r#"{"data":"010500011234ABCD"}"#),
        Err(Error::UnsupportedOperationCode(0x1234))
    );
}

#[test]
fn malformed_json() {
    assert_matches!(raw_data_to_protocol("{data:"), Err(Error::InvalidJson(..)));
    assert_matches!(protocol_to_raw_data(""), Err(Error::InvalidJson(..)));
}
