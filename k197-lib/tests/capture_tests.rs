//! Capture dump parsing and stream framing

mod common;

use common::*;
use k197_lib::capture::{CaptureLine, parse_capture, read_capture};
use k197_lib::framer::PacketFramer;

const DUMP: &str = "\
# K197 bus dump, 1.23456 V DC autorange
@0 20 30 4A 14 00 18 11 20 01 C0 7E F8 D1 B9 BB 08 00 00

@250.5 0x20,0x30,0x4A,0x14,0x00,0x18,0x11,0x20,0x00,0xEB,0xEB,0xEB,0xEB,0xEB,0xEB,0x00,0x00,0x00
20304a140018112000ebebebebebeb000000
";

#[test]
fn test_parse_dump() {
    let captures = parse_capture(DUMP).expect("dump should parse");
    assert_eq!(captures.len(), 3);

    assert_eq!(captures[0].line, 2);
    assert_eq!(captures[0].timestamp_ms, Some(0.0));
    assert_eq!(captures[0].packet.mode_byte(), 0x01);

    assert_eq!(captures[1].line, 4);
    assert_eq!(captures[1].timestamp_ms, Some(250.5));
    assert_eq!(captures[1].packet, hex_packet(POWER_UP));

    assert_eq!(captures[2].line, 5);
    assert_eq!(captures[2].timestamp_ms, None);
    assert_eq!(captures[2].packet, captures[1].packet);
}

#[test]
fn test_error_reports_line_number() {
    let dump = "20304a140018112000ebebebebebeb000000\n20304a1400\n";
    match parse_capture(dump) {
        Err(K197Error::ParseError { line, message }) => {
            assert_eq!(line, 2);
            assert!(message.contains("expected 18 bytes"), "message was {}", message);
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_bad_timestamp() {
    let result = CaptureLine::parse(7, "@soon 20304a140018112000ebebebebebeb000000");
    assert!(matches!(result, Err(K197Error::ParseError { line: 7, .. })));
}

#[test]
fn test_comments_and_blanks() {
    assert!(CaptureLine::parse(1, "   ").unwrap().is_none());
    assert!(CaptureLine::parse(1, "# note").unwrap().is_none());
}

#[test]
fn test_missing_file() {
    let result = read_capture("/nonexistent/k197/dump.txt");
    assert!(matches!(result, Err(K197Error::Io(_))));
}

#[test]
fn test_framer_power_up_sequence() {
    // DISPLAY OFF, one command block, then a normal transfer
    let mut stream = vec![0x10, 0x20, 0x30, 0x4A, 0x14, 0x00, 0x18, 0x11];
    stream.extend(hex::decode(POWER_UP).unwrap());
    stream.extend(hex::decode(VOLTS_DC_AUTO.replace(' ', "")).unwrap());

    let mut framer = PacketFramer::new();
    let mut packets = Vec::new();
    for chunk in stream.chunks(5) {
        framer.push(chunk);
        packets.extend(framer.packets());
    }

    assert_eq!(packets.len(), 2);
    assert_eq!(framer.discarded(), 8);
    let readings: Vec<String> = packets
        .iter()
        .map(|p| DecodedReading::decode(p, Charset::Unicode).digits)
        .collect();
    assert_eq!(readings, vec!["  000000", " 1.23456"]);
}
