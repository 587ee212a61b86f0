//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use k197_lib::constants::*;
#[allow(unused_imports)]
pub use k197_lib::error::K197Error;
#[allow(unused_imports)]
pub use k197_lib::{Charset, DecodedReading, Packet, get_digits, get_mode, get_units, merge_units};

/// Build a packet with the controller preamble and the given data bytes.
#[allow(dead_code)]
pub fn packet_with(mode: u8, digits: [u8; DIGIT_COUNT], units: u8, units2: u8) -> Packet {
    let mut bytes = [0u8; PACKET_SIZE];
    bytes[..COMMAND_SIZE].copy_from_slice(&COMMAND_PREAMBLE);
    bytes[MODES_BYTE] = mode;
    bytes[FIRST_DIGIT..=LAST_DIGIT].copy_from_slice(&digits);
    bytes[UNITS_BYTE] = units;
    bytes[UNIT2_BYTE] = units2;
    Packet::new(bytes)
}

/// Packet carrying only a merged unit byte (second unit byte left clear).
#[allow(dead_code)]
pub fn units_packet(merged: u8, ac: bool) -> Packet {
    let mode = if ac { 1 << 4 } else { 0 };
    packet_with(mode, [0xEB; DIGIT_COUNT], merged, 0)
}

/// Decode hex string to a packet for testing
#[allow(dead_code)]
pub fn hex_packet(hex_data: &str) -> Packet {
    let bytes = hex::decode(hex_data).expect("Failed to decode hex");
    Packet::try_from(bytes.as_slice()).expect("Failed to build packet")
}

/// Meter showing 1.23456 V DC in autorange
#[allow(dead_code)]
pub const VOLTS_DC_AUTO: &str = "20304a1400181120 01 c07e f8d1b9bb 0800 00";

/// Power-up frame: all zeroes, no annunciators
#[allow(dead_code)]
pub const POWER_UP: &str = "20304a140018112000ebebebebebeb000000";
