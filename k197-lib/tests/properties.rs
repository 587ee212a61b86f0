//! Exhaustive and property-based checks of the decoder invariants

mod common;

use common::*;
use k197_lib::segment::{SEGMENT_TABLE, decode_segment};
use proptest::prelude::*;

/// Codes confirmed on a real meter
const CONFIRMED: &[(u8, char)] = &[
    (0xEB, '0'),
    (0xC0, '1'),
    (0x7A, '2'),
    (0xF8, '3'),
    (0xD1, '4'),
    (0xB9, '5'),
    (0xBB, '6'),
    (0xC8, '7'),
    (0xFB, '8'),
    (0xD9, '9'),
    (0xDB, 'A'),
    (0x2B, 'C'),
    (0x3B, 'E'),
    (0xD3, 'H'),
    (0x23, 'L'),
    (0x92, 'n'),
    (0xB2, 'o'),
    (0x12, 'r'),
    (0x33, 't'),
    (0xA2, 'u'),
    (0x30, '='),
    (0x00, ' '),
];

/// Lowercase `c` was derived from the segment layout and still awaits a
/// sighting on hardware. The table must keep it; its glyph may change.
const INFERRED_LOWERCASE_C: u8 = 0x32;

/// Minimal merged unit bytes, in decoding priority order.
const UNIT_PRIORITY: &[(u8, &str)] = &[
    (0b0101_0000, "kΩ   "),
    (0b0100_0010, "MΩ   "),
    (0b0100_0000, " Ω   "),
    (0b1000_0100, "μA   "),
    (0b1010_0000, "mA   "),
    (0b1000_0000, " A   "),
    (0b0000_1001, "mV   "),
    (0b0000_1000, " V   "),
];

fn digits_packet(mode: u8, digits: [u8; DIGIT_COUNT]) -> Packet {
    packet_with(mode, digits, 0, 0)
}

#[test]
fn test_every_segment_code() {
    for code in 0u8..=255 {
        let masked = code & !DIGIT_DOT_MASK;
        let expected = CONFIRMED
            .iter()
            .find(|(c, _)| *c == masked)
            .map(|(_, ch)| *ch);
        if masked == INFERRED_LOWERCASE_C {
            continue;
        }
        assert_eq!(
            decode_segment(code),
            expected.unwrap_or('_'),
            "code {:#04x} (masked {:#04x})",
            code,
            masked
        );
    }
}

#[test]
fn test_confirmed_codes_through_packets() {
    for &(code, ch) in CONFIRMED {
        let packet = digits_packet(0, [code; DIGIT_COUNT]);
        let expected: String = format!("  {}", ch.to_string().repeat(DIGIT_COUNT));
        assert_eq!(get_digits(&packet, Charset::Unicode), expected, "code {:#04x}", code);
    }
}

#[test]
fn test_inferred_lowercase_c_pending_hardware_confirmation() {
    assert!(
        SEGMENT_TABLE.iter().any(|(code, _)| *code == INFERRED_LOWERCASE_C),
        "inferred code {:#04x} must stay in the table",
        INFERRED_LOWERCASE_C
    );
    assert_ne!(decode_segment(INFERRED_LOWERCASE_C), '_');
}

#[test]
fn test_table_size() {
    assert_eq!(SEGMENT_TABLE.len(), CONFIRMED.len() + 1);
}

#[test]
fn test_sign_for_every_mode_byte() {
    for mode in 0u8..=255 {
        let digits = get_digits(&digits_packet(mode, [0xEB; DIGIT_COUNT]), Charset::Unicode);
        let sign = digits.chars().nth(1).unwrap();
        let expected = if mode & 0x80 != 0 { '-' } else { ' ' };
        assert_eq!(sign, expected, "mode {:#010b}", mode);
        // width padding sits in front of the sign
        assert_eq!(digits.chars().next(), Some(' '));
    }
}

#[test]
fn test_sign_with_dot_is_first_char() {
    for mode in 0u8..=255 {
        let digits = get_digits(&digits_packet(mode, [0xEF, 0xEB, 0xEB, 0xEB, 0xEB, 0xEB]), Charset::Unicode);
        let expected = if mode & 0x80 != 0 { '-' } else { ' ' };
        assert_eq!(digits.chars().next(), Some(expected), "mode {:#010b}", mode);
    }
}

#[test]
fn test_mode_width_for_every_flag_combination() {
    for mode in 0u8..=255 {
        for aux in 0u8..=255 {
            let packet = packet_with(mode, [0; DIGIT_COUNT], 0, aux);
            assert_eq!(get_mode(&packet).chars().count(), MODE_WIDTH);
        }
    }
}

#[test]
fn test_units_width_for_every_unit_combination() {
    for units in 0u8..=255 {
        for units2 in 0u8..=255 {
            for mode in [0x00, 0x10] {
                let packet = packet_with(mode, [0; DIGIT_COUNT], units, units2);
                assert_eq!(get_units(&packet, Charset::Unicode).chars().count(), UNITS_WIDTH);
                assert_eq!(get_units(&packet, Charset::Lcd).chars().count(), UNITS_WIDTH);
            }
        }
    }
}

#[test]
fn test_unit_priority_pairs() {
    for (i, &(higher, expected)) in UNIT_PRIORITY.iter().enumerate() {
        for &(lower, lower_name) in &UNIT_PRIORITY[i + 1..] {
            let packet = units_packet(higher | lower, false);
            assert_eq!(
                get_units(&packet, Charset::Unicode),
                expected,
                "{:?} must win over {:?}",
                expected,
                lower_name
            );
        }
    }
}

#[test]
fn test_ac_suffix_only_on_amps_and_volts() {
    for &(merged, dc) in UNIT_PRIORITY {
        let ac = get_units(&units_packet(merged, true), Charset::Unicode);
        if dc.contains('Ω') {
            assert_eq!(ac, dc);
        } else {
            assert_eq!(ac, format!("{}AC", &dc[..dc.len() - 2]));
        }
    }
}

fn digit_code() -> impl Strategy<Value = u8> {
    prop_oneof![
        proptest::sample::select(SEGMENT_TABLE.iter().map(|(c, _)| *c).collect::<Vec<_>>()),
        any::<u8>().prop_map(|c| c & !DIGIT_DOT_MASK),
    ]
}

proptest! {
    #[test]
    fn prop_merge_ignores_unrelated_bits(
        bytes in any::<[u8; PACKET_SIZE]>(),
        noise in any::<[u8; PACKET_SIZE]>(),
    ) {
        let original = Packet::new(bytes);

        let mut changed = noise;
        changed[UNITS_BYTE] = bytes[UNITS_BYTE];
        changed[UNIT2_BYTE] = (noise[UNIT2_BYTE] & !UNIT2_MERGE_MASK) | (bytes[UNIT2_BYTE] & UNIT2_MERGE_MASK);
        let changed = Packet::new(changed);

        prop_assert_eq!(merge_units(&original), merge_units(&changed));
    }

    #[test]
    fn prop_merge_formula(units in any::<u8>(), units2 in any::<u8>()) {
        let packet = packet_with(0, [0; DIGIT_COUNT], units, units2);
        prop_assert_eq!(merge_units(&packet), units | ((units2 & 0b0000_0110) << 5));
    }

    #[test]
    fn prop_digit_width_constant(
        mode in any::<u8>(),
        digits in proptest::array::uniform6(digit_code()),
        dot in proptest::option::of(0usize..DIGIT_COUNT),
    ) {
        let mut digits = digits;
        if let Some(position) = dot {
            digits[position] |= DIGIT_DOT_MASK;
        }
        let rendered = get_digits(&digits_packet(mode, digits), Charset::Unicode);
        prop_assert_eq!(rendered.chars().count(), DIGITS_WIDTH);
        prop_assert_eq!(rendered.contains('.'), dot.is_some());
    }
}
