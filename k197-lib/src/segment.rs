//! 7-segment code table.
//!
//! The meter drives its LCD controller without the controller's segment
//! decoder, so each digit byte is a raw segment pattern. Codes were mapped by
//! watching the bus while the meter displayed known values. Bit 2 of every
//! digit byte is the decimal point and is masked off before lookup.

use crate::constants::{DIGIT_DOT_MASK, UNKNOWN_SEGMENT};

/// Known segment patterns (decimal point bit cleared).
pub const SEGMENT_TABLE: &[(u8, char)] = &[
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
    // Inferred from the segment layout, not yet seen on a real meter
    (0x32, 'c'),
    (0x92, 'n'),
    (0xB2, 'o'),
    (0x12, 'r'),
    (0x33, 't'),
    (0xA2, 'u'),
    (0x30, '='),
    (0x00, ' '),
];

const LOOKUP: [Option<char>; 256] = build_lookup();

const fn build_lookup() -> [Option<char>; 256] {
    let mut lookup = [None; 256];
    let mut i = 0;
    while i < SEGMENT_TABLE.len() {
        let (code, ch) = SEGMENT_TABLE[i];
        lookup[code as usize] = Some(ch);
        i += 1;
    }
    lookup
}

/// True when the decimal point segment of `code` is lit.
pub fn has_dot(code: u8) -> bool {
    code & DIGIT_DOT_MASK == DIGIT_DOT_MASK
}

/// Look up a digit byte, ignoring its decimal point bit.
pub fn lookup(code: u8) -> Option<char> {
    LOOKUP[(code & !DIGIT_DOT_MASK) as usize]
}

/// Decode a digit byte, returning `'_'` for patterns not in the table.
///
/// In practice an unknown pattern means the capture is out of phase with the
/// bus rather than a genuinely new glyph.
pub fn decode_segment(code: u8) -> char {
    lookup(code).unwrap_or(UNKNOWN_SEGMENT)
}
