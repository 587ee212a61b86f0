// Bus layout constants for the Keithley 197(a) LCD controller link

/// Size of one display-bus packet (8 command bytes + 10 data bytes)
pub const PACKET_SIZE: usize = 18;

/// Number of controller command bytes at the start of every packet
pub const COMMAND_SIZE: usize = 8;

/// Offset of the mode-status byte (sign and annunciators)
pub const MODES_BYTE: usize = 8;

/// Offset of the first digit byte (most significant digit)
pub const FIRST_DIGIT: usize = 9;

/// Offset of the last digit byte (least significant digit)
pub const LAST_DIGIT: usize = 14;

/// Number of digit positions on the meter's LCD
pub const DIGIT_COUNT: usize = LAST_DIGIT - FIRST_DIGIT + 1;

/// Offset of the first unit-status byte
pub const UNITS_BYTE: usize = 15;

/// Offset of the second unit-status byte (CAL, RMT and the split Ω/A bits)
pub const UNIT2_BYTE: usize = 16;

/// Bits of the second unit byte that belong to the unit field
pub const UNIT2_MERGE_MASK: u8 = 0b0000_0110;

/// Shift that moves the masked second unit byte onto bits 6..=7 of the first
pub const UNIT2_MERGE_SHIFT: u32 = 5;

/// Decimal point bit inside a digit byte
pub const DIGIT_DOT_MASK: u8 = 0b0000_0100;

/// Command sequence the meter sends ahead of every data block:
/// clear data memory, unsynchronized transfer, mode set (1/3 bias, 3 time-share),
/// no segment decoder, clear blink memory, blink off, display on, clear data memory.
pub const COMMAND_PREAMBLE: [u8; COMMAND_SIZE] = [0x20, 0x30, 0x4A, 0x14, 0x00, 0x18, 0x11, 0x20];

/// Width of the rendered mode string
pub const MODE_WIDTH: usize = 15;

/// Width of the rendered unit string
pub const UNITS_WIDTH: usize = 5;

/// Width of the rendered digit string (sign + six digits + dot or padding)
pub const DIGITS_WIDTH: usize = 8;

/// Sentinel for digit codes missing from the segment table
pub const UNKNOWN_SEGMENT: char = '_';
