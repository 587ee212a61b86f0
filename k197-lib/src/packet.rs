use crate::constants::{COMMAND_PREAMBLE, COMMAND_SIZE, DIGIT_COUNT, PACKET_SIZE};
use crate::error::K197Error;
use crate::status::{AuxStatus, MergedUnits, ModeStatus};
use std::fmt;
use std::str::FromStr;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// One 18-byte transfer from the meter's main board to its LCD controller.
///
/// The layout is fixed: 8 controller command bytes, the mode byte, six digit
/// bytes (most significant first), two unit bytes and one trailing byte.
/// Construction from `[u8; 18]` cannot fail; slices of any other length are
/// rejected by `TryFrom<&[u8]>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct Packet {
    command: [u8; COMMAND_SIZE],
    mode: u8,
    digits: [u8; DIGIT_COUNT],
    units: u8,
    units2: u8,
    trailer: u8,
}

impl Packet {
    pub fn new(bytes: [u8; PACKET_SIZE]) -> Self {
        zerocopy::transmute!(bytes)
    }

    /// Controller command bytes (offsets 0..=7)
    pub fn command_bytes(&self) -> &[u8; COMMAND_SIZE] {
        &self.command
    }

    /// True when the packet starts with the controller command preamble,
    /// i.e. the capture was in phase with the bus.
    pub fn is_aligned(&self) -> bool {
        self.command == COMMAND_PREAMBLE
    }

    /// Raw mode-status byte (offset 8)
    pub fn mode_byte(&self) -> u8 {
        self.mode
    }

    pub fn mode_status(&self) -> ModeStatus {
        ModeStatus::from_bytes([self.mode])
    }

    /// Raw digit bytes (offsets 9..=14), most significant first
    pub fn digit_codes(&self) -> &[u8; DIGIT_COUNT] {
        &self.digits
    }

    /// Raw first unit-status byte (offset 15)
    pub fn units_byte(&self) -> u8 {
        self.units
    }

    /// Raw second unit-status byte (offset 16)
    pub fn units2_byte(&self) -> u8 {
        self.units2
    }

    pub fn aux_status(&self) -> AuxStatus {
        AuxStatus::from_bytes([self.units2])
    }

    /// Unit flags with the split Ω/A bits merged in
    pub fn merged_units(&self) -> MergedUnits {
        MergedUnits::merge(self.units, self.units2)
    }

    pub fn is_negative(&self) -> bool {
        self.mode_status().neg()
    }

    pub fn is_ac(&self) -> bool {
        self.mode_status().ac()
    }

    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        zerocopy::transmute!(*self)
    }
}

impl From<[u8; PACKET_SIZE]> for Packet {
    fn from(bytes: [u8; PACKET_SIZE]) -> Self {
        Packet::new(bytes)
    }
}

impl TryFrom<&[u8]> for Packet {
    type Error = K197Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Packet::read_from_bytes(bytes).map_err(|_| K197Error::InvalidLength {
            expected: PACKET_SIZE,
            actual: bytes.len(),
        })
    }
}

impl FromStr for Packet {
    type Err = K197Error;

    /// Parse hex text. Whitespace, commas and `0x` prefixes are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| token.trim_start_matches("0x").trim_start_matches("0X"))
            .collect();
        let bytes = hex::decode(digits)?;
        Packet::try_from(bytes.as_slice())
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}
