//! Status bytes of the display-bus packet.
//!
//! The meter spreads its annunciators over three bytes: the mode byte (8),
//! the unit byte (15) and a second unit byte (16) that also carries CAL and
//! RMT. Bits 1..=2 of byte 16 hold the Ω and A context for some ranges, so
//! unit tests are only meaningful on the merged byte produced by
//! [`merge_units`].

// The bitfield macro output trips a rustc ICE when the unused_parens lint
// renders its suggestion over these doc comments.
#![allow(unused_parens)]

use crate::constants::{UNIT2_MERGE_MASK, UNIT2_MERGE_SHIFT};
use crate::packet::Packet;
use modular_bitfield::prelude::*;

/// Mode-status byte (packet offset 8).
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeStatus {
    /// Autoranging (volts and ohms only)
    pub auto: bool,
    /// Relative reading, used to zero the probes
    pub rel: bool,
    /// Readings are being stored
    pub sto: bool,
    /// dB relative to 1 mW into 600 Ω
    pub db: bool,
    /// AC coupling (volts, amps, dB)
    pub ac: bool,
    /// Playback of stored readings
    pub rcl: bool,
    /// Low battery
    pub bat: bool,
    /// Negative reading
    pub neg: bool,
}

/// Unit-status byte layout, valid only after merging (see [`merge_units`]).
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStatus {
    pub millivolt: bool,
    pub megaohm: bool,
    pub microamp: bool,
    pub volt: bool,
    pub kiloohm: bool,
    pub milliamp: bool,
    pub ohm: bool,
    pub amp: bool,
}

/// Second unit-status byte (packet offset 16).
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxStatus {
    /// Calibration in progress
    pub cal: bool,
    pub ohm: bool,
    pub amp: bool,
    #[skip]
    unknown_lo: B2,
    /// Under GPIB control
    pub remote: bool,
    #[skip]
    unknown_hi: B2,
}

/// The canonical unit byte, first unit byte with the Ω/A bits of the second
/// merged onto bits 6 and 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedUnits(UnitStatus);

impl MergedUnits {
    /// Merge the two raw unit bytes.
    pub fn merge(units: u8, units2: u8) -> Self {
        Self::from_raw(units | ((units2 & UNIT2_MERGE_MASK) << UNIT2_MERGE_SHIFT))
    }

    /// Wrap an already merged byte.
    pub fn from_raw(raw: u8) -> Self {
        Self(UnitStatus::from_bytes([raw]))
    }

    pub fn raw(&self) -> u8 {
        self.0.into_bytes()[0]
    }

    pub fn status(&self) -> UnitStatus {
        self.0
    }

    pub fn is_ohm(&self) -> bool {
        self.0.ohm()
    }

    pub fn is_kilo_ohm(&self) -> bool {
        self.0.ohm() && self.0.kiloohm()
    }

    pub fn is_mega_ohm(&self) -> bool {
        self.0.ohm() && self.0.megaohm()
    }

    pub fn is_amp(&self) -> bool {
        self.0.amp()
    }

    pub fn is_micro_amp(&self) -> bool {
        self.0.amp() && self.0.microamp()
    }

    pub fn is_milli_amp(&self) -> bool {
        self.0.amp() && self.0.milliamp()
    }

    pub fn is_volt(&self) -> bool {
        self.0.volt()
    }

    pub fn is_milli_volt(&self) -> bool {
        self.0.volt() && self.0.millivolt()
    }
}

/// Merge the two unit-status bytes of `packet` into the canonical unit byte.
///
/// `units | ((units2 & 0b0000_0110) << 5)`
pub fn merge_units(packet: &Packet) -> u8 {
    packet.merged_units().raw()
}
