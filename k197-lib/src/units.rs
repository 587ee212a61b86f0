//! Unit annunciators.
//!
//! The base unit bits (V, A, Ω) stay lit alongside their scale bits, e.g. a
//! millivolt reading sets both V and mV. The decision order below is
//! therefore significant: scaled ohm and amp ranges are checked before their
//! base unit, and volts only after every ohm and amp branch.

use crate::packet::Packet;
use crate::status::MergedUnits;
use strum_macros::Display;

/// Measurement unit shown by the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Unit {
    #[strum(to_string = "kΩ")]
    KiloOhm,
    #[strum(to_string = "MΩ")]
    MegaOhm,
    #[strum(to_string = "Ω")]
    Ohm,
    #[strum(to_string = "μA")]
    MicroAmp,
    #[strum(to_string = "mA")]
    MilliAmp,
    #[strum(to_string = "A")]
    Amp,
    #[strum(to_string = "mV")]
    MilliVolt,
    #[strum(to_string = "V")]
    Volt,
}

/// Character set used for the Ω and μ glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// Plain Unicode, for terminals and files
    #[default]
    Unicode,
    /// HD44780 character ROM codes, one `char` per ROM byte (Ω = 0xF4, μ = 0xE4)
    Lcd,
}

impl Charset {
    pub fn ohm(&self) -> char {
        match self {
            Charset::Unicode => 'Ω',
            Charset::Lcd => '\u{f4}',
        }
    }

    pub fn micro(&self) -> char {
        match self {
            Charset::Unicode => 'μ',
            Charset::Lcd => '\u{e4}',
        }
    }
}

impl Unit {
    /// Pick the unit from merged unit flags, first match wins.
    pub fn decode(units: MergedUnits) -> Option<Unit> {
        if units.is_kilo_ohm() {
            Some(Unit::KiloOhm)
        } else if units.is_mega_ohm() {
            Some(Unit::MegaOhm)
        } else if units.is_ohm() {
            Some(Unit::Ohm)
        } else if units.is_micro_amp() {
            Some(Unit::MicroAmp)
        } else if units.is_milli_amp() {
            Some(Unit::MilliAmp)
        } else if units.is_amp() {
            Some(Unit::Amp)
        } else if units.is_milli_volt() {
            Some(Unit::MilliVolt)
        } else if units.is_volt() {
            Some(Unit::Volt)
        } else {
            None
        }
    }

    /// Whether the meter can measure this unit with AC coupling.
    pub fn supports_ac(&self) -> bool {
        !matches!(self, Unit::KiloOhm | Unit::MegaOhm | Unit::Ohm)
    }

    /// Two-character right-aligned symbol (`"kΩ"`, `" V"`).
    fn symbol(&self, charset: Charset) -> [char; 2] {
        match self {
            Unit::KiloOhm => ['k', charset.ohm()],
            Unit::MegaOhm => ['M', charset.ohm()],
            Unit::Ohm => [' ', charset.ohm()],
            Unit::MicroAmp => [charset.micro(), 'A'],
            Unit::MilliAmp => ['m', 'A'],
            Unit::Amp => [' ', 'A'],
            Unit::MilliVolt => ['m', 'V'],
            Unit::Volt => [' ', 'V'],
        }
    }
}

/// Render the 5-character unit field: symbol plus `" AC"` or three blanks.
pub fn render_units(unit: Option<Unit>, ac: bool, charset: Charset) -> String {
    let Some(unit) = unit else {
        return "     ".to_string();
    };
    let mut out: String = unit.symbol(charset).iter().collect();
    out.push_str(if ac && unit.supports_ac() { " AC" } else { "   " });
    out
}

/// Unit field of `packet`. Blank when no known unit combination is lit,
/// which usually points at an unmapped mode or a corrupted capture.
pub fn get_units(packet: &Packet, charset: Charset) -> String {
    let unit = Unit::decode(packet.merged_units());
    if unit.is_none() {
        tracing::trace!(merged = packet.merged_units().raw(), "no unit annunciator lit");
    }
    render_units(unit, packet.is_ac(), charset)
}
