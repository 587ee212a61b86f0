use crate::digits::get_digits;
use crate::format::{console_line, plot_value};
use crate::mode::{ModeFlags, get_mode};
use crate::packet::Packet;
use crate::units::{Charset, Unit, get_units};
use serde::{Deserialize, Serialize};
use std::fmt;
use uom::si::electric_current::{ampere, microampere, milliampere};
use uom::si::electric_potential::{millivolt, volt};
use uom::si::electrical_resistance::{kiloohm, megaohm, ohm};
use uom::si::f64::{ElectricCurrent, ElectricPotential, ElectricalResistance};

/// The three display fields of one packet, exactly as they should be placed
/// on a character display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedReading {
    pub mode: String,
    pub digits: String,
    pub units: String,
}

impl DecodedReading {
    pub fn decode(packet: &Packet, charset: Charset) -> Self {
        Self {
            mode: get_mode(packet),
            digits: get_digits(packet, charset),
            units: get_units(packet, charset),
        }
    }

    /// True when any digit position held an unknown segment pattern.
    pub fn is_corrupted(&self) -> bool {
        self.digits.contains(crate::constants::UNKNOWN_SEGMENT)
    }
}

impl fmt::Display for DecodedReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&console_line(self))
    }
}

/// A reading converted to an SI quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    Voltage(ElectricPotential),
    Current(ElectricCurrent),
    Resistance(ElectricalResistance),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub quantity: Quantity,
    pub ac: bool,
}

impl Measurement {
    /// Combine the displayed number and the lit unit.
    ///
    /// Returns `None` when the digits are not numeric (overload, corruption,
    /// text), when no unit is lit, or in dB mode where the number is not in
    /// the lit unit.
    pub fn from_packet(packet: &Packet) -> Option<Self> {
        let flags = ModeFlags::from_packet(packet);
        if flags.db {
            return None;
        }
        let unit = Unit::decode(packet.merged_units())?;
        let value = plot_value(&get_digits(packet, Charset::Unicode))?;
        let quantity = match unit {
            Unit::Volt => Quantity::Voltage(ElectricPotential::new::<volt>(value)),
            Unit::MilliVolt => Quantity::Voltage(ElectricPotential::new::<millivolt>(value)),
            Unit::Amp => Quantity::Current(ElectricCurrent::new::<ampere>(value)),
            Unit::MilliAmp => Quantity::Current(ElectricCurrent::new::<milliampere>(value)),
            Unit::MicroAmp => Quantity::Current(ElectricCurrent::new::<microampere>(value)),
            Unit::Ohm => Quantity::Resistance(ElectricalResistance::new::<ohm>(value)),
            Unit::KiloOhm => Quantity::Resistance(ElectricalResistance::new::<kiloohm>(value)),
            Unit::MegaOhm => Quantity::Resistance(ElectricalResistance::new::<megaohm>(value)),
        };
        Some(Self { quantity, ac: flags.ac })
    }

    /// Value in the SI base unit (V, A or Ω)
    pub fn si_value(&self) -> f64 {
        match self.quantity {
            Quantity::Voltage(v) => v.get::<volt>(),
            Quantity::Current(i) => i.get::<ampere>(),
            Quantity::Resistance(r) => r.get::<ohm>(),
        }
    }

    pub fn base_symbol(&self) -> &'static str {
        match self.quantity {
            Quantity::Voltage(_) => "V",
            Quantity::Current(_) => "A",
            Quantity::Resistance(_) => "Ω",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.si_value(), self.base_symbol())?;
        if self.ac {
            write!(f, " AC")?;
        }
        Ok(())
    }
}
