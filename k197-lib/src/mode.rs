use crate::packet::Packet;
use strum_macros::IntoStaticStr;

/// Operating-mode annunciators of a single packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeFlags {
    pub auto: bool,
    pub rel: bool,
    pub sto: bool,
    pub db: bool,
    pub ac: bool,
    pub rcl: bool,
    pub battery: bool,
    pub negative: bool,
    /// Calibration, reported in the second unit byte
    pub cal: bool,
    /// GPIB remote control, reported in the second unit byte
    pub remote: bool,
}

/// The single annunciator shown in the last slot of the mode line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum StorageMode {
    #[strum(serialize = "STO")]
    Store,
    #[strum(serialize = "RCL")]
    Recall,
    #[strum(serialize = "CAL")]
    Calibrate,
}

impl ModeFlags {
    pub fn from_packet(packet: &Packet) -> Self {
        let mode = packet.mode_status();
        let aux = packet.aux_status();
        Self {
            auto: mode.auto(),
            rel: mode.rel(),
            sto: mode.sto(),
            db: mode.db(),
            ac: mode.ac(),
            rcl: mode.rcl(),
            battery: mode.bat(),
            negative: mode.neg(),
            cal: aux.cal(),
            remote: aux.remote(),
        }
    }

    /// STO wins over RCL, RCL over CAL.
    pub fn storage_mode(&self) -> Option<StorageMode> {
        if self.sto {
            Some(StorageMode::Store)
        } else if self.rcl {
            Some(StorageMode::Recall)
        } else if self.cal {
            Some(StorageMode::Calibrate)
        } else {
            None
        }
    }

    /// Render the fixed-width mode line: `AUTO `, `REL `, `dB ` and the
    /// storage slot, each replaced by blanks of the same width when off.
    pub fn render(&self) -> String {
        let mut mode = String::with_capacity(crate::constants::MODE_WIDTH);
        mode.push_str(if self.auto { "AUTO " } else { "     " });
        mode.push_str(if self.rel { "REL " } else { "    " });
        mode.push_str(if self.db { "dB " } else { "   " });
        mode.push_str(self.storage_mode().map_or("   ", |slot| slot.into()));
        mode
    }
}

impl From<&Packet> for ModeFlags {
    fn from(packet: &Packet) -> Self {
        ModeFlags::from_packet(packet)
    }
}

/// Mode line of `packet`, always [`MODE_WIDTH`](crate::constants::MODE_WIDTH) characters wide.
pub fn get_mode(packet: &Packet) -> String {
    ModeFlags::from_packet(packet).render()
}
