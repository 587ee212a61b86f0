//! Busy indicator shown in the corner of the LCD while packets arrive.
//!
//! The glyph cycles through a short animation in the HD44780 character ROM.
//! The timer is explicit: callers keep the returned [`BusyIndicator`] and hand
//! it back with the current monotonic time on every step.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Animation frames as LCD ROM codes
pub const GLYPHS: [u8; 10] = [b'.', 0xA1, 0xA5, b'o', b'O', b'*', 0xDB, 0xDF, 0xDE, 0xEB];

/// Minimum time between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusyConfig {
    /// Frame interval while readings are flowing, in milliseconds
    pub active_ms: u64,
    /// Frame interval while the bus is idle, in milliseconds
    pub idle_ms: u64,
}

impl Default for BusyConfig {
    fn default() -> Self {
        Self {
            active_ms: 33,
            idle_ms: 66,
        }
    }
}

impl BusyConfig {
    pub fn threshold(&self, idle: bool) -> Duration {
        Duration::from_millis(if idle { self.idle_ms } else { self.active_ms })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyIndicator {
    pub glyph: u8,
    pub last_advance: Duration,
}

impl BusyIndicator {
    pub fn new(now: Duration) -> Self {
        Self {
            glyph: GLYPHS[0],
            last_advance: now,
        }
    }

    /// Advance to the next frame if enough time has passed since the last one.
    ///
    /// `now` is a monotonic timestamp on the same clock as `last_advance`.
    pub fn step(self, now: Duration, idle: bool, config: &BusyConfig) -> Self {
        let elapsed = now.saturating_sub(self.last_advance);
        if elapsed < config.threshold(idle) {
            return self;
        }
        Self {
            glyph: next_glyph(self.glyph),
            last_advance: now,
        }
    }
}

/// Frame following `glyph`; anything outside the animation restarts it.
pub fn next_glyph(glyph: u8) -> u8 {
    match GLYPHS.iter().position(|&g| g == glyph) {
        Some(i) => GLYPHS[(i + 1) % GLYPHS.len()],
        None => GLYPHS[0],
    }
}
