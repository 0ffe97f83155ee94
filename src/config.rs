//! Watchface configuration

use crate::clock::ClockStyle;

/// Time the date view stays up after a tap
pub const DEFAULT_REVERT_DELAY_MS: u32 = 3_000;

/// Length of each pulse of the disconnect alert
pub const DEFAULT_PULSE_MS: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchfaceConfig {
    /// 12 or 24-hour display
    pub clock_style: ClockStyle,
    /// Delay before the face falls back to the time view
    pub revert_delay_ms: u32,
    /// Local time offset from UTC in seconds
    pub utc_offset_secs: i32,
    /// Haptic pulse length in milliseconds
    pub pulse_ms: u32,
}

impl Default for WatchfaceConfig {
    fn default() -> Self {
        Self {
            clock_style: ClockStyle::TwelveHour,
            revert_delay_ms: DEFAULT_REVERT_DELAY_MS,
            utc_offset_secs: 0,
            pulse_ms: DEFAULT_PULSE_MS,
        }
    }
}

impl WatchfaceConfig {
    pub fn with_clock_style(mut self, style: ClockStyle) -> Self {
        self.clock_style = style;
        self
    }

    pub fn with_utc_offset(mut self, secs: i32) -> Self {
        self.utc_offset_secs = secs;
        self
    }
}
