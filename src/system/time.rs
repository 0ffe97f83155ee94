//! Time keeping module for PineTime

use casio_watchface::clock::local_time;
use chrono::NaiveDateTime;
use embassy_time::Instant;

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

/// Wall clock derived from the build time and the uptime
pub struct TimeManager {
    /// Unix time at `boot`
    epoch: i64,
    /// Uptime the epoch refers to
    boot: Instant,
    /// Local time offset in seconds
    utc_offset: i32,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(utc_offset: i32) -> Self {
        Self {
            epoch: UTC_EPOCH,
            boot: Instant::now(),
            utc_offset,
        }
    }

    /// Current local time
    pub fn now(&self) -> NaiveDateTime {
        let secs = self.epoch + self.boot.elapsed().as_secs() as i64;
        match local_time(secs, self.utc_offset) {
            Ok(time) => time,
            Err(e) => {
                defmt::warn!("Clock out of range: {}", e);
                NaiveDateTime::UNIX_EPOCH
            }
        }
    }
}

/// Milliseconds since boot
pub fn uptime_ms() -> u64 {
    Instant::now().as_millis()
}
