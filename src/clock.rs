//! Calendar fields and change tracking

use core::ops::{BitOr, BitOrAssign};

use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Timelike};

/// Hour display preference of the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockStyle {
    TwelveHour,
    TwentyFourHour,
}

/// Half of the day shown by the period glyph
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Period {
    Am,
    Pm,
}

/// Calendar fields of one wall-clock instant.
///
/// A snapshot is always rebuilt as a whole, never patched field by field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSnapshot {
    pub year: i32,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
    /// Days since Sunday (0-6)
    pub weekday: u8,
    /// 0-23
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub is_24h: bool,
}

impl ClockSnapshot {
    /// Hour as it appears on the face: 0-23 in 24-hour mode, 1-12 otherwise.
    pub fn display_hour(&self) -> u8 {
        if self.is_24h {
            self.hour
        } else {
            (self.hour + 11) % 12 + 1
        }
    }

    pub fn period(&self) -> Period {
        if self.hour < 12 {
            Period::Am
        } else {
            Period::Pm
        }
    }

    /// Two-digit year shown in the date view
    pub fn year_of_century(&self) -> u8 {
        self.year.rem_euclid(100) as u8
    }
}

/// Build a snapshot from local wall-clock time.
pub fn snapshot(now: &NaiveDateTime, style: ClockStyle) -> ClockSnapshot {
    ClockSnapshot {
        year: now.year(),
        month: now.month() as u8,
        day: now.day() as u8,
        weekday: now.weekday().num_days_from_sunday() as u8,
        hour: now.hour() as u8,
        minute: now.minute() as u8,
        second: now.second() as u8,
        is_24h: style == ClockStyle::TwentyFourHour,
    }
}

/// Build a snapshot from a Unix timestamp shifted by `utc_offset` seconds.
pub fn snapshot_from_timestamp(
    secs: i64,
    utc_offset: i32,
    style: ClockStyle,
) -> Result<ClockSnapshot, Error> {
    let local = local_time(secs, utc_offset)?;
    Ok(snapshot(&local, style))
}

/// Convert a Unix timestamp into local time.
pub fn local_time(secs: i64, utc_offset: i32) -> Result<NaiveDateTime, Error> {
    let offset = TimeDelta::try_seconds(utc_offset as i64).ok_or(Error::InvalidTimestamp)?;
    DateTime::from_timestamp(secs, 0)
        .map(|utc| utc.naive_utc())
        .and_then(|utc| utc.checked_add_signed(offset))
        .ok_or(Error::InvalidTimestamp)
}

/// Calendar granularities that advanced between two snapshots.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeMask(u8);

impl ChangeMask {
    pub const EMPTY: Self = Self(0);
    pub const SECOND: Self = Self(1 << 0);
    pub const MINUTE: Self = Self(1 << 1);
    pub const HOUR: Self = Self(1 << 2);
    pub const DAY: Self = Self(1 << 3);
    pub const ALL: Self = Self(0b1111);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for ChangeMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChangeMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl core::fmt::Debug for ChangeMask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChangeMask")
            .field("day", &self.contains(Self::DAY))
            .field("hour", &self.contains(Self::HOUR))
            .field("minute", &self.contains(Self::MINUTE))
            .field("second", &self.contains(Self::SECOND))
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChangeMask {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ChangeMask({=u8:04b})", self.0)
    }
}

/// Field-wise comparison of two snapshots.
///
/// Without a previous snapshot everything counts as changed. A switch between
/// 12 and 24-hour style changes how the hour is drawn and is reported as an
/// hour change.
pub fn diff(prev: Option<&ClockSnapshot>, curr: &ClockSnapshot) -> ChangeMask {
    let Some(prev) = prev else {
        return ChangeMask::ALL;
    };

    let mut mask = ChangeMask::EMPTY;
    if prev.year != curr.year
        || prev.month != curr.month
        || prev.day != curr.day
        || prev.weekday != curr.weekday
    {
        mask |= ChangeMask::DAY;
    }
    if prev.hour != curr.hour || prev.is_24h != curr.is_24h {
        mask |= ChangeMask::HOUR;
    }
    if prev.minute != curr.minute {
        mask |= ChangeMask::MINUTE;
    }
    if prev.second != curr.second {
        mask |= ChangeMask::SECOND;
    }
    mask
}

/// Remembers the last snapshot so every tick yields what changed since.
pub struct ClockState {
    style: ClockStyle,
    last: Option<ClockSnapshot>,
}

impl ClockState {
    pub fn new(style: ClockStyle) -> Self {
        Self { style, last: None }
    }

    pub fn style(&self) -> ClockStyle {
        self.style
    }

    /// Takes effect on the next `update`.
    pub fn set_style(&mut self, style: ClockStyle) {
        self.style = style;
    }

    /// Recompute the snapshot for `now` and report the granularities that
    /// changed since the previous call.
    pub fn update(&mut self, now: &NaiveDateTime) -> (ClockSnapshot, ChangeMask) {
        let current = snapshot(now, self.style);
        let mask = diff(self.last.as_ref(), &current);
        self.last = Some(current);
        (current, mask)
    }
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    InvalidTimestamp,
}
