//! Casio CA-53W style watchface for the PineTime
//!
//! The library holds everything that does not touch hardware: clock
//! bookkeeping, the glyph catalogue, slot layout, the Time/Date view toggle and
//! the status indicators. The firmware binary (feature `firmware`) binds it to
//! the LCD, touch panel, battery sense, vibration motor and SoftDevice.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod status;
pub mod ui;
mod watchface;

pub use watchface::Watchface;
