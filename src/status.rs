//! Bluetooth and battery indicators

use crate::ui::resources::ResourceId;

/// Tactile feedback provided by the host
pub trait Haptics {
    /// Two short pulses
    fn double_pulse(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectivityState {
    Connected,
    Disconnected,
}

impl From<bool> for ConnectivityState {
    fn from(connected: bool) -> Self {
        if connected {
            ConnectivityState::Connected
        } else {
            ConnectivityState::Disconnected
        }
    }
}

impl ConnectivityState {
    pub fn resource(self) -> ResourceId {
        match self {
            ConnectivityState::Connected => ResourceId::BluetoothConnected,
            ConnectivityState::Disconnected => ResourceId::BluetoothDisconnected,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryState {
    /// Charge in percent (0-100)
    pub percent: u8,
    pub charging: bool,
}

/// Battery icon variants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatteryLevel {
    Charging,
    Empty,
    Low,
    Half,
    Full,
}

impl BatteryState {
    pub fn new(percent: u8, charging: bool) -> Self {
        Self { percent, charging }
    }

    /// Charging wins over the charge bands. Bands include their upper bound;
    /// readings above 100 count as full.
    pub fn level(&self) -> BatteryLevel {
        if self.charging {
            return BatteryLevel::Charging;
        }
        match self.percent {
            0 => BatteryLevel::Empty,
            1..=33 => BatteryLevel::Low,
            34..=66 => BatteryLevel::Half,
            _ => BatteryLevel::Full,
        }
    }
}

impl BatteryLevel {
    pub fn resource(self) -> ResourceId {
        match self {
            BatteryLevel::Charging => ResourceId::BatteryCharging,
            BatteryLevel::Empty => ResourceId::BatteryEmpty,
            BatteryLevel::Low => ResourceId::BatteryLow,
            BatteryLevel::Half => ResourceId::BatteryHalf,
            BatteryLevel::Full => ResourceId::BatteryFull,
        }
    }
}

/// Tracks the connection and raises the disconnect alert.
///
/// The state read during startup is shown but never alerts, even when the
/// watch boots without a connection.
#[derive(Default)]
pub struct BluetoothIndicator {
    state: Option<ConnectivityState>,
    started: bool,
}

impl BluetoothIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<ConnectivityState> {
        self.state
    }

    /// From now on a drop of the connection alerts.
    pub fn startup_complete(&mut self) {
        self.started = true;
    }

    /// Record `state` and return the icon to show.
    pub fn update<H: Haptics>(&mut self, state: ConnectivityState, haptics: &mut H) -> ResourceId {
        let previous = self.state.replace(state);
        let dropped = state == ConnectivityState::Disconnected
            && previous != Some(ConnectivityState::Disconnected);
        if dropped && self.started {
            info!("Bluetooth connection lost");
            haptics.double_pulse();
        }
        state.resource()
    }
}
