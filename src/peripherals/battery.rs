//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use casio_watchface::status::BatteryState;
use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};

/// Battery configuration
struct BatteryConfig<'a> {
    /// ADC instance for battery voltage measurement
    adc: Saadc<'a, 1>,
    /// Charge indication pin:
    /// high = battery, low = charging
    pin_charge_indication: Input<'a, P0_12>,
}

/// Battery API
pub struct Battery {
    /// Battery configuration
    config: BatteryConfig<'static>,
    /// Last reported state
    state: BatteryState,
}

impl Battery {
    /// Configure battery settings on boot and take a first reading
    pub async fn init(adc: Saadc<'static, 1>, charge_pin: Input<'static, P0_12>) -> Self {
        let mut battery = Self {
            config: BatteryConfig {
                adc,
                pin_charge_indication: charge_pin,
            },
            state: BatteryState::new(0, false),
        };
        battery.state = battery.read().await;
        battery
    }

    /// Last reported state
    pub fn state(&self) -> BatteryState {
        self.state
    }

    /// Carging state of the battery
    fn is_charging(&self) -> bool {
        self.config.pin_charge_indication.is_low()
    }

    /// Sample the hardware and return the new state if it differs from the
    /// last reported one.
    pub async fn poll_changed(&mut self) -> Option<BatteryState> {
        let state = self.read().await;
        if state == self.state {
            return None;
        }
        self.state = state;
        Some(state)
    }

    async fn read(&mut self) -> BatteryState {
        BatteryState::new(self.get_percent().await, self.is_charging())
    }

    /// Battery capacity in percent
    async fn get_percent(&mut self) -> u8 {
        let voltage = self.get_voltage().await;

        // Use fixed data points and linear interpolation in between
        // to estimate battery capacity.
        (match voltage {
            0..=3449 => 0,
            3450..=3699 => (voltage - 3450) / 5,
            3700..=4199 => 50 + (voltage - 3700) / 10,
            _ => 100,
        }) as u8
    }

    /// Battery voltage in millivolts
    async fn get_voltage(&mut self) -> u16 {
        let mut buf = [0; 1];
        self.config.adc.sample(&mut buf).await;
        // For detailed explanation of formula check https://wiki.pine64.org/wiki/PineTime
        // Use u32 during calculation to prevent overflow
        (buf[0].max(0) as u32 * 2000 / 1241) as u16
    }
}
