//! Watchface controller
//!
//! Owns every piece of face state and takes one call per host event. The host
//! must deliver events one at a time; nothing in here blocks.

use chrono::NaiveDateTime;
use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::clock::{ChangeMask, ClockState, ClockStyle};
use crate::config::WatchfaceConfig;
use crate::status::{BatteryState, BluetoothIndicator, ConnectivityState, Haptics};
use crate::ui::{layout::SlotId, mode::ModeToggle, mode::ViewMode, resources::ResourceCache, CasioFace};

pub struct Watchface<'c, H: Haptics> {
    face: CasioFace<'c>,
    clock: ClockState,
    mode: ModeToggle,
    bluetooth: BluetoothIndicator,
    battery: Option<BatteryState>,
    haptics: H,
}

impl<'c, H: Haptics> Watchface<'c, H> {
    pub fn new(cache: &'c ResourceCache, config: &WatchfaceConfig, haptics: H) -> Self {
        Self {
            face: CasioFace::new(cache),
            clock: ClockState::new(config.clock_style),
            mode: ModeToggle::new(config.revert_delay_ms),
            bluetooth: BluetoothIndicator::new(),
            battery: None,
            haptics,
        }
    }

    /// Render the initial state read from the host.
    ///
    /// The connection state passed here never triggers the disconnect alert.
    pub fn start(&mut self, now: &NaiveDateTime, connection: ConnectivityState, battery: BatteryState) {
        self.on_connection(connection);
        self.on_tick(now);
        self.on_battery(battery);
        self.bluetooth.startup_complete();
        info!("Watchface started ({})", self.clock.style());
    }

    /// Second tick: rebind whatever changed since the previous tick.
    pub fn on_tick(&mut self, now: &NaiveDateTime) -> ChangeMask {
        let (snapshot, mask) = self.clock.update(now);
        self.face.apply_changes(mask, &snapshot);
        mask
    }

    /// Tap gesture at `uptime_ms`.
    pub fn on_tap(&mut self, uptime_ms: u64) -> ViewMode {
        let view = self.mode.on_gesture(uptime_ms);
        self.face.set_view(view);
        view
    }

    /// Revert timer; call once [`Self::revert_deadline`] has passed.
    pub fn on_timer(&mut self, uptime_ms: u64) -> bool {
        let fired = self.mode.poll(uptime_ms);
        if fired {
            self.face.set_view(self.mode.mode());
        }
        fired
    }

    /// Uptime at which the view reverts to the time view
    pub fn revert_deadline(&self) -> Option<u64> {
        self.mode.deadline()
    }

    pub fn on_connection(&mut self, state: ConnectivityState) {
        let icon = self.bluetooth.update(state, &mut self.haptics);
        self.face.rebind(SlotId::Bluetooth, icon);
    }

    pub fn on_battery(&mut self, state: BatteryState) {
        if self.battery != Some(state) {
            debug!("Battery {}% ({})", state.percent, state.level());
        }
        self.battery = Some(state);
        self.face.rebind(SlotId::Battery, state.level().resource());
    }

    /// Host changed its 12/24-hour preference; applied on the next tick.
    pub fn set_clock_style(&mut self, style: ClockStyle) {
        self.clock.set_style(style);
    }

    pub fn view(&self) -> ViewMode {
        self.mode.mode()
    }

    pub fn face(&self) -> &CasioFace<'c> {
        &self.face
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    pub fn needs_draw(&self) -> bool {
        self.face.needs_draw()
    }

    pub fn draw<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.face.draw(target)
    }

    /// Tear the face down, releasing every glyph.
    pub fn stop(self) -> H {
        info!("Watchface stopped");
        self.haptics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::resources::ResourceId;
    use chrono::{NaiveDate, TimeDelta};

    #[derive(Default)]
    struct Pulses(u8);

    impl Haptics for Pulses {
        fn double_pulse(&mut self) {
            self.0 += 1;
        }
    }

    fn boot_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(8, 59, 58)
            .unwrap()
    }

    fn started(cache: &ResourceCache, connection: ConnectivityState) -> Watchface<'_, Pulses> {
        let mut watch = Watchface::new(cache, &WatchfaceConfig::default(), Pulses::default());
        watch.start(&boot_time(), connection, BatteryState::new(50, false));
        watch
    }

    #[test]
    fn boot_while_disconnected_is_silent() {
        let cache = ResourceCache::default();
        let watch = started(&cache, ConnectivityState::Disconnected);
        assert_eq!(watch.haptics().0, 0);
        assert_eq!(
            watch.face().slot(SlotId::Bluetooth).bound(),
            Some(ResourceId::BluetoothDisconnected)
        );
    }

    #[test]
    fn losing_the_connection_later_alerts() {
        let cache = ResourceCache::default();
        let mut watch = started(&cache, ConnectivityState::Connected);
        watch.on_connection(ConnectivityState::Disconnected);
        assert_eq!(watch.haptics().0, 1);
        assert_eq!(
            watch.face().slot(SlotId::Bluetooth).bound(),
            Some(ResourceId::BluetoothDisconnected)
        );
    }

    #[test]
    fn start_renders_every_slot() {
        let cache = ResourceCache::default();
        let watch = started(&cache, ConnectivityState::Connected);
        for id in SlotId::ALL {
            assert!(watch.face().slot(id).bound().is_some(), "{:?}", id);
        }
        assert_eq!(watch.face().slot(SlotId::Battery).bound(), Some(ResourceId::BatteryHalf));
    }

    #[test]
    fn ticks_advance_the_digits() {
        let cache = ResourceCache::default();
        let mut watch = started(&cache, ConnectivityState::Connected);

        let mask = watch.on_tick(&(boot_time() + TimeDelta::try_seconds(1).unwrap()));
        assert_eq!(mask, ChangeMask::SECOND);

        let mask = watch.on_tick(&(boot_time() + TimeDelta::try_seconds(2).unwrap()));
        assert_eq!(mask, ChangeMask::HOUR | ChangeMask::MINUTE | ChangeMask::SECOND);
        assert_eq!(watch.face().slot(SlotId::HourUnits).bound(), Some(ResourceId::Digit(9)));
        assert_eq!(watch.face().slot(SlotId::MinuteTens).bound(), Some(ResourceId::Digit(0)));
    }

    #[test]
    fn tap_shows_date_until_timer_fires() {
        let cache = ResourceCache::default();
        let mut watch = started(&cache, ConnectivityState::Connected);

        assert_eq!(watch.on_tap(1_000), ViewMode::Date);
        assert!(watch.face().is_visible(SlotId::DayTens));
        assert_eq!(watch.revert_deadline(), Some(4_000));

        assert!(!watch.on_timer(3_999));
        assert_eq!(watch.view(), ViewMode::Date);
        assert!(watch.on_timer(4_000));
        assert_eq!(watch.view(), ViewMode::Time);
        assert!(watch.face().is_visible(SlotId::HourTens));
        assert_eq!(watch.revert_deadline(), None);
    }

    #[test]
    fn second_tap_restarts_the_timer() {
        let cache = ResourceCache::default();
        let mut watch = started(&cache, ConnectivityState::Connected);

        watch.on_tap(0);
        watch.on_tap(1_000);
        assert!(!watch.on_timer(3_000));
        assert!(watch.on_timer(4_000));
        assert_eq!(watch.view(), ViewMode::Time);
    }

    #[test]
    fn battery_events_swap_the_icon() {
        let cache = ResourceCache::default();
        let mut watch = started(&cache, ConnectivityState::Connected);
        watch.on_battery(BatteryState::new(10, true));
        assert_eq!(watch.face().slot(SlotId::Battery).bound(), Some(ResourceId::BatteryCharging));
        watch.on_battery(BatteryState::new(0, false));
        assert_eq!(watch.face().slot(SlotId::Battery).bound(), Some(ResourceId::BatteryEmpty));
    }

    #[test]
    fn style_change_redraws_hour_on_next_tick() {
        let cache = ResourceCache::default();
        let mut watch = started(&cache, ConnectivityState::Connected);
        let afternoon = boot_time() + TimeDelta::try_hours(6).unwrap();
        watch.on_tick(&afternoon);
        assert_eq!(watch.face().slot(SlotId::HourUnits).bound(), Some(ResourceId::Digit(2)));

        watch.set_clock_style(ClockStyle::TwentyFourHour);
        let mask = watch.on_tick(&afternoon);
        assert_eq!(mask, ChangeMask::HOUR);
        assert_eq!(watch.face().slot(SlotId::HourTens).bound(), Some(ResourceId::Digit(1)));
        assert_eq!(watch.face().slot(SlotId::HourUnits).bound(), Some(ResourceId::Digit(4)));
    }

    #[test]
    fn configured_style_applies_from_the_first_frame() {
        let cache = ResourceCache::default();
        let config = WatchfaceConfig::default().with_clock_style(ClockStyle::TwentyFourHour);
        let mut watch = Watchface::new(&cache, &config, Pulses::default());
        let afternoon = boot_time() + TimeDelta::try_hours(6).unwrap();
        watch.start(&afternoon, ConnectivityState::Connected, BatteryState::new(80, false));
        assert_eq!(watch.face().slot(SlotId::HourTens).bound(), Some(ResourceId::Digit(1)));
        assert_eq!(watch.face().slot(SlotId::HourUnits).bound(), Some(ResourceId::Digit(4)));
    }

    #[test]
    fn stop_releases_every_glyph() {
        let cache = ResourceCache::default();
        let watch = started(&cache, ConnectivityState::Connected);
        assert!(cache.live_handles() > 0);
        watch.stop();
        assert_eq!(cache.live_handles(), 0);
    }
}
