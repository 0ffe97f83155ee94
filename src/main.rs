#![no_std]
#![no_main]

mod peripherals;
mod system;

// Core
use core::cell::RefCell;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_futures::select::{select, select4, Either, Either4};
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    interrupt::{self, InterruptExt, Priority},
    peripherals::{SPI2, TWISPI1},
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim::{self, Spim},
    twim::{self, Twim},
};
use embassy_sync::{
    blocking_mutex::{
        raw::{NoopRawMutex, ThreadModeRawMutex},
        Mutex,
    },
    signal::Signal,
};
use embassy_time::{Duration, Instant, Ticker, Timer};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM1_SPIS1_TWIM1_TWIS1_SPI1_TWI1 => twim::InterruptHandler<TWISPI1>;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use casio_watchface::{
    config::WatchfaceConfig,
    status::{BatteryState, ConnectivityState, Haptics},
    ui::resources::ResourceCache,
    Watchface,
};
use peripherals::{
    battery::Battery,
    display::{BacklightPins, Brightness, Display},
    touch::TouchController,
    vibration::Vibrator,
};
use system::{
    bluetooth::{self, Server},
    time::{uptime_ms, TimeManager},
};

// Communication channels
static BATTERY_STATE: Signal<ThreadModeRawMutex, BatteryState> = Signal::new();
static CONNECTION: Signal<ThreadModeRawMutex, ConnectivityState> = Signal::new();
static NOTIFY: Signal<ThreadModeRawMutex, u8> = Signal::new();
static TAP: Signal<ThreadModeRawMutex, ()> = Signal::new();

static I2C_BUS: StaticCell<Mutex<NoopRawMutex, RefCell<Twim<'static, TWISPI1>>>> =
    StaticCell::new();
static SERVER: StaticCell<Server> = StaticCell::new();

/// Disconnect alert, played by the `notify` task
struct VibrationAlert;

impl Haptics for VibrationAlert {
    fn double_pulse(&mut self) {
        NOTIFY.signal(2);
    }
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn bluetooth_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    bluetooth::advertise(sd, server, |state| CONNECTION.signal(state)).await
}

/// Play vibration patterns
#[embassy_executor::task(pool_size = 1)]
async fn notify(mut vibrator: Vibrator, pulse_ms: u32) {
    loop {
        let count = NOTIFY.wait().await;
        vibrator.pulse(pulse_ms, count).await;
    }
}

/// Fetch the battery status from the hardware.
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: Battery, server: &'static Server) {
    bluetooth::set_battery_level(server, battery.state().percent);
    loop {
        if let Some(status) = battery.poll_changed().await {
            defmt::info!(
                "Battery status: {} ({})",
                status.percent,
                if status.charging {
                    "charging"
                } else {
                    "discharging"
                }
            );
            bluetooth::set_battery_level(server, status.percent);
            BATTERY_STATE.signal(status);
        }

        // Re-schedule the timer interrupt in 10s
        Timer::after(Duration::from_secs(10)).await;
    }
}

/// Polls the touch interrupt pin every 2ms
#[embassy_executor::task(pool_size = 1)]
async fn poll_touch(mut touch: TouchController<TWISPI1>) {
    loop {
        if touch.tapped() {
            TAP.signal(());
        }

        // Re-schedule the timer interrupt in 2ms
        Timer::after(Duration::from_millis(2)).await;
    }
}

/// Own the watchface and feed it every event, one at a time.
#[embassy_executor::task(pool_size = 1)]
async fn update_lcd(
    mut display: Display<SPI2>,
    config: WatchfaceConfig,
    battery: BatteryState,
) {
    let time = TimeManager::init(config.utc_offset_secs);
    let cache = ResourceCache::default();
    let mut watchface = Watchface::new(&cache, &config, VibrationAlert);

    // Nothing is connected while the SoftDevice is still advertising
    watchface.start(&time.now(), ConnectivityState::Disconnected, battery);
    redraw(&mut watchface, &mut display);

    let mut tick = Ticker::every(Duration::from_secs(1));
    loop {
        let revert = revert_timer(watchface.revert_deadline());
        match select4(
            tick.next(),
            TAP.wait(),
            CONNECTION.wait(),
            select(BATTERY_STATE.wait(), revert),
        )
        .await
        {
            Either4::First(()) => {
                watchface.on_tick(&time.now());
            }
            Either4::Second(()) => {
                let view = watchface.on_tap(uptime_ms());
                defmt::debug!("Tap, showing {}", view);
            }
            Either4::Third(state) => watchface.on_connection(state),
            Either4::Fourth(Either::First(state)) => watchface.on_battery(state),
            Either4::Fourth(Either::Second(())) => {
                watchface.on_timer(uptime_ms());
            }
        }

        redraw(&mut watchface, &mut display);
    }
}

/// Resolve once the view revert is due; never without a pending revert.
async fn revert_timer(deadline: Option<u64>) {
    match deadline {
        Some(at) => Timer::at(Instant::from_millis(at)).await,
        None => core::future::pending().await,
    }
}

fn redraw(watchface: &mut Watchface<'_, VibrationAlert>, display: &mut Display<SPI2>) {
    if watchface.needs_draw() && watchface.draw(display.lcd()).is_err() {
        defmt::warn!("LCD update failed");
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(system::config::embassy_config());
    defmt::info!("Initializing");

    let config = system::config::watchface_config();

    // Keep peripheral interrupts clear of the SoftDevice's priorities
    interrupt::SAADC.set_priority(Priority::P3);
    interrupt::SPIM1_SPIS1_TWIM1_TWIS1_SPI1_TWI1.set_priority(Priority::P3);
    interrupt::SPIM2_SPIS2_SPI2.set_priority(Priority::P3);

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::softdevice_config());
    let server: &'static Server = SERVER.init(unwrap!(Server::new(sd)));
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initalize Battery
    let battery = Battery::init(saadc, Input::new(p.P0_12, Pull::None)).await;
    let initial_battery = battery.state();

    // Initialize vibration motor
    let vibrator = Vibrator::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize I2C
    let mut i2c_config = twim::Config::default();
    // Use I2C at 400KHz (the fastest clock available on the nRF52832),
    i2c_config.frequency = twim::Frequency::K400;
    let i2c = Twim::new(p.TWISPI1, Irqs, p.P0_06, p.P0_07, i2c_config);
    let i2c_bus = I2C_BUS.init(Mutex::new(RefCell::new(i2c)));

    // Initialize touch controller
    let touch = TouchController::init(
        I2cDevice::new(i2c_bus),
        Input::new(p.P0_28, Pull::Up), // Touchpad external interrupt pin: P0.28/AIN4 (TP_INT)
        Output::new(p.P0_10, Level::High, OutputDrive::Standard), // Touchpad reset pin: P0.10/NFC2 (TP_RESET)
    );

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;
    let spim = Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let backlight = BacklightPins::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    );
    let mut display = Display::init(
        spim,
        Output::new(p.P0_25, Level::High, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        backlight,
    );
    display.set_brightness(Brightness::LEVEL2);

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(bluetooth_task(sd, server)));
    unwrap!(spawner.spawn(poll_touch(touch)));
    unwrap!(spawner.spawn(update_battery_status(battery, server)));
    unwrap!(spawner.spawn(notify(vibrator, config.pulse_ms)));
    unwrap!(spawner.spawn(update_lcd(display, config, initial_battery)));
}
