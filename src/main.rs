// TremorScope — Firmware Entry Point
//
// Boot sequence:
//   1. Bring up logging, the indicator LEDs and the I2C bus (100 kHz).
//   2. Check the LSM6DSL identity.  On mismatch all LEDs blink forever and
//      sampling never starts.
//   3. Configure the accelerometer (104 Hz, ±2 g) and blink "ready".
//   4. Run detection cycles forever: 256 samples → FFT → classification,
//      then a one-second pause.
//
// On any other target the same pipeline runs against a simulated sensor
// (tone frequency from SIM_TONE_HZ, default 4 Hz).

use std::sync::Arc;

use tremorscope::tasks::sampler::{SampleSignal, Sampler};
use tremorscope::{Detector, DetectorConfig, Error};

fn banner() {
    log::info!("------------------------------------");
    log::info!("Tremor/Dyskinesia Detection System");
    log::info!("------------------------------------");
}

fn report_startup_failure(e: &Error) {
    if e.is_sensor_fault() {
        log::error!("ERROR: Sensor not found or not responding! ({})", e);
        log::error!("Check connections and restart.");
    } else {
        log::error!("ERROR: Startup failed: {}", e);
    }
}

// ---------------------------------------------------------------------------
// ESP-IDF firmware
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::{OutputPin, PinDriver};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;
    use esp_idf_svc::timer::EspTaskTimerService;

    use tremorscope::config::*;
    use tremorscope::drivers::leds::LedIndicator;
    use tremorscope::drivers::lsm6dsl::{I2cRegisterBus, Lsm6dsl, SampleSource};
    use tremorscope::drivers::Indicator;
    use tremorscope::tasks::sampler::EspTicker;

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    banner();

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    let mut leds = LedIndicator::new(
        PinDriver::output(peripherals.pins.gpio2.downgrade_output())?,
        PinDriver::output(peripherals.pins.gpio3.downgrade_output())?,
        PinDriver::output(peripherals.pins.gpio4.downgrade_output())?,
    );
    leds.set_all(false)?;
    log::info!(
        "LEDs on GPIO{}/{}/{} (tremor/dyskinesia/none)",
        PIN_LED_TREMOR,
        PIN_LED_DYSK,
        PIN_LED_NONE
    );
    thread::sleep(Duration::from_millis(BOOT_SETTLE_MS));

    // ---- I2C bus (LSM6DSL only) -------------------------------------------
    let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_HZ.Hz());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio6, // SDA
        peripherals.pins.gpio7, // SCL
        &i2c_config,
    )?;
    log::info!("I2C at {} Hz on SDA GPIO{}, SCL GPIO{}", I2C_BAUDRATE_HZ, PIN_I2C_SDA, PIN_I2C_SCL);
    thread::sleep(Duration::from_millis(I2C_SETTLE_MS));

    let imu = Lsm6dsl::new(I2cRegisterBus::new(i2c, I2C_ADDR_LSM6DSL), SampleSource::AxisX);

    // ---- Sampling timer ---------------------------------------------------
    let config = DetectorConfig::default();
    let signal = Arc::new(SampleSignal::new(config.trigger_policy));
    let timer_service = EspTaskTimerService::new()?;
    let ticker = EspTicker::new(&timer_service, Arc::clone(&signal))?;
    let sampler = Sampler::new(signal, ticker, config.sample_period, config.poll_interval);

    let mut detector = Detector::new(imu, sampler, leds, config)?;

    if let Err(e) = detector.start() {
        report_startup_failure(&e);
        detector.halt();
    }

    detector.run()
}

// ---------------------------------------------------------------------------
// Host simulation
// ---------------------------------------------------------------------------
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use tremorscope::drivers::sim::{SimIndicator, SimulatedSensor};
    use tremorscope::tasks::sampler::ThreadTicker;

    /// Simulated tone amplitude in raw counts (≈ 61 mg at ±2 g).
    const SIM_AMPLITUDE: f32 = 1000.0;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    banner();

    let tone_hz: f32 = match std::env::var("SIM_TONE_HZ") {
        Ok(value) => value.parse()?,
        Err(_) => 4.0,
    };
    let sensor = SimulatedSensor::new(tone_hz, SIM_AMPLITUDE);

    let config = DetectorConfig::default();
    let signal = Arc::new(SampleSignal::new(config.trigger_policy));
    let ticker = ThreadTicker::new(Arc::clone(&signal));
    let sampler = Sampler::new(signal, ticker, config.sample_period, config.poll_interval);

    let mut detector = Detector::new(sensor, sampler, SimIndicator::default(), config)?;

    if let Err(e) = detector.start() {
        report_startup_failure(&e);
        detector.halt();
    }

    detector.run()
}
