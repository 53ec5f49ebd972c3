// TremorScope — Hardware & System Configuration
// Target: ESP32-C3 (RISC-V) with an LSM6DSL accelerometer on I2C

// ---------------------------------------------------------------------------
// GPIO Pin Definitions
// ---------------------------------------------------------------------------
pub const PIN_LED_TREMOR: i32 = 2;  // Tremor indicator
pub const PIN_LED_DYSK: i32 = 3;    // Dyskinesia indicator
pub const PIN_LED_NONE: i32 = 4;    // "No detection" indicator
pub const PIN_I2C_SDA: i32 = 6;     // I2C data line
pub const PIN_I2C_SCL: i32 = 7;     // I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_LSM6DSL: u8 = 0x6A;
pub const I2C_BAUDRATE_HZ: u32 = 100_000;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// LSM6DSL registers
// ---------------------------------------------------------------------------
pub const REG_WHO_AM_I: u8 = 0x0F;
pub const REG_CTRL1_XL: u8 = 0x10;
pub const REG_CTRL3_C: u8 = 0x12;
pub const REG_OUTX_L_XL: u8 = 0x28; // Start of 6-byte XYZ burst

pub const WHO_AM_I_EXPECTED: u8 = 0x6A;
pub const CTRL1_XL_104HZ_2G: u8 = 0x40; // ODR_XL = 104 Hz, FS_XL = ±2 g
pub const CTRL3_C_BDU_IF_INC: u8 = 0x44; // block data update + address auto-increment

/// LSB → g at ±2 g full scale (0.061 mg/LSB).
pub const ACCEL_SCALE_2G: f32 = 0.000_061;

// ---------------------------------------------------------------------------
// Spectral pipeline
// ---------------------------------------------------------------------------
pub const FFT_SIZE: usize = 256;
pub const SAMPLE_RATE_HZ: f32 = 104.0;
pub const SAMPLE_PERIOD_US: u64 = 9615; // round(1e6 / 104)

pub const TREMOR_BAND_HZ: (f32, f32) = (3.0, 5.0);
pub const DYSKINESIA_BAND_HZ: (f32, f32) = (5.0, 7.0);

/// Scale applied to bin 0; gravity/bias offset would otherwise dominate.
pub const DC_ATTENUATION: f32 = 0.1;

/// Low-frequency reference slice for the noise floor (DC excluded).
pub const NOISE_FLOOR_BINS: core::ops::Range<usize> = 1..10;

/// Detection threshold as a multiple of the noise floor.
pub const THRESHOLD_FACTOR: f32 = 10.0;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const POLL_INTERVAL_MS: u64 = 1;
pub const CYCLE_DELAY_MS: u64 = 1000;
pub const READY_BLINK_COUNT: u32 = 3;
pub const READY_BLINK_MS: u64 = 200;
pub const FATAL_BLINK_MS: u64 = 200;
pub const BOOT_SETTLE_MS: u64 = 100;   // Peripheral power-up
pub const I2C_SETTLE_MS: u64 = 300;    // Bus ready after frequency change
pub const CONFIG_SETTLE_MS: u64 = 100; // CTRL3_C takes effect before ODR is set

/// Consecutive failed reads after which the sensor is considered gone.
pub const MAX_READ_FAILURES: u32 = 8;
