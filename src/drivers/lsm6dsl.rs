// TremorScope — LSM6DSL Accelerometer Driver
//
// Register-level driver over any `RegisterBus`.  Only the accelerometer is
// used; the gyroscope stays powered down.

use std::thread;
use std::time::Duration;

use crate::config::*;
use crate::drivers::{AccelSensor, RegisterBus};
use crate::error::Result;

/// Which scalar each sample is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleSource {
    /// Raw X-axis counts.
    #[default]
    AxisX,
    /// |a| in g over all three axes.
    Magnitude,
}

pub struct Lsm6dsl<B> {
    bus: B,
    source: SampleSource,
}

impl<B: RegisterBus> Lsm6dsl<B> {
    pub fn new(bus: B, source: SampleSource) -> Self {
        Self { bus, source }
    }

    /// Burst-read the three accelerometer axes as raw counts.
    pub fn read_axes(&mut self) -> Result<[i16; 3]> {
        let mut raw = [0u8; 6];
        self.bus.read_registers(REG_OUTX_L_XL, &mut raw)?;
        Ok([
            i16::from_le_bytes([raw[0], raw[1]]),
            i16::from_le_bytes([raw[2], raw[3]]),
            i16::from_le_bytes([raw[4], raw[5]]),
        ])
    }

    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: RegisterBus> AccelSensor for Lsm6dsl<B> {
    fn identify(&mut self) -> Result<u8> {
        self.bus.read_register(REG_WHO_AM_I)
    }

    fn configure(&mut self) -> Result<()> {
        self.bus.write_register(REG_CTRL3_C, CTRL3_C_BDU_IF_INC)?;
        thread::sleep(Duration::from_millis(CONFIG_SETTLE_MS));
        self.bus.write_register(REG_CTRL1_XL, CTRL1_XL_104HZ_2G)?;
        log::info!("LSM6DSL configured (104 Hz, ±2g, {:?})", self.source);
        Ok(())
    }

    fn read_sample(&mut self) -> Result<f32> {
        match self.source {
            SampleSource::AxisX => {
                let mut raw = [0u8; 2];
                self.bus.read_registers(REG_OUTX_L_XL, &mut raw)?;
                Ok(i16::from_le_bytes(raw) as f32)
            }
            SampleSource::Magnitude => {
                let [x, y, z] = self.read_axes()?;
                let (xg, yg, zg) = (
                    x as f32 * ACCEL_SCALE_2G,
                    y as f32 * ACCEL_SCALE_2G,
                    z as f32 * ACCEL_SCALE_2G,
                );
                Ok((xg * xg + yg * yg + zg * zg).sqrt())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ESP-IDF transport
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
pub use esp::I2cRegisterBus;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::i2c::I2cDriver;

    use crate::config::I2C_TIMEOUT_TICKS;
    use crate::drivers::RegisterBus;
    use crate::error::{Error, Result};

    /// One device address on an owned I2C driver.
    pub struct I2cRegisterBus<'d> {
        i2c: I2cDriver<'d>,
        addr: u8,
    }

    impl<'d> I2cRegisterBus<'d> {
        pub fn new(i2c: I2cDriver<'d>, addr: u8) -> Self {
            Self { i2c, addr }
        }
    }

    impl RegisterBus for I2cRegisterBus<'_> {
        fn write_register(&mut self, reg: u8, value: u8) -> Result<()> {
            self.i2c
                .write(self.addr, &[reg, value], I2C_TIMEOUT_TICKS)
                .map_err(|e| Error::Bus { register: reg, reason: e.to_string() })
        }

        fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
            self.i2c
                .write_read(self.addr, &[reg], buf, I2C_TIMEOUT_TICKS)
                .map_err(|e| Error::Bus { register: reg, reason: e.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_abs_diff_eq;

    /// 128-register map with a write log.
    struct FakeBus {
        regs: [u8; 128],
        writes: Vec<(u8, u8)>,
        fail: bool,
    }

    impl FakeBus {
        fn new() -> Self {
            let mut regs = [0u8; 128];
            regs[REG_WHO_AM_I as usize] = WHO_AM_I_EXPECTED;
            Self { regs, writes: Vec::new(), fail: false }
        }

        fn set_axes(&mut self, x: i16, y: i16, z: i16) {
            let base = REG_OUTX_L_XL as usize;
            for (i, v) in [x, y, z].into_iter().enumerate() {
                let [lo, hi] = v.to_le_bytes();
                self.regs[base + 2 * i] = lo;
                self.regs[base + 2 * i + 1] = hi;
            }
        }
    }

    impl RegisterBus for FakeBus {
        fn write_register(&mut self, reg: u8, value: u8) -> Result<()> {
            self.writes.push((reg, value));
            self.regs[reg as usize] = value;
            Ok(())
        }

        fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
            if self.fail {
                return Err(Error::Bus { register: reg, reason: "nack".into() });
            }
            let start = reg as usize;
            buf.copy_from_slice(&self.regs[start..start + buf.len()]);
            Ok(())
        }
    }

    #[test]
    fn identify_reads_who_am_i() {
        let mut imu = Lsm6dsl::new(FakeBus::new(), SampleSource::AxisX);
        assert_eq!(imu.identify().unwrap(), 0x6A);
    }

    #[test]
    fn configure_enables_bdu_before_setting_odr() {
        let mut imu = Lsm6dsl::new(FakeBus::new(), SampleSource::AxisX);
        imu.configure().unwrap();
        let bus = imu.release();
        assert_eq!(bus.writes, vec![(REG_CTRL3_C, 0x44), (REG_CTRL1_XL, 0x40)]);
    }

    #[test]
    fn configure_waits_for_ctrl3_c_to_settle() {
        let mut imu = Lsm6dsl::new(FakeBus::new(), SampleSource::AxisX);
        let started = std::time::Instant::now();
        imu.configure().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(CONFIG_SETTLE_MS));
    }

    #[test]
    fn axis_x_sample_is_signed_raw_count() {
        let mut bus = FakeBus::new();
        bus.set_axes(-1234, 5, 16384);
        let mut imu = Lsm6dsl::new(bus, SampleSource::AxisX);
        assert_eq!(imu.read_sample().unwrap(), -1234.0);
    }

    #[test]
    fn magnitude_sample_is_in_g() {
        let mut bus = FakeBus::new();
        // 1 g on Z only: 1 / 0.000061 ≈ 16393 counts
        bus.set_axes(0, 0, 16393);
        let mut imu = Lsm6dsl::new(bus, SampleSource::Magnitude);
        assert_abs_diff_eq!(imu.read_sample().unwrap(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn bus_failure_propagates() {
        let mut bus = FakeBus::new();
        bus.fail = true;
        let mut imu = Lsm6dsl::new(bus, SampleSource::AxisX);
        assert!(matches!(imu.read_sample(), Err(Error::Bus { register: 0x28, .. })));
    }
}
