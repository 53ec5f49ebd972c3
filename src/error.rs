// TremorScope — Error Types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// WHO_AM_I did not match; the sensor is absent or the wrong part.
    #[error("sensor identity mismatch: expected {expected:#04x}, found {found:#04x}")]
    IdentityMismatch { expected: u8, found: u8 },

    #[error("bus transaction on register {register:#04x} failed: {reason}")]
    Bus { register: u8, reason: String },

    #[error("sample timer failure: {0}")]
    Timer(String),

    #[error("indicator output failure: {0}")]
    Gpio(String),

    #[error("band {f_lo}-{f_hi} Hz maps to no bins (Δf = {resolution} Hz, {bins} bins)")]
    InvalidBand {
        f_lo: f32,
        f_hi: f32,
        resolution: f32,
        bins: usize,
    },

    /// Noise-floor slice is empty, includes DC or runs past Nyquist.
    #[error("noise floor bins {start}..{end} outside 1..{bins}")]
    InvalidNoiseSlice { start: usize, end: usize, bins: usize },

    #[error("FFT failed: {0}")]
    Fft(#[from] realfft::FftError),
}

impl Error {
    /// Whether the accelerometer itself is absent or not answering.
    pub fn is_sensor_fault(&self) -> bool {
        matches!(self, Error::IdentityMismatch { .. } | Error::Bus { .. })
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_identity_and_bus_errors_are_sensor_faults() {
        assert!(Error::IdentityMismatch { expected: 0x6A, found: 0x00 }.is_sensor_fault());
        assert!(Error::Bus { register: 0x10, reason: "nack".into() }.is_sensor_fault());
        assert!(!Error::Gpio("pin busy".into()).is_sensor_fault());
        assert!(!Error::Timer("no timer".into()).is_sensor_fault());
    }
}
