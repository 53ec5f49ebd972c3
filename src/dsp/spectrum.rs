//! Hann window, real FFT and magnitude spectrum.
//!
//! The FFT plan, window table, complex output and scratch buffers are all
//! allocated in [`SpectralTransform::new`]; [`SpectralTransform::process`]
//! reuses them every cycle.

use std::f32::consts::PI;
use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

use crate::config::DC_ATTENUATION;
use crate::error::Result;

/// Hann coefficient for sample `i` of an `n`-point window.
pub fn hann_coefficient(i: usize, n: usize) -> f32 {
    0.5 * (1.0 - (2.0 * PI * i as f32 / (n - 1) as f32).cos())
}

/// Converts a full time-domain window into `N/2 + 1` bin magnitudes.
pub struct SpectralTransform {
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectralTransform {
    /// Plan a transform of `size` points.  Panics unless `size` is a power of
    /// two, which the sample buffer already guarantees at compile time.
    pub fn new(size: usize) -> Self {
        assert!(
            size >= 2 && size.is_power_of_two(),
            "FFT size must be a power of two"
        );

        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(size);
        let window = (0..size).map(|i| hann_coefficient(i, size)).collect();
        let spectrum = fft.make_output_vec();
        let scratch = fft.make_scratch_vec();

        Self {
            fft,
            window,
            spectrum,
            scratch,
            magnitudes: vec![0.0; size / 2 + 1],
        }
    }

    /// Window, transform and take magnitudes.  `samples` is consumed as FFT
    /// scratch and holds garbage afterwards.
    pub fn process(&mut self, samples: &mut [f32]) -> Result<&[f32]> {
        for (s, w) in samples.iter_mut().zip(&self.window) {
            *s *= w;
        }

        self.fft
            .process_with_scratch(samples, &mut self.spectrum, &mut self.scratch)?;

        for (m, c) in self.magnitudes.iter_mut().zip(&self.spectrum) {
            *m = c.norm();
        }
        self.magnitudes[0] *= DC_ATTENUATION;

        Ok(&self.magnitudes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sine(freq: f32, amplitude: f32, fs: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f32 / fs).sin())
            .collect()
    }

    #[test]
    fn hann_tapers_to_zero_at_edges() {
        assert_abs_diff_eq!(hann_coefficient(0, 256), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(hann_coefficient(255, 256), 0.0, epsilon = 1e-6);
        assert!(hann_coefficient(128, 256) > 0.99);
    }

    #[test]
    fn zero_window_gives_zero_spectrum() {
        let mut transform = SpectralTransform::new(64);
        let mut samples = vec![0.0f32; 64];
        let mags = transform.process(&mut samples).unwrap();
        assert!(mags.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn window_is_applied_once_per_call() {
        let mut transform = SpectralTransform::new(256);
        let raw = sine(4.0, 1000.0, 104.0, 256);

        let mut samples = raw.clone();
        let once = transform.process(&mut samples).unwrap().to_vec();

        // Feed a pre-windowed copy: process windows it a second time.
        let mut prewindowed: Vec<f32> = raw
            .iter()
            .enumerate()
            .map(|(i, s)| s * hann_coefficient(i, 256))
            .collect();
        let twice = transform.process(&mut prewindowed).unwrap().to_vec();

        assert!(once.iter().zip(&twice).any(|(a, b)| (a - b).abs() > 1.0));
        assert!(twice[10] < once[10]);
    }

    #[test]
    fn spectrum_has_half_plus_one_bins() {
        let mut transform = SpectralTransform::new(256);
        let mut samples = sine(4.0, 1000.0, 104.0, 256);
        let mags = transform.process(&mut samples).unwrap();
        assert_eq!(mags.len(), 129);
        assert!(mags.iter().all(|&m| m >= 0.0));
    }

    #[test]
    fn sine_peaks_in_nearest_bin() {
        let fs = 104.0;
        let mut transform = SpectralTransform::new(256);
        let mut samples = sine(6.0, 1000.0, fs, 256);
        let mags = transform.process(&mut samples).unwrap();

        let peak = (1..mags.len())
            .max_by(|&a, &b| mags[a].total_cmp(&mags[b]))
            .unwrap();
        // 6 Hz / (104/256) = 14.77 → bin 15
        assert_eq!(peak, 15);
        // Hann coherent gain 0.5: peak ≈ A·N/4 with some scalloping loss.
        assert!(mags[peak] > 0.8 * 1000.0 * 64.0);
    }

    #[test]
    fn dc_bin_is_attenuated() {
        let mut transform = SpectralTransform::new(256);
        let mut samples = vec![100.0f32; 256];
        let window_sum: f32 = (0..256).map(|i| hann_coefficient(i, 256)).sum();
        let mags = transform.process(&mut samples).unwrap();
        assert_abs_diff_eq!(mags[0], 100.0 * window_sum * DC_ATTENUATION, epsilon = 1.0);
    }
}
