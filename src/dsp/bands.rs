//! Band extraction over a magnitude spectrum.

use core::ops::{Range, RangeInclusive};

use crate::error::{Error, Result};
use crate::events::{BandMetrics, BandValue};

/// Frequency resolution of an `n`-point transform at `sample_rate_hz`.
pub fn bin_width(sample_rate_hz: f32, n: usize) -> f32 {
    sample_rate_hz / n as f32
}

/// Closed bin interval `[lo, hi]` covering a frequency range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyBand {
    pub lo: usize,
    pub hi: usize,
}

impl FrequencyBand {
    /// Map `[f_lo, f_hi]` Hz onto the bins that lie fully inside it:
    /// `lo = ceil(f_lo/Δf)`, `hi = floor(f_hi/Δf)`.
    pub fn from_hz(f_lo: f32, f_hi: f32, sample_rate_hz: f32, n: usize) -> Result<Self> {
        let resolution = bin_width(sample_rate_hz, n);
        let lo = (f_lo / resolution).ceil();
        let hi = (f_hi / resolution).floor();
        let nyquist_bin = n / 2;

        if lo < 0.0 || hi < lo || hi as usize > nyquist_bin {
            return Err(Error::InvalidBand {
                f_lo,
                f_hi,
                resolution,
                bins: nyquist_bin + 1,
            });
        }

        Ok(Self { lo: lo as usize, hi: hi as usize })
    }

    pub fn bins(&self) -> RangeInclusive<usize> {
        self.lo..=self.hi
    }

    /// Number of bins in the band; never zero.
    pub fn width(&self) -> usize {
        self.hi - self.lo + 1
    }
}

/// How a band is reduced to a single representative value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandReduction {
    /// Largest in-band magnitude.
    #[default]
    Peak,
    /// Sum of in-band magnitudes.  Values scale with band width, so the
    /// noise-floor threshold is far easier to clear than with `Peak`.
    Sum,
}

/// Reduces a magnitude spectrum to tremor/dyskinesia values and a noise floor.
#[derive(Debug, Clone)]
pub struct BandAnalyzer {
    tremor: FrequencyBand,
    dyskinesia: FrequencyBand,
    noise_bins: Range<usize>,
    reduction: BandReduction,
    resolution: f32,
}

impl BandAnalyzer {
    pub fn new(
        tremor_hz: (f32, f32),
        dyskinesia_hz: (f32, f32),
        noise_bins: Range<usize>,
        reduction: BandReduction,
        sample_rate_hz: f32,
        n: usize,
    ) -> Result<Self> {
        let tremor = FrequencyBand::from_hz(tremor_hz.0, tremor_hz.1, sample_rate_hz, n)?;
        let dyskinesia = FrequencyBand::from_hz(dyskinesia_hz.0, dyskinesia_hz.1, sample_rate_hz, n)?;
        let bins = n / 2 + 1;
        if noise_bins.is_empty() || noise_bins.start < 1 || noise_bins.end > bins {
            return Err(Error::InvalidNoiseSlice {
                start: noise_bins.start,
                end: noise_bins.end,
                bins,
            });
        }

        Ok(Self {
            tremor,
            dyskinesia,
            noise_bins,
            reduction,
            resolution: bin_width(sample_rate_hz, n),
        })
    }

    pub fn tremor_band(&self) -> FrequencyBand {
        self.tremor
    }

    pub fn dyskinesia_band(&self) -> FrequencyBand {
        self.dyskinesia
    }

    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    pub fn analyze(&self, magnitudes: &[f32]) -> BandMetrics {
        let noise = &magnitudes[self.noise_bins.clone()];
        let noise_floor = noise.iter().sum::<f32>() / noise.len() as f32;

        BandMetrics {
            tremor: self.reduce(magnitudes, self.tremor),
            dyskinesia: self.reduce(magnitudes, self.dyskinesia),
            noise_floor,
        }
    }

    fn reduce(&self, magnitudes: &[f32], band: FrequencyBand) -> BandValue {
        let slice = &magnitudes[band.bins()];

        // First maximum wins on equal magnitudes.
        let (offset, peak) = slice
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, m)| if m > best.1 { (i, m) } else { best });

        let value = match self.reduction {
            BandReduction::Peak => peak,
            BandReduction::Sum => slice.iter().sum(),
        };
        let bin = band.lo + offset;

        BandValue {
            value,
            bin,
            frequency_hz: bin as f32 * self.resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DYSKINESIA_BAND_HZ, NOISE_FLOOR_BINS, TREMOR_BAND_HZ};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn analyzer(reduction: BandReduction) -> BandAnalyzer {
        BandAnalyzer::new(TREMOR_BAND_HZ, DYSKINESIA_BAND_HZ, NOISE_FLOOR_BINS, reduction, 104.0, 256)
            .unwrap()
    }

    #[test]
    fn default_bands_at_104hz_256() {
        let a = analyzer(BandReduction::Peak);
        assert_eq!(a.tremor_band(), FrequencyBand { lo: 8, hi: 12 });
        assert_eq!(a.dyskinesia_band(), FrequencyBand { lo: 13, hi: 17 });
        assert_eq!(a.tremor_band().width(), 5);
        assert_relative_eq!(a.resolution(), 0.40625);
    }

    #[test]
    fn band_beyond_nyquist_is_rejected() {
        // fs = 10 Hz → Nyquist 5 Hz, the dyskinesia band cannot fit.
        let err = FrequencyBand::from_hz(5.0, 7.0, 10.0, 256).unwrap_err();
        assert!(matches!(err, Error::InvalidBand { .. }));
    }

    #[test]
    fn band_narrower_than_a_bin_is_rejected() {
        // Δf = 6.5 Hz: no bin centre falls in [3, 5].
        assert!(FrequencyBand::from_hz(3.0, 5.0, 104.0, 16).is_err());
    }

    #[test]
    fn peak_reduction_reports_bin_and_frequency() {
        let mut mags = vec![1.0f32; 129];
        mags[10] = 500.0;
        mags[15] = 200.0;
        let m = analyzer(BandReduction::Peak).analyze(&mags);
        assert_eq!(m.tremor.value, 500.0);
        assert_eq!(m.tremor.bin, 10);
        assert_relative_eq!(m.tremor.frequency_hz, 4.0625);
        assert_eq!(m.dyskinesia.value, 200.0);
        assert_eq!(m.dyskinesia.bin, 15);
    }

    #[test]
    fn sum_reduction_adds_band_and_keeps_peak_bin() {
        let mut mags = vec![1.0f32; 129];
        mags[11] = 9.0;
        let m = analyzer(BandReduction::Sum).analyze(&mags);
        // bins 8..=12: four ones plus nine
        assert_eq!(m.tremor.value, 13.0);
        assert_eq!(m.tremor.bin, 11);
        assert_eq!(m.dyskinesia.value, 5.0);
    }

    #[test]
    fn noise_floor_is_mean_of_reference_slice() {
        let mut mags = vec![0.0f32; 129];
        mags[0] = 1.0e6; // DC never counts
        for (k, m) in mags.iter_mut().enumerate().take(10).skip(1) {
            *m = k as f32;
        }
        mags[10] = 1.0e6; // first bin past the slice
        let m = analyzer(BandReduction::Peak).analyze(&mags);
        assert_relative_eq!(m.noise_floor, 5.0);
    }

    #[test]
    fn noise_slice_must_exclude_dc_and_fit_spectrum() {
        for bins in [0..10, 5..5, 1..200] {
            let err = BandAnalyzer::new(
                TREMOR_BAND_HZ,
                DYSKINESIA_BAND_HZ,
                bins,
                BandReduction::Peak,
                104.0,
                256,
            )
            .unwrap_err();
            assert!(matches!(err, Error::InvalidNoiseSlice { bins: 129, .. }));
        }
    }

    proptest! {
        #[test]
        fn configured_bands_stay_in_range(exp in 6u32..=12, fs in 14.0f32..512.0) {
            let n = 1usize << exp;
            let df = bin_width(fs, n);
            prop_assume!(df <= 1.5);
            prop_assert_eq!(df, fs / n as f32);

            for (lo_hz, hi_hz) in [TREMOR_BAND_HZ, DYSKINESIA_BAND_HZ] {
                let band = FrequencyBand::from_hz(lo_hz, hi_hz, fs, n).unwrap();
                prop_assert!(band.lo <= band.hi);
                prop_assert!(band.hi <= n / 2);
            }
        }
    }
}
