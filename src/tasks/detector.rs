// TremorScope — Detection Task
//
// Owns every piece of per-cycle state: the sample window, the FFT plan, the
// band analyzer and the peripherals.  One cycle is
//
//   Idle → Sampling (fill window) → Analyzing (FFT, bands, decision) → Idle
//
// followed by a fixed pause.  Nothing carries over between cycles except
// the preallocated buffers.

use std::thread;
use std::time::Duration;

use crate::config::*;
use crate::drivers::leds::{blink_ready, halt_blinking};
use crate::drivers::{AccelSensor, Indicator};
use crate::dsp::{classify, BandAnalyzer, BandReduction, SampleBuffer, SpectralTransform};
use crate::error::{Error, Result};
use crate::events::Detection;
use crate::tasks::sampler::{Sampler, Ticker, TriggerPolicy};

/// Runtime knobs.  `Default` is the production configuration.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub trigger_policy: TriggerPolicy,
    pub reduction: BandReduction,
    pub sample_period: Duration,
    pub poll_interval: Duration,
    pub cycle_delay: Duration,
    pub ready_blinks: u32,
    pub blink_half_period: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            trigger_policy: TriggerPolicy::default(),
            reduction: BandReduction::default(),
            sample_period: Duration::from_micros(SAMPLE_PERIOD_US),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            cycle_delay: Duration::from_millis(CYCLE_DELAY_MS),
            ready_blinks: READY_BLINK_COUNT,
            blink_half_period: Duration::from_millis(READY_BLINK_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Sampling,
    Analyzing,
}

/// Check the sensor identity.  A mismatch is fatal for the caller.
pub fn verify_identity<S: AccelSensor>(sensor: &mut S) -> Result<()> {
    let found = sensor.identify()?;
    log::info!("WHO_AM_I = {:#04x} (expect {:#04x})", found, WHO_AM_I_EXPECTED);
    if found != WHO_AM_I_EXPECTED {
        return Err(Error::IdentityMismatch {
            expected: WHO_AM_I_EXPECTED,
            found,
        });
    }
    Ok(())
}

pub struct Detector<S, T, I> {
    sensor: S,
    sampler: Sampler<T>,
    indicator: I,
    buffer: SampleBuffer<FFT_SIZE>,
    transform: SpectralTransform,
    analyzer: BandAnalyzer,
    config: DetectorConfig,
    state: CycleState,
}

impl<S, T, I> Detector<S, T, I>
where
    S: AccelSensor,
    T: Ticker,
    I: Indicator,
{
    /// Build the pipeline.  All allocation happens here.
    pub fn new(sensor: S, sampler: Sampler<T>, indicator: I, config: DetectorConfig) -> Result<Self> {
        let analyzer = BandAnalyzer::new(
            TREMOR_BAND_HZ,
            DYSKINESIA_BAND_HZ,
            NOISE_FLOOR_BINS,
            config.reduction,
            SAMPLE_RATE_HZ,
            FFT_SIZE,
        )?;
        log::debug!(
            "Bands: tremor {:?}, dyskinesia {:?}, Δf = {:.4} Hz",
            analyzer.tremor_band().bins(),
            analyzer.dyskinesia_band().bins(),
            analyzer.resolution()
        );

        Ok(Self {
            sensor,
            sampler,
            indicator,
            buffer: SampleBuffer::new(),
            transform: SpectralTransform::new(FFT_SIZE),
            analyzer,
            config,
            state: CycleState::Idle,
        })
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Startup: identity check, sensor configuration, ready blink.
    pub fn start(&mut self) -> Result<()> {
        log::info!("Testing sensor connectivity...");
        verify_identity(&mut self.sensor)?;

        log::info!("Configuring accelerometer...");
        self.sensor.configure()?;

        log::info!("System ready. Starting measurements...");
        blink_ready(
            &mut self.indicator,
            self.config.ready_blinks,
            self.config.blink_half_period,
        )
    }

    /// One full acquisition + analysis cycle.
    pub fn run_cycle(&mut self) -> Result<Detection> {
        self.state = CycleState::Sampling;
        log::debug!("Collecting samples...");
        let filled = self.sampler.fill(&mut self.sensor, &mut self.buffer);
        if let Err(e) = filled {
            self.state = CycleState::Idle;
            // No window, no result: drop the previous cycle's output.
            if let Err(gpio) = self.indicator.set_all(false) {
                log::warn!("Could not clear indicator: {}", gpio);
            }
            return Err(e);
        }

        self.state = CycleState::Analyzing;
        log::debug!("Analyzing data...");
        let detection = self.analyze();
        self.state = CycleState::Idle;

        let detection = detection?;
        log::debug!("Indicator: {}", detection.classification.label());
        self.indicator.show(detection.classification)?;
        log::info!("{}", detection);
        Ok(detection)
    }

    fn analyze(&mut self) -> Result<Detection> {
        let magnitudes = self.transform.process(self.buffer.window_mut())?;
        let metrics = self.analyzer.analyze(magnitudes);
        log::debug!(
            "T: {:.0} @ bin {}, D: {:.0} @ bin {}, noise floor {:.1}",
            metrics.tremor.value,
            metrics.tremor.bin,
            metrics.dyskinesia.value,
            metrics.dyskinesia.bin,
            metrics.noise_floor
        );
        Ok(classify(&metrics, THRESHOLD_FACTOR))
    }

    /// Fatal diagnostic state: never samples, blinks all outputs forever.
    pub fn halt(&mut self) -> ! {
        halt_blinking(&mut self.indicator, Duration::from_millis(FATAL_BLINK_MS))
    }

    /// Endless cycle loop.  Cycle failures are logged and the next cycle
    /// starts after the usual pause.
    pub fn run(&mut self) -> ! {
        loop {
            if let Err(e) = self.run_cycle() {
                log::error!("Detection cycle failed: {}", e);
            }
            thread::sleep(self.config.cycle_delay);
        }
    }
}
