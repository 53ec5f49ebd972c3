// TremorScope — Acquisition Scheduler
//
// A periodic timer marks samples as due; the main context polls the mark,
// performs the (blocking) accelerometer read and appends to the window.  The
// timer callback only touches the atomics in `SampleSignal`, so bus latency
// never lands on the timer path.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::MAX_READ_FAILURES;
use crate::drivers::AccelSensor;
use crate::dsp::SampleBuffer;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Timer → main context handoff
// ---------------------------------------------------------------------------

/// What happens when the timer fires again before the last trigger was polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerPolicy {
    /// Single "sample due" flag.  A second fire before the poll is lost and
    /// only counted, so the window silently stretches in time.
    Latch,
    /// Pending-trigger counter.  The poller catches up on every missed
    /// trigger.
    #[default]
    Count,
}

/// Single-producer/single-consumer "sample due" signal.
#[derive(Debug)]
pub struct SampleSignal {
    pending: AtomicU32,
    lost: AtomicU32,
    policy: TriggerPolicy,
}

impl SampleSignal {
    pub fn new(policy: TriggerPolicy) -> Self {
        Self {
            pending: AtomicU32::new(0),
            lost: AtomicU32::new(0),
            policy,
        }
    }

    /// Timer side.  Lock-free and never blocks.
    pub fn fire(&self) {
        match self.policy {
            TriggerPolicy::Latch => {
                if self.pending.swap(1, Ordering::AcqRel) != 0 {
                    self.lost.fetch_add(1, Ordering::Relaxed);
                }
            }
            TriggerPolicy::Count => {
                self.pending.fetch_add(1, Ordering::AcqRel);
            }
        }
    }

    /// Poller side: triggers due since the previous call.
    pub fn take(&self) -> u32 {
        self.pending.swap(0, Ordering::AcqRel)
    }

    /// Triggers dropped by the `Latch` policy since the previous call.
    pub fn take_lost(&self) -> u32 {
        self.lost.swap(0, Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.pending.store(0, Ordering::Release);
        self.lost.store(0, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Periodic trigger sources
// ---------------------------------------------------------------------------

/// Periodic source that fires a `SampleSignal` it was built with.
pub trait Ticker {
    fn arm(&mut self, period: Duration) -> Result<()>;
    fn disarm(&mut self) -> Result<()>;
}

/// Host ticker: a dedicated thread fires the signal on a fixed schedule.
pub struct ThreadTicker {
    signal: Arc<SampleSignal>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadTicker {
    pub fn new(signal: Arc<SampleSignal>) -> Self {
        Self {
            signal,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

impl Ticker for ThreadTicker {
    fn arm(&mut self, period: Duration) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        self.running.store(true, Ordering::SeqCst);

        let signal = Arc::clone(&self.signal);
        let running = Arc::clone(&self.running);
        let worker = thread::Builder::new()
            .name("sampler".into())
            .spawn(move || {
                let mut next = Instant::now() + period;
                while running.load(Ordering::SeqCst) {
                    let now = Instant::now();
                    if now < next {
                        thread::sleep(next - now);
                    }
                    if !running.load(Ordering::SeqCst) {
                        break;
                    }
                    signal.fire();
                    next += period;
                }
            })
            .map_err(|e| Error::Timer(e.to_string()))?;

        self.worker = Some(worker);
        Ok(())
    }

    fn disarm(&mut self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            worker
                .join()
                .map_err(|_| Error::Timer("sampler thread panicked".into()))?;
        }
        Ok(())
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        let _ = self.disarm();
    }
}

#[cfg(target_os = "espidf")]
pub use esp::EspTicker;

#[cfg(target_os = "espidf")]
mod esp {
    use std::sync::Arc;
    use std::time::Duration;

    use esp_idf_svc::timer::{EspTaskTimerService, EspTimer};

    use super::{SampleSignal, Ticker};
    use crate::error::{Error, Result};

    /// ESP timer service callback.  Created once at startup, re-armed every
    /// cycle.
    pub struct EspTicker {
        timer: EspTimer<'static>,
    }

    impl EspTicker {
        pub fn new(service: &EspTaskTimerService, signal: Arc<SampleSignal>) -> Result<Self> {
            let timer = service
                .timer(move || signal.fire())
                .map_err(|e| Error::Timer(e.to_string()))?;
            Ok(Self { timer })
        }
    }

    impl Ticker for EspTicker {
        fn arm(&mut self, period: Duration) -> Result<()> {
            self.timer.every(period).map_err(|e| Error::Timer(e.to_string()))
        }

        fn disarm(&mut self) -> Result<()> {
            self.timer
                .cancel()
                .map(|_| ())
                .map_err(|e| Error::Timer(e.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Acquisition
// ---------------------------------------------------------------------------

/// Owns the trigger side of acquisition and fills one window per call.
pub struct Sampler<T> {
    signal: Arc<SampleSignal>,
    ticker: T,
    period: Duration,
    poll_interval: Duration,
    failures: u32,
}

impl<T: Ticker> Sampler<T> {
    pub fn new(signal: Arc<SampleSignal>, ticker: T, period: Duration, poll_interval: Duration) -> Self {
        Self {
            signal,
            ticker,
            period,
            poll_interval,
            failures: 0,
        }
    }

    pub fn signal(&self) -> &Arc<SampleSignal> {
        &self.signal
    }

    /// Consume due triggers and read that many samples (bounded by the
    /// space left).  Returns the number of samples appended.
    ///
    /// A failed read skips its trigger.  After `MAX_READ_FAILURES` failures
    /// in a row the sensor is treated as gone and the last error returned.
    pub fn service<S: AccelSensor, const N: usize>(
        &mut self,
        sensor: &mut S,
        buffer: &mut SampleBuffer<N>,
    ) -> Result<usize> {
        let due = self.signal.take() as usize;
        let mut appended = 0;

        for _ in 0..due.min(buffer.remaining()) {
            match sensor.read_sample() {
                Ok(sample) => {
                    buffer.push(sample);
                    appended += 1;
                    self.failures = 0;
                }
                Err(e) => {
                    self.failures += 1;
                    if self.failures >= MAX_READ_FAILURES {
                        log::error!(
                            "Accelerometer stopped responding ({} failed reads)",
                            self.failures
                        );
                        return Err(e);
                    }
                    log::warn!("Accelerometer read error: {}", e);
                }
            }
        }
        Ok(appended)
    }

    /// Reset `buffer`, arm the timer and poll until the window is full.
    /// The timer is disarmed as soon as the last sample lands, or when the
    /// sensor stops answering.  Returns the number of triggers lost during
    /// the window.
    pub fn fill<S: AccelSensor, const N: usize>(
        &mut self,
        sensor: &mut S,
        buffer: &mut SampleBuffer<N>,
    ) -> Result<u32> {
        buffer.reset();
        self.signal.clear();
        self.failures = 0;
        self.ticker.arm(self.period)?;

        while !buffer.is_full() {
            if let Err(e) = self.service(sensor, buffer) {
                self.ticker.disarm()?;
                return Err(e);
            }
            if !buffer.is_full() {
                thread::sleep(self.poll_interval);
            }
        }

        self.ticker.disarm()?;

        let lost = self.signal.take_lost();
        if lost > 0 {
            log::warn!("{} sample trigger(s) lost this window", lost);
        }
        Ok(lost)
    }
}
