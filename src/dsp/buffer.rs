// TremorScope — Sample Buffer
//
// One analysis window of raw accelerometer readings.  The storage is a fixed
// array sized at compile time; `reset` only rewinds the fill index.

/// Fixed-capacity window of `N` samples plus its fill state.
pub struct SampleBuffer<const N: usize> {
    samples: [f32; N],
    idx: usize,
}

impl<const N: usize> SampleBuffer<N> {
    const VALID_SIZE: () = assert!(
        N >= 32 && N.is_power_of_two(),
        "window size must be a power of two of at least 32"
    );

    pub fn new() -> Self {
        let () = Self::VALID_SIZE;
        Self { samples: [0.0; N], idx: 0 }
    }

    /// Number of samples written so far this cycle.
    pub fn len(&self) -> usize {
        self.idx
    }

    pub fn is_empty(&self) -> bool {
        self.idx == 0
    }

    pub fn is_full(&self) -> bool {
        self.idx == N
    }

    pub fn remaining(&self) -> usize {
        N - self.idx
    }

    /// Rewind for a new acquisition cycle.  Stale values are left in place
    /// and overwritten as the window refills.
    pub fn reset(&mut self) {
        self.idx = 0;
    }

    /// Append one sample.  Returns `false` (and drops the sample) when full.
    pub fn push(&mut self, sample: f32) -> bool {
        if self.is_full() {
            return false;
        }
        self.samples[self.idx] = sample;
        self.idx += 1;
        true
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples[..self.idx]
    }

    /// Full window for the in-place transform.  Only meaningful once full.
    pub fn window_mut(&mut self) -> &mut [f32; N] {
        &mut self.samples
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_to_capacity_and_rejects_overflow() {
        let mut buf = SampleBuffer::<32>::new();
        assert!(buf.is_empty());
        for i in 0..32 {
            assert!(buf.push(i as f32));
        }
        assert!(buf.is_full());
        assert_eq!(buf.remaining(), 0);
        assert!(!buf.push(99.0));
        assert_eq!(buf.len(), 32);
        assert_eq!(buf.as_slice()[31], 31.0);
    }

    #[test]
    fn reset_rewinds_fill_index() {
        let mut buf = SampleBuffer::<64>::new();
        buf.push(1.0);
        buf.push(2.0);
        buf.reset();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.remaining(), 64);
        assert!(buf.as_slice().is_empty());
        buf.push(5.0);
        assert_eq!(buf.as_slice(), &[5.0]);
    }
}
