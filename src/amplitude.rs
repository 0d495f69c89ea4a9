/// Normalized-amplitude memory.
///
/// Maps logical index i in [1, N] to i / sqrt(Σ k² for k = 1..N), so the
/// squared amplitudes over the whole address space sum to 1.
use crate::error::{Result, SimError};

#[derive(Debug, Clone)]
pub struct AmplitudeMemory {
    size: usize,
    normalization: f64,
}

impl AmplitudeMemory {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(SimError::Configuration("amplitude memory needs at least one slot".into()));
        }
        Ok(AmplitudeMemory { size, normalization: Self::normalization_for(size) })
    }

    /// sqrt(N(N+1)(2N+1)/6), computed in f64 to avoid integer overflow.
    pub fn normalization_for(size: usize) -> f64 {
        let n = size as f64;
        (n * (n + 1.0) * (2.0 * n + 1.0) / 6.0).sqrt()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn normalization(&self) -> f64 {
        self.normalization
    }

    /// Amplitude at 1-based index `i`.
    pub fn get_amplitude(&self, i: usize) -> Result<f64> {
        if i == 0 || i > self.size {
            return Err(SimError::OutOfRange {
                what: "amplitude",
                index: i,
                valid: format!("[1, {}]", self.size),
            });
        }
        Ok(i as f64 / self.normalization)
    }

    /// The first `count` amplitudes (fewer if the address space is smaller).
    pub fn samples(&self, count: usize) -> Vec<f64> {
        (1..=count.min(self.size)).map(|i| i as f64 / self.normalization).collect()
    }
}
