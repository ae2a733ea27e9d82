use crate::{AnalyticsError, Result};

/// Finite window with geometrically decaying weights.
///
/// `weights()[i]` applies to the i-th most recent sample of a window and the
/// weights always sum to one. Weights are only materialised for series long
/// enough to fill a window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayingWindow {
    window_size: usize,
    decay_factor: f64,
}

impl DecayingWindow {
    pub fn new(window_size: usize, decay_factor: f64) -> Result<Self> {
        if window_size == 0 {
            return Err(AnalyticsError::InvalidWindowSize);
        }
        // also rejects NaN
        if !(decay_factor > 0.0 && decay_factor <= 1.0) {
            return Err(AnalyticsError::InvalidDecayFactor(decay_factor));
        }

        Ok(Self {
            window_size,
            decay_factor,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Allocates `window_size` values.
    pub fn weights(&self) -> Vec<f64> {
        let raw = std::iter::successors(Some(1.0_f64), |w| Some(w * self.decay_factor))
            .take(self.window_size)
            .collect::<Vec<_>>();
        let total = raw.iter().sum::<f64>();

        raw.into_iter().map(|w| w / total).collect()
    }

    /// Sliding weighted average. Output `k` covers `series[k..k + window_size]`
    /// and aligns with `series[k + window_size - 1]`; a series shorter than the
    /// window yields nothing.
    pub fn apply(&self, series: &[f64]) -> Vec<f64> {
        if series.len() < self.window_size {
            return Vec::new();
        }

        let weights = self.weights();
        series
            .windows(self.window_size)
            .map(|window| {
                window
                    .iter()
                    .rev()
                    .zip(&weights)
                    .map(|(value, weight)| value * weight)
                    .sum()
            })
            .collect()
    }
}
