//! Sliding-window stability detection over raw load-cell samples.
//!
//! The window is newest-first and fixed-capacity. Once full, the sample
//! standard deviation decides whether the mass on the shelf is at rest; when
//! it is, the window mean is reported as the stable weight.

use std::collections::VecDeque;

use crate::config::FilterCfg;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct StabilityFilter {
    window: VecDeque<f64>,
    window_size: usize,
    stable_deviation: f64,
}

impl StabilityFilter {
    /// Build a filter; rejects window sizes below 2 and non-positive thresholds.
    pub fn new(cfg: FilterCfg) -> Result<Self> {
        cfg.validate().map_err(eyre::Report::new)?;
        Ok(Self {
            window: VecDeque::with_capacity(cfg.window_size + 1),
            window_size: cfg.window_size,
            stable_deviation: cfg.stable_deviation,
        })
    }

    /// Ingest one raw sample. Returns the window mean when the full window is
    /// stable, `None` otherwise.
    ///
    /// Non-finite samples are dropped before touching the window so a single
    /// NaN cannot poison the statistics.
    pub fn observe(&mut self, sample: f64) -> Option<f64> {
        if !sample.is_finite() {
            tracing::debug!(sample, "non-finite sample ignored");
            return None;
        }
        self.window.push_front(sample);
        self.window.truncate(self.window_size);

        let (mean, stdev) = self.stats()?;
        if stdev < self.stable_deviation {
            tracing::trace!(mean, stdev, "stable window");
            Some(mean)
        } else {
            None
        }
    }

    /// Mean and sample standard deviation of the window, only once it is full.
    pub fn stats(&self) -> Option<(f64, f64)> {
        if !self.is_full() {
            return None;
        }
        let n = self.window.len() as f64;
        let mean = self.window.iter().sum::<f64>() / n;
        let ss: f64 = self.window.iter().map(|x| (x - mean) * (x - mean)).sum();
        let stdev = (ss / (n - 1.0)).sqrt();
        Some((mean, stdev))
    }

    /// Drop all buffered samples.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.window.len() == self.window_size
    }

    #[inline]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Buffered samples, newest first.
    pub fn samples(&self) -> impl Iterator<Item = &f64> {
        self.window.iter()
    }
}
