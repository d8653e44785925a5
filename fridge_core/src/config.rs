//! Runtime configuration for the analyzer.
//!
//! These are the structs the core works with. They are separate from the
//! TOML-deserialized config in `fridge_config`; see `conversions`.

use crate::error::BuildError;

/// Stability filter parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCfg {
    /// Sliding window length (samples). Must be >= 2.
    pub window_size: usize,
    /// A full window is stable when its sample stdev is strictly below this (kg).
    pub stable_deviation: f64,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self {
            window_size: 4,
            stable_deviation: 0.015,
        }
    }
}

impl FilterCfg {
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.window_size < 2 {
            return Err(BuildError::InvalidConfig("window_size must be >= 2"));
        }
        if !(self.stable_deviation.is_finite() && self.stable_deviation > 0.0) {
            return Err(BuildError::InvalidConfig("stable_deviation must be > 0"));
        }
        Ok(())
    }
}

/// Uniform item model used by the quantization rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemCfg {
    /// Mass of one item (kg).
    pub item_weight: f64,
    /// Accepted residual (kg) around a whole-item multiple.
    pub max_item_deviation: f64,
}

impl Default for ItemCfg {
    fn default() -> Self {
        Self {
            item_weight: 0.88,
            max_item_deviation: 0.1,
        }
    }
}

impl ItemCfg {
    pub fn validate(&self) -> Result<(), BuildError> {
        if !(self.item_weight.is_finite() && self.item_weight > 0.0) {
            return Err(BuildError::InvalidConfig("item_weight must be > 0"));
        }
        if !(self.max_item_deviation.is_finite() && self.max_item_deviation > 0.0) {
            return Err(BuildError::InvalidConfig("max_item_deviation must be > 0"));
        }
        // Tolerance must stay below one item.
        if self.max_item_deviation >= self.item_weight {
            return Err(BuildError::InvalidConfig(
                "max_item_deviation must be smaller than item_weight",
            ));
        }
        Ok(())
    }
}

/// Delivery pacing for the outbound queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushCfg {
    /// Upper bound on events handed to the sink per flush step.
    pub max_per_flush: usize,
    /// Flush even without new input after this much idle time (ms).
    pub interval_ms: u64,
}

impl Default for FlushCfg {
    fn default() -> Self {
        Self {
            max_per_flush: 16,
            interval_ms: 100,
        }
    }
}
