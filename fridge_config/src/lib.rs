#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the fridge analyzer.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every section is optional; omitted keys fall back to the values the
//!   deployed fridge was tuned with.
use serde::Deserialize;
use std::path::Path;

/// Default bus prefix used by the fridge firmware.
pub const DEFAULT_TOPIC_PREFIX: &str = "devlol/h19/fridge";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FilterCfg {
    /// Sliding window length in samples. Must be >= 2.
    pub window_size: usize,
    /// Window is "stable" when its sample stdev is strictly below this (kg).
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

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ItemsCfg {
    /// Mass of one item (kg).
    pub item_weight_kg: f64,
    /// Max residual (kg) between a delta and the nearest whole-item multiple.
    pub max_item_deviation_kg: f64,
}

impl Default for ItemsCfg {
    fn default() -> Self {
        Self {
            item_weight_kg: 0.88,
            max_item_deviation_kg: 0.1,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Topics {
    pub raw_samples: String,
    pub door: String,
    /// Items taken out of the fridge.
    pub items_out: String,
    /// Items put into the fridge.
    pub items_in: String,
    /// Presence / last-will topic.
    pub online: String,
}

impl Default for Topics {
    fn default() -> Self {
        Self {
            raw_samples: format!("{DEFAULT_TOPIC_PREFIX}/rawsamples"),
            door: format!("{DEFAULT_TOPIC_PREFIX}/door"),
            items_out: format!("{DEFAULT_TOPIC_PREFIX}/bottles/out"),
            items_in: format!("{DEFAULT_TOPIC_PREFIX}/bottles/in"),
            online: format!("{DEFAULT_TOPIC_PREFIX}/online"),
        }
    }
}

/// Payload words the door sensor publishes.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DoorPayloads {
    pub open: String,
    pub close: String,
}

impl Default for DoorPayloads {
    fn default() -> Self {
        Self {
            open: "OPEN".to_string(),
            close: "CLOSE".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PresenceCfg {
    /// Publish online=true at startup and online=false at shutdown.
    pub enabled: bool,
}

impl Default for PresenceCfg {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FlushCfg {
    /// Upper bound on events delivered per flush step.
    pub max_per_flush: usize,
    /// Idle period (ms) after which pending events are flushed without new input.
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

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub filter: FilterCfg,
    pub items: ItemsCfg,
    pub topics: Topics,
    pub door: DoorPayloads,
    pub presence: PresenceCfg,
    pub flush: FlushCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file. A missing file yields the defaults.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Filter
        if self.filter.window_size < 2 {
            eyre::bail!("filter.window_size must be >= 2");
        }
        if self.filter.window_size > 10_000 {
            eyre::bail!("filter.window_size is unreasonably large (>10000)");
        }
        if !(self.filter.stable_deviation.is_finite() && self.filter.stable_deviation > 0.0) {
            eyre::bail!("filter.stable_deviation must be > 0");
        }

        // Items
        if !(self.items.item_weight_kg.is_finite() && self.items.item_weight_kg > 0.0) {
            eyre::bail!("items.item_weight_kg must be > 0");
        }
        if !(self.items.max_item_deviation_kg.is_finite() && self.items.max_item_deviation_kg > 0.0)
        {
            eyre::bail!("items.max_item_deviation_kg must be > 0");
        }
        if self.items.max_item_deviation_kg >= self.items.item_weight_kg {
            eyre::bail!("items.max_item_deviation_kg must be smaller than items.item_weight_kg");
        }

        // Topics
        let topics = [
            ("topics.raw_samples", &self.topics.raw_samples),
            ("topics.door", &self.topics.door),
            ("topics.items_out", &self.topics.items_out),
            ("topics.items_in", &self.topics.items_in),
            ("topics.online", &self.topics.online),
        ];
        for (key, topic) in topics {
            if topic.trim().is_empty() {
                eyre::bail!("{key} must not be empty");
            }
            if topic.chars().any(char::is_whitespace) {
                eyre::bail!("{key} must not contain whitespace");
            }
        }
        if self.topics.raw_samples == self.topics.door {
            eyre::bail!("topics.raw_samples and topics.door must differ");
        }

        // Door payloads
        if self.door.open.trim().is_empty() || self.door.close.trim().is_empty() {
            eyre::bail!("door.open and door.close must not be empty");
        }
        if self.door.open == self.door.close {
            eyre::bail!("door.open and door.close must differ");
        }

        // Flush
        if self.flush.max_per_flush == 0 {
            eyre::bail!("flush.max_per_flush must be >= 1");
        }
        if self.flush.interval_ms == 0 {
            eyre::bail!("flush.interval_ms must be >= 1");
        }
        if self.flush.interval_ms > 60 * 1000 {
            eyre::bail!("flush.interval_ms is unreasonably large (>60s)");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
