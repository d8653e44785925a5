//! Builder for `FridgeAnalyzer`.
//!
//! Every knob has a default, so `FridgeAnalyzer::builder().try_build()` gives
//! the deployed fridge's tuning. Validation happens once, in `try_build()`.

use crate::analyzer::FridgeAnalyzer;
use crate::config::{FilterCfg, ItemCfg};
use crate::error::Result;

#[derive(Debug, Default, Clone)]
pub struct FridgeAnalyzerBuilder {
    filter: Option<FilterCfg>,
    items: Option<ItemCfg>,
    window_size: Option<usize>,
    item_weight: Option<f64>,
}

impl FridgeAnalyzerBuilder {
    pub fn with_filter(mut self, filter: FilterCfg) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_items(mut self, items: ItemCfg) -> Self {
        self.items = Some(items);
        self
    }

    /// Override only the window length; takes precedence over `with_filter`.
    pub fn with_window_size(mut self, n: usize) -> Self {
        self.window_size = Some(n);
        self
    }

    /// Override only the item weight (kg); takes precedence over `with_items`.
    pub fn with_item_weight(mut self, kg: f64) -> Self {
        self.item_weight = Some(kg);
        self
    }

    pub fn try_build(self) -> Result<FridgeAnalyzer> {
        let mut filter = self.filter.unwrap_or_default();
        if let Some(n) = self.window_size {
            filter.window_size = n;
        }
        let mut items = self.items.unwrap_or_default();
        if let Some(kg) = self.item_weight {
            items.item_weight = kg;
        }

        filter.validate().map_err(eyre::Report::new)?;
        items.validate().map_err(eyre::Report::new)?;

        tracing::debug!(
            window_size = filter.window_size,
            stable_deviation = filter.stable_deviation,
            item_weight = items.item_weight,
            max_item_deviation = items.max_item_deviation,
            "analyzer configured"
        );
        FridgeAnalyzer::new(filter, items)
    }
}
