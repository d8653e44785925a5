//! `From` conversions from TOML config types to core runtime types.

impl From<&fridge_config::FilterCfg> for crate::FilterCfg {
    fn from(f: &fridge_config::FilterCfg) -> Self {
        Self {
            window_size: f.window_size,
            stable_deviation: f.stable_deviation,
        }
    }
}

impl From<&fridge_config::ItemsCfg> for crate::ItemCfg {
    fn from(i: &fridge_config::ItemsCfg) -> Self {
        Self {
            item_weight: i.item_weight_kg,
            max_item_deviation: i.max_item_deviation_kg,
        }
    }
}

impl From<&fridge_config::FlushCfg> for crate::FlushCfg {
    fn from(f: &fridge_config::FlushCfg) -> Self {
        Self {
            max_per_flush: f.max_per_flush.max(1),
            interval_ms: f.interval_ms.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn toml_defaults_match_core_defaults() {
        let cfg = fridge_config::Config::default();
        let filter: crate::FilterCfg = (&cfg.filter).into();
        let items: crate::ItemCfg = (&cfg.items).into();
        let flush: crate::FlushCfg = (&cfg.flush).into();
        assert_eq!(filter, crate::FilterCfg::default());
        assert_eq!(items, crate::ItemCfg::default());
        assert_eq!(flush, crate::FlushCfg::default());
    }
}
