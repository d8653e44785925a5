//! Conversion of a weight delta into a whole number of items.
//!
//! Pure functions only; the state machine decides when a delta is meaningful.
//! Rounding is half away from zero (`f64::round`) so removed and added
//! deltas of the same magnitude always quantize to the same count.

use fridge_traits::OutboundEvent;

use crate::config::ItemCfg;

/// Outcome of quantizing one door cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemChange {
    /// Delta too small or too irregular to attribute to whole items.
    #[default]
    None,
    Removed(u32),
    Added(u32),
}

impl ItemChange {
    /// The outbound event for this change, if any.
    pub fn event(self) -> Option<OutboundEvent> {
        match self {
            ItemChange::None => None,
            ItemChange::Removed(n) => Some(OutboundEvent::ItemsRemoved(n)),
            ItemChange::Added(n) => Some(OutboundEvent::ItemsAdded(n)),
        }
    }
}

/// Quantize the change from `baseline` to `settled` into items.
///
/// A positive `baseline - settled` is a loss (items removed), a negative one a
/// gain (items added). The count is accepted only when it is at least one and
/// the residual to the nearest whole multiple is within `max_item_deviation`.
pub fn quantize(baseline: f64, settled: f64, items: &ItemCfg) -> ItemChange {
    let delta = baseline - settled;
    if !delta.is_finite() || delta == 0.0 {
        return ItemChange::None;
    }
    match whole_items(delta.abs(), items) {
        Some(n) if delta > 0.0 => ItemChange::Removed(n),
        Some(n) => ItemChange::Added(n),
        None => ItemChange::None,
    }
}

/// Distance from `magnitude` to the nearest whole multiple of the item weight.
#[inline]
pub fn residual(magnitude: f64, items: &ItemCfg) -> f64 {
    let n = (magnitude / items.item_weight).round();
    (magnitude - n * items.item_weight).abs()
}

fn whole_items(magnitude: f64, items: &ItemCfg) -> Option<u32> {
    let n = (magnitude / items.item_weight).round();
    if n < 1.0 || n > f64::from(u32::MAX) {
        return None;
    }
    if residual(magnitude, items) <= items.max_item_deviation {
        Some(n as u32)
    } else {
        None
    }
}
