//! Node table aggregation
//!
//! The order tree is serialized as a flat table of allocator slots. Tree
//! topology is never followed: every slot is read in index order, empty
//! cells are skipped, and the rest are folded into per-tick levels held in a
//! BTreeMap keyed by `Reverse(tick)` so iteration yields the best tick first.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::debug;

use super::PriceLevel;
use crate::layout::OrderBookRecord;
use crate::price::PriceTick;

#[derive(Debug, Default, Clone, Copy)]
struct LevelTotals {
    /// 512 slots of 56-bit quantities always fit
    quantity: u128,
    orders: u32,
}

/// Aggregate the record's allocator slots into price levels, highest tick first.
///
/// Never fails. Corrupt slot contents yield wrong levels, not errors.
pub fn aggregate(record: &OrderBookRecord<'_>) -> Vec<PriceLevel> {
    if record.order_count == 0 {
        return Vec::new();
    }

    let mut levels: BTreeMap<Reverse<PriceTick>, LevelTotals> = BTreeMap::new();
    let mut scanned = 0usize;

    for slot in record.slots() {
        scanned += 1;
        if slot.is_empty() {
            continue;
        }

        let totals = levels.entry(Reverse(slot.price_tick)).or_default();
        totals.quantity += u128::from(slot.quantity);
        totals.orders += 1;
    }

    debug!(
        order_count = record.order_count,
        scanned,
        levels = levels.len(),
        "Aggregated order tree"
    );

    levels
        .into_iter()
        .map(|(Reverse(price_tick), totals)| PriceLevel {
            price_tick,
            total_quantity: totals.quantity,
            order_count: totals.orders,
        })
        .collect()
}
