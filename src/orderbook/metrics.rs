//! Depth metrics for an aggregated order book view

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::OrderBookView;
use crate::price::{complement_tick, cost_per_unit, tick_to_fraction, PriceTick};

/// Summary figures for one side's depth
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthMetrics {
    /// Highest resting tick
    pub best_tick: Option<PriceTick>,

    /// Best tick as a currency fraction
    pub best_price: Option<Decimal>,

    /// Opposite-outcome tick implied by the best level
    pub implied_complement: Option<PriceTick>,

    /// Total shares resting on this side
    #[serde(with = "crate::price::units_str")]
    pub total_quantity: u128,

    /// Number of resting orders
    pub order_count: u64,

    /// Number of price levels
    pub levels: usize,

    /// Cost of the whole side in currency base units
    #[serde(with = "crate::price::units_str")]
    pub notional: u128,
}

impl DepthMetrics {
    pub fn from_view(view: &OrderBookView) -> Self {
        let best_tick = view.best_level().map(|level| level.price_tick);

        Self {
            best_tick,
            best_price: best_tick.map(tick_to_fraction),
            implied_complement: best_tick.map(complement_tick),
            total_quantity: view
                .levels
                .iter()
                .fold(0u128, |acc, level| acc.saturating_add(level.total_quantity)),
            order_count: view.levels.iter().map(|level| u64::from(level.order_count)).sum(),
            levels: view.levels.len(),
            notional: view
                .levels
                .iter()
                .map(|level| {
                    level
                        .total_quantity
                        .saturating_mul(u128::from(cost_per_unit(level.price_tick)))
                })
                .fold(0u128, u128::saturating_add),
        }
    }

    /// Average cost per resting share in base units, if any shares rest
    pub fn average_cost(&self) -> Option<u128> {
        match self.total_quantity {
            0 => None,
            quantity => Some(self.notional / quantity),
        }
    }
}

impl OrderBookView {
    pub fn metrics(&self) -> DepthMetrics {
        DepthMetrics::from_view(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::{PriceLevel, Side};
    use rust_decimal_macros::dec;

    #[test]
    fn test_metrics_for_populated_view() {
        let view = OrderBookView {
            side: Side::Yes,
            levels: vec![
                PriceLevel {
                    price_tick: 600,
                    total_quantity: 10,
                    order_count: 2,
                },
                PriceLevel {
                    price_tick: 400,
                    total_quantity: 30,
                    order_count: 3,
                },
            ],
        };
        let metrics = view.metrics();

        assert_eq!(metrics.best_tick, Some(600));
        assert_eq!(metrics.best_price, Some(dec!(0.6)));
        assert_eq!(metrics.implied_complement, Some(400));
        assert_eq!(metrics.total_quantity, 40);
        assert_eq!(metrics.order_count, 5);
        assert_eq!(metrics.levels, 2);
        // 10 * 600_000 + 30 * 400_000
        assert_eq!(metrics.notional, 18_000_000);
        assert_eq!(metrics.average_cost(), Some(450_000));
    }

    #[test]
    fn test_metrics_for_empty_view() {
        let view = OrderBookView {
            side: Side::No,
            levels: vec![],
        };
        assert_eq!(view.metrics(), DepthMetrics::default());
        assert_eq!(view.metrics().average_cost(), None);
    }

    #[test]
    fn test_large_notional_serializes() {
        // One near-full 56-bit order at tick 500 is worth ~3.6e22 base units
        let view = OrderBookView {
            side: Side::Yes,
            levels: vec![PriceLevel {
                price_tick: 500,
                total_quantity: 0x00FF_FFFF_FFFF_FFFF,
                order_count: 1,
            }],
        };
        let metrics = view.metrics();
        assert_eq!(metrics.notional, 0x00FF_FFFF_FFFF_FFFF * 500_000);
        assert!(metrics.notional > u128::from(u64::MAX));

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["notional"], metrics.notional.to_string());
        assert_eq!(json["total_quantity"], "72057594037927935");

        let back: DepthMetrics = serde_json::from_value(json).unwrap();
        assert_eq!(back, metrics);
    }
}
