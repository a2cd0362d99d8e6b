//! Order book module
//!
//! Aggregated depth views derived from order book snapshots.

mod book;
mod metrics;

pub use book::aggregate;
pub use metrics::DepthMetrics;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::price::{tick_to_fraction, PriceTick};

/// Outcome side of an order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// Zero is YES; any other tag reads as NO
    pub fn from_byte(tag: u8) -> Self {
        if tag == 0 {
            Side::Yes
        } else {
            Side::No
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

/// Resting quantity at one price tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price_tick: PriceTick,
    /// Total shares at this tick; a full tick can exceed `u64`
    #[serde(with = "crate::price::units_str")]
    pub total_quantity: u128,
    /// Number of orders at this tick
    pub order_count: u32,
}

impl PriceLevel {
    pub fn price(&self) -> Decimal {
        tick_to_fraction(self.price_tick)
    }
}

/// Depth for one side of a market leg, best (highest) tick first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookView {
    pub side: Side,
    pub levels: Vec<PriceLevel>,
}

impl OrderBookView {
    pub fn best_level(&self) -> Option<&PriceLevel> {
        self.levels.first()
    }

    /// Keep only the best `max_depth` levels
    pub fn trim_depth(&mut self, max_depth: usize) {
        self.levels.truncate(max_depth);
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Both order books of a market leg; either may not exist yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegBooks {
    pub yes: Option<OrderBookView>,
    pub no: Option<OrderBookView>,
}

impl LegBooks {
    pub fn side(&self, side: Side) -> Option<&OrderBookView> {
        match side {
            Side::Yes => self.yes.as_ref(),
            Side::No => self.no.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn view() -> OrderBookView {
        OrderBookView {
            side: Side::Yes,
            levels: vec![
                PriceLevel {
                    price_tick: 800,
                    total_quantity: 5,
                    order_count: 1,
                },
                PriceLevel {
                    price_tick: 500,
                    total_quantity: 25,
                    order_count: 2,
                },
                PriceLevel {
                    price_tick: 200,
                    total_quantity: 3,
                    order_count: 1,
                },
            ],
        }
    }

    #[test]
    fn test_side_from_byte() {
        assert_eq!(Side::from_byte(0), Side::Yes);
        assert_eq!(Side::from_byte(1), Side::No);
        assert_eq!(Side::from_byte(7), Side::No);
        assert_eq!(Side::Yes.opposite(), Side::No);
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Yes).unwrap(), "\"yes\"");
        assert_eq!(serde_json::to_string(&Side::No).unwrap(), "\"no\"");
    }

    #[test]
    fn test_level_quantity_serializes_as_string() {
        let level = PriceLevel {
            price_tick: 500,
            total_quantity: u128::from(u64::MAX) + 1,
            order_count: 257,
        };
        let json = serde_json::to_value(level).unwrap();
        assert_eq!(json["total_quantity"], "18446744073709551616");

        let back: PriceLevel = serde_json::from_value(json).unwrap();
        assert_eq!(back, level);
    }

    #[test]
    fn test_level_price() {
        assert_eq!(view().levels[1].price(), dec!(0.5));
    }

    #[test]
    fn test_trim_depth() {
        let mut book = view();
        assert_eq!(book.best_level().map(|l| l.price_tick), Some(800));
        book.trim_depth(2);
        assert_eq!(book.levels.len(), 2);
        assert_eq!(book.levels[1].price_tick, 500);
        book.trim_depth(0);
        assert!(book.is_empty());
    }

    #[test]
    fn test_leg_books_side() {
        let legs = LegBooks {
            yes: Some(view()),
            no: None,
        };
        assert!(legs.side(Side::Yes).is_some());
        assert!(legs.side(Side::No).is_none());
    }
}
