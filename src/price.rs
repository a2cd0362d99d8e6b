//! Price tick arithmetic
//!
//! Prices are integer ticks in thousandths of the settlement currency unit.
//! A YES tick and its NO complement always sum to [`FULL_PRICE`]. Currency
//! amounts are integer base units (6 decimals for the settlement currency).
//! Nothing here touches floating point.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{BookError, Result};

/// A price in ticks; valid tradable ticks are `MIN_TICK..=MAX_TICK`
pub type PriceTick = u16;

/// Full price: YES + NO = 1000 ticks = one currency unit
pub const FULL_PRICE: PriceTick = 1000;

/// Half price (used for split outcomes)
pub const HALF_PRICE: PriceTick = 500;

pub const MIN_TICK: PriceTick = 1;
pub const MAX_TICK: PriceTick = 999;

/// Number of tradable ticks
pub const PRICE_TICKS: usize = 999;

/// Decimals of the settlement currency
pub const CURRENCY_DECIMALS: u32 = 6;

/// Largest decimal scale representable in a `u128` amount
pub const MAX_DECIMAL_PLACES: u32 = 38;

const TICK_SCALE: u32 = 3;

/// Cost in currency base units of one share at `tick`.
///
/// Tick 500 ($0.50) costs 500_000 base units per share.
pub fn cost_per_unit(tick: PriceTick) -> u64 {
    u64::from(tick) * u64::from(FULL_PRICE)
}

/// Whole shares `budget` buys at `tick`, truncating toward zero.
pub fn quantity_for_budget(budget: u128, tick: PriceTick) -> Result<u128> {
    match cost_per_unit(tick) {
        0 => Err(BookError::DivideByZero),
        cost => Ok(budget / u128::from(cost)),
    }
}

/// Cost in base units of `quantity` shares at `tick`. Cannot overflow.
pub fn cost_for_quantity(quantity: u64, tick: PriceTick) -> u128 {
    u128::from(quantity) * u128::from(cost_per_unit(tick))
}

/// Tick of the opposite outcome. Saturates at zero for ticks above `FULL_PRICE`.
pub fn complement_tick(tick: PriceTick) -> PriceTick {
    FULL_PRICE.saturating_sub(tick)
}

/// Tick as a currency fraction with three decimal places (500 -> 0.500)
pub fn tick_to_fraction(tick: PriceTick) -> Decimal {
    Decimal::new(i64::from(tick), TICK_SCALE)
}

/// Nearest tick to a currency fraction, rounding half away from zero.
///
/// Returns `None` when the result does not fit a tick (negative or huge).
pub fn fraction_to_tick(fraction: Decimal) -> Option<PriceTick> {
    fraction
        .checked_mul(Decimal::from(FULL_PRICE))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u16()
}

pub fn is_valid_tick(tick: PriceTick) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick)
}

/// Validity check for an arbitrary numeric value; fractional values are never ticks
pub fn is_valid_tick_value(value: Decimal) -> bool {
    value.fract().is_zero()
        && value >= Decimal::from(MIN_TICK)
        && value <= Decimal::from(MAX_TICK)
}

/// Format base units as a dollar string.
///
/// The fractional part is truncated (never rounded) to two display digits:
/// `format_currency(1_999_999, 6) == "$1.99"`.
pub fn format_currency(units: u128, decimal_places: u32) -> String {
    let decimal_places = decimal_places.min(MAX_DECIMAL_PLACES);
    if decimal_places == 0 {
        return format!("${units}");
    }

    let divisor = 10u128.pow(decimal_places);
    let whole = units / divisor;
    let frac = units % divisor;
    let frac_str = format!("{:0width$}", frac, width = decimal_places as usize);
    let shown = &frac_str[..frac_str.len().min(2)];

    format!("${whole}.{shown}")
}

/// Parse a display amount ("$1.50", "100", ".25") into base units.
///
/// Fractional digits beyond `decimal_places` are dropped.
pub fn parse_currency(text: &str, decimal_places: u32) -> Result<u128> {
    let decimal_places = decimal_places.min(MAX_DECIMAL_PLACES);
    let trimmed = text.trim();
    let body = trimmed.strip_prefix('$').unwrap_or(trimmed);

    let (whole_str, frac_str) = match body.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (body, ""),
    };

    let whole = parse_digits(whole_str, text)?;
    if !frac_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed(text));
    }

    let mut frac_digits: String = frac_str.chars().take(decimal_places as usize).collect();
    while frac_digits.len() < decimal_places as usize {
        frac_digits.push('0');
    }
    let frac = parse_digits(&frac_digits, text)?;

    whole
        .checked_mul(10u128.pow(decimal_places))
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| malformed(text))
}

/// Base units for a decimal amount (1.5 -> 1_500_000 at 6 decimals)
pub fn units_from_decimal(value: Decimal, decimal_places: u32) -> Result<u128> {
    parse_currency(&value.normalize().to_string(), decimal_places)
}

/// Empty digit strings count as zero
fn parse_digits(digits: &str, original: &str) -> Result<u128> {
    if digits.is_empty() {
        return Ok(0);
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed(original));
    }
    digits.parse::<u128>().map_err(|_| malformed(original))
}

fn malformed(text: &str) -> BookError {
    BookError::MalformedAmount(format!("{text:?}"))
}

/// Serde adapter writing `u128` amounts as decimal strings.
///
/// JSON numbers stop at `u64`; share totals and notionals can go past it.
pub mod units_str {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_constants() {
        assert_eq!(FULL_PRICE, 1000);
        assert_eq!(HALF_PRICE, 500);
        assert_eq!(complement_tick(HALF_PRICE), HALF_PRICE);
    }

    #[test]
    fn test_cost_per_unit() {
        assert_eq!(cost_per_unit(500), 500_000);
        assert_eq!(cost_per_unit(1), 1_000);
        assert_eq!(cost_per_unit(999), 999_000);
    }

    #[test]
    fn test_cost_per_unit_in_currency_scale() {
        let half = u128::from(cost_per_unit(HALF_PRICE));
        assert_eq!(format_currency(half, CURRENCY_DECIMALS), "$0.50");
        assert_eq!(parse_currency("$0.50", CURRENCY_DECIMALS).unwrap(), half);
        assert_eq!(
            format_currency(u128::from(cost_per_unit(MAX_TICK)), CURRENCY_DECIMALS),
            "$0.99"
        );
    }

    #[test]
    fn test_quantity_for_budget_truncates() {
        assert_eq!(quantity_for_budget(100_000_000, 500).unwrap(), 200);
        assert_eq!(quantity_for_budget(100, 500).unwrap(), 0);
        // 750_000 / 500_000 = 1.5
        assert_eq!(quantity_for_budget(750_000, 500).unwrap(), 1);
    }

    #[test]
    fn test_quantity_for_budget_zero_tick() {
        assert!(matches!(
            quantity_for_budget(1_000, 0),
            Err(BookError::DivideByZero)
        ));
    }

    #[test]
    fn test_cost_for_quantity() {
        assert_eq!(cost_for_quantity(100, 500), 50_000_000);
        assert_eq!(cost_for_quantity(1, 1), 1_000);
        assert_eq!(cost_for_quantity(0, 500), 0);
        assert_eq!(
            cost_for_quantity(u64::MAX, MAX_TICK),
            u128::from(u64::MAX) * 999_000
        );
    }

    #[test]
    fn test_complement_tick() {
        assert_eq!(complement_tick(300), 700);
        assert_eq!(complement_tick(1), 999);
        assert_eq!(complement_tick(999), 1);
        assert_eq!(complement_tick(1200), 0);
    }

    #[test]
    fn test_tick_to_fraction() {
        assert_eq!(tick_to_fraction(500), dec!(0.5));
        assert_eq!(tick_to_fraction(1), dec!(0.001));
        assert_eq!(tick_to_fraction(999), dec!(0.999));
        assert_eq!(tick_to_fraction(500).to_string(), "0.500");
    }

    #[test]
    fn test_fraction_to_tick_rounding() {
        assert_eq!(fraction_to_tick(dec!(0.5)), Some(500));
        assert_eq!(fraction_to_tick(dec!(0.001)), Some(1));
        assert_eq!(fraction_to_tick(dec!(0.4996)), Some(500));
        assert_eq!(fraction_to_tick(dec!(0.5006)), Some(501));
        assert_eq!(fraction_to_tick(dec!(0.0005)), Some(1));
        assert_eq!(fraction_to_tick(dec!(-0.5)), None);
    }

    #[test]
    fn test_is_valid_tick() {
        assert!(is_valid_tick(1));
        assert!(is_valid_tick(500));
        assert!(is_valid_tick(999));
        assert!(!is_valid_tick(0));
        assert!(!is_valid_tick(1000));
    }

    #[test]
    fn test_is_valid_tick_value() {
        assert!(is_valid_tick_value(dec!(500)));
        assert!(!is_valid_tick_value(dec!(500.5)));
        assert!(!is_valid_tick_value(dec!(-1)));
        assert!(!is_valid_tick_value(dec!(0)));
        assert!(!is_valid_tick_value(dec!(1000)));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1_500_000, 6), "$1.50");
        assert_eq!(format_currency(0, 6), "$0.00");
        assert_eq!(format_currency(100_000_000, 6), "$100.00");
        assert_eq!(format_currency(1_999_999, 6), "$1.99");
        assert_eq!(format_currency(5, 6), "$0.00");
    }

    #[test]
    fn test_format_currency_small_scales() {
        assert_eq!(format_currency(150, 2), "$1.50");
        assert_eq!(format_currency(15, 1), "$1.5");
        assert_eq!(format_currency(7, 0), "$7");
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("1.50", 6).unwrap(), 1_500_000);
        assert_eq!(parse_currency("$1.50", 6).unwrap(), 1_500_000);
        assert_eq!(parse_currency("100", 6).unwrap(), 100_000_000);
        assert_eq!(parse_currency("0.001", 6).unwrap(), 1_000);
        assert_eq!(parse_currency(".25", 6).unwrap(), 250_000);
        assert_eq!(parse_currency("1.1234567", 6).unwrap(), 1_123_456);
    }

    #[test]
    fn test_parse_currency_malformed() {
        for text in ["abc", "$x.50", "1.5a", "-1", "1.2.3", "1 000"] {
            assert!(
                matches!(parse_currency(text, 6), Err(BookError::MalformedAmount(_))),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn test_units_from_decimal() {
        assert_eq!(units_from_decimal(dec!(1.5), 6).unwrap(), 1_500_000);
        assert_eq!(units_from_decimal(dec!(2.000), 6).unwrap(), 2_000_000);
    }

    proptest! {
        #[test]
        fn complement_is_involution(tick in MIN_TICK..=MAX_TICK) {
            prop_assert_eq!(complement_tick(complement_tick(tick)), tick);
            prop_assert_eq!(tick + complement_tick(tick), FULL_PRICE);
        }

        #[test]
        fn fraction_round_trip(tick in MIN_TICK..=MAX_TICK) {
            prop_assert_eq!(fraction_to_tick(tick_to_fraction(tick)), Some(tick));
        }

        #[test]
        fn budget_round_trip(quantity in any::<u64>(), tick in MIN_TICK..=MAX_TICK) {
            let cost = cost_for_quantity(quantity, tick);
            prop_assert_eq!(quantity_for_budget(cost, tick).unwrap(), u128::from(quantity));
        }

        #[test]
        fn parse_inverts_format_for_cents(cents in 0u128..10_000_000) {
            let units = cents * 10_000;
            prop_assert_eq!(parse_currency(&format_currency(units, 6), 6).unwrap(), units);
        }
    }
}
