/* ===============================================================================
Food ordering storefront.
Price calculation and formatting. 16 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::cart::CartLineItem;
use crate::environment as env;
use crate::models::Restaurant;

// ============================================================================
// [Totals]
// ============================================================================

// Option and extras price deltas are already folded into the unit price
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
   unit_price * Decimal::from(quantity)
}

pub fn cart_subtotal(lines: &[CartLineItem]) -> Decimal {
   lines.iter()
   .fold(Decimal::ZERO, |acc, line| acc + line_total(line.unit_price, line.quantity))
}

// Conditional fee per restaurant configuration. A zero min_order means
// the restaurant has no free-delivery tier and the fee is always charged,
// it does not mean delivery is free
pub fn delivery_fee(restaurant: &Restaurant, subtotal: Decimal) -> Decimal {
   if restaurant.delivery_fee <= Decimal::ZERO {
      return Decimal::ZERO;
   }
   if restaurant.min_order > Decimal::ZERO && subtotal >= restaurant.min_order {
      return Decimal::ZERO;
   }
   restaurant.delivery_fee
}

pub fn order_total(subtotal: Decimal, delivery_fee: Decimal) -> Decimal {
   subtotal + delivery_fee
}

// Amount in integer minor currency units, as the payment API wants it
pub fn minor_units(amount: Decimal) -> i64 {
   (amount * Decimal::from(100)).round().to_i64().unwrap_or_default()
}

// ============================================================================
// [Formatting]
// ============================================================================

// Price with the currency prefix and exactly two fraction digits
pub fn format_price(amount: Decimal) -> String {
   format!("{}{:.2}", env::price_unit(), amount)
}

// Parse a raw price string back to an amount: strip everything but digits
// and separators, normalize a comma decimal separator to a period. Must be
// lossless for anything format_price produces
pub fn parse_price(s: &str) -> Decimal {
   let cleaned: String = s.chars()
   .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
   .map(|c| if c == ',' { '.' } else { c })
   .collect();

   Decimal::from_str(&cleaned).unwrap_or_default()
}

// ============================================================================
// [Tests]
// ============================================================================

#[cfg(test)]
mod tests {
   use super::*;

   fn restaurant(fee: Decimal, min_order: Decimal) -> Restaurant {
      Restaurant {
         id: 1,
         name: String::from("Trattoria"),
         is_open: true,
         delivery_fee: fee,
         min_order,
         opening_hours: vec![],
         sections: vec![],
         offers: vec![],
      }
   }

   #[test]
   fn fee_charged_below_threshold_waived_at_it() {
      let rest = restaurant(Decimal::new(200, 2), Decimal::new(1000, 2));

      assert_eq!(delivery_fee(&rest, Decimal::new(999, 2)), Decimal::new(200, 2));
      assert_eq!(delivery_fee(&rest, Decimal::new(1000, 2)), Decimal::ZERO);
      assert_eq!(delivery_fee(&rest, Decimal::new(2500, 2)), Decimal::ZERO);
   }

   #[test]
   fn zero_min_order_always_charges() {
      // Zero threshold means "no free-delivery tier", not "always free"
      let rest = restaurant(Decimal::new(200, 2), Decimal::ZERO);

      assert_eq!(delivery_fee(&rest, Decimal::ZERO), Decimal::new(200, 2));
      assert_eq!(delivery_fee(&rest, Decimal::new(99999, 2)), Decimal::new(200, 2));
   }

   #[test]
   fn zero_fee_is_free() {
      let rest = restaurant(Decimal::ZERO, Decimal::new(1000, 2));
      assert_eq!(delivery_fee(&rest, Decimal::new(100, 2)), Decimal::ZERO);
   }

   #[test]
   fn total_is_subtotal_plus_fee() {
      let subtotal = Decimal::new(1250, 2);
      let fee = Decimal::new(200, 2);
      assert_eq!(order_total(subtotal, fee), Decimal::new(1450, 2));
   }

   #[test]
   fn format_parse_round_trip() {
      for cents in [0i64, 1, 99, 100, 450, 999, 1000, 123456] {
         let amount = Decimal::new(cents, 2);
         assert_eq!(parse_price(&format_price(amount)), amount);
      }
   }

   #[test]
   fn parse_normalizes_comma_separator() {
      assert_eq!(parse_price("€ 14,50"), Decimal::new(1450, 2));
      assert_eq!(parse_price("14.50 EUR"), Decimal::new(1450, 2));
      assert_eq!(parse_price("garbage"), Decimal::ZERO);
   }

   #[test]
   fn minor_units_rounds_to_cents() {
      assert_eq!(minor_units(Decimal::new(1450, 2)), 1450);
      assert_eq!(minor_units(Decimal::ZERO), 0);
   }
}
