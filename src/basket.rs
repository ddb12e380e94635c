/* ===============================================================================
Food ordering storefront.
Basket screen. 22 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::time::{Duration, Instant};

use crate::cart::Cart;
use crate::pricing;
use crate::states::{read_line, Context, Screen, ScreenResult};

// ============================================================================
// [Highlight]
// ============================================================================

pub const HIGHLIGHT_TTL: Duration = Duration::from_millis(700);

// Transient marker for the line that was just added or merged
#[derive(Clone, Debug)]
pub struct Highlight {
   key: String,
   since: Instant,
}

impl Highlight {
   pub fn new(key: String) -> Self {
      Self { key, since: Instant::now() }
   }

   pub fn active(&self, key: &str) -> bool {
      self.key == key && self.since.elapsed() < HIGHLIGHT_TTL
   }
}

// ============================================================================
// [Screen]
// ============================================================================

enum Command {
   Plus(usize),
   Minus(usize),
   Delete(usize),
   Clear,
   Checkout,
   Exit, // back to the store
   Unknown,
}

impl Command {
   fn parse(s: &str) -> Self {
      match s {
         "/clear" => Self::Clear,
         "/order" => Self::Checkout,
         "/back" => Self::Exit,
         _ => {
            if let Some(n) = s.strip_prefix("/inc").and_then(|r| r.parse().ok()) {
               Self::Plus(n)
            } else if let Some(n) = s.strip_prefix("/dec").and_then(|r| r.parse().ok()) {
               Self::Minus(n)
            } else if let Some(n) = s.strip_prefix("/del").and_then(|r| r.parse().ok()) {
               Self::Delete(n)
            } else {
               Self::Unknown
            }
         }
      }
   }
}

pub async fn enter(ctx: &Context, location_id: i64, restaurant_id: i64, highlight: Option<Highlight>) -> ScreenResult {
   let rest = ctx.api.restaurant(restaurant_id).await?;
   let mut cart = Cart::open(ctx.storage.clone());
   let mut highlight = highlight;

   loop {
      view(&cart, &rest, highlight.as_ref());
      // The marker is one render only
      highlight = None;

      let ans = read_line("basket> ").await?;
      match Command::parse(&ans) {
         Command::Exit => return Ok(Screen::Store { location_id, restaurant_id }),

         Command::Clear => cart.clear(),

         Command::Checkout => {
            if cart.is_empty() {
               println!("Cart is empty");
               continue;
            }
            if !rest.is_open {
               println!("{} is closed now, ordering is unavailable", rest.name);
               continue;
            }
            return Ok(Screen::Checkout { location_id, restaurant_id });
         }

         Command::Plus(n) => {
            if let Some(line) = cart.items().get(n.wrapping_sub(1)) {
               let (key, quantity) = (line.key.clone(), line.quantity + 1);
               cart.set_quantity(&key, quantity);
            }
         }

         Command::Minus(n) => {
            if let Some(line) = cart.items().get(n.wrapping_sub(1)) {
               let (key, quantity) = (line.key.clone(), clamped_decrement(line.quantity));
               cart.set_quantity(&key, quantity);
            }
         }

         Command::Delete(n) => {
            if let Some(line) = cart.items().get(n.wrapping_sub(1)) {
               let key = line.key.clone();
               cart.remove(&key);
            }
         }

         Command::Unknown => println!("Commands: /inc<n>, /dec<n>, /del<n>, /clear, /order, /back"),
      }
   }
}

// Quantity after a minus press. Stops at one, removal belongs to the
// delete command
fn clamped_decrement(quantity: u32) -> u32 {
   quantity.saturating_sub(1).max(1)
}

fn view(cart: &Cart, rest: &crate::models::Restaurant, highlight: Option<&Highlight>) {
   println!("=== Cart ===");
   if cart.is_empty() {
      println!("Cart is empty");
      return;
   }

   for (i, line) in cart.items().iter().enumerate() {
      let mark = match highlight {
         Some(h) if h.active(&line.key) => "* ",
         _ => "",
      };
      println!(
         "{}. {}{} x{} | {}",
         i + 1, mark, line.name, line.quantity,
         pricing::format_price(line.line_total),
      );

      for (group, label) in &line.selected_options {
         println!("   {}: {}", group, label);
      }
      if !line.selected_extra_names.is_empty() {
         println!("   extras: {}", line.selected_extra_names.join(", "));
      }
      for sel in &line.selected_offer_groups {
         println!("   {}: {}", sel.group_name, sel.selected_item_name);
      }
   }

   let subtotal = cart.total_amount();
   let fee = pricing::delivery_fee(rest, subtotal);
   println!("Subtotal: {}", pricing::format_price(subtotal));
   println!("Delivery: {}", pricing::format_price(fee));
   println!("Total: {}", pricing::format_price(pricing::order_total(subtotal, fee)));
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn highlight_marks_only_its_line_and_expires() {
      let highlight = Highlight::new(String::from("p7||"));
      assert!(highlight.active("p7||"));
      assert!(!highlight.active("p8||"));

      std::thread::sleep(HIGHLIGHT_TTL + Duration::from_millis(50));
      assert!(!highlight.active("p7||"));
   }

   #[test]
   fn minus_never_drops_below_one() {
      assert_eq!(clamped_decrement(3), 2);
      assert_eq!(clamped_decrement(2), 1);
      assert_eq!(clamped_decrement(1), 1);
   }

   #[test]
   fn commands_parse_with_argument() {
      assert!(matches!(Command::parse("/inc2"), Command::Plus(2)));
      assert!(matches!(Command::parse("/dec1"), Command::Minus(1)));
      assert!(matches!(Command::parse("/del3"), Command::Delete(3)));
      assert!(matches!(Command::parse("/order"), Command::Checkout));
      assert!(matches!(Command::parse("/inc"), Command::Unknown));
   }
}
