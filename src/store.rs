/* ===============================================================================
Food ordering storefront.
Restaurant menu screen. 21 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use chrono::{Datelike, Utc};

use crate::cart::Cart;
use crate::models::Restaurant;
use crate::pricing;
use crate::states::{read_line, Context, Screen, ScreenResult};

enum Command {
   Product(i64),
   Offer(i64),
   Basket,
   Return, // back to locations
   Reload,
   Exit,
   Unknown,
}

impl Command {
   fn parse(s: &str) -> Self {
      match s {
         "/basket" => Self::Basket,
         "/back" => Self::Return,
         "/reload" => Self::Reload,
         "/exit" => Self::Exit,
         _ => {
            if let Some(id) = s.strip_prefix("/pro").and_then(|r| r.parse().ok()) {
               Self::Product(id)
            } else if let Some(id) = s.strip_prefix("/off").and_then(|r| r.parse().ok()) {
               Self::Offer(id)
            } else {
               Self::Unknown
            }
         }
      }
   }
}

pub async fn enter(ctx: &Context, location_id: i64, restaurant_id: i64) -> ScreenResult {
   loop {
      let rest = ctx.api.restaurant(restaurant_id).await?;
      let cart = Cart::open(ctx.storage.clone());
      view(&rest, &cart);

      let ans = read_line("store> ").await?;
      match Command::parse(&ans) {
         Command::Exit => return Ok(Screen::Exit),
         Command::Return => return Ok(Screen::Locations),
         Command::Reload => continue,

         Command::Basket => {
            return Ok(Screen::Basket { location_id, restaurant_id, highlight: None });
         }

         Command::Product(id) => {
            let known = rest.sections.iter()
            .flat_map(|section| section.products.iter())
            .any(|product| product.id == id);

            if known {
               return Ok(Screen::ProductDetail { location_id, restaurant_id, product_id: id });
            }
            println!("No product {}", id);
         }

         Command::Offer(id) => {
            if rest.offers.iter().any(|offer| offer.id == id) {
               return Ok(Screen::OfferDetail { location_id, restaurant_id, offer_id: id });
            }
            println!("No offer {}", id);
         }

         Command::Unknown => println!("Commands: /pro<id>, /off<id>, /basket, /back, /exit"),
      }
   }
}

fn view(rest: &Restaurant, cart: &Cart) {
   let mark = if rest.is_open { "" } else { " (closed now)" };
   println!("=== {}{} ===", rest.name, mark);

   let today = Utc::now().weekday().num_days_from_sunday() as u8;
   if let Some(hours) = rest.opening_hours.iter().find(|h| h.day_of_week == today) {
      println!("Open today {} - {}", hours.open.format("%H:%M"), hours.close.format("%H:%M"));
   }

   for offer in &rest.offers {
      println!("/off{} [offer] {} | {}", offer.id, offer.name, pricing::format_price(offer.price));
   }

   for section in &rest.sections {
      println!("--- {} ---", section.name);
      for product in section.products.iter() {
         if !product.orderable() {
            continue;
         }
         // Struck-through base price when a discount applies
         let price = match product.price_after_discount {
            Some(discounted) => format!(
               "{} (was {})",
               pricing::format_price(discounted),
               pricing::format_price(product.price),
            ),
            None => pricing::format_price(product.price),
         };
         println!("/pro{} {} | {}", product.id, product.name, price);
      }
   }

   if !cart.is_empty() {
      println!(
         "[cart: {} pcs. for {}] /basket to review",
         cart.total_count(),
         pricing::format_price(cart.total_amount()),
      );
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn commands_parse_with_argument() {
      assert!(matches!(Command::parse("/pro7"), Command::Product(7)));
      assert!(matches!(Command::parse("/off12"), Command::Offer(12)));
      assert!(matches!(Command::parse("/basket"), Command::Basket));
      assert!(matches!(Command::parse("/proX"), Command::Unknown));
   }
}
