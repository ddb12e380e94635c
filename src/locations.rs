/* ===============================================================================
Food ordering storefront.
Delivery location and restaurant pick. 20 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use crate::models::DeliveryLocation;
use crate::pricing;
use crate::states::{read_line, Context, Screen, ScreenResult};

enum Command {
   Select(i64),
   Reload,
   Exit,
   Unknown,
}

impl Command {
   fn parse(s: &str) -> Self {
      match s {
         "/reload" => Self::Reload,
         "/exit" => Self::Exit,
         _ => match s.strip_prefix("/sel").and_then(|r| r.parse().ok()) {
            Some(id) => Self::Select(id),
            None => Self::Unknown,
         }
      }
   }
}

// Landing screen: pick where to deliver, then which restaurant cooks
pub async fn enter(ctx: &Context) -> ScreenResult {
   loop {
      let all = ctx.api.delivery_locations().await?;
      view(&all);

      let ans = read_line("locations> ").await?;
      match Command::parse(&ans) {
         Command::Exit => return Ok(Screen::Exit),
         Command::Reload => continue,

         Command::Select(id) => {
            match all.iter().find(|location| location.id == id) {
               Some(location) if location.is_active => {
                  if let Some(next) = pick_restaurant(location).await? {
                     return Ok(next);
                  }
               }
               Some(_) => println!("Location is not accepting orders right now"),
               None => println!("No location {}", id),
            }
         }

         Command::Unknown => println!("Commands: /sel<id>, /reload, /exit"),
      }
   }
}

fn view(all: &[DeliveryLocation]) {
   println!("=== Delivery locations ===");
   for location in all {
      let mark = if location.is_active { "" } else { " (unavailable)" };
      let address = location.address.as_deref().unwrap_or("-");
      println!("/sel{} {}{} | {}", location.id, location.name, mark, address);
   }
}

// Second step of the pick. None means back to the locations list
async fn pick_restaurant(location: &DeliveryLocation) -> Result<Option<Screen>, Box<dyn std::error::Error + Send + Sync>> {
   if location.delivered_by.is_empty() {
      println!("No restaurants deliver to {}", location.name);
      return Ok(None);
   }

   loop {
      println!("=== Restaurants for {} ===", location.name);
      for rest in &location.delivered_by {
         let mark = if rest.is_open { "" } else { " (closed)" };
         println!(
            "/sel{} {}{} | delivery {}, free over {}",
            rest.id, rest.name, mark,
            pricing::format_price(rest.delivery_fee),
            pricing::format_price(rest.min_order),
         );
      }

      let ans = read_line("restaurants> ").await?;
      match Command::parse(&ans) {
         Command::Exit => return Ok(None),
         Command::Reload => continue,

         Command::Select(id) => {
            match location.delivered_by.iter().find(|rest| rest.id == id) {
               Some(rest) => {
                  return Ok(Some(Screen::Store {
                     location_id: location.id,
                     restaurant_id: rest.id,
                  }));
               }
               None => println!("No restaurant {}", id),
            }
         }

         Command::Unknown => println!("Commands: /sel<id>, /reload, /exit"),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn commands_parse_with_argument() {
      assert!(matches!(Command::parse("/sel12"), Command::Select(12)));
      assert!(matches!(Command::parse("/reload"), Command::Reload));
      assert!(matches!(Command::parse("/exit"), Command::Exit));
      assert!(matches!(Command::parse("/sel"), Command::Unknown));
      assert!(matches!(Command::parse("garbage"), Command::Unknown));
   }
}
