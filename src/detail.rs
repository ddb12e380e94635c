/* ===============================================================================
Food ordering storefront.
Product and offer configuration. 21 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::collections::BTreeMap;

use crate::basket::Highlight;
use crate::cart::{Cart, LineDraft, OfferSelection};
use crate::models::{DeliveryLocation, MenuProduct, Offer};
use crate::pricing;
use crate::states::{read_line, Context, Screen, ScreenResult};

// A location may be disabled between its pick and an add, refuse to
// configure a line for it
fn location_accepts_orders(all: &[DeliveryLocation], location_id: i64) -> bool {
   all.iter().any(|location| location.id == location_id && location.is_active)
}

// ============================================================================
// [Product]
// ============================================================================

pub async fn product(ctx: &Context, location_id: i64, restaurant_id: i64, product_id: i64) -> ScreenResult {
   let back = Screen::Store { location_id, restaurant_id };

   let all = ctx.api.delivery_locations().await?;
   if !location_accepts_orders(&all, location_id) {
      println!("Location is not accepting orders right now");
      return Ok(Screen::Locations);
   }

   let rest = ctx.api.restaurant(restaurant_id).await?;
   let product = rest.sections.iter()
   .flat_map(|section| section.products.iter())
   .find(|product| product.id == product_id);

   let product = match product {
      Some(product) if product.orderable() => product,
      Some(_) => {
         println!("{} is not available right now", product_id);
         return Ok(back);
      }
      None => {
         println!("No product {}", product_id);
         return Ok(back);
      }
   };

   view_product(product);

   // Single-select groups first, the extras multi-select after
   let mut options = BTreeMap::new();
   let mut price = product.effective_price();

   for group in product.single_select_groups() {
      match pick_single(group).await? {
         Some(choice_idx) => {
            let choice = &group.choices[choice_idx];
            options.insert(group.id.clone(), choice.label.clone());
            price += choice.price_delta;
         }
         None => continue, // optional group skipped
      }
   }

   let mut extra_ids = vec![];
   let mut extra_names = vec![];
   if let Some(extras) = product.extras_group() {
      for choice_idx in pick_extras(extras).await? {
         let choice = &extras.choices[choice_idx];
         match choice.extra_id() {
            Some(id) => {
               extra_ids.push(id);
               extra_names.push(choice.label.clone());
               price += choice.price_delta;
            }
            None => log::warn!("detail::product: extras choice '{}' has no numeric id", choice.id),
         }
      }
   }

   let quantity = match pick_quantity(product.stock_quantity).await? {
      Some(quantity) => quantity,
      None => return Ok(back),
   };

   let draft = LineDraft::Product {
      product_id: product.id,
      name: product.name.clone(),
      unit_price: price,
      quantity,
      options,
      extra_ids,
      extra_names,
   };

   let mut cart = Cart::open(ctx.storage.clone());
   let key = cart.add_or_merge(draft);
   println!("Added, {} pcs. for {}", cart.total_count(), pricing::format_price(cart.total_amount()));

   Ok(Screen::Basket { location_id, restaurant_id, highlight: Some(Highlight::new(key)) })
}

fn view_product(product: &MenuProduct) {
   println!("=== {} | {} ===", product.name, pricing::format_price(product.effective_price()));
   if let Some(description) = &product.description {
      println!("{}", description);
   }
   if let Some(stock) = product.stock_quantity {
      println!("In stock: {}", stock);
   }
}

// One choice out of a single-select group, None when an optional group
// is skipped with an empty answer
async fn pick_single(group: &crate::models::OptionGroup) -> Result<Option<usize>, String> {
   loop {
      println!("--- {}{} ---", group.title, if group.required { " (required)" } else { "" });
      for (i, choice) in group.choices.iter().enumerate() {
         let delta = if choice.price_delta.is_zero() {
            String::new()
         } else {
            format!(" +{}", pricing::format_price(choice.price_delta))
         };
         println!("{}. {}{}", i + 1, choice.label, delta);
      }

      let ans = read_line("choice> ").await?;
      if ans.is_empty() {
         if group.required {
            println!("A choice is required");
            continue;
         }
         return Ok(None);
      }

      match ans.parse::<usize>() {
         Ok(n) if n >= 1 && n <= group.choices.len() => return Ok(Some(n - 1)),
         _ => println!("Expected a number 1..{}", group.choices.len()),
      }
   }
}

// Comma-separated picks from the extras group, duplicates collapse
async fn pick_extras(group: &crate::models::OptionGroup) -> Result<Vec<usize>, String> {
   loop {
      println!("--- {} (comma-separated, empty for none) ---", group.title);
      for (i, choice) in group.choices.iter().enumerate() {
         println!("{}. {} +{}", i + 1, choice.label, pricing::format_price(choice.price_delta));
      }

      let ans = read_line("extras> ").await?;
      if ans.is_empty() {
         return Ok(vec![]);
      }

      let mut picks = vec![];
      let mut valid = true;
      for part in ans.split(',') {
         match part.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= group.choices.len() => {
               if !picks.contains(&(n - 1)) {
                  picks.push(n - 1);
               }
            }
            _ => {
               println!("Expected numbers 1..{}", group.choices.len());
               valid = false;
               break;
            }
         }
      }
      if valid {
         return Ok(picks);
      }
   }
}

// None means the user backed out with an empty answer. The quantity is
// capped at the known stock, the backend is still the authority at
// order time
async fn pick_quantity(stock: Option<i64>) -> Result<Option<u32>, String> {
   loop {
      let ans = read_line("quantity (empty to cancel)> ").await?;
      if ans.is_empty() {
         return Ok(None);
      }

      match ans.parse::<u32>() {
         Ok(0) => println!("At least one"),
         Ok(quantity) => {
            if let Some(stock) = stock {
               if i64::from(quantity) > stock {
                  let capped = u32::try_from(stock.max(0)).unwrap_or(0);
                  if capped == 0 {
                     println!("Out of stock");
                     return Ok(None);
                  }
                  println!("Only {} in stock, taking {}", stock, capped);
                  return Ok(Some(capped));
               }
            }
            return Ok(Some(quantity));
         }
         Err(_) => println!("Expected a number"),
      }
   }
}

// ============================================================================
// [Offer]
// ============================================================================

pub async fn offer(ctx: &Context, location_id: i64, restaurant_id: i64, offer_id: i64) -> ScreenResult {
   let back = Screen::Store { location_id, restaurant_id };

   let all = ctx.api.delivery_locations().await?;
   if !location_accepts_orders(&all, location_id) {
      println!("Location is not accepting orders right now");
      return Ok(Screen::Locations);
   }

   let rest = ctx.api.restaurant(restaurant_id).await?;
   let offer = match rest.offers.iter().find(|offer| offer.id == offer_id) {
      Some(offer) => offer,
      None => {
         println!("No offer {}", offer_id);
         return Ok(back);
      }
   };

   view_offer(offer);

   // One pick per bundle group, a group with min_items 0 may be skipped.
   // Picks add nothing to the flat bundle price
   let mut selected_groups = vec![];
   for group in &offer.groups {
      let required = group.min_items > 0;
      loop {
         println!("--- {}{} ---", group.name, if required { " (required)" } else { "" });
         for (i, item) in group.offer_group_products.iter().enumerate() {
            println!("{}. {}", i + 1, item.product.name);
         }

         let ans = read_line("choice> ").await?;
         if ans.is_empty() {
            if required {
               println!("A choice is required");
               continue;
            }
            break;
         }

         match ans.parse::<usize>() {
            Ok(n) if n >= 1 && n <= group.offer_group_products.len() => {
               let item = &group.offer_group_products[n - 1];
               selected_groups.push(OfferSelection {
                  group_id: group.id,
                  group_name: group.name.clone(),
                  selected_item_id: item.id,
                  selected_item_name: item.product.name.clone(),
               });
               break;
            }
            _ => println!("Expected a number 1..{}", group.offer_group_products.len()),
         }
      }
   }

   let quantity = match pick_quantity(None).await? {
      Some(quantity) => quantity,
      None => return Ok(back),
   };

   let draft = LineDraft::Offer {
      offer_id: offer.id,
      name: offer.name.clone(),
      unit_price: offer.price,
      quantity,
      selected_groups,
   };

   let mut cart = Cart::open(ctx.storage.clone());
   let key = cart.add_or_merge(draft);
   println!("Added, {} pcs. for {}", cart.total_count(), pricing::format_price(cart.total_amount()));

   Ok(Screen::Basket { location_id, restaurant_id, highlight: Some(Highlight::new(key)) })
}

fn view_offer(offer: &Offer) {
   println!("=== {} [offer] | {} ===", offer.name, pricing::format_price(offer.price));
   if let Some(description) = &offer.description {
      println!("{}", description);
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::models::{OptionChoice, OptionGroup};
   use rust_decimal::Decimal;

   #[test]
   fn inactive_or_unknown_location_blocks_adding() {
      let all = vec![
         DeliveryLocation {
            id: 2,
            name: String::from("Campus"),
            address: None,
            is_active: false,
            delivered_by: vec![],
         },
         DeliveryLocation {
            id: 3,
            name: String::from("Station"),
            address: None,
            is_active: true,
            delivered_by: vec![],
         },
      ];

      assert!(!location_accepts_orders(&all, 2));
      assert!(location_accepts_orders(&all, 3));
      assert!(!location_accepts_orders(&all, 99));
   }

   #[test]
   fn extras_deltas_fold_into_unit_price() {
      let group = OptionGroup {
         id: String::from("extras"),
         title: String::from("Extras"),
         required: false,
         choices: vec![
            OptionChoice {
               id: String::from("extra_3"),
               label: String::from("Cheese"),
               price_delta: Decimal::new(50, 2),
            },
            OptionChoice {
               id: String::from("extra_7"),
               label: String::from("Ham"),
               price_delta: Decimal::new(100, 2),
            },
         ],
      };

      let total: Decimal = group.choices.iter().map(|c| c.price_delta).sum();
      assert_eq!(total, Decimal::new(150, 2));
      assert_eq!(group.choices[0].extra_id(), Some(3));
      assert_eq!(group.choices[1].extra_id(), Some(7));
   }
}
