/* ===============================================================================
Food ordering storefront.
Dialogue FSM. 20 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::io::Write;

use crate::alert::ConsoleNotify;
use crate::api::Api;
use crate::storage::Storage;
use crate::{basket, detail, locations, order, store};

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
pub type ScreenResult = Result<Screen, Box<dyn std::error::Error + Send + Sync>>;

// Shared dependencies of every screen
pub struct Context {
   pub api: Api,
   pub storage: Storage,
   pub notify: ConsoleNotify,
}

// FSM screens. Each screen's enter() runs its own command loop and
// returns the screen to go to next
pub enum Screen {
   // Initial screen, pick a delivery location and a restaurant
   Locations,
   Store { location_id: i64, restaurant_id: i64 },
   ProductDetail { location_id: i64, restaurant_id: i64, product_id: i64 },
   OfferDetail { location_id: i64, restaurant_id: i64, offer_id: i64 },
   // highlight marks the just-added line
   Basket { location_id: i64, restaurant_id: i64, highlight: Option<basket::Highlight> },
   Checkout { location_id: i64, restaurant_id: i64 },
   OrderStatus { token: String },
   Exit,
}

pub async fn dialogue_loop(ctx: &Context) -> HandlerResult {
   let mut screen = Screen::Locations;
   loop {
      screen = match screen {
         Screen::Locations => locations::enter(ctx).await?,

         Screen::Store { location_id, restaurant_id } =>
            store::enter(ctx, location_id, restaurant_id).await?,

         Screen::ProductDetail { location_id, restaurant_id, product_id } =>
            detail::product(ctx, location_id, restaurant_id, product_id).await?,

         Screen::OfferDetail { location_id, restaurant_id, offer_id } =>
            detail::offer(ctx, location_id, restaurant_id, offer_id).await?,

         Screen::Basket { location_id, restaurant_id, highlight } =>
            basket::enter(ctx, location_id, restaurant_id, highlight).await?,

         Screen::Checkout { location_id, restaurant_id } =>
            order::checkout(ctx, location_id, restaurant_id).await?,

         Screen::OrderStatus { token } => order::status(ctx, &token).await?,

         Screen::Exit => break,
      };
   }
   Ok(())
}

// Prompt and read one trimmed line. Blocking terminal read goes to the
// blocking pool, not the async runtime
pub async fn read_line(prompt: &str) -> Result<String, String> {
   print!("{}", prompt);
   std::io::stdout().flush()
   .map_err(|err| format!("states::read_line flush: {}", err))?;

   tokio::task::spawn_blocking(|| {
      let mut line = String::new();
      std::io::stdin().read_line(&mut line)
      .map(|_| line.trim().to_string())
      .map_err(|err| format!("states::read_line: {}", err))
   })
   .await
   .map_err(|err| format!("states::read_line join: {}", err))?
}

// Convert for flag value
pub fn to_flag(text: &str) -> Result<bool, String> {
   match text {
      "y" | "yes" => Ok(true),
      "n" | "no" => Ok(false),
      _ => Err(format!("Expected y or n, got {}", text)),
   }
}

pub fn from_flag(flag: bool) -> String {
   if flag { String::from("yes") }
   else { String::from("no") }
}
