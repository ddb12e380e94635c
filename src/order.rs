/* ===============================================================================
Food ordering storefront.
Checkout screen and order status. 23 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::str::FromStr;
use strum::EnumMessage;

use crate::alert::ConsoleNotify;
use crate::api::Api;
use crate::cart::Cart;
use crate::checkout::{Checkout, ContactForm, Outcome, State};
use crate::models::{OrderDetail, PaymentMethod, Timeslot};
use crate::pricing;
use crate::states::{read_line, to_flag, Context, Screen, ScreenResult};

// ============================================================================
// [Checkout screen]
// ============================================================================

enum Command {
   Edit(EditCmd),
   Payment,
   Terms,
   Submit,
   Exit, // back to the basket
   Unknown,
}

#[derive(Copy, Clone)]
enum EditCmd {
   Name,
   Phone,
   Email,
   Notes,
}

impl Command {
   fn parse(s: &str) -> Self {
      match s {
         "/name" => Self::Edit(EditCmd::Name),
         "/phone" => Self::Edit(EditCmd::Phone),
         "/email" => Self::Edit(EditCmd::Email),
         "/notes" => Self::Edit(EditCmd::Notes),
         "/pay" => Self::Payment,
         "/terms" => Self::Terms,
         "/submit" => Self::Submit,
         "/back" => Self::Exit,
         _ => Self::Unknown,
      }
   }
}

pub async fn checkout(ctx: &Context, location_id: i64, restaurant_id: i64) -> ScreenResult {
   let rest = ctx.api.restaurant(restaurant_id).await?;
   let cart = Cart::open(ctx.storage.clone());

   let mut flow: Checkout<Api, ConsoleNotify> = Checkout::open(
      ctx.api.clone(), ConsoleNotify, ctx.storage.clone(), cart, location_id, rest,
   );

   if let Err(err) = flow.refresh_delivery_time().await {
      log::warn!("order::checkout: {}", err);
      println!("Could not fetch the delivery time, it will be checked on submit");
   }

   loop {
      // A submission may have ended the flow on the previous pass
      match flow.state().clone() {
         State::Completed(Outcome::OrderPlaced { token }) => {
            println!("Order placed, tracking token {}", token);
            return Ok(Screen::OrderStatus { token });
         }

         State::Completed(Outcome::PaymentRedirect { url, token }) => {
            println!("Open the payment page to finish: {}", url);
            return Ok(Screen::OrderStatus { token });
         }

         State::TimeChanged { fresh } => {
            println!("The delivery time moved to {}", format_slot(&fresh));
            let ans = read_line("proceed with the new time? y/n> ").await?;
            match to_flag(&ans) {
               Ok(true) => flow.confirm_time_change().await,
               _ => flow.dismiss(),
            }
            continue;
         }

         State::StockConflict { shortages } => {
            println!("Not enough stock:");
            for shortage in &shortages {
               println!(
                  "  {} - requested {}, available {}",
                  shortage.product_name, shortage.requested, shortage.available,
               );
            }
            let ans = read_line("adjust the cart to what is available? y/n> ").await?;
            match to_flag(&ans) {
               Ok(true) => flow.resolve_stock_conflict(),
               _ => flow.dismiss(),
            }
            continue;
         }

         // Filling, or a transient in-flight state after an await
         _ => {}
      }

      view(&flow);

      let ans = read_line("checkout> ").await?;
      match Command::parse(&ans) {
         Command::Exit => return Ok(Screen::Basket { location_id, restaurant_id, highlight: None }),

         Command::Edit(cmd) => edit_field(&mut flow, cmd).await?,

         Command::Payment => {
            println!("Payment: CASH, CARD_ON_DELIVERY or ONLINE");
            let ans = read_line("payment> ").await?;
            match PaymentMethod::from_str(&ans.to_uppercase()) {
               Ok(method) => flow.edit_form(|form| form.payment_method = method),
               Err(_) => println!("Unknown payment method"),
            }
         }

         Command::Terms => {
            let accepted = !flow.form().accepted_terms;
            flow.edit_form(|form| form.accepted_terms = accepted);
         }

         Command::Submit => {
            if !flow.form().accepted_terms {
               // Mirrors the disabled submit button, do nothing loudly
               println!("Accept the terms first: /terms");
               continue;
            }
            if let Err(fields) = flow.submit().await {
               for field in fields {
                  println!("Check the {} field", field.as_ref());
               }
            }
         }

         Command::Unknown =>
            println!("Commands: /name, /phone, /email, /notes, /pay, /terms, /submit, /back"),
      }
   }
}

async fn edit_field(flow: &mut Checkout<Api, ConsoleNotify>, cmd: EditCmd) -> Result<(), String> {
   let value = read_line("value> ").await?;
   flow.edit_form(|form| match cmd {
      EditCmd::Name => form.name = value,
      EditCmd::Phone => form.phone = value,
      EditCmd::Email => form.email = value,
      EditCmd::Notes => form.notes = value,
   });
   Ok(())
}

fn view(flow: &Checkout<Api, ConsoleNotify>) {
   println!("=== Checkout ===");
   for line in flow.cart().items() {
      println!("{} x{} | {}", line.name, line.quantity, pricing::format_price(line.line_total));
   }
   println!("Subtotal: {}", pricing::format_price(flow.subtotal()));
   println!("Delivery: {}", pricing::format_price(flow.delivery_fee()));
   println!("Total: {}", pricing::format_price(flow.total()));

   match flow.displayed_timeslot() {
      Some(slot) => println!("Delivery time: {}", format_slot(slot)),
      None => println!("Delivery time: to be confirmed"),
   }

   view_form(flow.form());
}

fn view_form(form: &ContactForm) {
   let or_dash = |s: &str| if s.is_empty() { String::from("-") } else { s.to_string() };
   println!("Name: {}", or_dash(&form.name));
   println!("Phone: {}", or_dash(&form.phone));
   println!("Email: {}", or_dash(&form.email));
   println!("Notes: {}", or_dash(&form.notes));
   println!("Payment: {}", form.payment_method.get_message().unwrap_or_default());
   println!("Terms accepted: {}", crate::states::from_flag(form.accepted_terms));
}

fn format_slot(slot: &Timeslot) -> String {
   match &slot.end {
      Some(end) => format!("{} - {}", slot.start.format("%H:%M"), end.format("%H:%M")),
      None => slot.start.format("%H:%M").to_string(),
   }
}

// ============================================================================
// [Order status]
// ============================================================================

// Anonymous tracking by the token from order creation
pub async fn status(ctx: &Context, token: &str) -> ScreenResult {
   loop {
      match ctx.api.order_by_token(token).await {
         Ok(detail) => view_status(&detail),
         Err(err) => {
            log::warn!("order::status: {}", err);
            println!("Could not load the order, /reload to retry");
         }
      }

      let ans = read_line("order> ").await?;
      match ans.as_str() {
         "/reload" => continue,
         "/back" => return Ok(Screen::Locations),
         "/exit" => return Ok(Screen::Exit),
         _ => println!("Commands: /reload, /back, /exit"),
      }
   }
}

fn view_status(detail: &OrderDetail) {
   println!("=== Order {} ===", detail.token);
   println!("Status: {}", detail.status.get_message().unwrap_or_default());

   if let Some(created) = &detail.created_at {
      println!("Placed: {}", created.format("%d %b %H:%M"));
   }
   if let Some(time) = &detail.delivery_time {
      println!("Delivery at: {}", time.format("%H:%M"));
   }
   if let Some(customer) = &detail.customer {
      let phone = customer.phone.as_deref().unwrap_or("-");
      println!("For: {} ({})", customer.name, phone);
   }
   if let Some(place) = &detail.delivery_location {
      let address = place.address.as_deref().unwrap_or("-");
      println!("Deliver to: {} | {}", place.name, address);
   }
   if let Some(place) = &detail.restaurant {
      println!("From: {}", place.name);
   }
   if let Some(notes) = &detail.notes {
      println!("Notes: {}", notes);
   }

   for line in &detail.products {
      println!("{} x{} | {}", line.name, line.quantity, pricing::format_price(line.total));
   }
   for line in &detail.offers {
      println!("{} x{} | {}", line.name, line.quantity, pricing::format_price(line.total));
      for group in &line.groups {
         if let Some(item) = &group.selected_item {
            println!("   {}: {}", group.group_name, item.name);
         }
      }
   }

   println!("Subtotal: {}", pricing::format_price(detail.subtotal));
   if let Some(fee) = detail.delivery_fee {
      println!("Delivery: {}", pricing::format_price(fee));
   }
   println!("Total: {}", pricing::format_price(detail.total));

   if let Some(method) = &detail.payment_method {
      let status = detail.payment_status.as_deref().unwrap_or("-");
      println!("Payment: {} ({})", method, status);
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn commands_parse() {
      assert!(matches!(Command::parse("/name"), Command::Edit(EditCmd::Name)));
      assert!(matches!(Command::parse("/pay"), Command::Payment));
      assert!(matches!(Command::parse("/submit"), Command::Submit));
      assert!(matches!(Command::parse("/go"), Command::Unknown));
   }

   #[test]
   fn payment_methods_parse_from_wire_names() {
      assert_eq!(PaymentMethod::from_str("CASH"), Ok(PaymentMethod::Cash));
      assert_eq!(PaymentMethod::from_str("CARD_ON_DELIVERY"), Ok(PaymentMethod::CardOnDelivery));
      assert_eq!(PaymentMethod::from_str("ONLINE"), Ok(PaymentMethod::Online));
   }
}
