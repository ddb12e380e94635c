/* ===============================================================================
Food ordering storefront.
Checkout flow orchestration. 19 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use strum::AsRefStr;

use crate::alert::{Kind, Notify};
use crate::api::{Backend, OrderError, OrderPayload, PayloadCustomer, PayloadOffer, PayloadProduct};
use crate::cart::Cart;
use crate::models::{InsufficientStock, PaymentMethod, Restaurant, Timeslot};
use crate::pricing;
use crate::storage::{Storage, CHECKOUT_KEY};

lazy_static! {
   static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").unwrap();
}

// ============================================================================
// [Contact form]
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, AsRefStr)]
pub enum Field {
   #[strum(serialize = "name")]
   Name,
   #[strum(serialize = "phone")]
   Phone,
   #[strum(serialize = "email")]
   Email,
}

// Checkout draft, persisted on every edit so an interrupted checkout
// resumes where it stopped
#[derive(Clone, Debug, SmartDefault, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
   #[serde(default)]
   pub name: String,
   #[serde(default)]
   pub phone: String,
   #[serde(default)]
   pub email: String,
   #[serde(default)]
   pub notes: String,
   #[default(PaymentMethod::Cash)]
   #[serde(default = "ContactForm::default_payment")]
   pub payment_method: PaymentMethod,
   // Terms acceptance is deliberately not persisted, it must be given
   // anew on every visit
   #[serde(skip)]
   pub accepted_terms: bool,
}

impl ContactForm {
   fn default_payment() -> PaymentMethod {
      PaymentMethod::Cash
   }

   // Empty list means the form is submittable. All three contact
   // fields are required, the email must have a local@domain.tld shape
   pub fn invalid_fields(&self) -> Vec<Field> {
      let mut fields = vec![];
      if self.name.trim().is_empty() {
         fields.push(Field::Name);
      }
      if self.phone.trim().is_empty() {
         fields.push(Field::Phone);
      }
      if !EMAIL_RE.is_match(self.email.trim()) {
         fields.push(Field::Email);
      }
      fields
   }
}

// ============================================================================
// [States and outcomes]
// ============================================================================

#[derive(Clone, Debug, PartialEq, SmartDefault)]
pub enum State {
   // Form editable, nothing in flight
   #[default]
   Filling,
   // Submission started, re-checking the delivery slot
   VerifyingDeliveryTime,
   // The slot moved since it was shown, waiting for the user to accept
   TimeChanged { fresh: Timeslot },
   // Order request in flight
   Submitting,
   // Order rejected for stock, waiting for the user to adjust the cart
   StockConflict { shortages: Vec<InsufficientStock> },
   Completed(Outcome),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
   OrderPlaced { token: String },
   // Online payment: local state is already cleaned up, the caller only
   // has to open the URL
   PaymentRedirect { url: String, token: String },
}

// ============================================================================
// [Orchestrator]
// ============================================================================

// Drives a single checkout attempt over the backend seam. Owns the cart
// for the duration of the flow, every failure path returns to Filling
// with the cart intact
pub struct Checkout<B: Backend, N: Notify> {
   backend: B,
   notify: N,
   storage: Option<Storage>,
   cart: Cart,
   location_id: i64,
   restaurant: Restaurant,
   // Slot shown to the user when the screen opened, the freshness baseline
   displayed_timeslot: Option<Timeslot>,
   form: ContactForm,
   state: State,
}

impl<B: Backend, N: Notify> Checkout<B, N> {
   pub fn new(backend: B, notify: N, cart: Cart, location_id: i64, restaurant: Restaurant) -> Self {
      Self {
         backend,
         notify,
         storage: None,
         cart,
         location_id,
         restaurant,
         displayed_timeslot: None,
         form: ContactForm::default(),
         state: State::default(),
      }
   }

   // Same, with the draft restored from storage
   pub fn open(backend: B, notify: N, storage: Storage, cart: Cart, location_id: i64, restaurant: Restaurant) -> Self {
      let form = storage.load(CHECKOUT_KEY).unwrap_or_default();
      Self {
         storage: Some(storage),
         form,
         ..Self::new(backend, notify, cart, location_id, restaurant)
      }
   }

   pub fn state(&self) -> &State {
      &self.state
   }

   pub fn form(&self) -> &ContactForm {
      &self.form
   }

   pub fn cart(&self) -> &Cart {
      &self.cart
   }

   pub fn displayed_timeslot(&self) -> Option<&Timeslot> {
      self.displayed_timeslot.as_ref()
   }

   pub fn subtotal(&self) -> Decimal {
      self.cart.total_amount()
   }

   pub fn delivery_fee(&self) -> Decimal {
      pricing::delivery_fee(&self.restaurant, self.subtotal())
   }

   pub fn total(&self) -> Decimal {
      pricing::order_total(self.subtotal(), self.delivery_fee())
   }

   // ========================================================================
   // [Form edits]
   // ========================================================================

   pub fn edit_form(&mut self, edit: impl FnOnce(&mut ContactForm)) {
      edit(&mut self.form);
      self.persist_form();
   }

   fn persist_form(&self) {
      if let Some(storage) = &self.storage {
         if let Err(err) = storage.save(CHECKOUT_KEY, &self.form) {
            log::warn!("checkout::persist_form: {}", err);
         }
      }
   }

   // Fetch the slot to show on screen entry. Unavailability here is
   // informational, submission re-checks anyway
   pub async fn refresh_delivery_time(&mut self) -> Result<(), String> {
      let reply = self.backend.delivery_time(self.location_id, self.restaurant.id).await?;
      if let Some(reason) = reply.error {
         self.notify.notify(Kind::Warning, "Delivery unavailable", &reason);
      }
      self.displayed_timeslot = reply.timeslot;
      Ok(())
   }

   // ========================================================================
   // [Submission]
   // ========================================================================

   // Main entry. Silent no-op while terms are unaccepted or a request is
   // already in flight, Err carries the fields the user must fix
   pub async fn submit(&mut self) -> Result<(), Vec<Field>> {
      if !self.form.accepted_terms || self.state != State::Filling {
         return Ok(());
      }
      if self.cart.is_empty() {
         self.notify.notify(Kind::Warning, "Cart is empty", "");
         return Ok(());
      }

      let invalid = self.form.invalid_fields();
      if !invalid.is_empty() {
         return Err(invalid);
      }

      // Step 1. The slot on screen may be minutes old, re-verify it
      self.state = State::VerifyingDeliveryTime;
      let reply = match self.backend.delivery_time(self.location_id, self.restaurant.id).await {
         Ok(reply) => reply,
         Err(err) => {
            log::error!("checkout::submit: {}", err);
            self.notify.notify(Kind::Error, "Could not verify delivery time", "please try again");
            self.state = State::Filling;
            return Ok(());
         }
      };

      if let Some(reason) = reply.error {
         self.notify.notify(Kind::Warning, "Delivery unavailable", &reason);
         self.state = State::Filling;
         return Ok(());
      }

      let fresh = match reply.timeslot {
         Some(slot) => slot,
         None => {
            self.notify.notify(Kind::Warning, "Delivery unavailable", "no delivery slot");
            self.state = State::Filling;
            return Ok(());
         }
      };

      // Step 2. A moved slot needs explicit consent before the order goes
      // out. No baseline means the user never saw a slot at all, that
      // counts as moved too
      let moved = match self.displayed_timeslot.as_ref() {
         Some(shown) => !shown.same_window(&fresh),
         None => true,
      };

      if moved {
         self.state = State::TimeChanged { fresh };
         return Ok(());
      }

      self.displayed_timeslot = Some(fresh);
      self.do_submit().await;
      Ok(())
   }

   // The user accepted the moved slot, proceed with it
   pub async fn confirm_time_change(&mut self) {
      if let State::TimeChanged { fresh } = self.state.clone() {
         self.displayed_timeslot = Some(fresh);
         self.do_submit().await;
      }
   }

   // Back out of the time-changed or stock-conflict prompt
   pub fn dismiss(&mut self) {
      if matches!(self.state, State::TimeChanged { .. } | State::StockConflict { .. }) {
         self.state = State::Filling;
      }
   }

   // The user accepted the proposed truncation: cap each short product at
   // the available quantity and return to the editable form
   pub fn resolve_stock_conflict(&mut self) {
      if let State::StockConflict { shortages } = self.state.clone() {
         self.cart.truncate_to_stock(&shortages);
         if self.cart.is_empty() {
            self.notify.notify(Kind::Warning, "Cart is empty", "the items are out of stock");
         }
         self.state = State::Filling;
      }
   }

   async fn do_submit(&mut self) {
      self.state = State::Submitting;

      // The payment amount comes from the cart, capture it while the
      // cart still has its lines
      let total = self.total();
      let payload = self.build_payload();

      match self.backend.create_order(&payload).await {
         Ok(created) => {
            // Online payment opens a hosted session for the captured total
            let payment_url = if self.form.payment_method == PaymentMethod::Online {
               match self.backend.payment_checkout(pricing::minor_units(total)).await {
                  Ok(url) => Some(url),
                  Err(err) => {
                     // The order exists, only the payment session failed
                     log::error!("checkout::do_submit: {}", err);
                     self.notify.notify(Kind::Error, "Could not open the payment page", "the order was placed");
                     None
                  }
               }
            } else {
               None
            };

            // Local cleanup strictly before any redirect
            self.cart.clear();
            if let Some(storage) = &self.storage {
               storage.clear(CHECKOUT_KEY);
            }

            let outcome = match payment_url {
               Some(url) => Outcome::PaymentRedirect { url, token: created.token },
               None => Outcome::OrderPlaced { token: created.token },
            };
            self.state = State::Completed(outcome);
         }

         Err(OrderError::StockConflict(body)) => {
            let message = body.message.unwrap_or_else(|| String::from("some items are no longer available"));
            self.notify.notify(Kind::Warning, "Insufficient stock", &message);
            self.state = State::StockConflict { shortages: body.products };
         }

         Err(OrderError::Other(err)) => {
            log::error!("checkout::do_submit: {}", err);
            self.notify.notify(Kind::Error, "Order failed", "please try again");
            self.state = State::Filling;
         }
      }
   }

   fn build_payload(&self) -> OrderPayload {
      let mut products = vec![];
      let mut offers = vec![];

      for line in self.cart.items() {
         if line.is_offer {
            // Drop malformed group picks instead of sending them, a
            // stale persisted cart may carry zeroed ids
            let selected_groups: Vec<_> = line.selected_offer_groups.iter()
            .filter(|sel| sel.group_id > 0 && sel.selected_item_id > 0)
            .cloned()
            .collect();

            offers.push(PayloadOffer {
               offer_id: line.source_id,
               quantity: line.quantity,
               selected_groups,
            });
         } else {
            products.push(PayloadProduct {
               product_id: line.source_id,
               quantity: line.quantity,
               extra_ids: line.selected_extra_ids.clone(),
            });
         }
      }

      OrderPayload {
         restaurant_id: self.restaurant.id,
         delivery_location_id: self.location_id,
         payment_method: self.form.payment_method.as_ref().to_string(),
         // Payment settles later for every method
         payment_status: String::from("PENDING"),
         customer: PayloadCustomer {
            name: self.form.name.trim().to_string(),
            phone: self.form.phone.trim().to_string(),
            email: self.form.email.trim().to_string(),
         },
         notes: self.form.notes.trim().to_string(),
         products,
         offers,
      }
   }
}

// ============================================================================
// [Tests]
// ============================================================================

#[cfg(test)]
mod tests {
   use super::*;
   use crate::api::{OrderCreated, StockConflictBody};
   use crate::cart::{LineDraft, OfferSelection};
   use crate::models::DeliveryTimeReply;
   use chrono::{TimeZone, Utc};
   use std::cell::RefCell;
   use std::collections::{BTreeMap, VecDeque};
   use std::rc::Rc;

   struct MockBackend {
      time_replies: RefCell<VecDeque<Result<DeliveryTimeReply, String>>>,
      order_replies: RefCell<VecDeque<Result<OrderCreated, OrderError>>>,
      payment_replies: RefCell<VecDeque<Result<String, String>>>,
      sent_payloads: Rc<RefCell<Vec<OrderPayload>>>,
      payment_amounts: Rc<RefCell<Vec<i64>>>,
   }

   impl MockBackend {
      fn new() -> Self {
         Self {
            time_replies: RefCell::new(VecDeque::new()),
            order_replies: RefCell::new(VecDeque::new()),
            payment_replies: RefCell::new(VecDeque::new()),
            sent_payloads: Rc::new(RefCell::new(vec![])),
            payment_amounts: Rc::new(RefCell::new(vec![])),
         }
      }

      fn push_time(self, reply: Result<DeliveryTimeReply, String>) -> Self {
         self.time_replies.borrow_mut().push_back(reply);
         self
      }

      fn push_order(self, reply: Result<OrderCreated, OrderError>) -> Self {
         self.order_replies.borrow_mut().push_back(reply);
         self
      }

      fn push_payment(self, reply: Result<String, String>) -> Self {
         self.payment_replies.borrow_mut().push_back(reply);
         self
      }
   }

   impl Backend for MockBackend {
      async fn delivery_time(&self, _location_id: i64, _restaurant_id: i64) -> Result<DeliveryTimeReply, String> {
         self.time_replies.borrow_mut().pop_front()
         .unwrap_or_else(|| Err(String::from("mock: no scripted delivery_time reply")))
      }

      async fn create_order(&self, payload: &OrderPayload) -> Result<OrderCreated, OrderError> {
         self.sent_payloads.borrow_mut().push(payload.clone());
         self.order_replies.borrow_mut().pop_front()
         .unwrap_or_else(|| Err(OrderError::from(String::from("mock: no scripted create_order reply"))))
      }

      async fn payment_checkout(&self, amount: i64) -> Result<String, String> {
         self.payment_amounts.borrow_mut().push(amount);
         self.payment_replies.borrow_mut().pop_front()
         .unwrap_or_else(|| Err(String::from("mock: no scripted payment_checkout reply")))
      }
   }

   #[derive(Clone, Default)]
   struct RecordingNotify {
      alerts: Rc<RefCell<Vec<(Kind, String)>>>,
   }

   impl Notify for RecordingNotify {
      fn notify(&self, kind: Kind, title: &str, _body: &str) {
         self.alerts.borrow_mut().push((kind, title.to_string()));
      }
   }

   fn slot(hour: u32) -> Timeslot {
      Timeslot {
         start: Utc.with_ymd_and_hms(2024, 2, 19, hour, 0, 0).unwrap(),
         end: Some(Utc.with_ymd_and_hms(2024, 2, 19, hour, 30, 0).unwrap()),
         timezone: None,
      }
   }

   fn time_ok(hour: u32) -> Result<DeliveryTimeReply, String> {
      Ok(DeliveryTimeReply { timeslot: Some(slot(hour)), error: None })
   }

   fn restaurant() -> Restaurant {
      Restaurant {
         id: 5,
         name: String::from("Trattoria"),
         is_open: true,
         delivery_fee: Decimal::new(200, 2),
         min_order: Decimal::new(2000, 2),
         opening_hours: vec![],
         sections: vec![],
         offers: vec![],
      }
   }

   fn cart_with_product(product_id: i64, quantity: u32, cents: i64) -> Cart {
      let mut cart = Cart::new();
      cart.add_or_merge(LineDraft::Product {
         product_id,
         name: format!("Product {}", product_id),
         unit_price: Decimal::new(cents, 2),
         quantity,
         options: BTreeMap::new(),
         extra_ids: vec![],
         extra_names: vec![],
      });
      cart
   }

   fn ready_checkout(backend: MockBackend, cart: Cart) -> Checkout<MockBackend, RecordingNotify> {
      let mut checkout = Checkout::new(backend, RecordingNotify::default(), cart, 2, restaurant());
      checkout.edit_form(|form| {
         form.name = String::from("Mario");
         form.phone = String::from("+39 333 1234567");
         form.email = String::from("mario@example.com");
         form.accepted_terms = true;
      });
      checkout.displayed_timeslot = Some(slot(18));
      checkout
   }

   #[tokio::test]
   async fn submit_without_terms_is_a_silent_noop() {
      let backend = MockBackend::new();
      let mut checkout = ready_checkout(backend, cart_with_product(7, 1, 450));
      checkout.edit_form(|form| form.accepted_terms = false);

      assert!(checkout.submit().await.is_ok());
      assert_eq!(*checkout.state(), State::Filling);
   }

   #[tokio::test]
   async fn invalid_fields_block_submission() {
      let backend = MockBackend::new();
      let mut checkout = ready_checkout(backend, cart_with_product(7, 1, 450));
      checkout.edit_form(|form| {
         form.phone = String::new();
         form.email = String::from("not-an-email");
      });

      let fields = checkout.submit().await.unwrap_err();
      assert_eq!(fields, vec![Field::Phone, Field::Email]);
      assert_eq!(*checkout.state(), State::Filling);
   }

   #[tokio::test]
   async fn delivery_unavailable_aborts_and_alerts() {
      let backend = MockBackend::new()
      .push_time(Ok(DeliveryTimeReply {
         timeslot: None,
         error: Some(String::from("restaurant is closed")),
      }));
      let mut checkout = ready_checkout(backend, cart_with_product(7, 1, 450));
      let alerts = checkout.notify.alerts.clone();

      assert!(checkout.submit().await.is_ok());
      assert_eq!(*checkout.state(), State::Filling);
      assert_eq!(alerts.borrow()[0].0, Kind::Warning);
   }

   #[tokio::test]
   async fn moved_timeslot_needs_confirmation_then_submits() {
      let backend = MockBackend::new()
      .push_time(time_ok(19))
      .push_order(Ok(OrderCreated { token: String::from("tok123"), id: 1 }));
      let mut checkout = ready_checkout(backend, cart_with_product(7, 1, 450));

      assert!(checkout.submit().await.is_ok());
      assert_eq!(*checkout.state(), State::TimeChanged { fresh: slot(19) });

      checkout.confirm_time_change().await;
      assert_eq!(
         *checkout.state(),
         State::Completed(Outcome::OrderPlaced { token: String::from("tok123") })
      );
      assert!(checkout.cart().is_empty());
   }

   #[tokio::test]
   async fn missing_baseline_slot_requires_confirmation() {
      let backend = MockBackend::new()
      .push_time(time_ok(18))
      .push_order(Ok(OrderCreated { token: String::from("tok123"), id: 1 }));
      let mut checkout = ready_checkout(backend, cart_with_product(7, 1, 450));
      // The initial delivery-time fetch failed, no slot was ever shown
      checkout.displayed_timeslot = None;

      assert!(checkout.submit().await.is_ok());
      assert_eq!(*checkout.state(), State::TimeChanged { fresh: slot(18) });

      checkout.confirm_time_change().await;
      assert_eq!(
         *checkout.state(),
         State::Completed(Outcome::OrderPlaced { token: String::from("tok123") })
      );
   }

   #[tokio::test]
   async fn dismissing_time_change_returns_to_form() {
      let backend = MockBackend::new().push_time(time_ok(19));
      let mut checkout = ready_checkout(backend, cart_with_product(7, 1, 450));

      checkout.submit().await.unwrap();
      checkout.dismiss();
      assert_eq!(*checkout.state(), State::Filling);
      assert!(!checkout.cart().is_empty());
   }

   #[tokio::test]
   async fn unchanged_timeslot_submits_straight_through() {
      let backend = MockBackend::new()
      .push_time(time_ok(18))
      .push_order(Ok(OrderCreated { token: String::from("tok123"), id: 1 }));
      let mut checkout = ready_checkout(backend, cart_with_product(7, 2, 450));
      let payloads = checkout.backend.sent_payloads.clone();

      checkout.submit().await.unwrap();
      assert_eq!(
         *checkout.state(),
         State::Completed(Outcome::OrderPlaced { token: String::from("tok123") })
      );

      let payload = &payloads.borrow()[0];
      assert_eq!(payload.payment_method, "CASH");
      assert_eq!(payload.payment_status, "PENDING");
      assert_eq!(payload.customer.name, "Mario");
      assert_eq!(payload.products[0].product_id, 7);
      assert_eq!(payload.products[0].quantity, 2);
   }

   #[tokio::test]
   async fn stock_conflict_truncation_keeps_first_line() {
      let backend = MockBackend::new()
      .push_time(time_ok(18))
      .push_order(Err(OrderError::StockConflict(StockConflictBody {
         message: None,
         products: vec![InsufficientStock {
            product_id: 7,
            product_name: String::from("Product 7"),
            available: 1,
            requested: 3,
         }],
      })));

      let mut cart = cart_with_product(7, 3, 450);
      let mut options = BTreeMap::new();
      options.insert(String::from("size"), String::from("Small"));
      cart.add_or_merge(LineDraft::Product {
         product_id: 7,
         name: String::from("Product 7"),
         unit_price: Decimal::new(400, 2),
         quantity: 2,
         options,
         extra_ids: vec![],
         extra_names: vec![],
      });

      let mut checkout = ready_checkout(backend, cart);
      checkout.submit().await.unwrap();
      assert!(matches!(checkout.state(), State::StockConflict { .. }));

      checkout.resolve_stock_conflict();
      assert_eq!(*checkout.state(), State::Filling);
      assert_eq!(checkout.cart().items().len(), 1);
      assert_eq!(checkout.cart().items()[0].quantity, 1);
   }

   #[tokio::test]
   async fn online_payment_cleans_up_before_redirect() {
      let backend = MockBackend::new()
      .push_time(time_ok(18))
      .push_order(Ok(OrderCreated { token: String::from("tok123"), id: 1 }))
      .push_payment(Ok(String::from("https://pay.example/session/1")));
      let mut checkout = ready_checkout(backend, cart_with_product(7, 1, 450));
      checkout.edit_form(|form| form.payment_method = PaymentMethod::Online);
      let amounts = checkout.backend.payment_amounts.clone();

      checkout.submit().await.unwrap();
      assert_eq!(
         *checkout.state(),
         State::Completed(Outcome::PaymentRedirect {
            url: String::from("https://pay.example/session/1"),
            token: String::from("tok123"),
         })
      );
      // Subtotal 4.50 plus the 2.00 fee, captured before the cart was
      // emptied, in minor units
      assert_eq!(amounts.borrow()[0], 650);
      assert!(checkout.cart().is_empty());
   }

   #[tokio::test]
   async fn failed_payment_session_still_places_the_order() {
      let backend = MockBackend::new()
      .push_time(time_ok(18))
      .push_order(Ok(OrderCreated { token: String::from("tok123"), id: 1 }))
      .push_payment(Err(String::from("status 502")));
      let mut checkout = ready_checkout(backend, cart_with_product(7, 1, 450));
      checkout.edit_form(|form| form.payment_method = PaymentMethod::Online);

      checkout.submit().await.unwrap();
      assert_eq!(
         *checkout.state(),
         State::Completed(Outcome::OrderPlaced { token: String::from("tok123") })
      );
      assert!(checkout.cart().is_empty());
   }

   #[tokio::test]
   async fn malformed_offer_picks_are_dropped_from_the_payload() {
      let backend = MockBackend::new()
      .push_time(time_ok(18))
      .push_order(Ok(OrderCreated { token: String::from("tok123"), id: 1 }));

      let mut cart = Cart::new();
      cart.add_or_merge(LineDraft::Offer {
         offer_id: 9,
         name: String::from("Lunch deal"),
         unit_price: Decimal::new(1450, 2),
         quantity: 1,
         selected_groups: vec![
            OfferSelection {
               group_id: 1,
               group_name: String::from("Drink"),
               selected_item_id: 10,
               selected_item_name: String::from("Cola"),
            },
            OfferSelection {
               group_id: 0, // stale persisted entry
               group_name: String::new(),
               selected_item_id: 0,
               selected_item_name: String::new(),
            },
         ],
      });

      let mut checkout = ready_checkout(backend, cart);
      let payloads = checkout.backend.sent_payloads.clone();

      checkout.submit().await.unwrap();
      let payload = &payloads.borrow()[0];
      assert_eq!(payload.offers[0].selected_groups.len(), 1);
      assert_eq!(payload.offers[0].selected_groups[0].selected_item_id, 10);
   }

   #[tokio::test]
   async fn transport_failure_returns_to_form_with_cart_intact() {
      let backend = MockBackend::new()
      .push_time(time_ok(18))
      .push_order(Err(OrderError::from(String::from("status 500"))));
      let mut checkout = ready_checkout(backend, cart_with_product(7, 1, 450));
      let alerts = checkout.notify.alerts.clone();

      checkout.submit().await.unwrap();
      assert_eq!(*checkout.state(), State::Filling);
      assert!(!checkout.cart().is_empty());
      assert_eq!(alerts.borrow().last().unwrap().0, Kind::Error);
   }

   #[tokio::test]
   async fn draft_is_restored_and_cleared_with_storage() {
      let dir = tempfile::tempdir().unwrap();
      let storage = Storage::open(dir.path()).unwrap();

      let backend = MockBackend::new();
      let mut checkout = Checkout::open(
         backend, RecordingNotify::default(), storage.clone(), Cart::new(), 2, restaurant(),
      );
      checkout.edit_form(|form| form.name = String::from("Mario"));
      drop(checkout);

      let backend = MockBackend::new()
      .push_time(time_ok(18))
      .push_order(Ok(OrderCreated { token: String::from("tok123"), id: 1 }));
      let cart = cart_with_product(7, 1, 450);
      let mut checkout = Checkout::open(
         backend, RecordingNotify::default(), storage.clone(), cart, 2, restaurant(),
      );
      assert_eq!(checkout.form().name, "Mario");
      assert!(!checkout.form().accepted_terms);

      checkout.edit_form(|form| {
         form.phone = String::from("+39 333 1234567");
         form.email = String::from("mario@example.com");
         form.accepted_terms = true;
      });
      checkout.displayed_timeslot = Some(slot(18));
      checkout.submit().await.unwrap();

      // Successful submission wipes the persisted draft
      assert!(storage.load::<ContactForm>(CHECKOUT_KEY).is_none());
   }
}
