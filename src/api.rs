/* ===============================================================================
Food ordering storefront.
REST backend client. 15 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use derive_more::From;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::cart::OfferSelection;
use crate::environment as env;
use crate::models::{DeliveryLocation, DeliveryTimeReply, InsufficientStock, OrderDetail, Restaurant};

// ============================================================================
// [Order payload]
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
   pub restaurant_id: i64,
   pub delivery_location_id: i64,
   pub payment_method: String,
   pub payment_status: String,
   pub customer: PayloadCustomer,
   pub notes: String,
   pub products: Vec<PayloadProduct>,
   pub offers: Vec<PayloadOffer>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadCustomer {
   pub name: String,
   pub phone: String,
   pub email: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadProduct {
   pub product_id: i64,
   pub quantity: u32,
   pub extra_ids: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadOffer {
   pub offer_id: i64,
   pub quantity: u32,
   pub selected_groups: Vec<OfferSelection>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
   pub token: String,
   pub id: i64,
}

// ============================================================================
// [Errors]
// ============================================================================

// Structured body of an order rejected for insufficient stock
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockConflictBody {
   #[serde(default)]
   pub message: Option<String>,
   #[serde(default)]
   pub products: Vec<InsufficientStock>,
}

// Order creation distinguishes the stock conflict, which the UI can
// resolve, from every other failure, which it can only report
#[derive(Clone, Debug, From, PartialEq)]
pub enum OrderError {
   StockConflict(StockConflictBody),
   #[from]
   Other(String),
}

// ============================================================================
// [Backend seam]
// ============================================================================

// The calls the checkout flow makes, behind a trait so the flow can be
// tested against a scripted backend. The futures are awaited in place,
// never spawned, so no Send bound
#[allow(async_fn_in_trait)]
pub trait Backend {
   async fn delivery_time(&self, location_id: i64, restaurant_id: i64) -> Result<DeliveryTimeReply, String>;
   async fn create_order(&self, payload: &OrderPayload) -> Result<OrderCreated, OrderError>;
   // Opens a hosted payment session for the amount in minor currency
   // units, returns the page URL
   async fn payment_checkout(&self, amount: i64) -> Result<String, String>;
}

// ============================================================================
// [Client]
// ============================================================================

#[derive(Clone)]
pub struct Api {
   client: reqwest::Client,
   base_url: String,
}

#[derive(Deserialize)]
struct PaymentReply {
   url: String,
}

impl Api {
   pub fn new() -> Self {
      Self {
         client: reqwest::Client::new(),
         base_url: env::api_base_url(),
      }
   }

   fn url(&self, path: &str) -> String {
      format!("{}{}", self.base_url, path)
   }

   async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, String> {
      let url = self.url(path);
      let response = self.client.get(&url).send().await
      .map_err(|err| format!("api::get {}: {}", url, err))?;

      let status = response.status();
      if !status.is_success() {
         return Err(format!("api::get {}: status {}", url, status));
      }

      response.json().await
      .map_err(|err| format!("api::get {} decode: {}", url, err))
   }

   // Delivery locations for the landing screen, each optionally
   // embedding its serving restaurants
   pub async fn delivery_locations(&self) -> Result<Vec<DeliveryLocation>, String> {
      self.get_json("/public/delivery-locations").await
   }

   // Full restaurant with menu sections, products and offers
   pub async fn restaurant(&self, restaurant_id: i64) -> Result<Restaurant, String> {
      self.get_json(&format!("/public/restaurants?id={}", restaurant_id)).await
   }

   // Anonymous order lookup by opaque token
   pub async fn order_by_token(&self, token: &str) -> Result<OrderDetail, String> {
      self.get_json(&format!("/public/orders/status/{}", token)).await
   }
}

impl Backend for Api {
   // Estimated delivery slot, or a reason why delivery is unavailable.
   // A non-success status is a transport error, "delivery impossible"
   // arrives as a 200 with the error field set
   async fn delivery_time(&self, location_id: i64, restaurant_id: i64) -> Result<DeliveryTimeReply, String> {
      self.get_json(&format!(
         "/public/delivery-time?restaurantId={}&deliveryLocationId={}",
         restaurant_id, location_id,
      )).await
   }

   async fn create_order(&self, payload: &OrderPayload) -> Result<OrderCreated, OrderError> {
      let url = self.url("/public/orders/create");
      let response = self.client.post(&url).json(payload).send().await
      .map_err(|err| OrderError::from(format!("api::create_order: {}", err)))?;

      let status = response.status();
      if status == StatusCode::CONFLICT {
         let body: StockConflictBody = response.json().await
         .map_err(|err| OrderError::from(format!("api::create_order conflict decode: {}", err)))?;
         return Err(OrderError::StockConflict(body));
      }
      if !status.is_success() {
         let text = response.text().await.unwrap_or_default();
         return Err(OrderError::from(format!("api::create_order: status {} {}", status, text)));
      }

      response.json().await
      .map_err(|err| OrderError::from(format!("api::create_order decode: {}", err)))
   }

   async fn payment_checkout(&self, amount: i64) -> Result<String, String> {
      let url = self.url("/payments/checkout");
      let body = serde_json::json!({ "amount": amount });

      let response = self.client.post(&url).json(&body).send().await
      .map_err(|err| format!("api::payment_checkout: {}", err))?;

      let status = response.status();
      if !status.is_success() {
         return Err(format!("api::payment_checkout: status {}", status));
      }

      let reply: PaymentReply = response.json().await
      .map_err(|err| format!("api::payment_checkout decode: {}", err))?;
      Ok(reply.url)
   }
}

// ============================================================================
// [Tests]
// ============================================================================
