/* ===============================================================================
Food ordering storefront.
Backend data model. 14 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumMessage, EnumString};

fn default_true() -> bool { true }

// ============================================================================
// [Delivery locations and restaurants]
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLocation {
   pub id: i64,
   pub name: String,
   #[serde(default)]
   pub address: Option<String>,
   #[serde(default = "default_true")]
   pub is_active: bool, // false - ordering disabled even if reachable
   #[serde(default)]
   pub delivered_by: Vec<Restaurant>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
   pub id: i64,
   pub name: String,
   #[serde(default = "default_true")]
   pub is_open: bool,
   #[serde(default)]
   pub delivery_fee: Decimal,
   // Subtotal threshold above which the delivery fee is waived. Zero means
   // there is no free-delivery tier at all, not "always free"
   #[serde(default)]
   pub min_order: Decimal,
   #[serde(default)]
   pub opening_hours: Vec<OpeningHours>,
   #[serde(default)]
   pub sections: Vec<MenuSection>,
   #[serde(default)]
   pub offers: Vec<Offer>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
   pub day_of_week: u8, // 0 = Sunday
   pub open: NaiveTime,
   pub close: NaiveTime,
}

// ============================================================================
// [Menu]
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
   pub name: String,
   #[serde(default)]
   pub products: Vec<MenuProduct>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuProduct {
   pub id: i64,
   pub name: String,
   #[serde(default)]
   pub description: Option<String>,
   pub price: Decimal,
   #[serde(default)]
   pub price_after_discount: Option<Decimal>,
   #[serde(default)]
   pub image: Option<String>,
   #[serde(default = "default_true")]
   pub is_active: bool,
   #[serde(default = "default_true")]
   pub is_available: bool,
   #[serde(default)]
   pub stock_quantity: Option<i64>,
   #[serde(default)]
   pub option_groups: Vec<OptionGroup>,
}

impl MenuProduct {
   // Discounted price overrides the base price for calculation
   pub fn effective_price(&self) -> Decimal {
      self.price_after_discount.unwrap_or(self.price)
   }

   pub fn orderable(&self) -> bool {
      self.is_active && self.is_available
   }

   // The special-cased multi-select group of add-ons
   pub fn extras_group(&self) -> Option<&OptionGroup> {
      self.option_groups.iter().find(|g| g.is_extras())
   }

   // All single-select groups, i.e. everything except extras
   pub fn single_select_groups(&self) -> impl Iterator<Item = &OptionGroup> {
      self.option_groups.iter().filter(|g| !g.is_extras())
   }
}

pub const EXTRAS_GROUP_ID: &str = "extras";
const EXTRA_CHOICE_PREFIX: &str = "extra_";

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionGroup {
   pub id: String,
   pub title: String,
   #[serde(default)]
   pub required: bool,
   #[serde(default)]
   pub choices: Vec<OptionChoice>,
}

impl OptionGroup {
   pub fn is_extras(&self) -> bool {
      self.id == EXTRAS_GROUP_ID
   }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChoice {
   pub id: String,
   pub label: String,
   #[serde(default, rename = "price")]
   pub price_delta: Decimal,
}

impl OptionChoice {
   // Extras choices carry ids like "extra_7", the numeric part is what
   // the order payload wants
   pub fn extra_id(&self) -> Option<i64> {
      self.id.strip_prefix(EXTRA_CHOICE_PREFIX)
      .and_then(|s| s.parse().ok())
   }
}

// ============================================================================
// [Offers]
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
   pub id: i64,
   pub name: String,
   #[serde(default)]
   pub description: Option<String>,
   pub price: Decimal, // flat bundle price, group picks add no cost
   #[serde(default)]
   pub image: Option<String>,
   #[serde(default)]
   pub groups: Vec<OfferGroup>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferGroup {
   pub id: i64,
   pub name: String,
   pub min_items: usize,
   pub max_items: usize,
   #[serde(default)]
   pub offer_group_products: Vec<OfferGroupProduct>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferGroupProduct {
   pub id: i64,
   pub product: OfferProduct,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferProduct {
   pub id: i64,
   pub name: String,
   #[serde(default)]
   pub description: Option<String>,
   #[serde(default)]
   pub image: Option<String>,
}

// ============================================================================
// [Delivery time]
// ============================================================================

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeslot {
   pub start: DateTime<Utc>,
   #[serde(default)]
   pub end: Option<DateTime<Utc>>,
   #[serde(default)]
   pub timezone: Option<String>,
}

impl Timeslot {
   // Freshness comparison before submission is exact start-and-end equality
   pub fn same_window(&self, other: &Timeslot) -> bool {
      self.start == other.start && self.end == other.end
   }
}

// The backend answers either with a timeslot or with a reason why
// delivery is unavailable (restaurant closed etc.)
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryTimeReply {
   #[serde(default)]
   pub timeslot: Option<Timeslot>,
   #[serde(default)]
   pub error: Option<String>,
}

// ============================================================================
// [Orders]
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, AsRefStr, EnumString, EnumMessage, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
   #[strum(to_string = "CASH", message = "Cash on delivery")]
   Cash,
   #[strum(to_string = "CARD_ON_DELIVERY", message = "Card on delivery")]
   CardOnDelivery,
   #[strum(to_string = "ONLINE", message = "Pay online")]
   Online,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, EnumMessage)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
   #[strum(message = "Pending")]
   Pending,
   #[strum(message = "Confirmed")]
   Confirmed,
   #[strum(message = "Preparing")]
   Preparing,
   #[strum(message = "Ready")]
   Ready,
   #[strum(message = "On the way")]
   Delivering,
   #[strum(message = "Delivered")]
   Delivered,
   #[strum(message = "Cancelled")]
   Cancelled,
   #[serde(other)]
   #[strum(message = "Unknown")]
   Unknown,
}

// One insufficient-stock entry of a structured order-create rejection
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsufficientStock {
   pub product_id: i64,
   #[serde(default)]
   pub product_name: String,
   pub available: u32,
   pub requested: u32,
}

// Full order detail for the anonymous status lookup by token
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
   pub token: String,
   pub status: OrderStatus,
   #[serde(default)]
   pub created_at: Option<DateTime<Utc>>,
   #[serde(default)]
   pub delivery_time: Option<DateTime<Utc>>,
   #[serde(default)]
   pub notes: Option<String>,
   #[serde(default)]
   pub customer: Option<OrderCustomer>,
   #[serde(default)]
   pub delivery_location: Option<OrderPlace>,
   #[serde(default)]
   pub restaurant: Option<OrderPlace>,
   #[serde(default)]
   pub products: Vec<OrderProductLine>,
   #[serde(default)]
   pub offers: Vec<OrderOfferLine>,
   pub subtotal: Decimal,
   #[serde(default)]
   pub delivery_fee: Option<Decimal>,
   pub total: Decimal,
   #[serde(default)]
   pub payment_method: Option<String>,
   #[serde(default)]
   pub payment_status: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
   pub name: String,
   #[serde(default)]
   pub phone: Option<String>,
   #[serde(default)]
   pub email: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlace {
   pub name: String,
   #[serde(default)]
   pub address: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductLine {
   pub name: String,
   pub quantity: u32,
   pub total: Decimal,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOfferLine {
   pub name: String,
   pub quantity: u32,
   pub total: Decimal,
   #[serde(default)]
   pub groups: Vec<OrderOfferGroupLine>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOfferGroupLine {
   pub group_name: String,
   #[serde(default)]
   pub selected_item: Option<OrderOfferSelectedItem>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOfferSelectedItem {
   pub name: String,
}
