/* ===============================================================================
Food ordering storefront.
Cart store and line identity. 18 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::InsufficientStock;
use crate::pricing;
use crate::storage::{Storage, CART_KEY};

// ============================================================================
// [Line drafts]
// ============================================================================

// One winning pick of a required offer bundle group
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSelection {
   pub group_id: i64,
   pub group_name: String,
   pub selected_item_id: i64,
   pub selected_item_name: String,
}

// A prospective cart addition built by a detail screen. Products and offers
// are distinct shapes, so the identity resolver and the pricing can match
// exhaustively instead of branching on a flag
#[derive(Clone, Debug)]
pub enum LineDraft {
   Product {
      product_id: i64,
      name: String,
      // Base price with all selected option and extras deltas folded in
      unit_price: Decimal,
      quantity: u32,
      // Option-group id to chosen label, order-stable
      options: BTreeMap<String, String>,
      extra_ids: Vec<i64>,
      extra_names: Vec<String>,
   },
   Offer {
      offer_id: i64,
      name: String,
      unit_price: Decimal, // flat bundle price
      quantity: u32,
      selected_groups: Vec<OfferSelection>,
   },
}

impl LineDraft {
   // Deterministic merge key: two drafts get the same key iff they are the
   // same purchasable configuration. Extras and offer picks are sorted
   // before serialization so that UI selection order cannot split a line.
   // The p/o prefix keeps a product and an offer with equal numeric ids
   // from ever colliding
   pub fn identity_key(&self) -> String {
      match self {
         Self::Product { product_id, options, extra_ids, .. } => {
            let opts: Vec<String> = options.iter()
            .map(|(group, label)| format!("{}={}", group, label))
            .collect();

            let mut extras = extra_ids.clone();
            extras.sort_unstable();
            let extras: Vec<String> = extras.iter().map(|id| id.to_string()).collect();

            format!("p{}|{}|{}", product_id, opts.join(","), extras.join(","))
         }

         Self::Offer { offer_id, selected_groups, .. } => {
            let mut picks: Vec<(i64, i64)> = selected_groups.iter()
            .map(|sel| (sel.group_id, sel.selected_item_id))
            .collect();
            picks.sort_unstable();

            let picks: Vec<String> = picks.iter()
            .map(|(group, item)| format!("{}:{}", group, item))
            .collect();

            format!("o{}|{}", offer_id, picks.join(","))
         }
      }
   }

   pub fn quantity(&self) -> u32 {
      match self {
         Self::Product { quantity, .. } | Self::Offer { quantity, .. } => *quantity,
      }
   }
}

// ============================================================================
// [Line items]
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
   pub key: String, // identity hash, primary key of the line
   pub source_id: i64,
   pub is_offer: bool,
   pub name: String,
   pub unit_price: Decimal,
   pub quantity: u32,
   #[serde(default)]
   pub selected_options: BTreeMap<String, String>,
   #[serde(default)]
   pub selected_extra_ids: Vec<i64>,
   #[serde(default)]
   pub selected_extra_names: Vec<String>,
   #[serde(default)]
   pub selected_offer_groups: Vec<OfferSelection>,
   pub line_total: Decimal,
}

impl CartLineItem {
   fn from_draft(draft: LineDraft) -> Self {
      let key = draft.identity_key();
      let mut line = match draft {
         LineDraft::Product { product_id, name, unit_price, quantity, options, extra_ids, extra_names } => Self {
            key,
            source_id: product_id,
            is_offer: false,
            name,
            unit_price,
            quantity,
            selected_options: options,
            selected_extra_ids: extra_ids,
            selected_extra_names: extra_names,
            selected_offer_groups: vec![],
            line_total: Decimal::ZERO,
         },
         LineDraft::Offer { offer_id, name, unit_price, quantity, selected_groups } => Self {
            key,
            source_id: offer_id,
            is_offer: true,
            name,
            unit_price,
            quantity,
            selected_options: BTreeMap::new(),
            selected_extra_ids: vec![],
            selected_extra_names: vec![],
            selected_offer_groups: selected_groups,
            line_total: Decimal::ZERO,
         },
      };
      line.refresh_total();
      line
   }

   fn refresh_total(&mut self) {
      self.line_total = pricing::line_total(self.unit_price, self.quantity);
   }
}

// ============================================================================
// [Cart store]
// ============================================================================

// Single source of truth for the cart contents. Lines keep insertion order,
// the stock-conflict "first line wins" rule depends on it. Every mutation
// is persisted synchronously; a corrupt snapshot loads as an empty cart
pub struct Cart {
   items: Vec<CartLineItem>,
   storage: Option<Storage>,
}

impl Cart {
   // In-memory cart, nothing persisted
   pub fn new() -> Self {
      Self { items: vec![], storage: None }
   }

   pub fn open(storage: Storage) -> Self {
      let items = storage.load(CART_KEY).unwrap_or_default();
      Self { items, storage: Some(storage) }
   }

   pub fn items(&self) -> &[CartLineItem] {
      &self.items
   }

   pub fn is_empty(&self) -> bool {
      self.items.is_empty()
   }

   pub fn line(&self, key: &str) -> Option<&CartLineItem> {
      self.items.iter().find(|item| item.key == key)
   }

   // Merge into an existing line with the same identity key or insert a new
   // line. Returns the key for the caller's transient highlight
   pub fn add_or_merge(&mut self, draft: LineDraft) -> String {
      let key = draft.identity_key();

      match self.items.iter_mut().find(|item| item.key == key) {
         Some(item) => {
            item.quantity += draft.quantity();
            item.refresh_total();
         }
         None => self.items.push(CartLineItem::from_draft(draft)),
      }

      self.persist();
      key
   }

   // Zero removes the line, a quantity below one must not exist. Upper
   // bounds like stock limits are the calling UI's business
   pub fn set_quantity(&mut self, key: &str, quantity: u32) {
      if quantity == 0 {
         self.items.retain(|item| item.key != key);
      } else if let Some(item) = self.items.iter_mut().find(|item| item.key == key) {
         item.quantity = quantity;
         item.refresh_total();
      }
      self.persist();
   }

   pub fn remove(&mut self, key: &str) {
      self.items.retain(|item| item.key != key);
      self.persist();
   }

   pub fn clear(&mut self) {
      self.items.clear();
      self.persist();
   }

   pub fn total_count(&self) -> u32 {
      self.items.iter().map(|item| item.quantity).sum()
   }

   pub fn total_amount(&self) -> Decimal {
      pricing::cart_subtotal(&self.items)
   }

   // Accepted stock-conflict resolution: for every reported product the
   // first matching line is truncated to the available quantity, any other
   // line of the same product (different options) is zeroed out. Only one
   // line may take the remaining stock, silently adjusting both would
   // over-order
   pub fn truncate_to_stock(&mut self, shortages: &[InsufficientStock]) {
      for shortage in shortages {
         let keys: Vec<String> = self.items.iter()
         .filter(|item| !item.is_offer && item.source_id == shortage.product_id)
         .map(|item| item.key.clone())
         .collect();

         for (i, key) in keys.iter().enumerate() {
            let quantity = if i == 0 { shortage.available } else { 0 };
            self.set_quantity(key, quantity);
         }
      }
   }

   fn persist(&self) {
      if let Some(storage) = &self.storage {
         if let Err(err) = storage.save(CART_KEY, &self.items) {
            log::warn!("cart::persist: {}", err);
         }
      }
   }
}

// ============================================================================
// [Tests]
// ============================================================================
