/* ===============================================================================
Food ordering storefront.
Global vars from environment. 14 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use once_cell::sync::OnceCell;
use std::{env, path::PathBuf};

// Settings
pub static VARS: OnceCell<Vars> = OnceCell::new();

// Enviroment variables
pub struct Vars {
   // Base URL of the REST backend
   api_base_url: String,

   // Price prefix, i.e. currency symbol
   price_unit: String,

   // Directory for durable client state (cart, checkout draft, language)
   storage_dir: PathBuf,

   // Default interface language
   language: String,
}

impl Vars {
   pub fn from_env() -> Self {
      Vars {
         api_base_url: {
            match env::var("API_BASE_URL") {
               Ok(s) => s.trim_end_matches('/').to_string(),
               Err(e) => {
                  log::info!("Something wrong with API_BASE_URL: {}, using localhost", e);
                  String::from("http://localhost:3000")
               }
            }
         },

         price_unit: {
            match env::var("PRICE_UNIT") {
               Ok(s) => s,
               Err(e) => {
                  log::info!("Something wrong with PRICE_UNIT: {}, using euro", e);
                  String::from("€ ")
               }
            }
         },

         storage_dir: {
            match env::var("STORAGE_DIR") {
               Ok(s) => PathBuf::from(s),
               Err(_) => PathBuf::from(".cunzato"), // if the variable is not set, that's ok
            }
         },

         language: {
            match env::var("LANGUAGE") {
               Ok(s) => s,
               Err(_) => String::from("en"), // if the variable is not set, that's ok
            }
         },
      }
   }
}

// Base URL of the backend, without a trailing slash
pub fn api_base_url() -> String {
   match VARS.get() {
      Some(vars) => vars.api_base_url.clone(),
      None => String::from("http://localhost:3000"),
   }
}

// Currency prefix for price formatting. Falls back to euro when vars
// are not initialized (unit tests)
pub fn price_unit() -> String {
   match VARS.get() {
      Some(vars) => vars.price_unit.clone(),
      None => String::from("€ "),
   }
}

pub fn storage_dir() -> PathBuf {
   match VARS.get() {
      Some(vars) => vars.storage_dir.clone(),
      None => PathBuf::from(".cunzato"),
   }
}

pub fn language() -> String {
   match VARS.get() {
      Some(vars) => vars.language.clone(),
      None => String::from("en"),
   }
}
