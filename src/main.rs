/* ===============================================================================
Food ordering storefront.
Main module. 14 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

mod alert;
mod api;
mod basket;
mod cart;
mod checkout;
mod detail;
mod environment;
mod locations;
mod models;
mod order;
mod pricing;
mod states;
mod storage;
mod store;

use storage::LANGUAGE_KEY;

// ============================================================================
// [Run!]
// ============================================================================
#[tokio::main]
async fn main() {
   run().await;
}

async fn run() {
   let mut builder = pretty_env_logger::formatted_builder();
   builder.target(pretty_env_logger::env_logger::Target::Stdout);
   builder.init();

   log::info!("Starting...");

   // Settings from environments
   let vars = environment::Vars::from_env();
   if environment::VARS.set(vars).is_err() {
      log::info!("Something wrong with vars, already set");
   }

   // Open durable client state
   let storage = match storage::Storage::open(environment::storage_dir()) {
      Ok(storage) => storage,
      Err(err) => {
         log::error!("main: {}", err);
         return;
      }
   };

   // Remember the interface language across runs
   let language: String = match storage.load(LANGUAGE_KEY) {
      Some(language) => language,
      None => {
         let language = environment::language();
         if let Err(err) = storage.save(LANGUAGE_KEY, &language) {
            log::warn!("main: {}", err);
         }
         language
      }
   };
   log::info!("Language {}", language);

   let ctx = states::Context {
      api: api::Api::new(),
      storage,
      notify: alert::ConsoleNotify,
   };

   if let Err(err) = states::dialogue_loop(&ctx).await {
      log::error!("main: {}", err);
   }

   log::info!("Bye");
}
