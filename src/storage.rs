/* ===============================================================================
Food ordering storefront.
Durable local storage. 16 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

// Fixed storage keys
pub const CART_KEY: &str = "cart";
pub const CHECKOUT_KEY: &str = "checkout";
pub const LANGUAGE_KEY: &str = "language";

// Key-value JSON storage, one file per key. The only persisted shared state
// of the client, read once at startup and written after every mutation
#[derive(Clone)]
pub struct Storage {
   dir: PathBuf,
}

impl Storage {
   pub fn open(dir: impl AsRef<Path>) -> Result<Self, String> {
      let dir = dir.as_ref().to_path_buf();
      fs::create_dir_all(&dir)
      .map_err(|err| format!("storage::open {}: {}", dir.display(), err))?;
      Ok(Self { dir })
   }

   fn path(&self, key: &str) -> PathBuf {
      self.dir.join(format!("{}.json", key))
   }

   // Missing or corrupt data degrades to None, never to an error
   pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
      let text = fs::read_to_string(self.path(key)).ok()?;
      match serde_json::from_str(&text) {
         Ok(value) => Some(value),
         Err(err) => {
            log::warn!("storage::load discarding corrupt '{}': {}", key, err);
            None
         }
      }
   }

   pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), String> {
      let text = serde_json::to_string(value)
      .map_err(|err| format!("storage::save serialize '{}': {}", key, err))?;

      fs::write(self.path(key), text)
      .map_err(|err| format!("storage::save write '{}': {}", key, err))
   }

   // Removing an absent key is not an error
   pub fn clear(&self, key: &str) {
      let _ = fs::remove_file(self.path(key));
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn save_load_round_trip() {
      let dir = tempfile::tempdir().unwrap();
      let storage = Storage::open(dir.path()).unwrap();

      storage.save("test", &vec![1, 2, 3]).unwrap();
      assert_eq!(storage.load::<Vec<i32>>("test"), Some(vec![1, 2, 3]));
   }

   #[test]
   fn corrupt_data_degrades_to_none() {
      let dir = tempfile::tempdir().unwrap();
      let storage = Storage::open(dir.path()).unwrap();

      fs::write(storage.path("test"), "{not json!").unwrap();
      assert_eq!(storage.load::<Vec<i32>>("test"), None);
   }

   #[test]
   fn missing_key_is_none_and_clear_is_idempotent() {
      let dir = tempfile::tempdir().unwrap();
      let storage = Storage::open(dir.path()).unwrap();

      assert_eq!(storage.load::<String>("absent"), None);
      storage.clear("absent");
      storage.clear("absent");
   }
}
