/* ===============================================================================
Food ordering storefront.
User-facing notifications. 17 Feb 2024.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2024 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use strum::EnumMessage;

#[derive(Clone, Copy, Debug, PartialEq, EnumMessage)]
pub enum Kind {
   #[strum(message = "i")]
   Info,
   #[strum(message = "!")]
   Warning,
   #[strum(message = "x")]
   Error,
}

// Transient user-visible alerts, behind a trait so flows under test can
// record them instead of printing
pub trait Notify {
   fn notify(&self, kind: Kind, title: &str, body: &str);
}

pub struct ConsoleNotify;

impl Notify for ConsoleNotify {
   fn notify(&self, kind: Kind, title: &str, body: &str) {
      let mark = kind.get_message().unwrap_or_default();
      if body.is_empty() {
         println!("[{}] {}", mark, title);
      } else {
         println!("[{}] {}: {}", mark, title, body);
      }
   }
}
