//! Locale-bound text lookup.
//!
//! A [`TextResolver`] holds a receiver on the locale channel and reads the
//! active locale on every lookup, so a locale change is reflected by the very
//! next call. Hand the resolver itself to views, not strings resolved from it.

#[cfg(test)]
#[path = "text_test.rs"]
mod text_test;

use std::rc::Rc;

use tokio::sync::watch;

use crate::util::i18n::{Locale, Translations, resolve};

#[derive(Clone, Debug)]
pub struct TextResolver {
    translations: Rc<Translations>,
    locale: watch::Receiver<Locale>,
}

impl TextResolver {
    pub fn new(translations: Rc<Translations>, locale: watch::Receiver<Locale>) -> Self {
        Self { translations, locale }
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        *self.locale.borrow()
    }

    /// Display text for `key` in the active locale.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        resolve(&self.translations, self.locale(), key).to_owned()
    }

    /// Wait for the next locale change. Returns `None` once the locale store
    /// has been dropped.
    pub async fn changed(&mut self) -> Option<Locale> {
        self.locale.changed().await.ok()?;
        Some(*self.locale.borrow_and_update())
    }
}
