//! Active display-language preference.
//!
//! The locale is read once from durable storage at construction (falling back
//! to [`Locale::DEFAULT`] when unset or unsupported). Every mutation is
//! persisted before it is published, mirrored onto the document `lang`
//! attribute, and delivered to subscribers immediately.

#[cfg(test)]
#[path = "locale_test.rs"]
mod locale_test;

use std::rc::Rc;

use tokio::sync::watch;

use super::text::TextResolver;
use crate::util::document::DocumentHost;
use crate::util::i18n::{Locale, Translations};
use crate::util::storage::{DurableStore, LANGUAGE_KEY, StorageError};

pub struct LocaleStore {
    storage: Rc<dyn DurableStore>,
    document: Rc<dyn DocumentHost>,
    current: watch::Sender<Locale>,
}

impl LocaleStore {
    pub fn new(storage: Rc<dyn DurableStore>, document: Rc<dyn DocumentHost>) -> Self {
        let initial = storage
            .get(LANGUAGE_KEY)
            .as_deref()
            .and_then(Locale::parse)
            .unwrap_or_default();
        let (current, _) = watch::channel(initial);
        Self { storage, document, current }
    }

    #[must_use]
    pub fn current(&self) -> Locale {
        *self.current.borrow()
    }

    /// Change notifications. Read values through [`LocaleStore::current`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        self.current.subscribe()
    }

    /// Persist and activate `locale`.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be persisted; the active
    /// locale is then unchanged.
    pub fn set(&self, locale: Locale) -> Result<(), StorageError> {
        self.storage.set(LANGUAGE_KEY, locale.code())?;
        self.document.set_lang(locale.code());
        self.current.send_replace(locale);
        log::debug!("locale set to {locale}");
        Ok(())
    }

    /// Advance to the next supported locale (`de` ↔ `en`) and return it.
    ///
    /// # Errors
    ///
    /// Same as [`LocaleStore::set`].
    pub fn toggle(&self) -> Result<Locale, StorageError> {
        let next = self.current().next();
        self.set(next)?;
        Ok(next)
    }

    /// Text lookup bound to this store's live locale.
    #[must_use]
    pub fn text_resolver(&self, translations: Rc<Translations>) -> TextResolver {
        TextResolver::new(translations, self.subscribe())
    }
}
