//! Locales and fallback-aware text lookup.
//!
//! DESIGN
//! ======
//! Dictionaries are supplied by the host application; this module only owns
//! the closed set of locales and the lookup order:
//! active locale, then [`Locale::DEFAULT`], then the key itself.

#[cfg(test)]
#[path = "i18n_test.rs"]
mod i18n_test;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported display languages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// German (default).
    #[default]
    De,
    /// English.
    En,
}

/// Ordered list of supported locales. [`Locale::next`] cycles through it.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::De, Locale::En];

impl Locale {
    pub const DEFAULT: Self = Self::De;

    /// Two-letter code as persisted and as written to `<html lang>`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    /// Parse a locale code, case-insensitive and tolerant of region tags
    /// (`en-GB`, `de_AT`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or_default();
        SUPPORTED_LOCALES.iter().copied().find(|l| l.code() == lang)
    }

    /// The locale after `self` in [`SUPPORTED_LOCALES`], wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let index = SUPPORTED_LOCALES.iter().position(|l| *l == self).unwrap_or(0);
        SUPPORTED_LOCALES
            .get((index + 1) % SUPPORTED_LOCALES.len())
            .copied()
            .unwrap_or_default()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A locale code outside [`SUPPORTED_LOCALES`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnsupportedLocale(s.to_owned()))
    }
}

// =============================================================================
// DICTIONARIES
// =============================================================================

/// Per-locale key/text dictionaries.
#[derive(Clone, Debug, Default)]
pub struct Translations {
    dictionaries: HashMap<Locale, HashMap<String, String>>,
}

impl Translations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Translations::insert`] for a batch of entries.
    #[must_use]
    pub fn with<I, K, V>(mut self, locale: Locale, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, text) in entries {
            self.insert(locale, key, text);
        }
        self
    }

    pub fn insert(&mut self, locale: Locale, key: impl Into<String>, text: impl Into<String>) {
        self.dictionaries
            .entry(locale)
            .or_default()
            .insert(key.into(), text.into());
    }

    /// Text for `key` in exactly `locale`. Empty entries count as missing.
    #[must_use]
    pub fn get(&self, locale: Locale, key: &str) -> Option<&str> {
        self.dictionaries
            .get(&locale)?
            .get(key)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }
}

/// Look up `key` for `locale`, falling back to the default locale and then to
/// `key` itself. Never returns an empty string for a non-empty key.
#[must_use]
pub fn resolve<'a>(translations: &'a Translations, locale: Locale, key: &'a str) -> &'a str {
    translations
        .get(locale, key)
        .or_else(|| translations.get(Locale::DEFAULT, key))
        .unwrap_or(key)
}
