//! Document-level language attribute.
//!
//! The active locale is mirrored onto `<html lang>` for screen readers and
//! hyphenation. Requires a browser environment; every other host skips the
//! update.

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

/// Rendering host that can display the active language.
pub trait DocumentHost {
    fn set_lang(&self, code: &str);
}

/// Host for non-interactive execution: attribute updates are skipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct Headless;

impl DocumentHost for Headless {
    fn set_lang(&self, code: &str) {
        log::trace!("no document, skipping lang={code}");
    }
}

/// The browser's `<html>` element.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserDocument;

impl DocumentHost for BrowserDocument {
    fn set_lang(&self, code: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.document_element())
            {
                if let Err(e) = el.set_attribute("lang", code) {
                    log::warn!("failed to set document lang={code}: {e:?}");
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = code;
        }
    }
}
