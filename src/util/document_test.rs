#![cfg(not(feature = "hydrate"))]

use super::*;

#[test]
fn headless_set_lang_is_callable() {
    Headless.set_lang("de");
    Headless.set_lang("en");
}

#[test]
fn browser_document_is_noop_outside_hydrate() {
    BrowserDocument.set_lang("en");
}
