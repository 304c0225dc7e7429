//! Host-facing helpers shared by the stores.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, document
//! attributes) and pure lookup logic from the stateful stores.

pub mod document;
pub mod i18n;
pub mod storage;
