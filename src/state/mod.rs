//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`session`, `locale`, `text`) so consumers can
//! depend on small focused stores. Every store exposes a synchronous getter
//! for its value and a `watch` receiver for change notification only.

pub mod locale;
pub mod session;
pub mod text;
