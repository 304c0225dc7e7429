//! # session-core
//!
//! Client-side session and preference state for the web frontend.
//!
//! This crate holds the signed-in user and bearer token, the UI locale and
//! translated text lookup, and the request gateway that attaches the token to
//! every REST call. State survives reloads through a pluggable durable store:
//! `localStorage` in the browser, a JSON file or memory on native hosts.

pub mod config;
pub mod context;
pub mod net;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use context::ClientContext;

/// Route `log` output to the browser console at the configured level and
/// install the panic hook.
///
/// Safe to call more than once; later calls keep the first logger but still
/// apply the new level.
#[cfg(feature = "hydrate")]
pub fn init_browser_logging(config: &ClientConfig) {
    console_error_panic_hook::set_once();
    if let Some(level) = config.log_level.to_level() {
        if console_log::init_with_level(level).is_err() {
            log::debug!("console logger already installed");
        }
    }
    config.apply_log_level();
}
