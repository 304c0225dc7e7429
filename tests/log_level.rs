//! The configured `LOG_LEVEL` becomes the global `log` ceiling.
//!
//! Kept in its own test binary: `log::max_level()` is process-wide.

use std::rc::Rc;

use async_trait::async_trait;
use session_core::net::transport::Transport;
use session_core::net::types::{OutboundRequest, RawResponse, TransportError};
use session_core::util::document::Headless;
use session_core::util::storage::MemoryStore;
use session_core::{ClientConfig, ClientContext};

struct Offline;

#[async_trait(?Send)]
impl Transport for Offline {
    async fn send(&self, _request: OutboundRequest) -> Result<RawResponse, TransportError> {
        Err(TransportError("offline".to_owned()))
    }
}

fn config_with_level(level: &str) -> ClientConfig {
    ClientConfig::from_lookup(|key| (key == "LOG_LEVEL").then(|| level.to_owned())).unwrap()
}

#[test]
fn context_applies_configured_log_level() {
    for (raw, expected) in [
        ("trace", log::LevelFilter::Trace),
        ("warn", log::LevelFilter::Warn),
        ("off", log::LevelFilter::Off),
    ] {
        let config = config_with_level(raw);
        let _ctx = ClientContext::new(&config, Rc::new(MemoryStore::new()), Rc::new(Offline), Rc::new(Headless));
        assert_eq!(log::max_level(), expected, "LOG_LEVEL={raw}");
    }
}

