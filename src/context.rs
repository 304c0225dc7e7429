//! Application-wide client state, wired once at startup.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns one session store, one locale store, one request gateway and the
//! auth flows over them. Every part shares the same durable store, so the
//! gateway reads the token the session store writes.
//!
//! DESIGN
//! ======
//! The gateway reads its token from storage at call time, so it may be built
//! before the session store.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::rc::Rc;

use crate::config::ClientConfig;
use crate::net::api::RequestGateway;
use crate::net::auth::AuthApi;
use crate::net::transport::Transport;
use crate::state::locale::LocaleStore;
use crate::state::session::SessionStore;
use crate::state::text::TextResolver;
use crate::util::document::DocumentHost;
use crate::util::i18n::Translations;
use crate::util::storage::{DurableStore, JsonFileStore, MemoryStore, StorageError};

#[cfg(feature = "native-http")]
use crate::net::types::TransportError;

pub struct ClientContext {
    pub storage: Rc<dyn DurableStore>,
    pub gateway: Rc<RequestGateway>,
    pub session: Rc<SessionStore>,
    pub locale: Rc<LocaleStore>,
    pub auth: AuthApi,
}

impl ClientContext {
    /// Wire every store over `storage` and apply the configured log level.
    pub fn new(
        config: &ClientConfig,
        storage: Rc<dyn DurableStore>,
        transport: Rc<dyn Transport>,
        document: Rc<dyn DocumentHost>,
    ) -> Self {
        config.apply_log_level();
        let gateway = Rc::new(RequestGateway::new(config.api_url.as_str(), Rc::clone(&storage), transport));
        let session = Rc::new(SessionStore::new(Rc::clone(&storage)));
        let locale = Rc::new(LocaleStore::new(Rc::clone(&storage), document));
        let auth = AuthApi::new(Rc::clone(&gateway), Rc::clone(&session));
        log::debug!(
            "client context ready: api={} locale={} authenticated={}",
            gateway.base_url(),
            locale.current(),
            session.is_authenticated()
        );
        Self { storage, gateway, session, locale, auth }
    }

    /// Text resolver bound to this context's locale.
    #[must_use]
    pub fn text(&self, translations: Rc<Translations>) -> TextResolver {
        self.locale.text_resolver(translations)
    }

    /// Browser wiring: `localStorage`, `fetch` and the live document.
    ///
    /// # Errors
    ///
    /// Returns an error if `localStorage` is unavailable.
    #[cfg(feature = "hydrate")]
    pub fn browser(config: &ClientConfig) -> Result<Self, StorageError> {
        use crate::net::transport::GlooTransport;
        use crate::util::document::BrowserDocument;
        use crate::util::storage::LocalStorage;

        let storage = Rc::new(LocalStorage::open()?);
        Ok(Self::new(config, storage, Rc::new(GlooTransport), Rc::new(BrowserDocument)))
    }

    /// Native wiring: the configured store, `reqwest`, and no document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or the HTTP client
    /// cannot be built.
    #[cfg(feature = "native-http")]
    pub fn native(config: &ClientConfig) -> Result<Self, ContextError> {
        use crate::net::transport::ReqwestTransport;
        use crate::util::document::Headless;

        let storage = open_native_store(config)?;
        let transport = Rc::new(ReqwestTransport::new()?);
        Ok(Self::new(config, storage, transport, Rc::new(Headless)))
    }
}

#[cfg(feature = "native-http")]
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("transport unavailable: {0}")]
    Transport(#[from] TransportError),
}

/// File-backed store when `store_path` is configured, else in-memory.
///
/// # Errors
///
/// Returns an error if the configured file exists but cannot be read.
pub fn open_native_store(config: &ClientConfig) -> Result<Rc<dyn DurableStore>, StorageError> {
    match &config.store_path {
        Some(path) => {
            log::info!("session store: {}", path.display());
            Ok(Rc::new(JsonFileStore::open(path.clone())?))
        }
        None => {
            log::info!("session store: in-memory");
            Ok(Rc::new(MemoryStore::new()))
        }
    }
}
