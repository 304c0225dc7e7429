use super::*;
use crate::net::types::RequestOptions;
use crate::test_support::{RecordingDocument, ScriptedTransport, user};
use crate::util::i18n::Locale;
use crate::util::storage::{LANGUAGE_KEY, TOKEN_KEY, USER_KEY};
use serde_json::json;

fn context_over(memory: &MemoryStore) -> (ClientContext, Rc<ScriptedTransport>, Rc<RecordingDocument>) {
    let transport = ScriptedTransport::new();
    let document = RecordingDocument::new();
    let config = ClientConfig { api_url: "http://api.test".to_owned(), ..ClientConfig::default() };
    let ctx = ClientContext::new(&config, Rc::new(memory.clone()), transport.clone(), document.clone());
    (ctx, transport, document)
}

#[test]
fn fresh_storage_starts_signed_out_in_default_locale() {
    let (ctx, _, document) = context_over(&MemoryStore::new());

    assert_eq!(ctx.locale.current(), Locale::De);
    assert!(!ctx.session.is_authenticated());
    assert!(!ctx.session.is_admin());
    assert_eq!(ctx.session.stored_user(), None);
    assert!(!ctx.gateway.has_token());
    assert!(document.langs().is_empty());
}

#[test]
fn restores_persisted_state() {
    let memory = MemoryStore::new();
    memory.set(LANGUAGE_KEY, "en").unwrap();
    memory.set(TOKEN_KEY, "tok").unwrap();
    memory.set(USER_KEY, r#"{"id":7,"is_admin":true}"#).unwrap();

    let (ctx, _, _) = context_over(&memory);

    assert_eq!(ctx.locale.current(), Locale::En);
    assert!(ctx.session.is_authenticated());
    assert!(ctx.session.is_admin());
}

#[tokio::test]
async fn gateway_sees_token_written_by_session() {
    let (ctx, transport, _) = context_over(&MemoryStore::new());
    ctx.session.set_user(user(json!({"id": 1})), "fresh").unwrap();
    transport.reply(200, "[]");

    ctx.gateway.request("/api/items", RequestOptions::get()).await.unwrap();

    assert_eq!(transport.last().header("Authorization"), Some("Bearer fresh"));
}

#[test]
fn text_follows_context_locale() {
    let (ctx, _, document) = context_over(&MemoryStore::new());
    let translations = Rc::new(
        Translations::new()
            .with(Locale::De, [("nav.home", "Startseite")])
            .with(Locale::En, [("nav.home", "Home")]),
    );
    let text = ctx.text(translations);

    assert_eq!(text.t("nav.home"), "Startseite");
    ctx.locale.toggle().unwrap();
    assert_eq!(text.t("nav.home"), "Home");
    assert_eq!(document.langs(), vec!["en".to_owned()]);
}

#[test]
fn native_store_is_in_memory_without_path() {
    let store = open_native_store(&ClientConfig::default()).unwrap();
    store.set(TOKEN_KEY, "t").unwrap();
    assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("t"));
}

#[test]
fn native_store_persists_to_configured_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let config = ClientConfig { store_path: Some(path.clone()), ..ClientConfig::default() };

    open_native_store(&config).unwrap().set(LANGUAGE_KEY, "en").unwrap();

    let reopened = open_native_store(&config).unwrap();
    assert_eq!(reopened.get(LANGUAGE_KEY).as_deref(), Some("en"));
    assert!(path.exists());
}
